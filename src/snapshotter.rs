//! The snapshot lifecycle engine.
//!
//! Orchestrates load-compare-update-report for a named slot: serialize the
//! captured values with the active backend, read the previous snapshot from
//! disk, diff, then either accept the match, reject with a diff, or rewrite
//! the file when an update is authorized. Includes the one-time migration
//! path that lets files written in the legacy textual format keep matching
//! under a different active backend.
//!
//! Concurrency: each compare is single-threaded and does synchronous file
//! I/O. No cross-call locking is provided; the caller must ensure one logical
//! slot is touched by at most one concurrent caller.

use std::fs::{self, File};
use std::io::ErrorKind;

use serde::Serialize;

use crate::backend::{Snapshot, SnapshotBackend};
use crate::config::{self, Config};
use crate::dump::dump_value_set;
use crate::errors::SnapshotError;
use crate::structural::StructuralBackend;
use crate::textual::TextualBackend;
use crate::value::ValueSet;

/// Compares values against the snapshots of one configured store.
///
/// Exactly one backend is active per instance; swapping backends changes the
/// on-disk byte format, and files written by the prior textual format keep
/// matching through the legacy-compatibility check.
///
/// # Examples
///
/// ```rust,no_run
/// use snapfile::Snapshotter;
///
/// let snapshotter = Snapshotter::new();
/// snapshotter.compare("greeting", &"hello").unwrap();
/// ```
pub struct Snapshotter {
    config: Config,
    backend: Box<dyn SnapshotBackend + Send + Sync>,
}

impl Snapshotter {
    /// A snapshotter with the default config and the textual backend.
    pub fn new() -> Self {
        Self::with_config(Config::new())
    }

    /// A snapshotter with the default config and the structural backend.
    pub fn structural() -> Self {
        Self::with_config_and_backend(Config::new(), Box::new(StructuralBackend::new()))
    }

    /// A snapshotter with a custom config and the textual backend.
    pub fn with_config(config: Config) -> Self {
        Self::with_config_and_backend(config, Box::new(TextualBackend::new()))
    }

    /// A snapshotter with a custom config and an explicit backend.
    pub fn with_config_and_backend(
        config: Config,
        backend: Box<dyn SnapshotBackend + Send + Sync>,
    ) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compares a single value against the named slot.
    ///
    /// A slot can hold at most one snapshot; to capture several values under
    /// one slot, collect them in a [`ValueSet`] and use [`Self::compare_set`].
    pub fn compare<T: Serialize + ?Sized>(
        &self,
        slot: &str,
        value: &T,
    ) -> Result<(), SnapshotError> {
        self.compare_set(slot, &ValueSet::of(value)?)
    }

    /// Compares a set of captured values, as one composite unit, against the
    /// named slot.
    ///
    /// Returns `Ok(())` when the snapshot matches (or was rewritten with
    /// fail-on-update disabled); any other outcome is a discriminated
    /// [`SnapshotError`].
    pub fn compare_set(&self, slot: &str, values: &ValueSet) -> Result<(), SnapshotError> {
        let slot = normalize_slot(slot);
        let current = self.backend.serialize(values)?;

        let path = self.config.snapshot_path(&slot);
        let stored = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if self.config.is_create_missing() {
                    return self.update_slot(&slot, None, &current);
                }
                return Err(SnapshotError::NoSnapshot { name: slot });
            }
            Err(e) => {
                return Err(SnapshotError::storage(
                    format!("reading snapshot file '{}'", path.display()),
                    e,
                ));
            }
        };

        // Backward-compatibility rule: a stored file whose raw bytes equal
        // the legacy textual dump of the input values counts as matched, no
        // matter what the active backend thinks of it. Byte-exact on purpose;
        // this must run before the backend parse so legacy-format files do
        // not fail as malformed under a newer backend.
        if dump_value_set(values).as_bytes() == stored.as_slice() {
            return Ok(());
        }

        let previous = self.backend.read(&mut stored.as_slice())?;
        let diff = self.backend.diff(Some(&previous), &current);
        if diff.is_empty() {
            return Ok(());
        }

        if self.config.update_authorized() {
            return self.update_slot(&slot, Some(&previous), &current);
        }

        Err(SnapshotError::Mismatch { name: slot, diff })
    }

    /// Writes `current` to the slot's file, creating the snapshot
    /// subdirectory on demand, and reports the Created/Updated outcome under
    /// the fail-on-update policy.
    fn update_slot(
        &self,
        slot: &str,
        previous: Option<&Snapshot>,
        current: &Snapshot,
    ) -> Result<(), SnapshotError> {
        let subdirectory = self.config.subdirectory_path();
        fs::create_dir_all(&subdirectory).map_err(|e| {
            SnapshotError::storage(
                format!("creating snapshots directory '{}'", subdirectory.display()),
                e,
            )
        })?;

        let path = self.config.snapshot_path(slot);
        let is_new = !path.exists();

        let mut file = File::create(&path).map_err(|e| {
            SnapshotError::storage(format!("creating snapshot file '{}'", path.display()), e)
        })?;
        self.backend.write(&mut file, current)?;

        if !self.config.is_fail_on_update() {
            return Ok(());
        }

        if is_new {
            let mut rendered = Vec::new();
            self.backend.write(&mut rendered, current)?;
            return Err(SnapshotError::Created {
                name: slot.to_string(),
                contents: String::from_utf8_lossy(&rendered).into_owned(),
            });
        }

        Err(SnapshotError::Updated {
            name: slot.to_string(),
            diff: self.backend.diff(previous, current),
        })
    }
}

impl Default for Snapshotter {
    fn default() -> Self {
        Self::new()
    }
}

/// Path separators are not allowed in a path segment; external slot names
/// (e.g. nested test names) may contain them.
fn normalize_slot(slot: &str) -> String {
    slot.replace(['/', '\\'], "-")
}

/// Compares a single value through the process-wide default config.
pub fn compare<T: Serialize + ?Sized>(slot: &str, value: &T) -> Result<(), SnapshotError> {
    Snapshotter::with_config(config::global()).compare(slot, value)
}

/// Compares a value set through the process-wide default config.
pub fn compare_set(slot: &str, values: &ValueSet) -> Result<(), SnapshotError> {
    Snapshotter::with_config(config::global()).compare_set(slot, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names_are_normalized_for_path_use() {
        assert_eq!(normalize_slot("module/case"), "module-case");
        assert_eq!(normalize_slot("a\\b/c"), "a-b-c");
        assert_eq!(normalize_slot("plain"), "plain");
    }
}
