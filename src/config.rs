//! Snapshotting configuration.
//!
//! A plain settings struct with named toggles, builder-style customization,
//! and a process-wide default instance. Clones are value-deep: mutating a
//! derived copy never affects the shared default, and replacing the shared
//! default never affects instances built from an earlier clone.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

/// Zero-argument query deciding whether a mismatched snapshot may be
/// rewritten.
pub type UpdatePredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// The environment variable the default update predicate checks for.
pub const DEFAULT_ENV_VARIABLE: &str = "UPDATE_SNAPSHOTS";

/// Default name of the subdirectory snapshots are stored in.
pub const DEFAULT_SUBDIRECTORY: &str = ".snapshots";

static GLOBAL: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::new()));

/// Settings for one [`crate::Snapshotter`] instance.
///
/// # Examples
///
/// ```rust
/// use snapfile::Config;
/// let config = Config::new()
///     .subdirectory("testdata")
///     .fail_on_update(false)
///     .file_extension(".html");
/// ```
#[derive(Clone)]
pub struct Config {
    should_update: UpdatePredicate,
    subdirectory: String,
    fail_on_update: bool,
    create_missing: bool,
    fatal_on_mismatch: bool,
    file_extension: String,
}

impl Config {
    /// A config with the stock defaults: update on `UPDATE_SNAPSHOTS`
    /// presence, `.snapshots` subdirectory, fail on update, create missing
    /// snapshots automatically, nonfatal mismatches, no file extension.
    pub fn new() -> Self {
        Self {
            should_update: Arc::new(|| env_variable_set(DEFAULT_ENV_VARIABLE)),
            subdirectory: DEFAULT_SUBDIRECTORY.to_string(),
            fail_on_update: true,
            create_missing: true,
            fatal_on_mismatch: false,
            file_extension: String::new(),
        }
    }

    /// Watches a different environment variable for update authorization.
    pub fn env_variable(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.should_update = Arc::new(move || env_variable_set(&name));
        self
    }

    /// Installs custom logic deciding whether snapshots may be rewritten.
    pub fn should_update(mut self, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.should_update = Arc::new(predicate);
        self
    }

    /// Changes the directory snapshots are stored in.
    pub fn subdirectory(mut self, name: impl Into<String>) -> Self {
        self.subdirectory = name.into();
        self
    }

    /// Controls whether created/updated snapshots are reported as failures.
    /// Defaults to true so snapshots are not accidentally rewritten in CI.
    pub fn fail_on_update(mut self, fail: bool) -> Self {
        self.fail_on_update = fail;
        self
    }

    /// Controls whether a missing snapshot is created automatically on first
    /// compare. Defaults to true.
    pub fn create_missing(mut self, create: bool) -> Self {
        self.create_missing = create;
        self
    }

    /// Controls whether a reporter receives a hard-stop failure instead of a
    /// soft one. Defaults to false.
    pub fn fatal_on_mismatch(mut self, fatal: bool) -> Self {
        self.fatal_on_mismatch = fatal;
        self
    }

    /// Appends an extension to every snapshot file name, e.g. `".html"`.
    pub fn file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    pub(crate) fn update_authorized(&self) -> bool {
        (self.should_update)()
    }

    pub(crate) fn is_fail_on_update(&self) -> bool {
        self.fail_on_update
    }

    pub(crate) fn is_create_missing(&self) -> bool {
        self.create_missing
    }

    pub(crate) fn is_fatal_on_mismatch(&self) -> bool {
        self.fatal_on_mismatch
    }

    pub(crate) fn subdirectory_path(&self) -> PathBuf {
        PathBuf::from(&self.subdirectory)
    }

    /// The file a slot maps to: `<subdirectory>/<slot><extension>`.
    pub(crate) fn snapshot_path(&self, slot: &str) -> PathBuf {
        self.subdirectory_path()
            .join(format!("{}{}", slot, self.file_extension))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("subdirectory", &self.subdirectory)
            .field("fail_on_update", &self.fail_on_update)
            .field("create_missing", &self.create_missing)
            .field("fatal_on_mismatch", &self.fatal_on_mismatch)
            .field("file_extension", &self.file_extension)
            .finish_non_exhaustive()
    }
}

/// Returns a clone of the process-wide default config.
pub fn global() -> Config {
    GLOBAL
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Replaces the process-wide default config.
///
/// Affects only calls made through the shared default (the free functions in
/// this crate); instances constructed from an earlier [`global`] clone keep
/// their settings.
pub fn set_global(config: Config) {
    let mut guard = GLOBAL
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = config;
}

fn env_variable_set(name: &str) -> bool {
    env::var_os(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_are_independent() {
        let base = Config::new().subdirectory("one");
        let derived = base.clone().subdirectory("two").fail_on_update(false);
        assert_eq!(base.snapshot_path("x"), PathBuf::from("one/x"));
        assert_eq!(derived.snapshot_path("x"), PathBuf::from("two/x"));
        assert!(base.is_fail_on_update());
        assert!(!derived.is_fail_on_update());
    }

    #[test]
    fn extension_is_appended_to_the_slot_file() {
        let config = Config::new().subdirectory("snaps").file_extension(".html");
        assert_eq!(config.snapshot_path("page"), PathBuf::from("snaps/page.html"));
    }

    #[test]
    fn custom_predicate_controls_update_authorization() {
        let config = Config::new().should_update(|| true);
        assert!(config.update_authorized());
        let config = Config::new().should_update(|| false);
        assert!(!config.update_authorized());
    }
}
