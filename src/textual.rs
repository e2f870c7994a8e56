//! Legacy textual-dump backend.
//!
//! The snapshot is one concatenated dump string (see [`crate::dump`]) and the
//! on-disk form is a raw byte passthrough of it. This is the format the
//! legacy-compatibility check in the lifecycle engine reinterprets stored
//! files against, so current files written by this backend keep matching
//! after a migration to the structural backend.

use std::io::{Read, Write};

use crate::backend::{wrong_variant, Snapshot, SnapshotBackend};
use crate::diff;
use crate::dump::dump_value_set;
use crate::errors::SnapshotError;
use crate::value::ValueSet;

/// Backend that stores snapshots as deterministic pretty-printed text and
/// diffs them line by line.
#[derive(Debug, Default)]
pub struct TextualBackend;

impl TextualBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotBackend for TextualBackend {
    fn serialize(&self, values: &ValueSet) -> Result<Snapshot, SnapshotError> {
        Ok(Snapshot::Text(dump_value_set(values)))
    }

    fn write(&self, dest: &mut dyn Write, snapshot: &Snapshot) -> Result<u64, SnapshotError> {
        let Snapshot::Text(text) = snapshot else {
            return Err(wrong_variant("text", snapshot));
        };
        dest.write_all(text.as_bytes())
            .map_err(|e| SnapshotError::storage("writing snapshot bytes", e))?;
        Ok(text.len() as u64)
    }

    fn read(&self, src: &mut dyn Read) -> Result<Snapshot, SnapshotError> {
        let mut text = String::new();
        src.read_to_string(&mut text)
            .map_err(|e| SnapshotError::malformed(format!("snapshot is not valid UTF-8: {e}")))?;
        Ok(Snapshot::Text(text))
    }

    fn diff(&self, previous: Option<&Snapshot>, current: &Snapshot) -> String {
        let prev_text = match previous {
            Some(Snapshot::Text(text)) => text.as_str(),
            Some(Snapshot::Tree(_)) | None => "",
        };
        let cur_text = match current {
            Snapshot::Text(text) => text.as_str(),
            Snapshot::Tree(_) => "",
        };
        diff::unified(prev_text, cur_text)
    }
}
