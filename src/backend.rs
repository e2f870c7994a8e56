//! The backend capability seam: serialize, persist, restore, diff.
//!
//! A backend is a named strategy bundling the four operations a snapshot
//! store needs. Exactly one backend is active per [`crate::Snapshotter`]
//! instance; swapping backends changes the on-disk byte format. Reading a
//! file written by a different prior backend is supported only through the
//! legacy-compatibility path in the lifecycle engine, never by cross-backend
//! deserialization here.

use std::io::{Read, Write};

use serde_json::Value;

use crate::errors::SnapshotError;
use crate::value::ValueSet;

/// An opaque serialized representation of one captured [`ValueSet`].
///
/// Each backend produces and consumes exactly one variant; handing a backend
/// the other variant is reported as [`SnapshotError::Malformed`].
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// Legacy textual dump: one concatenated string.
    Text(String),
    /// Structural form: the captured values as one ordered sequence.
    Tree(Vec<Value>),
}

impl Snapshot {
    pub fn kind(&self) -> &'static str {
        match self {
            Snapshot::Text(_) => "text",
            Snapshot::Tree(_) => "tree",
        }
    }
}

/// The serializer/differ capability every snapshot backend implements.
pub trait SnapshotBackend {
    /// Produces the composite snapshot for a set of captured values.
    ///
    /// Must be deterministic given equal inputs: stable key ordering, no
    /// pointer-identity leakage, no nondeterministic iteration order.
    fn serialize(&self, values: &ValueSet) -> Result<Snapshot, SnapshotError>;

    /// Persists a snapshot in a form `read` can restore. Returns the number
    /// of bytes written.
    fn write(&self, dest: &mut dyn Write, snapshot: &Snapshot) -> Result<u64, SnapshotError>;

    /// Restores a previously written snapshot. Fails with
    /// [`SnapshotError::Malformed`] when the bytes cannot be parsed by this
    /// backend.
    fn read(&self, src: &mut dyn Read) -> Result<Snapshot, SnapshotError>;

    /// Computes a human-readable diff between two snapshots.
    ///
    /// An empty string means the snapshots are equal. An absent `previous` is
    /// treated as this backend's zero value (empty string or empty sequence),
    /// never as an error.
    fn diff(&self, previous: Option<&Snapshot>, current: &Snapshot) -> String;
}

pub(crate) fn wrong_variant(expected: &'static str, found: &Snapshot) -> SnapshotError {
    SnapshotError::malformed(format!(
        "expected a {} snapshot, found a {} snapshot",
        expected,
        found.kind()
    ))
}
