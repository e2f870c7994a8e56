pub use crate::backend::{Snapshot, SnapshotBackend};
pub use crate::config::{global, set_global, Config};
pub use crate::errors::SnapshotError;
pub use crate::report::{assert, print_failure, Reporter};
pub use crate::snapshotter::{compare, compare_set, Snapshotter};
pub use crate::structural::StructuralBackend;
pub use crate::textual::TextualBackend;
pub use crate::value::ValueSet;

pub mod backend;
pub mod config;
pub mod diff;
pub mod dump;
pub mod errors;
pub mod report;
pub mod snapshotter;
pub mod structural;
pub mod textual;
pub mod value;
