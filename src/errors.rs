//! Snapfile Error Handling
//!
//! Every compare-or-update cycle resolves to `Ok(())` (matched) or one
//! discriminated `SnapshotError` variant. Only the outermost test-integration
//! layer decides fatal-stop vs. soft-fail vs. success; nothing in here retries
//! or swallows a failure.

use miette::Diagnostic;
use thiserror::Error;

/// The discriminated outcome of a failed compare-or-update cycle.
///
/// `Created` and `Updated` are "failures" only under the fail-on-update
/// policy; see [`crate::Config::fail_on_update`]. `Storage` and `Malformed`
/// are always hard failures.
#[derive(Debug, Error, Diagnostic)]
pub enum SnapshotError {
    /// The slot has no snapshot file and auto-create is disabled.
    #[error("no snapshot exists for '{name}'")]
    #[diagnostic(
        code(snapfile::no_snapshot),
        help("re-run with the update environment variable set (default UPDATE_SNAPSHOTS) or enable create_missing to record one")
    )]
    NoSnapshot { name: String },

    /// Genuine content difference and the update predicate denied a rewrite.
    #[error("snapshot '{name}' does not match the recorded value:\n{diff}")]
    #[diagnostic(
        code(snapfile::mismatch),
        help("re-run with the update environment variable set (default UPDATE_SNAPSHOTS) to accept the new value")
    )]
    Mismatch { name: String, diff: String },

    /// A brand-new snapshot file was written.
    #[error("recorded new snapshot '{name}' with contents:\n{contents}")]
    #[diagnostic(
        code(snapfile::created),
        help("commit the new snapshot file, or disable fail_on_update to accept new snapshots silently")
    )]
    Created { name: String, contents: String },

    /// An existing snapshot file was rewritten; carries the accepted diff.
    #[error("snapshot '{name}' was updated:\n{diff}")]
    #[diagnostic(
        code(snapfile::updated),
        help("review and commit the rewritten snapshot file")
    )]
    Updated { name: String, diff: String },

    /// Stored bytes could not be parsed by the active backend. There is no
    /// automatic backend fallback.
    #[error("malformed snapshot: {detail}")]
    #[diagnostic(
        code(snapfile::malformed),
        help("the stored bytes are unreadable by the active backend; delete the snapshot file and re-record it")
    )]
    Malformed { detail: String },

    /// A captured value could not be serialized.
    #[error("could not serialize value for snapshot")]
    #[diagnostic(code(snapfile::serialize))]
    Serialize {
        #[from]
        source: serde_json::Error,
    },

    /// Directory creation or file I/O failed.
    #[error("snapshot storage failure while {context}")]
    #[diagnostic(code(snapfile::storage))]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl SnapshotError {
    /// True for the outcomes produced by an authorized snapshot write.
    pub fn is_update(&self) -> bool {
        matches!(
            self,
            SnapshotError::Created { .. } | SnapshotError::Updated { .. }
        )
    }

    /// The diff text carried by this outcome, if any.
    pub fn diff(&self) -> Option<&str> {
        match self {
            SnapshotError::Mismatch { diff, .. } | SnapshotError::Updated { diff, .. } => {
                Some(diff)
            }
            _ => None,
        }
    }

    pub(crate) fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        SnapshotError::Storage {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        SnapshotError::Malformed {
            detail: detail.into(),
        }
    }
}
