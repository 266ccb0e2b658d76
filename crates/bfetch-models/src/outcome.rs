//! The uniform retrieval result handed to the delivery layer.

use std::path::{Path, PathBuf};

/// Result of one retrieval attempt.
///
/// The delivery layer owns size-gating and message composition; this type
/// only distinguishes "nothing to do" from success and failure and carries
/// the artifact path when one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalOutcome {
    /// The text carried no recognizable reference. A no-op, not a failure.
    NotApplicable,
    /// Retrieval produced (or found cached) an artifact on disk.
    Success { message: String, artifact: PathBuf },
    /// Retrieval failed; `message` is the user-reportable reason.
    Failure { message: String },
}

impl RetrievalOutcome {
    pub fn success(message: impl Into<String>, artifact: impl Into<PathBuf>) -> Self {
        Self::Success {
            message: message.into(),
            artifact: artifact.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The artifact path, present only on success.
    pub fn artifact(&self) -> Option<&Path> {
        match self {
            Self::Success { artifact, .. } => Some(artifact),
            _ => None,
        }
    }

    /// The user-reportable message, absent for the no-op outcome.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::NotApplicable => None,
            Self::Success { message, .. } | Self::Failure { message } => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let ok = RetrievalOutcome::success("done", "/tmp/a.mp4");
        assert!(ok.is_success());
        assert_eq!(ok.artifact(), Some(Path::new("/tmp/a.mp4")));
        assert_eq!(ok.message(), Some("done"));

        let failed = RetrievalOutcome::failure("no audio stream");
        assert!(!failed.is_success());
        assert_eq!(failed.artifact(), None);

        assert_eq!(RetrievalOutcome::NotApplicable.message(), None);
    }
}
