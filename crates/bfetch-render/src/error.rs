//! Error types for opus rendering.

use thiserror::Error;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering an opus page.
///
/// Individual backend failures never reach the caller; the cascade logs
/// them and reports only the aggregate exhaustion.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unable to extract opus title")]
    TitleMissing,

    #[error("all rendering strategies failed")]
    AllBackendsFailed,

    #[error("{backend} backend failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    #[error("network request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Create a backend failure error.
    pub fn backend(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            backend,
            message: message.into(),
        }
    }
}
