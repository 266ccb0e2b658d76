//! Error types for media retrieval.

use bfetch_models::StreamTrack;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while retrieving and assembling a video.
///
/// Display strings double as the user-reportable failure reasons, so each
/// upstream shape mismatch gets its own variant instead of a catch-all.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("ffmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("ffmpeg failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("unable to extract video title")]
    TitleMissing,

    #[error("unable to find playinfo in video page")]
    PlayInfoMissing,

    #[error("no usable {track} stream in manifest")]
    MissingStream { track: StreamTrack },

    #[error("download failed: {message}")]
    DownloadFailed { message: String },

    #[error("network request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("playinfo parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create an ffmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a download failure error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    /// Create a missing-stream error for a track.
    pub fn missing_stream(track: StreamTrack) -> Self {
        Self::MissingStream { track }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_stream_messages_are_distinct() {
        let audio = MediaError::missing_stream(StreamTrack::Audio).to_string();
        let video = MediaError::missing_stream(StreamTrack::Video).to_string();
        assert!(audio.contains("audio"));
        assert!(video.contains("video"));
        assert_ne!(audio, video);
    }
}
