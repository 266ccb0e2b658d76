//! Classified references to remote media.

use std::fmt;

/// What a classified reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// A short-form video page (downloaded and muxed to MP4).
    Video,
    /// A text/image opus post (rendered to PNG).
    Opus,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Video => "video",
            ReferenceKind::Opus => "opus",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified, canonicalized pointer to one remote video or opus post.
///
/// Only the classifier constructs these, and only from input that passed
/// its validation rules. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    kind: ReferenceKind,
    url: String,
}

impl Reference {
    /// Create a video reference from an already-validated canonical URL.
    pub fn video(url: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Video,
            url: url.into(),
        }
    }

    /// Create an opus reference from an already-validated canonical URL.
    pub fn opus(url: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Opus,
            url: url.into(),
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_accessors() {
        let r = Reference::video("https://www.bilibili.com/video/BV1xx411c7mD");
        assert_eq!(r.kind(), ReferenceKind::Video);
        assert_eq!(r.url(), "https://www.bilibili.com/video/BV1xx411c7mD");

        let o = Reference::opus("https://t.bilibili.com/123456");
        assert_eq!(o.kind(), ReferenceKind::Opus);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ReferenceKind::Video.to_string(), "video");
        assert_eq!(ReferenceKind::Opus.to_string(), "opus");
    }
}
