//! DASH playinfo manifest model and stream selection.
//!
//! The upstream page embeds a `window.__playinfo__` JSON payload whose
//! shape drifts and whose fields go missing without notice. Every field
//! here is optional; selection walks candidates instead of assuming any
//! of them exist.

use std::fmt;

use serde::Deserialize;

/// Which track of the manifest to select from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamTrack {
    Audio,
    Video,
}

impl StreamTrack {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamTrack::Audio => "audio",
            StreamTrack::Video => "video",
        }
    }
}

impl fmt::Display for StreamTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One candidate stream URL set for a quality tier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamVariant {
    #[serde(rename = "backupUrl", alias = "backup_url", default)]
    pub backup_url: Option<Vec<String>>,
    #[serde(rename = "baseUrl", alias = "base_url", default)]
    pub base_url: Option<String>,
}

/// Embedded playinfo payload: `data.dash.{audio,video}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayInfo {
    #[serde(default)]
    pub data: Option<PlayData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayData {
    #[serde(default)]
    pub dash: Option<DashStreams>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashStreams {
    #[serde(default)]
    pub audio: Option<Vec<StreamVariant>>,
    #[serde(default)]
    pub video: Option<Vec<StreamVariant>>,
}

impl PlayInfo {
    /// The variant list for a track, empty when any level is missing.
    pub fn track_variants(&self, track: StreamTrack) -> &[StreamVariant] {
        let dash = self.data.as_ref().and_then(|d| d.dash.as_ref());
        let variants = match track {
            StreamTrack::Audio => dash.and_then(|d| d.audio.as_ref()),
            StreamTrack::Video => dash.and_then(|d| d.video.as_ref()),
        };
        variants.map(Vec::as_slice).unwrap_or(&[])
    }

    /// Select a usable stream URL for a track, if any variant has one.
    pub fn stream_url(&self, track: StreamTrack) -> Option<&str> {
        select_stream_url(self.track_variants(track))
    }
}

/// Pick a stream URL from a variant list with ordered fallback.
///
/// Index priority is `[2, 1, 0, last]`: the empirically preferred quality
/// tier first, then lower tiers, then whatever the list ends with.
/// Out-of-range indices are skipped, no index is tried twice, and at each
/// index `backupUrl[0]` wins over `baseUrl`. Returns `None` when every
/// candidate lacks a usable URL.
pub fn select_stream_url(variants: &[StreamVariant]) -> Option<&str> {
    let last = variants.len().checked_sub(1)?;
    let mut tried: Vec<usize> = Vec::with_capacity(4);

    for index in [2, 1, 0, last] {
        if index >= variants.len() || tried.contains(&index) {
            continue;
        }
        tried.push(index);
        if let Some(url) = variant_url(&variants[index]) {
            return Some(url);
        }
    }
    None
}

fn variant_url(variant: &StreamVariant) -> Option<&str> {
    if let Some(backups) = &variant.backup_url {
        if let Some(first) = backups.first() {
            if !first.is_empty() {
                return Some(first);
            }
        }
    }
    match &variant.base_url {
        Some(url) if !url.is_empty() => Some(url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(backup: Option<&[&str]>, base: Option<&str>) -> StreamVariant {
        StreamVariant {
            backup_url: backup.map(|urls| urls.iter().map(|u| u.to_string()).collect()),
            base_url: base.map(|u| u.to_string()),
        }
    }

    #[test]
    fn test_prefers_index_two() {
        let variants = vec![
            variant(None, Some("v0")),
            variant(None, Some("v1")),
            variant(None, Some("v2")),
            variant(None, Some("v3")),
        ];
        assert_eq!(select_stream_url(&variants), Some("v2"));
    }

    #[test]
    fn test_falls_back_to_index_one_when_two_absent() {
        // Variants only at indices 0 and 1: index 2 is out of range, so
        // index 1 is next in priority, and backupUrl[0] beats baseUrl.
        let variants = vec![
            variant(None, Some("v0")),
            variant(Some(&["backup1"]), Some("base1")),
        ];
        assert_eq!(select_stream_url(&variants), Some("backup1"));
    }

    #[test]
    fn test_skips_unusable_index_without_error() {
        let variants = vec![
            variant(None, Some("v0")),
            variant(None, None),
            variant(Some(&[]), Some("")),
        ];
        // Index 2 yields nothing, index 1 yields nothing, index 0 wins.
        assert_eq!(select_stream_url(&variants), Some("v0"));
    }

    #[test]
    fn test_all_variants_empty_returns_none() {
        let variants = vec![variant(None, None), variant(Some(&[]), Some(""))];
        assert_eq!(select_stream_url(&variants), None);
        assert_eq!(select_stream_url(&[]), None);
    }

    #[test]
    fn test_last_index_not_retried() {
        // Single-element list: last aliases index 0, which was already
        // tried and found empty. Exactly one probe, then None.
        let variants = vec![variant(None, None)];
        assert_eq!(select_stream_url(&variants), None);
    }

    #[test]
    fn test_last_index_used_for_long_lists() {
        let mut variants = vec![variant(None, None); 5];
        variants[4] = variant(None, Some("tail"));
        assert_eq!(select_stream_url(&variants), Some("tail"));
    }

    #[test]
    fn test_parses_partial_manifest_json() {
        let raw = r#"{
            "data": {
                "dash": {
                    "video": [
                        {"baseUrl": "http://v/0"},
                        {"backupUrl": ["http://v/1b"], "baseUrl": "http://v/1"}
                    ]
                }
            }
        }"#;
        let info: PlayInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(info.stream_url(StreamTrack::Video), Some("http://v/1b"));
        assert_eq!(info.stream_url(StreamTrack::Audio), None);
    }

    #[test]
    fn test_parses_snake_case_aliases() {
        let raw = r#"{"data": {"dash": {"audio": [{"base_url": "http://a/0"}]}}}"#;
        let info: PlayInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(info.stream_url(StreamTrack::Audio), Some("http://a/0"));
    }

    #[test]
    fn test_tolerates_missing_levels() {
        let info: PlayInfo = serde_json::from_str("{}").unwrap();
        assert_eq!(info.stream_url(StreamTrack::Video), None);

        let info: PlayInfo = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert!(info.track_variants(StreamTrack::Audio).is_empty());
    }
}
