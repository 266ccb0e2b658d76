//! Opus page fetching and metadata extraction.

use std::sync::OnceLock;

use regex::Regex;

/// Referer presented when fetching opus pages.
pub(crate) const OPUS_REFERER: &str = "https://www.bilibili.com/";

/// Site-name suffix stripped from page titles.
const SITE_TITLE_SUFFIX: &str = " - 哔哩哔哩";

/// Metadata extracted from an opus page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpusInfo {
    pub title: String,
    /// Best-effort; an opus without an extractable author is normal.
    pub author: Option<String>,
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<title>(.*?)</title>").expect("valid regex"))
}

/// Author extraction patterns, tried in order; first match wins.
fn author_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r#""author":"([^"]+)""#).expect("valid regex"),
            Regex::new(r#""uname":"([^"]+)""#).expect("valid regex"),
            Regex::new(r#"<span class="up-name">([^<]+)</span>"#).expect("valid regex"),
        ]
    })
}

/// Extract title (site suffix stripped) and best-effort author.
///
/// Returns `None` when the page carries no usable title; rendering must
/// not proceed in that case because the artifact is title-keyed.
pub fn extract_opus_info(html: &str) -> Option<OpusInfo> {
    let title = title_re()
        .captures(html)
        .map(|caps| caps[1].replace(SITE_TITLE_SUFFIX, "").trim().to_string())
        .filter(|title| !title.is_empty())?;

    let author = author_patterns()
        .iter()
        .find_map(|pattern| pattern.captures(html).map(|caps| caps[1].to_string()));

    Some(OpusInfo { title, author })
}
