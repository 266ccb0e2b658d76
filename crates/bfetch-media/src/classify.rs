//! Reference classification over free-form chat text.
//!
//! Most messages carry no reference at all; returning `None` is the
//! normal outcome. Opus shapes are checked before video shapes, full URLs
//! before bare BV tokens, and short links are resolved before they are
//! allowed to count as video references.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use bfetch_models::{
    canonical_video_url, find_bare_video_id, is_likely_false_positive, Reference,
};

use crate::resolve::LinkResolver;

fn opus_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"https?://www\.bilibili\.com/opus/\d+").expect("valid regex"),
            Regex::new(r"https?://t\.bilibili\.com/\d+").expect("valid regex"),
        ]
    })
}

/// Video URL shapes in priority order. The flag marks the short-domain
/// form, which is indirection and must resolve before it counts.
fn video_patterns() -> &'static [(Regex, bool)] {
    static PATTERNS: OnceLock<Vec<(Regex, bool)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (
                Regex::new(r"https?://www\.bilibili\.com/video/[a-zA-Z0-9?&=]+")
                    .expect("valid regex"),
                false,
            ),
            (
                Regex::new(r"https?://b23\.tv/[a-zA-Z0-9]+").expect("valid regex"),
                true,
            ),
            (
                Regex::new(r"https?://m\.bilibili\.com/video/[a-zA-Z0-9?&=]+")
                    .expect("valid regex"),
                false,
            ),
            (
                Regex::new(r"https?://bilibili\.com/video/[a-zA-Z0-9?&=]+").expect("valid regex"),
                false,
            ),
        ]
    })
}

/// Classify chat text into a media reference, if it carries one.
pub async fn classify(text: &str, resolver: &dyn LinkResolver) -> Option<Reference> {
    if is_likely_false_positive(text) {
        debug!("rejected text as likely sticker/emoji code");
        return None;
    }

    for pattern in opus_patterns() {
        if let Some(m) = pattern.find(text) {
            return Some(Reference::opus(m.as_str()));
        }
    }

    for (pattern, is_short) in video_patterns() {
        let Some(m) = pattern.find(text) else {
            continue;
        };
        if !*is_short {
            return Some(Reference::video(m.as_str()));
        }

        let resolved = resolver.resolve(m.as_str()).await;
        if resolved.contains("bilibili.com/video/") {
            return Some(Reference::video(resolved));
        }
        // Unresolvable or non-video target: this candidate is discarded
        // and scanning continues with the remaining patterns.
        debug!(url = m.as_str(), resolved = %resolved, "short link did not resolve to a video");
    }

    find_bare_video_id(text).map(|bv_id| Reference::video(canonical_video_url(bv_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bfetch_models::ReferenceKind;

    /// Resolver that returns a fixed URL, standing in for the network.
    struct FixedResolver(&'static str);

    #[async_trait]
    impl LinkResolver for FixedResolver {
        async fn resolve(&self, _url: &str) -> String {
            self.0.to_string()
        }
    }

    /// Resolver that echoes its input, like a failed resolution does.
    struct EchoResolver;

    #[async_trait]
    impl LinkResolver for EchoResolver {
        async fn resolve(&self, url: &str) -> String {
            url.to_string()
        }
    }

    #[tokio::test]
    async fn test_classifies_opus_urls() {
        let r = classify("看看 https://www.bilibili.com/opus/912345678901234567", &EchoResolver)
            .await
            .unwrap();
        assert_eq!(r.kind(), ReferenceKind::Opus);
        assert_eq!(r.url(), "https://www.bilibili.com/opus/912345678901234567");

        let r = classify("https://t.bilibili.com/912345678901234567 这条动态", &EchoResolver)
            .await
            .unwrap();
        assert_eq!(r.kind(), ReferenceKind::Opus);
    }

    #[tokio::test]
    async fn test_classifies_full_video_url() {
        let r = classify(
            "分享 https://www.bilibili.com/video/BV1xx411c7mD?p=1 给你",
            &EchoResolver,
        )
        .await
        .unwrap();
        assert_eq!(r.kind(), ReferenceKind::Video);
        assert_eq!(r.url(), "https://www.bilibili.com/video/BV1xx411c7mD?p=1");
    }

    #[tokio::test]
    async fn test_short_link_resolving_to_video_is_accepted() {
        let resolver = FixedResolver("https://www.bilibili.com/video/BV1xx411c7mD");
        let r = classify("https://b23.tv/abc123", &resolver).await.unwrap();
        assert_eq!(r.kind(), ReferenceKind::Video);
        assert_eq!(r.url(), "https://www.bilibili.com/video/BV1xx411c7mD");
    }

    #[tokio::test]
    async fn test_unresolved_short_link_is_discarded() {
        // Resolution degraded to the original URL: no video shape, so the
        // candidate is dropped and nothing else matches.
        assert_eq!(classify("https://b23.tv/abc123", &EchoResolver).await, None);

        // Short link resolving to a non-video page is dropped too.
        let resolver = FixedResolver("https://www.bilibili.com/read/cv123");
        assert_eq!(classify("https://b23.tv/abc123", &resolver).await, None);
    }

    #[tokio::test]
    async fn test_bare_bv_token_end_to_end() {
        let r = classify("看这个 BV1xx411c7mD 不错", &EchoResolver)
            .await
            .unwrap();
        assert_eq!(r.kind(), ReferenceKind::Video);
        assert_eq!(r.url(), "https://www.bilibili.com/video/BV1xx411c7mD");
    }

    #[tokio::test]
    async fn test_sticker_text_is_rejected() {
        assert_eq!(classify("😂🤣[doge]", &EchoResolver).await, None);
    }

    #[tokio::test]
    async fn test_plain_text_has_no_reference() {
        assert_eq!(
            classify("今天天气不错，出去走走吧，顺便买点东西回来", &EchoResolver).await,
            None
        );
    }
}
