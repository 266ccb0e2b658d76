//! Filesystem-safe artifact naming.
//!
//! Artifacts are keyed by sanitized title: presence of the expected
//! filename is what makes retrieval idempotent, so naming must be
//! deterministic. Distinct titles that sanitize to the same string are
//! last-writer-wins.

/// Characters stripped from titles before they become filenames.
const UNSAFE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strip filesystem-unsafe characters from a title.
pub fn sanitize_title(title: &str) -> String {
    title.chars().filter(|c| !UNSAFE_CHARS.contains(c)).collect()
}

/// Final filename for a muxed video artifact.
pub fn video_file_name(title: &str) -> String {
    format!("{}.mp4", sanitize_title(title))
}

/// Final filename for a rendered opus screenshot.
pub fn opus_file_name(title: &str, author: Option<&str>) -> String {
    match author {
        Some(author) => format!("opus_{}_{}.png", sanitize_title(title), sanitize_title(author)),
        None => format!("opus_{}.png", sanitize_title(title)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_unsafe_chars() {
        assert_eq!(sanitize_title(r#"a<b>c:d"e/f\g|h?i*j"#), "abcdefghij");
        assert_eq!(sanitize_title("【合集】第1期 1/2"), "【合集】第1期 12");
        assert_eq!(sanitize_title("plain title"), "plain title");
    }

    #[test]
    fn test_video_file_name() {
        assert_eq!(video_file_name("标题: 测试?"), "标题 测试.mp4");
    }

    #[test]
    fn test_opus_file_name_with_and_without_author() {
        assert_eq!(opus_file_name("动态", Some("up主")), "opus_动态_up主.png");
        assert_eq!(opus_file_name("动态", None), "opus_动态.png");
    }
}
