//! Pure validators for reference classification.
//!
//! These helpers carry the text-level rules the classifier applies before
//! it will construct a [`Reference`](crate::Reference): BV id validation,
//! delimiter-aware bare-token scanning, and the false-positive guard that
//! keeps emoji/sticker codes from being mistaken for links.

/// The BV id payload alphabet: base58, excluding the ambiguous glyphs
/// `0`, `O`, `I` and `l`.
const BV_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Punctuation that delimits a bare BV token on either side.
///
/// Hyphen and underscore are deliberately absent: `abc-BV...` is part of a
/// larger token, not a video id.
const TOKEN_DELIMITERS: &str = "[]()（）【】<>《》“”‘’`~!@#$%^&*+=|\\:;,.?/";

/// Bracket-style punctuation used by emoji/sticker codes.
const BRACKET_PUNCT: &str = "[]()（）【】<>《》“”‘’";

/// Check whether a BV id follows the platform's encoding rules:
/// `BV` prefix plus exactly 10 characters of the base58 alphabet.
pub fn is_valid_bv_id(bv_id: &str) -> bool {
    if !bv_id.starts_with("BV") || bv_id.len() != 12 {
        return false;
    }
    bv_id[2..].chars().all(|c| BV_ALPHABET.contains(c))
}

/// Canonical page URL for a validated BV id.
pub fn canonical_video_url(bv_id: &str) -> String {
    format!("https://www.bilibili.com/video/{}", bv_id)
}

fn is_token_delimiter(c: char) -> bool {
    c.is_whitespace() || TOKEN_DELIMITERS.contains(c)
}

/// Scan `text` for a bare `BV`-prefixed video id.
///
/// A candidate only counts when it is delimited by whitespace, punctuation
/// or a string boundary on both sides, so a BV-shaped substring inside a
/// longer token never matches. Candidates that fail [`is_valid_bv_id`]
/// (wrong alphabet) are skipped and scanning continues.
pub fn find_bare_video_id(text: &str) -> Option<&str> {
    for (start, _) in text.match_indices("BV") {
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, is_token_delimiter);
        if !before_ok {
            continue;
        }

        let rest = &text[start + 2..];
        if rest.len() < 10 || !rest.is_char_boundary(10) {
            continue;
        }
        let after_ok = rest[10..].chars().next().map_or(true, is_token_delimiter);
        if !after_ok {
            continue;
        }

        let token = &text[start..start + 12];
        if is_valid_bv_id(token) {
            return Some(token);
        }
    }
    None
}

/// Guard against emoji/sticker codes being classified as references.
///
/// Short bracketed strings and strings dominated by non-word, non-CJK
/// characters are sticker codes in practice, not platform links.
pub fn is_likely_false_positive(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < 20 && trimmed.chars().any(|c| BRACKET_PUNCT.contains(c)) {
        return true;
    }

    let total = text.chars().count();
    if total == 0 {
        return false;
    }
    let special = text
        .chars()
        .filter(|&c| !(c.is_alphanumeric() || c == '_' || c.is_whitespace()))
        .count();
    special as f64 > total as f64 * 0.3
}
