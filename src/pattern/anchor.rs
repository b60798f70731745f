use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// Empty noncapturing groups may pad the anchors of generated patterns.
static LEADING_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\(\?:\))*\^").expect("leading anchor pattern is valid"));
static TRAILING_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(?:\(\?:\))*$").expect("trailing anchor pattern is valid"));
static ESCAPED_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\.").expect("escape pattern is valid"));

/// Strips a leading `^` and a trailing unescaped `$` when both are present.
///
/// Only one anchor is removed from each end, so `^^abc$$` keeps a real anchor pair.
#[tracing::instrument(level = "trace", skip(pattern), fields(pattern_len = pattern.len() as u64))]
pub fn deanchor(pattern: &str) -> Cow<'_, str> {
    if !LEADING_ANCHOR.is_match(pattern) || !TRAILING_ANCHOR.is_match(pattern) {
        return Cow::Borrowed(pattern);
    }

    if memchr::memchr(b'\\', pattern.as_bytes()).is_some() {
        let unescaped = ESCAPED_CHAR.replace_all(pattern, "");
        if !TRAILING_ANCHOR.is_match(&unescaped) {
            return Cow::Borrowed(pattern);
        }
    }

    let head = LEADING_ANCHOR
        .find(pattern)
        .map_or(0, |leading| leading.end());
    let tail = TRAILING_ANCHOR
        .find(pattern)
        .map_or(pattern.len(), |trailing| trailing.start());

    Cow::Owned(pattern[head..tail].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_single_anchor_pair() {
        assert_eq!(deanchor("^abc$"), "abc");
        assert_eq!(deanchor("^[0-5][0-9]$"), "[0-5][0-9]");
    }

    #[test]
    fn doubled_anchors_keep_one_pair() {
        assert_eq!(deanchor("^^abc$$"), "^abc$");
    }

    #[test]
    fn requires_both_anchors() {
        assert_eq!(deanchor("^abc"), "^abc");
        assert_eq!(deanchor("abc$"), "abc$");
        assert_eq!(deanchor("ab\\$"), "ab\\$");
    }

    #[test]
    fn escaped_trailing_dollar_is_not_an_anchor() {
        assert_eq!(deanchor("^ab\\$"), "^ab\\$");
        assert_eq!(deanchor("^ab\\\\$"), "ab\\\\");
    }

    #[test]
    fn strips_empty_group_padding() {
        assert_eq!(deanchor("(?:)(?:)^abc$(?:)"), "abc");
    }

    #[test]
    fn lone_anchor_pair_becomes_empty() {
        assert_eq!(deanchor("^$"), "");
    }
}
