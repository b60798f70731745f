use std::fmt::Write;

/// Escapes `text` so it matches itself verbatim, also under free-spacing mode where
/// unescaped whitespace and `#` would be dropped.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        if ch.is_whitespace() {
            let _ = write!(out, "\\x{{{:X}}}", u32::from(ch));
        } else if ch == '#' {
            out.push_str("\\#");
        } else {
            out.push_str(&fancy_regex::escape(ch.encode_utf8(&mut buf)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_metacharacters() {
        assert_eq!(escape_literal("a.b*c"), "a\\.b\\*c");
        assert_eq!(escape_literal("(x)[y]"), "\\(x\\)\\[y\\]");
    }

    #[test]
    fn encodes_whitespace_and_comment_marker() {
        assert_eq!(escape_literal("a b#"), "a\\x{20}b\\#");
        assert_eq!(escape_literal("\t\n"), "\\x{9}\\x{A}");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(escape_literal("héllo_42"), "héllo_42");
    }
}
