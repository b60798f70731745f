use std::iter::FusedIterator;

/// A lexical unit of regex pattern text.
///
/// Only the constructs that affect capture numbering are distinguished; everything else is
/// reported as [`Token::Literal`] and is meant to be copied through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(&'a str),
    /// `({{name}})`
    GroupedPlaceholder { name: &'a str, raw: &'a str },
    /// `{{name}}`
    Placeholder { name: &'a str, raw: &'a str },
    /// `(`, `(?<name>` or `(?P<name>`
    CaptureOpen { name: Option<&'a str>, raw: &'a str },
    /// `\N` with a nonzero first digit
    Backreference { index: usize, raw: &'a str },
    Escape(&'a str),
    Class(&'a str),
    /// `# ...` up to (not including) the line break, free-spacing mode only
    Comment(&'a str),
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Token::Literal(raw)
            | Token::Escape(raw)
            | Token::Class(raw)
            | Token::Comment(raw)
            | Token::GroupedPlaceholder { raw, .. }
            | Token::Placeholder { raw, .. }
            | Token::CaptureOpen { raw, .. }
            | Token::Backreference { raw, .. } => raw,
        }
    }
}

#[inline]
fn is_placeholder_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

#[inline]
fn is_group_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Single-pass scanner over pattern text.
///
/// Tokens are matched by priority at each position: placeholder wrapped in a capturing
/// group, bare placeholder, capturing group open, backreference, any other escape,
/// character class. Placeholders are never recognized inside a character class.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    pattern: &'a str,
    pos: usize,
    free_spacing: bool,
    placeholders: bool,
    pending: Option<(Token<'a>, usize)>,
}

impl<'a> Lexer<'a> {
    pub fn new(pattern: &'a str) -> Self {
        Self {
            pattern,
            pos: 0,
            free_spacing: false,
            placeholders: true,
            pending: None,
        }
    }

    /// Treat `#` comments as opaque, as the engine does under the `x` flag.
    pub fn free_spacing(mut self, enabled: bool) -> Self {
        self.free_spacing = enabled;
        self
    }

    /// Whether `{{name}}` placeholders are recognized. Subpattern bodies are scanned without them.
    pub fn placeholders(mut self, enabled: bool) -> Self {
        self.placeholders = enabled;
        self
    }

    fn token_at(&self, start: usize) -> Option<(Token<'a>, usize)> {
        match self.pattern.as_bytes()[start] {
            b'(' => self.group_open_at(start),
            b'{' if self.placeholders => self.placeholder_at(start).map(|(name, end)| {
                (
                    Token::Placeholder {
                        name,
                        raw: &self.pattern[start..end],
                    },
                    end,
                )
            }),
            b'\\' => self.escape_at(start),
            b'[' => self.class_at(start),
            b'#' if self.free_spacing => Some(self.comment_at(start)),
            _ => None,
        }
    }

    fn placeholder_at(&self, start: usize) -> Option<(&'a str, usize)> {
        let bytes = self.pattern.as_bytes();
        if !bytes[start..].starts_with(b"{{") {
            return None;
        }
        let name_start = start + 2;
        let name_len = memchr::memmem::find(&bytes[name_start..], b"}}")?;
        if name_len == 0
            || !bytes[name_start..name_start + name_len]
                .iter()
                .all(|&b| is_placeholder_name_byte(b))
        {
            return None;
        }
        let name_end = name_start + name_len;
        Some((&self.pattern[name_start..name_end], name_end + 2))
    }

    fn group_open_at(&self, start: usize) -> Option<(Token<'a>, usize)> {
        let bytes = self.pattern.as_bytes();

        if let Some((name, end)) = bytes
            .get(start + 1)
            .filter(|&&b| self.placeholders && b == b'{')
            .and_then(|_| self.placeholder_at(start + 1))
            && bytes.get(end) == Some(&b')')
        {
            let raw = &self.pattern[start..end + 1];
            return Some((Token::GroupedPlaceholder { name, raw }, end + 1));
        }

        if bytes.get(start + 1) != Some(&b'?') {
            let raw = &self.pattern[start..start + 1];
            return Some((Token::CaptureOpen { name: None, raw }, start + 1));
        }

        let rest = &bytes[start..];
        let name_start = if rest.starts_with(b"(?<") {
            start + 3
        } else if rest.starts_with(b"(?P<") {
            start + 4
        } else {
            return None;
        };

        // `(?<=` and `(?<!` are lookbehinds
        let first = *bytes.get(name_start)?;
        if !(first.is_ascii_alphabetic() || first == b'_') {
            return None;
        }
        let mut name_end = name_start;
        while name_end < bytes.len() && is_group_name_byte(bytes[name_end]) {
            name_end += 1;
        }
        if bytes.get(name_end) != Some(&b'>') {
            return None;
        }

        let name = &self.pattern[name_start..name_end];
        let raw = &self.pattern[start..name_end + 1];
        Some((
            Token::CaptureOpen {
                name: Some(name),
                raw,
            },
            name_end + 1,
        ))
    }

    fn escape_at(&self, start: usize) -> Option<(Token<'a>, usize)> {
        let bytes = self.pattern.as_bytes();
        let escaped = self.pattern[start + 1..].chars().next()?;

        if matches!(escaped, '1'..='9') {
            let mut end = start + 2;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            let raw = &self.pattern[start..end];
            if let Ok(index) = raw[1..].parse::<usize>() {
                return Some((Token::Backreference { index, raw }, end));
            }
        }

        let end = start + 1 + escaped.len_utf8();
        Some((Token::Escape(&self.pattern[start..end]), end))
    }

    fn class_at(&self, start: usize) -> Option<(Token<'a>, usize)> {
        let bytes = self.pattern.as_bytes();
        let mut depth = 1usize;
        let mut i = skip_class_prefix(bytes, start + 1);

        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    i += 1;
                    if let Some(ch) = self.pattern.get(i..).and_then(|rest| rest.chars().next()) {
                        i += ch.len_utf8();
                    }
                }
                b'[' => {
                    depth += 1;
                    i = skip_class_prefix(bytes, i + 1);
                }
                b']' => {
                    depth -= 1;
                    i += 1;
                    if depth == 0 {
                        return Some((Token::Class(&self.pattern[start..i]), i));
                    }
                }
                _ => i += 1,
            }
        }

        // unterminated; left for the engine to reject
        None
    }

    fn comment_at(&self, start: usize) -> (Token<'a>, usize) {
        let end = memchr::memchr(b'\n', &self.pattern.as_bytes()[start..])
            .map_or(self.pattern.len(), |offset| start + offset);
        (Token::Comment(&self.pattern[start..end]), end)
    }
}

// A `]` directly after `[` or `[^` is a literal member of the class.
fn skip_class_prefix(bytes: &[u8], mut i: usize) -> usize {
    if bytes.get(i) == Some(&b'^') {
        i += 1;
    }
    if bytes.get(i) == Some(&b']') {
        i += 1;
    }
    i
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((token, end)) = self.pending.take() {
            self.pos = end;
            return Some(token);
        }

        let start = self.pos;
        let len = self.pattern.len();
        if start >= len {
            return None;
        }

        // Candidate bytes are all ASCII, so every `i` probed at a match is a char boundary.
        let mut i = start;
        while i < len {
            if let Some((token, end)) = self.token_at(i) {
                if i == start {
                    self.pos = end;
                    return Some(token);
                }
                self.pos = i;
                self.pending = Some((token, end));
                return Some(Token::Literal(&self.pattern[start..i]));
            }
            i += 1;
        }

        self.pos = len;
        Some(Token::Literal(&self.pattern[start..]))
    }
}

impl FusedIterator for Lexer<'_> {}
