use bitflags::bitflags;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Flags: u8 {
        const IGNORE_CASE = 0b00000001;
        const MULTI_LINE = 0b00000010;
        const DOT_MATCHES_NEW_LINE = 0b00000100;
        const EXTENDED = 0b00001000;
        const SWAP_GREED = 0b00010000;
    }
}

// canonical rendering order
const FLAG_LETTERS: [(Flags, char); 5] = [
    (Flags::IGNORE_CASE, 'i'),
    (Flags::MULTI_LINE, 'm'),
    (Flags::DOT_MATCHES_NEW_LINE, 's'),
    (Flags::EXTENDED, 'x'),
    (Flags::SWAP_GREED, 'U'),
];

static LEADING_MODIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(\?([A-Za-z]+)\)").expect("leading modifier pattern is valid")
});

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlagsError {
    #[error("unknown flag '{flag}' in '{flags}'")]
    UnknownFlag { flag: char, flags: String },
}

pub type FlagsResult<T> = Result<T, FlagsError>;

impl Flags {
    /// Parses flag letters in any order; duplicates are collapsed.
    pub fn parse(text: &str) -> FlagsResult<Self> {
        let mut flags = Flags::empty();
        for ch in text.chars() {
            flags |= Self::from_letter(ch).ok_or_else(|| FlagsError::UnknownFlag {
                flag: ch,
                flags: text.to_string(),
            })?;
        }
        Ok(flags)
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        FLAG_LETTERS
            .iter()
            .find(|(_, letter)| *letter == ch)
            .map(|(flag, _)| *flag)
    }

    pub fn is_extended(&self) -> bool {
        self.contains(Flags::EXTENDED)
    }

    /// Renders the set as an inline group such as `(?ix)`, or an empty string when no flag is set.
    pub fn to_inline_group(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!("(?{self})")
    }

    /// Flags declared by a leading inline modifier group, e.g. `(?x)` at the very start of a pattern.
    ///
    /// Letters outside this set, such as `u`, stay in the pattern text for the engine to judge.
    pub fn from_leading_modifier(pattern: &str) -> Option<Self> {
        let caps = LEADING_MODIFIER.captures(pattern)?;
        let flags = caps[1]
            .chars()
            .filter_map(Self::from_letter)
            .fold(Flags::empty(), |acc, flag| acc | flag);
        (!flags.is_empty()).then_some(flags)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, letter) in FLAG_LETTERS {
            if self.contains(flag) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Flags {
    type Err = FlagsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letters_in_any_order_and_collapses_duplicates() {
        let flags = Flags::parse("xix").unwrap();
        assert_eq!(flags, Flags::IGNORE_CASE | Flags::EXTENDED);
        assert_eq!(flags.to_string(), "ix");
    }

    #[test]
    fn rejects_unknown_letters() {
        let err = Flags::parse("xn").unwrap_err();
        assert_eq!(
            err,
            FlagsError::UnknownFlag {
                flag: 'n',
                flags: "xn".to_string()
            }
        );
    }

    #[test]
    fn renders_inline_group() {
        assert_eq!(Flags::empty().to_inline_group(), "");
        assert_eq!(
            (Flags::SWAP_GREED | Flags::MULTI_LINE).to_inline_group(),
            "(?mU)"
        );
    }

    #[test]
    fn reads_leading_modifier_only_at_start() {
        assert_eq!(
            Flags::from_leading_modifier("(?x)^ a $"),
            Some(Flags::EXTENDED)
        );
        assert_eq!(Flags::from_leading_modifier("a(?x)b"), None);
        assert_eq!(Flags::from_leading_modifier("(?:a)"), None);
        assert_eq!(Flags::from_leading_modifier("(?i-x)a"), None);
    }

    #[test]
    fn leading_modifier_skips_letters_left_to_the_engine() {
        assert_eq!(
            Flags::from_leading_modifier("(?ux)a"),
            Some(Flags::EXTENDED)
        );
        assert_eq!(Flags::from_leading_modifier("(?u)a"), None);
    }
}
