use super::PatternResult;
use super::anchor::deanchor;
use crate::expression::{Expression, compile, names_of};
use crate::flags::Flags;
use crate::options::BuildOptions;
use crate::types::{CaptureNames, FastHashMap};

/// A value that can be embedded through a `{{name}}` placeholder.
#[derive(Debug, Clone)]
pub enum Subpattern {
    Source(String),
    Expression(Expression),
}

impl From<&str> for Subpattern {
    fn from(source: &str) -> Self {
        Subpattern::Source(source.to_string())
    }
}

impl From<String> for Subpattern {
    fn from(source: String) -> Self {
        Subpattern::Source(source)
    }
}

impl From<Expression> for Subpattern {
    fn from(expression: Expression) -> Self {
        Subpattern::Expression(expression)
    }
}

impl From<fancy_regex::Regex> for Subpattern {
    fn from(regex: fancy_regex::Regex) -> Self {
        Subpattern::Expression(Expression::from(regex))
    }
}

/// Placeholder name to subpattern lookup. Iteration order never affects the composed output.
#[derive(Debug, Clone, Default)]
pub struct SubpatternTable {
    entries: FastHashMap<String, Subpattern>,
}

impl SubpatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K: Into<String>, V: Into<Subpattern>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert<K: Into<String>, V: Into<Subpattern>>(
        &mut self,
        name: K,
        value: V,
    ) -> Option<Subpattern> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Subpattern> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Subpattern)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Subpattern>> FromIterator<(K, V)> for SubpatternTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = SubpatternTable::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

/// De-anchored source text of a subpattern, the names of its capturing groups, and whether the
/// text is written in free-spacing mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubpatternRecord {
    source: String,
    capture_names: CaptureNames,
    free_spacing: bool,
}

impl SubpatternRecord {
    pub fn new(source: String, capture_names: CaptureNames, free_spacing: bool) -> Self {
        Self {
            source,
            capture_names,
            free_spacing,
        }
    }

    pub fn is_free_spacing(&self) -> bool {
        self.free_spacing
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn capture_names(&self) -> &[Option<Box<str>>] {
        &self.capture_names
    }

    pub fn capture_count(&self) -> usize {
        self.capture_names.len()
    }

    /// Name of the capture at 0-based local position `index`, if it has one.
    pub fn capture_name(&self, index: usize) -> Option<&str> {
        self.capture_names.get(index).and_then(|name| name.as_deref())
    }
}

/// Converts a subpattern into a [`SubpatternRecord`].
///
/// Source text is read in the free-spacing mode of `flags`. Expressions keep the mode they
/// were compiled with. Expressions compiled by this crate keep their recorded names; anything
/// else is compiled once to prove it is valid on its own and to read its capture names.
#[tracing::instrument(level = "trace", skip(subpattern), fields(extended = flags.is_extended()))]
pub fn normalize(subpattern: &Subpattern, flags: Flags) -> PatternResult<SubpatternRecord> {
    let (source, capture_names, free_spacing) = match subpattern {
        Subpattern::Expression(expression) => {
            let free_spacing = expression.flags().is_extended();
            let capture_names = match expression.metadata() {
                Some(metadata) => CaptureNames::from(metadata.capture_names()),
                None => validate(expression.as_str(), free_spacing)?,
            };
            (expression.as_str(), capture_names, free_spacing)
        }
        Subpattern::Source(source) => (
            source.as_str(),
            validate(source, flags.is_extended())?,
            flags.is_extended(),
        ),
    };

    Ok(SubpatternRecord::new(
        deanchor(source).into_owned(),
        capture_names,
        free_spacing,
    ))
}

fn validate(source: &str, free_spacing: bool) -> PatternResult<CaptureNames> {
    let flags = if free_spacing {
        Flags::EXTENDED
    } else {
        Flags::empty()
    };
    let options = BuildOptions::with_flags(flags);
    let regex = compile(source, &options)?;
    Ok(names_of(&regex))
}
