use crate::flags::Flags;
use crate::options::BuildOptions;
use crate::pattern::{PatternError, PatternResult};
use crate::types::CaptureNames;
use std::borrow::Cow;

/// Capture names recorded when an [`Expression`] is compiled by this crate.
///
/// Their presence means the names can be trusted as-is when the expression is later embedded
/// as a subpattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureMetadata {
    capture_names: CaptureNames,
}

impl CaptureMetadata {
    pub fn new(capture_names: CaptureNames) -> Self {
        Self { capture_names }
    }

    pub fn capture_names(&self) -> &[Option<Box<str>>] {
        &self.capture_names
    }
}

/// A compiled regex together with the pattern text and flags it was compiled from.
#[derive(Debug, Clone)]
pub struct Expression {
    regex: fancy_regex::Regex,
    source: String,
    flags: Flags,
    metadata: Option<CaptureMetadata>,
}

impl Expression {
    pub fn new(pattern: &str, flags: Flags) -> PatternResult<Self> {
        Self::with_options(pattern, &BuildOptions::with_flags(flags))
    }

    #[tracing::instrument(level = "trace", skip(pattern, options), fields(pattern_len = pattern.len() as u64, flags = %options.flags))]
    pub fn with_options(pattern: &str, options: &BuildOptions) -> PatternResult<Self> {
        let regex = compile(pattern, options)?;
        let metadata = CaptureMetadata::new(names_of(&regex));
        Ok(Self {
            regex,
            source: pattern.to_string(),
            flags: options.flags,
            metadata: Some(metadata),
        })
    }

    /// The pattern text, without the inline group that applies [`flags`](Self::flags).
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn metadata(&self) -> Option<&CaptureMetadata> {
        self.metadata.as_ref()
    }

    pub fn regex(&self) -> &fancy_regex::Regex {
        &self.regex
    }

    /// Names of every capturing group, excluding the implicit group 0.
    pub fn capture_names(&self) -> CaptureNames {
        match &self.metadata {
            Some(metadata) => metadata.capture_names.clone(),
            None => names_of(&self.regex),
        }
    }

    /// Number of capturing groups, excluding the implicit group 0.
    pub fn captures_len(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }

    pub fn is_match(&self, text: &str) -> fancy_regex::Result<bool> {
        self.regex.is_match(text)
    }

    pub fn find<'t>(&self, text: &'t str) -> fancy_regex::Result<Option<fancy_regex::Match<'t>>> {
        self.regex.find(text)
    }

    pub fn captures<'t>(
        &self,
        text: &'t str,
    ) -> fancy_regex::Result<Option<fancy_regex::Captures<'t>>> {
        self.regex.captures(text)
    }

    pub fn replace_all<'t, R: fancy_regex::Replacer>(&self, text: &'t str, rep: R) -> Cow<'t, str> {
        self.regex.replace_all(text, rep)
    }
}

/// Wraps a regex compiled elsewhere. No metadata is attached, so its names are re-extracted
/// from the source whenever it is used as a subpattern.
impl From<fancy_regex::Regex> for Expression {
    fn from(regex: fancy_regex::Regex) -> Self {
        Self {
            source: regex.as_str().to_string(),
            regex,
            flags: Flags::empty(),
            metadata: None,
        }
    }
}

pub(crate) fn compile(pattern: &str, options: &BuildOptions) -> PatternResult<fancy_regex::Regex> {
    let text: Cow<'_, str> = if options.flags.is_empty() {
        Cow::Borrowed(pattern)
    } else {
        Cow::Owned(format!("{}{pattern}", options.flags.to_inline_group()))
    };
    options
        .engine_builder(&text)
        .build()
        .map_err(|err| PatternError::syntax(pattern, err))
}

pub(crate) fn names_of(regex: &fancy_regex::Regex) -> CaptureNames {
    regex
        .capture_names()
        .skip(1)
        .map(|name| name.map(Box::from))
        .collect()
}
