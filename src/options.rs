use crate::flags::{Flags, FlagsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub flags: Flags,
    pub backtrack_limit: Option<usize>,
    pub delegate_size_limit: Option<usize>,
    pub delegate_dfa_size_limit: Option<usize>,
}

impl BuildOptions {
    pub fn builder() -> BuildOptionsBuilder {
        BuildOptionsBuilder::default()
    }

    pub fn with_flags(flags: Flags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.backtrack_limit == Some(0) {
            return Err(OptionsError::BacktrackLimitInvalid { provided: 0 });
        }
        if self.delegate_size_limit == Some(0) {
            return Err(OptionsError::SizeLimitInvalid {
                field: "delegate_size_limit",
            });
        }
        if self.delegate_dfa_size_limit == Some(0) {
            return Err(OptionsError::SizeLimitInvalid {
                field: "delegate_dfa_size_limit",
            });
        }
        Ok(())
    }

    pub(crate) fn engine_builder(&self, pattern: &str) -> fancy_regex::RegexBuilder {
        let mut builder = fancy_regex::RegexBuilder::new(pattern);
        if let Some(limit) = self.backtrack_limit {
            builder.backtrack_limit(limit);
        }
        if let Some(limit) = self.delegate_size_limit {
            builder.delegate_size_limit(limit);
        }
        if let Some(limit) = self.delegate_dfa_size_limit {
            builder.delegate_dfa_size_limit(limit);
        }
        builder
    }
}

#[derive(Debug, Default, Clone)]
pub struct BuildOptionsBuilder {
    options: BuildOptions,
    flags_error: Option<FlagsError>,
}

impl BuildOptionsBuilder {
    pub fn flags(mut self, flags: Flags) -> Self {
        self.options.flags = flags;
        self
    }

    /// Sets the flags from their letter form, e.g. `"ix"`. Parse errors surface from [`build`](Self::build).
    pub fn flags_str(mut self, flags: &str) -> Self {
        match Flags::parse(flags) {
            Ok(parsed) => self.options.flags = parsed,
            Err(err) => self.flags_error = Some(err),
        }
        self
    }

    pub fn backtrack_limit(mut self, limit: usize) -> Self {
        self.options.backtrack_limit = Some(limit);
        self
    }

    pub fn delegate_size_limit(mut self, limit: usize) -> Self {
        self.options.delegate_size_limit = Some(limit);
        self
    }

    pub fn delegate_dfa_size_limit(mut self, limit: usize) -> Self {
        self.options.delegate_dfa_size_limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<BuildOptions, OptionsError> {
        if let Some(err) = self.flags_error {
            return Err(OptionsError::Flags(err));
        }
        let options = self.options;
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("backtrack_limit must be at least 1 (got {provided})")]
    BacktrackLimitInvalid { provided: usize },
    #[error("{field} must be at least 1")]
    SizeLimitInvalid { field: &'static str },
    #[error(transparent)]
    Flags(#[from] FlagsError),
}
