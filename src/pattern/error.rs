use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern '{pattern}' is not a valid regex: {source}")]
    Syntax {
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

impl PatternError {
    pub(crate) fn syntax(pattern: &str, source: fancy_regex::Error) -> Self {
        PatternError::Syntax {
            pattern: pattern.to_string(),
            source: Box::new(source),
        }
    }
}

pub type PatternResult<T> = Result<T, PatternError>;
