use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error(
        "expected exactly one more literal segment than substitutions (got {literals} literals and {substitutions} substitutions)"
    )]
    ArityMismatch {
        literals: usize,
        substitutions: usize,
    },
}

pub type TagResult<T> = Result<T, TagError>;
