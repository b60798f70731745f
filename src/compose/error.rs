use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("undefined subpattern '{name}' referenced by {token}")]
    UndefinedSubpattern { token: String, name: String },
    #[error("pattern '{pattern}' has {expected} capturing groups but {found} were scanned")]
    CaptureCountMismatch {
        pattern: String,
        expected: usize,
        found: usize,
    },
}

pub type ComposeResult<T> = Result<T, ComposeError>;
