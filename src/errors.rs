use crate::compose::ComposeError;
use crate::flags::FlagsError;
use crate::options::OptionsError;
use crate::pattern::PatternError;
use crate::tag::TagError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Flags(#[from] FlagsError),
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Tag(#[from] TagError),
}

pub type BuildResult<T> = Result<T, BuildError>;
