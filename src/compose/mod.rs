mod engine;
mod error;
mod numbering;

pub use engine::{Composition, build, build_with_options, compose};
pub use error::{ComposeError, ComposeResult};
pub use numbering::NumberingState;
