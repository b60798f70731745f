mod anchor;
mod error;
mod lexer;
mod subpattern;

pub use anchor::deanchor;
pub use error::{PatternError, PatternResult};
pub use lexer::{Lexer, Token};
pub use subpattern::{Subpattern, SubpatternRecord, SubpatternTable, normalize};
