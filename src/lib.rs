//! Composes regular expressions out of named, reusable subpatterns.
//!
//! `{{name}}` placeholders in an outer pattern are replaced by the subpatterns registered
//! under those names, and every capturing group and backreference is renumbered so the
//! composed expression behaves as if it had been written by hand.

pub mod compose;
pub mod errors;
pub mod expression;
pub mod flags;
pub mod options;
pub mod pattern;
pub mod tag;
pub mod types;

pub use compose::{Composition, build, build_with_options, compose};
pub use errors::{BuildError, BuildResult};
pub use expression::{CaptureMetadata, Expression};
pub use flags::Flags;
pub use options::{BuildOptions, BuildOptionsBuilder};
pub use pattern::{Subpattern, SubpatternTable, deanchor};
pub use tag::{Substitution, Tag, tag};
