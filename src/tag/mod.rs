mod error;
mod escape;

pub use error::{TagError, TagResult};
pub use escape::escape_literal;

use crate::compose::build_with_options;
use crate::errors::BuildResult;
use crate::expression::Expression;
use crate::flags::Flags;
use crate::options::BuildOptions;
use crate::pattern::{Subpattern, SubpatternTable};
use std::fmt::Write;

/// A value interpolated between two literal segments of a [`Tag`] pattern.
///
/// Literal text is escaped so it only ever matches itself. Expressions are embedded as
/// subpatterns and keep their groups.
#[derive(Debug, Clone)]
pub enum Substitution {
    Literal(String),
    Expression(Expression),
}

impl From<&str> for Substitution {
    fn from(text: &str) -> Self {
        Substitution::Literal(text.to_string())
    }
}

impl From<String> for Substitution {
    fn from(text: String) -> Self {
        Substitution::Literal(text)
    }
}

impl From<char> for Substitution {
    fn from(ch: char) -> Self {
        Substitution::Literal(ch.to_string())
    }
}

impl From<Expression> for Substitution {
    fn from(expression: Expression) -> Self {
        Substitution::Expression(expression)
    }
}

impl From<&Expression> for Substitution {
    fn from(expression: &Expression) -> Self {
        Substitution::Expression(expression.clone())
    }
}

impl From<fancy_regex::Regex> for Substitution {
    fn from(regex: fancy_regex::Regex) -> Self {
        Substitution::Expression(Expression::from(regex))
    }
}

/// Joins literal segments with `{{subpatternN}}` placeholders and collects the matching table.
///
/// `literals` must hold exactly one more entry than `substitutions`.
pub fn interpolate<I, S>(
    literals: &[&str],
    substitutions: I,
) -> TagResult<(String, SubpatternTable)>
where
    I: IntoIterator<Item = S>,
    S: Into<Substitution>,
{
    let substitutions: Vec<Substitution> = substitutions.into_iter().map(Into::into).collect();
    let Some((last, leading)) = literals.split_last() else {
        return Err(TagError::ArityMismatch {
            literals: 0,
            substitutions: substitutions.len(),
        });
    };
    if leading.len() != substitutions.len() {
        return Err(TagError::ArityMismatch {
            literals: literals.len(),
            substitutions: substitutions.len(),
        });
    }

    let mut pattern = String::with_capacity(literals.iter().map(|lit| lit.len()).sum());
    let mut table = SubpatternTable::new();
    for (index, (literal, substitution)) in leading.iter().zip(substitutions).enumerate() {
        let name = format!("subpattern{index}");
        pattern.push_str(literal);
        let _ = write!(pattern, "{{{{{name}}}}}");
        let subpattern = match substitution {
            Substitution::Literal(text) => Subpattern::Source(escape_literal(&text)),
            Substitution::Expression(expression) => Subpattern::Expression(expression),
        };
        table.insert(name, subpattern);
    }
    pattern.push_str(last);

    tracing::trace!(placeholders = table.len() as u64, "interpolated tag segments");
    Ok((pattern, table))
}

/// Creates a [`Tag`] that compiles with the given flag letters.
pub fn tag(flags: &str) -> BuildResult<Tag> {
    let flags = Flags::parse(flags)?;
    Ok(Tag::with_options(BuildOptions::with_flags(flags)))
}

/// Builds expressions from literal segments and interpolated values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tag {
    options: BuildOptions,
}

impl Tag {
    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    #[tracing::instrument(level = "trace", skip(self, literals, substitutions), fields(segments = literals.len() as u64))]
    pub fn build<I, S>(&self, literals: &[&str], substitutions: I) -> BuildResult<Expression>
    where
        I: IntoIterator<Item = S>,
        S: Into<Substitution>,
    {
        let (pattern, table) = interpolate(literals, substitutions)?;
        build_with_options(&pattern, &table, &self.options)
    }

    /// Turns the tag into a plain function over literal segments and substitutions.
    pub fn into_fn(self) -> impl Fn(&[&str], Vec<Substitution>) -> BuildResult<Expression> {
        move |literals: &[&str], substitutions: Vec<Substitution>| {
            self.build(literals, substitutions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BuildError;

    #[test]
    fn interpolate_places_one_placeholder_per_gap() {
        let (pattern, table) =
            interpolate(&["^", "-", "$"], ["a.b", "c"]).expect("arity should match");
        assert_eq!(pattern, "^{{subpattern0}}-{{subpattern1}}$");
        assert_eq!(table.len(), 2);
        match table.get("subpattern0") {
            Some(Subpattern::Source(source)) => assert_eq!(source, "a\\.b"),
            other => panic!("unexpected subpattern: {other:?}"),
        }
    }

    #[test]
    fn interpolate_without_substitutions_keeps_literal() {
        let (pattern, table) =
            interpolate(&["a+b"], Vec::<Substitution>::new()).expect("single literal is valid");
        assert_eq!(pattern, "a+b");
        assert!(table.is_empty());
    }

    #[test]
    fn interpolate_rejects_wrong_arity() {
        let err = interpolate(&["a", "b"], ["x", "y"]).expect_err("too many substitutions");
        assert_eq!(
            err,
            TagError::ArityMismatch {
                literals: 2,
                substitutions: 2
            }
        );
        let err = interpolate(&[], Vec::<Substitution>::new()).expect_err("no literals");
        assert!(matches!(err, TagError::ArityMismatch { literals: 0, .. }));
    }

    #[test]
    fn expressions_keep_their_groups() {
        let inner = Expression::new("(?<d>\\d)", Flags::empty()).expect("valid");
        let expression = tag("")
            .expect("no flags")
            .build(&["x", "y"], [inner])
            .expect("tag should build");
        assert_eq!(expression.as_str(), "x(?:(?<d>\\d))y");
    }

    #[test]
    fn unknown_flag_is_rejected() {
        match tag("q").expect_err("q is not a flag") {
            BuildError::Flags(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn into_fn_builds_like_build() {
        let build = tag("i").expect("valid flags").into_fn();
        let expression = build(&["a", "c"], vec![Substitution::from('.')]).expect("tag should build");
        assert_eq!(expression.as_str(), "a(?:\\.)c");
        assert!(expression.is_match("A.C").expect("match should run"));
    }
}
