use super::error::{ComposeError, ComposeResult};
use super::numbering::NumberingState;
use crate::errors::BuildResult;
use crate::expression::{Expression, compile, names_of};
use crate::flags::Flags;
use crate::options::BuildOptions;
use crate::pattern::{Lexer, PatternError, SubpatternRecord, SubpatternTable, Token, normalize};
use crate::types::FastHashMap;
use std::fmt::Write;

/// Merged pattern text and the flags it must be compiled with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub pattern: String,
    pub flags: Flags,
}

/// Builds a regex from `pattern`, embedding each `{{name}}` from `subpatterns`.
///
/// `({{name}})` is shorthand for `(?<name>{{name}})`. Capturing groups and backreferences in
/// the outer pattern and in every subpattern are renumbered so the result behaves as if
/// written by hand. A leading `^` and trailing unescaped `$` are stripped from subpatterns
/// when both are present; double them to keep a real anchor pair.
pub fn build(pattern: &str, subpatterns: &SubpatternTable, flags: &str) -> BuildResult<Expression> {
    let flags = Flags::parse(flags)?;
    build_with_options(pattern, subpatterns, &BuildOptions::with_flags(flags))
}

pub fn build_with_options(
    pattern: &str,
    subpatterns: &SubpatternTable,
    options: &BuildOptions,
) -> BuildResult<Expression> {
    options.validate()?;
    let composition = compose(pattern, subpatterns, options.flags)?;
    let options = BuildOptions {
        flags: composition.flags,
        ..*options
    };
    Ok(Expression::with_options(&composition.pattern, &options)?)
}

/// Produces the merged pattern text without compiling it.
#[tracing::instrument(level = "trace", skip(pattern, subpatterns), fields(pattern_len = pattern.len() as u64, subpatterns = subpatterns.len() as u64, flags = %flags))]
pub fn compose(
    pattern: &str,
    subpatterns: &SubpatternTable,
    flags: Flags,
) -> BuildResult<Composition> {
    let mut flags = flags;
    if let Some(inline) = Flags::from_leading_modifier(pattern) {
        flags |= inline;
    }
    let free_spacing = flags.is_extended();

    let masked = mask_placeholders(pattern, subpatterns, free_spacing)?;

    let mut records: FastHashMap<&str, SubpatternRecord> =
        FastHashMap::with_capacity(subpatterns.len());
    for (name, subpattern) in subpatterns.iter() {
        records.insert(name, normalize(subpattern, flags)?);
    }

    let outer = compile(&masked, &BuildOptions::with_flags(flags & Flags::EXTENDED)).map_err(
        |err| match err {
            PatternError::Syntax { source, .. } => PatternError::Syntax {
                pattern: pattern.to_string(),
                source,
            },
        },
    )?;
    let outer_names = names_of(&outer);

    let mut composer = Composer::new(&outer_names, &records, free_spacing);
    composer.run(pattern)?;
    let (output, state) = composer.finish(pattern)?;

    tracing::debug!(
        captures = state.total_captures() as u64,
        outer_captures = state.outer_captures_seen() as u64,
        output_len = output.len() as u64,
        "composed pattern"
    );

    Ok(Composition {
        pattern: output,
        flags,
    })
}

/// Replaces placeholders with empty groups so the outer pattern can be validated on its own.
/// `({{name}})` keeps its capturing group, preserving the outer capture order.
fn mask_placeholders(
    pattern: &str,
    subpatterns: &SubpatternTable,
    free_spacing: bool,
) -> ComposeResult<String> {
    let mut masked = String::with_capacity(pattern.len());
    for token in Lexer::new(pattern).free_spacing(free_spacing) {
        match token {
            Token::Placeholder { name, raw } => {
                ensure_defined(subpatterns, name, raw)?;
                masked.push_str("(?:)");
            }
            Token::GroupedPlaceholder { name, raw } => {
                ensure_defined(subpatterns, name, raw)?;
                masked.push_str("((?:))");
            }
            other => masked.push_str(other.as_str()),
        }
    }
    Ok(masked)
}

fn ensure_defined(subpatterns: &SubpatternTable, name: &str, raw: &str) -> ComposeResult<()> {
    if subpatterns.contains(name) {
        return Ok(());
    }
    Err(ComposeError::UndefinedSubpattern {
        token: raw.to_string(),
        name: name.to_string(),
    })
}

struct Composer<'a> {
    outer_names: &'a [Option<Box<str>>],
    records: &'a FastHashMap<&'a str, SubpatternRecord>,
    free_spacing: bool,
    state: NumberingState,
    output: String,
}

impl<'a> Composer<'a> {
    fn new(
        outer_names: &'a [Option<Box<str>>],
        records: &'a FastHashMap<&'a str, SubpatternRecord>,
        free_spacing: bool,
    ) -> Self {
        Self {
            outer_names,
            records,
            free_spacing,
            state: NumberingState::new(),
            output: String::new(),
        }
    }

    fn run(&mut self, pattern: &str) -> ComposeResult<()> {
        self.output.reserve(pattern.len());

        for token in Lexer::new(pattern).free_spacing(self.free_spacing) {
            match token {
                Token::Placeholder { name, raw } => {
                    let record = self.record(name, raw)?;
                    self.embed_group(record)?;
                }
                Token::GroupedPlaceholder { name, raw } => {
                    let record = self.record(name, raw)?;
                    let (ordinal, _) = self.state.assign_outer_capture();
                    // an explicit outer name wins over the placeholder name
                    let capture_name = self.outer_name(ordinal).unwrap_or(name);
                    push_capture_open(&mut self.output, Some(capture_name));
                    if record.is_free_spacing() == self.free_spacing {
                        self.embed(record)?;
                    } else {
                        self.embed_group(record)?;
                    }
                    self.output.push(')');
                }
                Token::CaptureOpen { .. } => {
                    let (ordinal, _) = self.state.assign_outer_capture();
                    let name = self.outer_name(ordinal);
                    push_capture_open(&mut self.output, name);
                }
                Token::Backreference { index, raw } => self.outer_backreference(index, raw),
                other => self.output.push_str(other.as_str()),
            }
        }

        Ok(())
    }

    fn finish(self, pattern: &str) -> ComposeResult<(String, NumberingState)> {
        let seen = self.state.outer_captures_seen();
        if seen != self.outer_names.len() {
            return Err(ComposeError::CaptureCountMismatch {
                pattern: pattern.to_string(),
                expected: self.outer_names.len(),
                found: seen,
            });
        }

        Ok((self.output, self.state))
    }

    fn record(&self, name: &str, raw: &str) -> ComposeResult<&'a SubpatternRecord> {
        self.records
            .get(name)
            .ok_or_else(|| ComposeError::UndefinedSubpattern {
                token: raw.to_string(),
                name: name.to_string(),
            })
    }

    fn outer_name(&self, ordinal: usize) -> Option<&'a str> {
        self.outer_names
            .get(ordinal)
            .and_then(|name| name.as_deref())
    }

    fn outer_backreference(&mut self, index: usize, raw: &str) {
        if let Some(name) = self.outer_name(index - 1) {
            push_named_backreference(&mut self.output, name);
            return;
        }
        // forward references never get here; the engine rejects them during validation
        match self.state.outer_global_index(index) {
            Some(global) => push_numbered_backreference(&mut self.output, global),
            None => self.output.push_str(raw),
        }
    }

    /// Embeds a subpattern inside a noncapturing group that restores its own free-spacing mode.
    fn embed_group(&mut self, record: &SubpatternRecord) -> ComposeResult<()> {
        self.output.push_str(match (record.is_free_spacing(), self.free_spacing) {
            (true, false) => "(?x:",
            (false, true) => "(?-x:",
            _ => "(?:",
        });
        self.embed(record)?;
        self.output.push(')');
        Ok(())
    }

    /// Emits a subpattern body with its groups numbered after every capture emitted so far.
    fn embed(&mut self, record: &SubpatternRecord) -> ComposeResult<()> {
        let prior = self.state.total_captures();
        let mut local = 0usize;
        let mut in_comment = false;

        let lexer = Lexer::new(record.source())
            .free_spacing(record.is_free_spacing())
            .placeholders(false);
        for token in lexer {
            in_comment = matches!(token, Token::Comment(_));
            match token {
                Token::CaptureOpen { .. } => {
                    let name = record.capture_name(local);
                    local += 1;
                    self.state.assign_capture();
                    push_capture_open(&mut self.output, name);
                }
                Token::Backreference { index, .. } => match record.capture_name(index - 1) {
                    // names are kept so the reference survives explicit-capture engines
                    Some(name) => push_named_backreference(&mut self.output, name),
                    None => push_numbered_backreference(&mut self.output, prior + index),
                },
                other => self.output.push_str(other.as_str()),
            }
        }
        // a trailing comment would swallow the closing paren
        if in_comment {
            self.output.push('\n');
        }

        if local != record.capture_count() {
            return Err(ComposeError::CaptureCountMismatch {
                pattern: record.source().to_string(),
                expected: record.capture_count(),
                found: local,
            });
        }
        Ok(())
    }
}

fn push_capture_open(output: &mut String, name: Option<&str>) {
    match name {
        Some(name) => {
            let _ = write!(output, "(?<{name}>");
        }
        None => output.push('('),
    }
}

fn push_named_backreference(output: &mut String, name: &str) {
    let _ = write!(output, "\\k<{name}>");
}

fn push_numbered_backreference(output: &mut String, index: usize) {
    let _ = write!(output, "\\{index}");
}
