//! Legacy line parsing
//!
//! Two entry points over one per-line parser, so the interactive and the
//! generation call sites cannot drift apart:
//! - [`parse_strict`] keeps every per-line failure for display to a human
//!   author, alongside the questions that did parse.
//! - [`parse_lenient`] keeps only the survivors; noisy LLM output is
//!   expected and must not block the good lines.

mod line;

pub use line::{parse_line, LineParseError};

pub(crate) use line::escape;

use ezq_common::Question;
use std::fmt;

/// One failed line from strict parsing.
///
/// `line` is the 1-based position among the non-blank input lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIssue {
    pub line: usize,
    pub error: LineParseError,
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.error)
    }
}

/// Strict parse result: everything that parsed plus everything that did not.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub questions: Vec<Question>,
    pub issues: Vec<LineIssue>,
}

/// Parse for interactive authoring: return the questions that parsed and a
/// report for every line that did not, so the author can fix all of them at
/// once.
pub fn parse_strict(text: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    for (position, raw) in lines.enumerate() {
        match parse_line(raw) {
            Ok(question) => outcome.questions.push(question),
            Err(error) => outcome.issues.push(LineIssue {
                line: position + 1,
                error,
            }),
        }
    }
    outcome
}

/// Parse for generation output: drop failing lines silently and return only
/// the questions that survive.
pub fn parse_lenient(text: &str) -> Vec<Question> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(|raw| parse_line(raw).ok())
        .collect()
}
