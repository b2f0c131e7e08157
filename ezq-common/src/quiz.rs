//! Canonical quiz model
//!
//! The validated in-memory representation every downstream consumer
//! (renderer, scorer, exporter) trusts unconditionally. `Question` is a
//! closed sum type so consumers handle every shape exhaustively; answer
//! indices are positional references into the sibling arrays of the same
//! question, never into a global id space.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::text;

/// A complete quiz.
///
/// After successful normalization `questions` is never empty; an empty quiz
/// is a hard failure, not a valid value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub topic: String,
    pub questions: Vec<Question>,
}

/// The four supported question shapes, by wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// `MC` - multiple choice, one or more correct options
    #[serde(rename = "MC")]
    MultipleChoice,
    /// `TF` - true/false statement
    #[serde(rename = "TF")]
    TrueFalse,
    /// `YN` - yes/no question (Yes maps to `true`)
    #[serde(rename = "YN")]
    YesNo,
    /// `MT` - matching of left items onto right items
    #[serde(rename = "MT")]
    Matching,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 4] = [
        QuestionKind::MultipleChoice,
        QuestionKind::TrueFalse,
        QuestionKind::YesNo,
        QuestionKind::Matching,
    ];

    /// Two-letter wire tag (`MC`, `TF`, `YN`, `MT`).
    pub fn as_tag(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "MC",
            QuestionKind::TrueFalse => "TF",
            QuestionKind::YesNo => "YN",
            QuestionKind::Matching => "MT",
        }
    }

    /// Parse an exact wire tag, case-insensitively. Wider aliasing
    /// (`MULTIPLE_CHOICE` and friends) belongs to the normalizer, not here.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "MC" => Some(QuestionKind::MultipleChoice),
            "TF" => Some(QuestionKind::TrueFalse),
            "YN" => Some(QuestionKind::YesNo),
            "MT" => Some(QuestionKind::Matching),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for QuestionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| {
            Error::InvalidInput(format!("unknown question type '{s}', use MC, TF, YN or MT"))
        })
    }
}

/// One quiz question.
///
/// Serializes to the canonical JSON contract, e.g.
/// `{"type":"MC","text":"...","options":[...],"correct":[0,2]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Question {
    /// Multiple choice. `correct` holds 0-based indices into `options`,
    /// deduplicated and sorted ascending; more than one index means a
    /// multi-answer question.
    #[serde(rename = "MC")]
    MultipleChoice {
        text: String,
        options: Vec<String>,
        correct: Vec<usize>,
    },

    /// True/false statement.
    #[serde(rename = "TF")]
    TrueFalse { text: String, correct: bool },

    /// Yes/no question; `true` means Yes.
    #[serde(rename = "YN")]
    YesNo { text: String, correct: bool },

    /// Matching. `pairs` is a total bijection by left index: every left
    /// index appears in exactly one `(left, right)` pair, so
    /// `pairs.len() == left.len()`. Right items may be reused.
    #[serde(rename = "MT")]
    Matching {
        text: String,
        left: Vec<String>,
        right: Vec<String>,
        pairs: Vec<(usize, usize)>,
    },
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            Question::TrueFalse { .. } => QuestionKind::TrueFalse,
            Question::YesNo { .. } => QuestionKind::YesNo,
            Question::Matching { .. } => QuestionKind::Matching,
        }
    }

    /// The question stem.
    pub fn text(&self) -> &str {
        match self {
            Question::MultipleChoice { text, .. }
            | Question::TrueFalse { text, .. }
            | Question::YesNo { text, .. }
            | Question::Matching { text, .. } => text,
        }
    }

    /// Identity key used to deduplicate questions across generation passes.
    pub fn stem_key(&self) -> String {
        text::stem_key(self.text())
    }
}
