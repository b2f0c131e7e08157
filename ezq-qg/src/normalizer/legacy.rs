//! Legacy line-set handling
//!
//! Cleanup of raw multi-line text before per-line parsing (TITLE header,
//! list numbering, tag filter), and the inverse direction: serializing a
//! canonical quiz back to pipe-delimited lines.

use ezq_common::text::index_to_letter;
use ezq_common::{Question, Quiz};

use crate::error::NormalizeError;
use crate::parser::escape;
use crate::validators::validate_quiz;

/// A quiz in legacy line form: optional title plus newline-separated lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegacyLines {
    pub title: String,
    pub lines: String,
}

/// Clean raw text down to candidate quiz lines.
///
/// Strips a leading `TITLE:` header into `title`, removes `1.` style list
/// numbering, keeps only lines with a recognized tag prefix, and truncates
/// at `count` (clamped to 1..=50) when given.
pub fn normalize_legacy_lines(text: &str, count: Option<usize>) -> LegacyLines {
    let mut lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(strip_numbering)
        .collect();

    let mut title = String::new();
    if let Some(first) = lines.first() {
        if let Some(rest) = strip_title_header(first) {
            title = rest;
            lines.remove(0);
        }
    }

    let limit = count.map_or(lines.len(), |c| c.clamp(1, 50));
    let lines: Vec<String> = lines
        .into_iter()
        .filter(|l| has_tag_prefix(l))
        .take(limit)
        .collect();

    LegacyLines {
        title,
        lines: lines.join("\n"),
    }
}

/// Drop a leading `12. ` list ordinal.
fn strip_numbering(line: &str) -> String {
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 && line.as_bytes().get(digits) == Some(&b'.') {
        line[digits + 1..].trim_start().to_string()
    } else {
        line.to_string()
    }
}

/// Recognize `TITLE: <text>` (any case) and return the text.
fn strip_title_header(line: &str) -> Option<String> {
    let lower = line.to_ascii_lowercase();
    let rest = lower.strip_prefix("title")?;
    let after = rest.trim_start();
    if !after.starts_with(':') {
        return None;
    }
    let offset = line.len() - after.len() + 1;
    Some(line[offset..].trim().to_string())
}

/// Does the line start with one of the four tags followed by `|`?
fn has_tag_prefix(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || bytes[2] != b'|' {
        return false;
    }
    matches!(
        &line[..2].to_ascii_uppercase()[..],
        "MC" | "TF" | "YN" | "MT"
    )
}

/// Serialize one canonical question to its legacy line.
///
/// Option and right items are labeled `A) `, left items `1) `; delimiters
/// inside content are escaped so the line parses back to the same question.
pub fn question_to_legacy_line(question: &Question) -> String {
    match question {
        Question::MultipleChoice {
            text,
            options,
            correct,
        } => {
            let opts = options
                .iter()
                .enumerate()
                .map(|(i, opt)| label_letter(i, opt))
                .collect::<Vec<_>>()
                .join(";");
            let answers = correct
                .iter()
                .filter_map(|&i| index_to_letter(i))
                .map(String::from)
                .collect::<Vec<_>>()
                .join(",");
            format!("MC|{}|{}|{}", escape(text), opts, answers)
        }
        Question::TrueFalse { text, correct } => {
            format!("TF|{}|{}", escape(text), if *correct { "T" } else { "F" })
        }
        Question::YesNo { text, correct } => {
            format!("YN|{}|{}", escape(text), if *correct { "Y" } else { "N" })
        }
        Question::Matching {
            text,
            left,
            right,
            pairs,
        } => {
            let left_items = left
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}) {}", i + 1, escape(item)))
                .collect::<Vec<_>>()
                .join(";");
            let right_items = right
                .iter()
                .enumerate()
                .map(|(i, item)| label_letter(i, item))
                .collect::<Vec<_>>()
                .join(";");
            let pair_tokens = pairs
                .iter()
                .filter_map(|&(li, ri)| index_to_letter(ri).map(|letter| format!("{}-{}", li + 1, letter)))
                .collect::<Vec<_>>()
                .join(",");
            format!(
                "MT|{}|{}|{}|{}",
                escape(text),
                left_items,
                right_items,
                pair_tokens
            )
        }
    }
}

fn label_letter(index: usize, item: &str) -> String {
    match index_to_letter(index) {
        Some(letter) => format!("{}) {}", letter, escape(item)),
        None => escape(item),
    }
}

/// Serialize a whole quiz back to legacy lines.
///
/// The quiz must already be schema-valid; an invalid quiz is refused rather
/// than silently producing lines no parser would accept. `count` truncates
/// the output (clamped to 1..=50).
pub fn to_legacy_lines(quiz: &Quiz, count: Option<usize>) -> Result<LegacyLines, NormalizeError> {
    let report = validate_quiz(quiz);
    if !report.valid {
        return Err(NormalizeError::InvalidQuiz {
            details: report.errors,
        });
    }

    let limit = count.map_or(quiz.questions.len(), |c| c.clamp(1, 50));
    let lines: Vec<String> = quiz
        .questions
        .iter()
        .take(limit)
        .map(question_to_legacy_line)
        .collect();

    Ok(LegacyLines {
        title: quiz.title.trim().to_string(),
        lines: lines.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_title_numbering_and_noise() {
        let text = "TITLE: Legacy Set\n1. TF|Sky?|T\nsome chatter\n2. YN|Go?|Y\n";
        let legacy = normalize_legacy_lines(text, None);
        assert_eq!(legacy.title, "Legacy Set");
        assert_eq!(legacy.lines, "TF|Sky?|T\nYN|Go?|Y");
    }

    #[test]
    fn title_header_is_case_insensitive_and_optional() {
        let legacy = normalize_legacy_lines("Title : Spaced\nTF|Sky?|T", None);
        assert_eq!(legacy.title, "Spaced");

        let legacy = normalize_legacy_lines("TF|Sky?|T", None);
        assert_eq!(legacy.title, "");
        assert_eq!(legacy.lines, "TF|Sky?|T");
    }

    #[test]
    fn truncates_to_requested_count() {
        let text = "TF|One?|T\nTF|Two?|F\nTF|Three?|T";
        let legacy = normalize_legacy_lines(text, Some(2));
        assert_eq!(legacy.lines.lines().count(), 2);
    }

    #[test]
    fn serializes_each_shape() {
        assert_eq!(
            question_to_legacy_line(&Question::TrueFalse {
                text: "Sky?".to_string(),
                correct: true,
            }),
            "TF|Sky?|T"
        );
        assert_eq!(
            question_to_legacy_line(&Question::MultipleChoice {
                text: "Pick".to_string(),
                options: vec!["One".to_string(), "Two".to_string()],
                correct: vec![0, 1],
            }),
            "MC|Pick|A) One;B) Two|A,B"
        );
        assert_eq!(
            question_to_legacy_line(&Question::Matching {
                text: "Match".to_string(),
                left: vec!["L1".to_string(), "L2".to_string()],
                right: vec!["R1".to_string(), "R2".to_string()],
                pairs: vec![(0, 1), (1, 0)],
            }),
            "MT|Match|1) L1;2) L2|A) R1;B) R2|1-B,2-A"
        );
    }

    #[test]
    fn refuses_to_serialize_an_invalid_quiz() {
        let quiz = Quiz {
            title: String::new(),
            topic: String::new(),
            questions: vec![],
        };
        let err = to_legacy_lines(&quiz, None).unwrap_err();
        match err {
            NormalizeError::InvalidQuiz { details } => assert!(!details.is_empty()),
            other => panic!("expected InvalidQuiz, got {other:?}"),
        }
    }
}
