//! Quiz normalization orchestrator
//!
//! Accepts arbitrary input (raw legacy-line text, JSON text with or without
//! code fences, or an already-parsed JSON value) and produces a canonical
//! quiz or a typed error. Strategy precedence is fixed: structured JSON
//! questions always win over a sibling legacy-line field, and raw legacy
//! lines are the fallback of last resort.
//!
//! Fallback decisions are logged with the input length only, never the
//! content.

mod extract;
mod legacy;
mod structured;

pub use extract::extract_json;
pub use legacy::{normalize_legacy_lines, question_to_legacy_line, to_legacy_lines, LegacyLines};
pub use structured::{
    normalize_boolean, normalize_correct_indexes, normalize_matches,
    normalize_structured_question, resolve_kind,
};

use ezq_common::{Question, QuestionKind, Quiz};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

use crate::error::NormalizeError;
use crate::parser::parse_lenient;
use crate::validators::validate_quiz;

/// Caller-supplied normalization options.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Topic recorded on the quiz when the input does not carry one.
    pub topic: String,
    /// Keep at most this many questions (clamped to 1..=50).
    pub count: Option<usize>,
    /// Restrict to these question kinds; `None` allows all four.
    pub kinds: Option<Vec<QuestionKind>>,
}

/// Normalize raw text: JSON recovery first, legacy lines as fallback.
pub fn normalize_text(input: &str, opts: &NormalizeOptions) -> Result<Quiz, NormalizeError> {
    match extract_json(input) {
        Some(value) => normalize_extracted(&value, input, opts),
        None => {
            warn!(reason = "json-parse-failed", len = input.len(), "falling back to legacy lines");
            quiz_from_legacy_text(input, opts)
        }
    }
}

/// Normalize an already-parsed JSON value. An array root is treated as a
/// bare question list.
pub fn normalize_value(value: &Value, opts: &NormalizeOptions) -> Result<Quiz, NormalizeError> {
    let raw = serde_json::to_string(value).unwrap_or_default();
    if value.is_array() {
        let wrapped = serde_json::json!({ "questions": value });
        return normalize_extracted(&wrapped, &raw, opts);
    }
    normalize_extracted(value, &raw, opts)
}

/// Normalize the legacy-line representation of `text` directly, skipping
/// JSON recovery. This is the path the batched generation controller uses
/// for every pass.
pub fn quiz_from_legacy_text(text: &str, opts: &NormalizeOptions) -> Result<Quiz, NormalizeError> {
    let limit = clamp_count(opts.count);
    let allowed = allowed_kinds(opts);

    let legacy = normalize_legacy_lines(text, limit);
    let questions: Vec<Question> = parse_lenient(&legacy.lines)
        .into_iter()
        .filter(|q| allowed.as_ref().map_or(true, |set| set.contains(&q.kind())))
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if questions.is_empty() {
        return Err(NormalizeError::NoQuestions {
            input_len: text.len(),
        });
    }

    finish(Quiz {
        title: legacy.title,
        topic: opts.topic.trim().to_string(),
        questions,
    })
}

fn normalize_extracted(
    value: &Value,
    raw_text: &str,
    opts: &NormalizeOptions,
) -> Result<Quiz, NormalizeError> {
    let limit = clamp_count(opts.count);
    let allowed = allowed_kinds(opts);

    // Unwrap one envelope level.
    let data = match value.get("quiz").filter(|v| v.is_object()) {
        Some(inner) => inner,
        None => value.get("result").filter(|v| v.is_object()).unwrap_or(value),
    };

    let question_source = ["questions", "items", "quizItems"]
        .iter()
        .find_map(|key| data.get(*key).and_then(Value::as_array))
        .filter(|items| !items.is_empty());

    if let Some(source) = question_source {
        let mut questions = Vec::new();
        for raw_question in source {
            let Some(question) = normalize_structured_question(raw_question) else {
                continue;
            };
            if let Some(set) = &allowed {
                if !set.contains(&question.kind()) {
                    continue;
                }
            }
            questions.push(question);
            if limit.is_some_and(|l| questions.len() >= l) {
                break;
            }
        }
        if !questions.is_empty() {
            let title = structured::field(data, &["title", "quizTitle", "name"])
                .map(structured::scalar_string)
                .unwrap_or_default();
            let topic = structured::field(data, &["topic"])
                .map(structured::scalar_string)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| opts.topic.trim().to_string());
            return finish(Quiz {
                title,
                topic,
                questions,
            });
        }
    }

    // A lines-bearing string field is the next best thing.
    let line_field = ["lines", "output", "text"]
        .iter()
        .find_map(|key| data.get(*key).and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty());
    if let Some(lines) = line_field {
        warn!(reason = "legacy-lines-field", len = lines.len(), "no structured questions survived");
        return quiz_from_legacy_text(lines, opts);
    }

    // Last resort: re-read the original input as legacy lines.
    warn!(reason = "no-structured-questions", len = raw_text.len(), "falling back to legacy lines");
    quiz_from_legacy_text(raw_text, opts)
}

/// Validation backstop before a quiz leaves the normalizer. The lenient
/// paths only emit valid questions, so a failure here means a bug upstream
/// rather than bad input; it is still refused.
fn finish(quiz: Quiz) -> Result<Quiz, NormalizeError> {
    let report = validate_quiz(&quiz);
    if !report.valid {
        return Err(NormalizeError::InvalidQuiz {
            details: report.errors,
        });
    }
    Ok(quiz)
}

fn clamp_count(count: Option<usize>) -> Option<usize> {
    count.map(|c| c.clamp(1, 50))
}

fn allowed_kinds(opts: &NormalizeOptions) -> Option<HashSet<QuestionKind>> {
    opts.kinds
        .as_ref()
        .filter(|kinds| !kinds.is_empty())
        .map(|kinds| kinds.iter().copied().collect())
}
