//! Structured question normalization
//!
//! Coerces one loosely-typed JSON question object into canonical form.
//! LLM output varies wildly: field names differ (`prompt` vs `question` vs
//! `stem`), answer keys arrive as letters, 1-based numbers, option text or
//! objects, and matching pairs come as arrays, objects or `"1-A"` strings.
//! Everything here resolves or is dropped; this module never fails a whole
//! quiz, it returns `None` per question and lets the caller decide.

use ezq_common::text::letter_to_index;
use ezq_common::{Question, QuestionKind};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

/// Wide aliasing for the `type` field, beyond the exact wire tags.
static TYPE_ALIASES: Lazy<HashMap<&'static str, QuestionKind>> = Lazy::new(|| {
    use QuestionKind::*;
    HashMap::from([
        ("MULTIPLE_CHOICE", MultipleChoice),
        ("MULTIPLE-CHOICE", MultipleChoice),
        ("MULTIPLECHOICE", MultipleChoice),
        ("MULTIPLE CHOICE", MultipleChoice),
        ("CHOICE", MultipleChoice),
        ("MCQ", MultipleChoice),
        ("TRUE_FALSE", TrueFalse),
        ("TRUEFALSE", TrueFalse),
        ("TRUE/FALSE", TrueFalse),
        ("TRUE FALSE", TrueFalse),
        ("YES_NO", YesNo),
        ("YESNO", YesNo),
        ("YES/NO", YesNo),
        ("MATCH", Matching),
        ("MATCHING", Matching),
        ("PAIR", Matching),
        ("PAIRING", Matching),
        ("MATCH_PAIRS", Matching),
    ])
});

/// Resolve a raw type string to a question kind, via exact tags first and
/// the alias table second.
pub fn resolve_kind(raw: &str) -> Option<QuestionKind> {
    let cleaned = raw.trim().to_ascii_uppercase();
    if cleaned.is_empty() {
        return None;
    }
    QuestionKind::from_tag(&cleaned).or_else(|| TYPE_ALIASES.get(cleaned.as_str()).copied())
}

/// First non-null value among the aliased keys of an object.
pub(crate) fn field<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    for key in keys {
        match raw.get(*key) {
            None | Some(Value::Null) => continue,
            Some(value) => return Some(value),
        }
    }
    None
}

/// Render a scalar JSON value as a trimmed string; containers render empty.
pub(crate) fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Treat a value as a list: arrays as-is, null as empty, anything else as a
/// single-element list.
fn to_list(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

/// Coerce a raw MC answer key into 0-based option indices.
///
/// Accepts an array or a comma/semicolon-delimited string of mixed tokens,
/// each resolved in priority order: integer (1-based when >= 1), single
/// letter, literal option text (case-insensitive), or an object carrying
/// `index`/`letter`/`value`. Out-of-range results are dropped; the output is
/// deduplicated and sorted ascending.
///
/// When nothing resolves, the first option is assumed correct: a malformed
/// answer key yields a usable question rather than none at all.
pub fn normalize_correct_indexes(raw: Option<&Value>, options: &[String]) -> Vec<usize> {
    let mut resolved: Vec<i64> = Vec::new();
    if let Some(value) = raw {
        collect_indexes(value, options, &mut resolved);
    }

    let mut unique: Vec<usize> = Vec::new();
    for value in resolved {
        if value >= 0 && (value as usize) < options.len() && !unique.contains(&(value as usize)) {
            unique.push(value as usize);
        }
    }
    if unique.is_empty() && !options.is_empty() {
        unique.push(0);
    }
    unique.sort_unstable();
    unique
}

fn collect_indexes(raw: &Value, options: &[String], out: &mut Vec<i64>) {
    match raw {
        Value::Array(items) => {
            for item in items {
                collect_indexes(item, options, out);
            }
        }
        Value::String(s) => {
            let chunks: Vec<&str> = s
                .split([';', ','])
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .collect();
            if chunks.len() > 1 {
                for chunk in chunks {
                    collect_token(chunk, options, out);
                }
            } else {
                collect_token(s.trim(), options, out);
            }
        }
        Value::Number(n) => {
            if let Some(value) = n.as_i64() {
                out.push(one_based(value));
            }
        }
        Value::Object(map) => {
            for key in ["index", "letter", "value"] {
                if let Some(inner) = map.get(key) {
                    collect_indexes(inner, options, out);
                }
            }
        }
        _ => {}
    }
}

fn collect_token(token: &str, options: &[String], out: &mut Vec<i64>) {
    if token.is_empty() {
        return;
    }
    if let Ok(number) = token.parse::<i64>() {
        out.push(one_based(number));
    } else if let Some(index) = letter_to_index(token) {
        out.push(index as i64);
    } else if let Some(index) = option_text_index(token, options) {
        out.push(index as i64);
    }
}

/// Integers are read as 1-based positions; 0 stays index 0.
fn one_based(value: i64) -> i64 {
    if value >= 1 {
        value - 1
    } else {
        value
    }
}

fn option_text_index(token: &str, options: &[String]) -> Option<usize> {
    let cleaned = token.trim().to_lowercase();
    if cleaned.is_empty() {
        return None;
    }
    options.iter().position(|opt| opt.to_lowercase() == cleaned)
}

/// Coerce a raw TF/YN answer into a boolean, falling back to the supplied
/// default when nothing recognizable arrives.
pub fn normalize_boolean(raw: Option<&Value>, fallback: bool) -> bool {
    match raw {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(fallback),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" => true,
            "false" | "f" | "no" | "n" | "0" => false,
            _ => fallback,
        },
        _ => fallback,
    }
}

/// Interpret a value as a 0-based index into a column of `size` items.
/// Accepts 0 as index 0, positive 1-based positions, and negative positions
/// counted by magnitude.
fn to_zero_based(value: &Value, size: usize) -> Option<usize> {
    let number = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    let size = size as i64;
    if number == 0 {
        Some(0)
    } else if number > 0 && number <= size {
        Some((number - 1) as usize)
    } else if number < 0 && -number <= size {
        Some((-number - 1) as usize)
    } else {
        None
    }
}

/// Right side of a pair: 1-based index first, answer letter second.
fn right_reference(value: &Value, right_len: usize) -> Option<usize> {
    to_zero_based(value, right_len).or_else(|| match value {
        Value::String(s) => letter_to_index(s),
        _ => None,
    })
}

/// Coerce raw matching data into in-range `(left, right)` pairs.
///
/// Accepts arrays of `[left, right]` pairs, objects with aliased left/right
/// keys, or strings of `left-right` tokens (`-`, `:` or `>` between the
/// sides, `,` between tokens). Invalid or out-of-range pairs are dropped,
/// not fatal; exact duplicates collapse.
pub fn normalize_matches(raw: Option<&Value>, left_len: usize, right_len: usize) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    let push_pair = |li: usize, ri: usize, pairs: &mut Vec<(usize, usize)>| {
        if li < left_len && ri < right_len && !pairs.contains(&(li, ri)) {
            pairs.push((li, ri));
        }
    };

    match raw {
        Some(Value::Array(items)) => {
            for item in items {
                match item {
                    Value::Array(parts) if parts.len() >= 2 => {
                        let li = to_zero_based(&parts[0], left_len);
                        let ri = right_reference(&parts[1], right_len);
                        if let (Some(li), Some(ri)) = (li, ri) {
                            push_pair(li, ri, &mut pairs);
                        }
                    }
                    Value::Object(_) => {
                        let li = field(item, &["left", "source", "question", "prompt"])
                            .and_then(|v| to_zero_based(v, left_len));
                        let ri = field(item, &["right", "target", "answer", "response", "match"])
                            .and_then(|v| right_reference(v, right_len));
                        if let (Some(li), Some(ri)) = (li, ri) {
                            push_pair(li, ri, &mut pairs);
                        }
                    }
                    Value::String(s) => {
                        if let Some((li, ri)) = pair_from_token(s, left_len, right_len) {
                            push_pair(li, ri, &mut pairs);
                        }
                    }
                    _ => {}
                }
            }
        }
        Some(Value::String(s)) => {
            for segment in s.split(',') {
                if let Some((li, ri)) = pair_from_token(segment, left_len, right_len) {
                    push_pair(li, ri, &mut pairs);
                }
            }
        }
        _ => {}
    }

    pairs
}

fn pair_from_token(token: &str, left_len: usize, right_len: usize) -> Option<(usize, usize)> {
    let parts: Vec<&str> = token
        .split(['-', ':', '>'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 2 {
        return None;
    }
    let li = to_zero_based(&Value::String(parts[0].to_string()), left_len)?;
    let ri = right_reference(&Value::String(parts[1].to_string()), right_len)?;
    Some((li, ri))
}

/// Coerce one loosely-typed question object into canonical form.
///
/// Returns `None` when the question cannot be made structurally valid; a
/// question returned here always satisfies the canonical invariants, so the
/// caller's schema validation acts as a backstop rather than a filter.
pub fn normalize_structured_question(raw: &Value) -> Option<Question> {
    if !raw.is_object() {
        return None;
    }

    let kind = field(raw, &["type", "kind", "questionType", "format"])
        .map(scalar_string)
        .and_then(|s| resolve_kind(&s))?;

    let text = field(raw, &["prompt", "question", "text", "stem", "body"])
        .map(scalar_string)
        .filter(|s| !s.is_empty())?;

    match kind {
        QuestionKind::MultipleChoice => {
            let options: Vec<String> = to_list(field(
                raw,
                &["options", "choices", "answers", "variants", "optionsText"],
            ))
            .iter()
            .map(scalar_string)
            .filter(|s| !s.is_empty())
            .take(8)
            .collect();
            if options.len() < 2 {
                return None;
            }
            let correct = normalize_correct_indexes(
                field(
                    raw,
                    &[
                        "correct",
                        "answer",
                        "answers",
                        "correctOptions",
                        "correctAnswer",
                        "key",
                    ],
                ),
                &options,
            );
            Some(Question::MultipleChoice {
                text,
                options,
                correct,
            })
        }
        QuestionKind::TrueFalse | QuestionKind::YesNo => {
            let correct = normalize_boolean(
                field(raw, &["correct", "answer", "value", "solution"]),
                true,
            );
            Some(match kind {
                QuestionKind::TrueFalse => Question::TrueFalse { text, correct },
                _ => Question::YesNo { text, correct },
            })
        }
        QuestionKind::Matching => {
            let left = match_column(raw, &["left", "columnA", "prompts", "source"], "left");
            let right = match_column(raw, &["right", "columnB", "responses", "target"], "right");
            if left.len() < 2 || right.len() < 2 {
                return None;
            }
            let matches = normalize_matches(
                field(raw, &["matches", "pairs", "mapping", "answers", "correct"]),
                left.len(),
                right.len(),
            );
            // Keep the first pair per left item; the result must consume
            // every left item or the question is unusable.
            let mut pairs: Vec<(usize, usize)> = Vec::new();
            for (li, ri) in matches {
                if !pairs.iter().any(|(seen, _)| *seen == li) {
                    pairs.push((li, ri));
                }
            }
            if pairs.len() != left.len() {
                return None;
            }
            Some(Question::Matching {
                text,
                left,
                right,
                pairs,
            })
        }
    }
}

/// A matching column, with a fallback to the same side of a `pairs` array of
/// objects (`[{left: "...", right: "..."}]` style payloads).
fn match_column(raw: &Value, keys: &[&str], pair_key: &str) -> Vec<String> {
    let direct = field(raw, keys).map(|v| to_list(Some(v)));
    let values = match direct {
        Some(values) if !values.is_empty() => values,
        _ => match raw.get("pairs") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.get(pair_key).cloned())
                .collect(),
            _ => Vec::new(),
        },
    };
    values
        .iter()
        .map(scalar_string)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> Vec<String> {
        vec![
            "Two".to_string(),
            "Three".to_string(),
            "Four".to_string(),
            "Five".to_string(),
        ]
    }

    #[test]
    fn resolves_exact_tags_and_aliases() {
        assert_eq!(resolve_kind("MC"), Some(QuestionKind::MultipleChoice));
        assert_eq!(
            resolve_kind("multiple_choice"),
            Some(QuestionKind::MultipleChoice)
        );
        assert_eq!(resolve_kind("True/False"), Some(QuestionKind::TrueFalse));
        assert_eq!(resolve_kind("matching"), Some(QuestionKind::Matching));
        assert_eq!(resolve_kind("essay"), None);
        assert_eq!(resolve_kind(""), None);
    }

    #[test]
    fn coerces_mixed_answer_tokens() {
        let raw = json!(["1", "D", "three", { "letter": "B" }, 4]);
        let correct = normalize_correct_indexes(Some(&raw), &options());
        assert_eq!(correct, vec![0, 1, 3]);
    }

    #[test]
    fn coerces_delimited_answer_strings() {
        let raw = json!("b; 1, Third");
        let opts = vec!["First".to_string(), "Second".to_string(), "Third".to_string()];
        assert_eq!(normalize_correct_indexes(Some(&raw), &opts), vec![0, 1, 2]);
    }

    #[test]
    fn defaults_to_first_option_when_answer_key_is_garbage() {
        let raw = json!("not an option");
        assert_eq!(normalize_correct_indexes(Some(&raw), &options()), vec![0]);
        assert_eq!(normalize_correct_indexes(None, &options()), vec![0]);
    }

    #[test]
    fn boolean_coercion_accepts_common_renderings() {
        assert!(normalize_boolean(Some(&json!(true)), false));
        assert!(normalize_boolean(Some(&json!("TRUE")), false));
        assert!(normalize_boolean(Some(&json!("y")), false));
        assert!(normalize_boolean(Some(&json!(2)), false));
        assert!(!normalize_boolean(Some(&json!("no")), true));
        assert!(!normalize_boolean(Some(&json!(0)), true));
        assert!(normalize_boolean(Some(&json!("maybe")), true));
        assert!(!normalize_boolean(None, false));
    }

    #[test]
    fn matches_accept_arrays_objects_and_strings() {
        let from_arrays = normalize_matches(Some(&json!([[1, "A"], [2, 2]])), 2, 2);
        assert_eq!(from_arrays, vec![(0, 0), (1, 1)]);

        let from_objects = normalize_matches(
            Some(&json!([
                { "left": 1, "right": "B" },
                { "source": 2, "target": 1 },
            ])),
            2,
            2,
        );
        assert_eq!(from_objects, vec![(0, 1), (1, 0)]);

        let from_string = normalize_matches(Some(&json!("1-A, 2:B")), 2, 2);
        assert_eq!(from_string, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn matches_drop_out_of_range_pairs() {
        let pairs = normalize_matches(Some(&json!(["1-A", "9-B", "2-Z"])), 2, 2);
        assert_eq!(pairs, vec![(0, 0)]);
    }

    #[test]
    fn normalizes_a_structured_mc_question() {
        let raw = json!({
            "type": "MC",
            "prompt": "Select every valid option",
            "options": ["First", "Second", "Third"],
            "correct": ["b", "1", "Third"],
        });
        let q = normalize_structured_question(&raw).unwrap();
        assert_eq!(
            q,
            Question::MultipleChoice {
                text: "Select every valid option".to_string(),
                options: vec![
                    "First".to_string(),
                    "Second".to_string(),
                    "Third".to_string()
                ],
                correct: vec![0, 1, 2],
            }
        );
    }

    #[test]
    fn aliased_fields_resolve() {
        let raw = json!({
            "kind": "TRUE_FALSE",
            "stem": "The sky is blue.",
            "solution": "t",
        });
        assert_eq!(
            normalize_structured_question(&raw),
            Some(Question::TrueFalse {
                text: "The sky is blue.".to_string(),
                correct: true,
            })
        );
    }

    #[test]
    fn matching_columns_fall_back_to_pair_objects() {
        let raw = json!({
            "type": "MATCHING",
            "prompt": "Match the objects",
            "pairs": [
                { "left": "Sun", "right": "Day" },
                { "left": "Moon", "right": "Night" },
            ],
            "matches": ["1-A", "2-B"],
        });
        let q = normalize_structured_question(&raw).unwrap();
        assert_eq!(
            q,
            Question::Matching {
                text: "Match the objects".to_string(),
                left: vec!["Sun".to_string(), "Moon".to_string()],
                right: vec!["Day".to_string(), "Night".to_string()],
                pairs: vec![(0, 0), (1, 1)],
            }
        );
    }

    #[test]
    fn rejects_questions_that_cannot_be_made_valid() {
        // Unknown type
        assert_eq!(
            normalize_structured_question(&json!({ "type": "ESSAY", "prompt": "Write" })),
            None
        );
        // Missing prompt
        assert_eq!(
            normalize_structured_question(&json!({ "type": "MC", "options": ["a", "b"] })),
            None
        );
        // Too few options
        assert_eq!(
            normalize_structured_question(&json!({
                "type": "MC", "prompt": "Q", "options": ["only"], "correct": "A"
            })),
            None
        );
        // Matches that do not cover every left item
        assert_eq!(
            normalize_structured_question(&json!({
                "type": "MT",
                "prompt": "Match",
                "left": ["A", "B", "C"],
                "right": ["1", "2", "3"],
                "matches": ["1-A"],
            })),
            None
        );
        // Not an object at all
        assert_eq!(normalize_structured_question(&json!("TF|Sky?|T")), None);
    }
}
