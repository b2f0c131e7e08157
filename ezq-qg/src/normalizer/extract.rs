//! Loose JSON extraction
//!
//! LLM responses rarely arrive as clean JSON: code fences, leading prose and
//! trailing commentary are all common. Recovery strategies, in order:
//! 1. direct parse of the trimmed text
//! 2. parse with a surrounding ```` ```json ```` fence stripped
//! 3. parse the first brace/bracket-balanced span found by a depth walk
//!
//! An array root is wrapped as `{"questions": [...]}` so callers always see
//! an object. `None` means "treat the input as legacy lines", never a hard
//! error.

use serde_json::{json, Value};

/// Recover a JSON value from noisy text.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(wrap_array_root(value));
    }

    if let Some(unfenced) = strip_fence(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(&unfenced) {
            return Some(wrap_array_root(value));
        }
    }

    balanced_span(trimmed)
        .and_then(|span| serde_json::from_str::<Value>(span).ok())
        .map(wrap_array_root)
}

fn wrap_array_root(value: Value) -> Value {
    if value.is_array() {
        json!({ "questions": value })
    } else {
        value
    }
}

/// Remove a leading ```` ```json ```` (or bare ```` ``` ````) fence and a
/// trailing ```` ``` ```` fence. Returns `None` when nothing was stripped.
fn strip_fence(text: &str) -> Option<String> {
    let mut stripped = text;
    let mut changed = false;

    for prefix in ["```json", "```JSON", "```Json", "```"] {
        if let Some(rest) = stripped.strip_prefix(prefix) {
            stripped = rest;
            changed = true;
            break;
        }
    }
    if let Some(rest) = stripped.strip_suffix("```") {
        stripped = rest;
        changed = true;
    }

    if changed {
        Some(stripped.trim().to_string())
    } else {
        None
    }
}

/// Find the first balanced `{...}` or `[...]` span. The walk is a naive
/// depth count over both bracket kinds; only the first balanced span is
/// attempted.
fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
