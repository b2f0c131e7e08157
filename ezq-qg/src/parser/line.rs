//! Legacy line grammar
//!
//! One question per line, `|` between fields, `;` between list entries and
//! `,` between sub-list entries. Field content may carry escaped delimiters
//! (`\|`, `\;`, `\,`) which are unescaped during extraction and re-escaped
//! by the serializer.
//!
//! Line shapes:
//! - `MC|<text>|<opt>;<opt>...|<LETTER>[,<LETTER>...]`
//! - `TF|<text>|T` (or `F`)
//! - `YN|<text>|Y` (or `N`)
//! - `MT|<text>|<n>) <item>;...|<LETTER>) <item>;...|<n>-<LETTER>,...`
//!
//! Option, left and right entries may carry a leading `A) ` / `1) ` label
//! which is stripped on parse.

use ezq_common::text::letter_to_index;
use ezq_common::Question;
use thiserror::Error;

/// Delimiters that may appear escaped inside field content.
const ESCAPABLE: [char; 3] = ['|', ';', ','];

/// Why a single line failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineParseError {
    #[error("unknown or invalid format")]
    UnknownFormat,

    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("question text is empty")]
    EmptyText,

    #[error("multiple choice requires at least two options")]
    TooFewOptions,

    #[error("answer token {0:?} is not a letter")]
    BadAnswerToken(String),

    #[error("answer letter {0} is out of range")]
    AnswerOutOfRange(char),

    #[error("answer letter {0} given more than once")]
    DuplicateAnswer(char),

    #[error("at least one correct answer letter is required")]
    NoAnswers,

    #[error("answer must be {expected}")]
    BadAnswer { expected: &'static str },

    #[error("matching requires at least two items per column")]
    TooFewMatchItems,

    #[error("pair token {0:?} is malformed")]
    BadPairToken(String),

    #[error("pair references an item out of range")]
    PairOutOfRange,

    #[error("left item {0} is mapped more than once")]
    DuplicateLeft(usize),

    #[error("left item {0} is not matched")]
    UnmatchedLeft(usize),
}

/// Split on a delimiter, honoring `\`-escapes. The returned fields still
/// contain their escape sequences; callers unescape after any further
/// splitting.
pub(crate) fn split_unescaped(input: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if ESCAPABLE.contains(&next) {
                    current.push('\\');
                    current.push(next);
                    chars.next();
                    continue;
                }
            }
            current.push('\\');
        } else if ch == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}

/// Remove the backslash from `\|`, `\;` and `\,`. Other backslashes are
/// literal content.
pub(crate) fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if ESCAPABLE.contains(&next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}

/// Escape `|`, `;` and `,` so the value survives a round trip through the
/// line grammar.
pub(crate) fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ESCAPABLE.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Strip a leading `A) ` style letter label.
fn strip_letter_label(item: &str) -> &str {
    let bytes = item.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b')' {
        item[2..].trim_start()
    } else {
        item
    }
}

/// Strip a leading `1) ` style ordinal label.
fn strip_ordinal_label(item: &str) -> &str {
    let digits = item.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 && item.as_bytes().get(digits) == Some(&b')') {
        item[digits + 1..].trim_start()
    } else {
        item
    }
}

/// Split a `;`-delimited list field into cleaned entries: label stripped,
/// escapes resolved, blanks dropped.
fn list_entries(field: &str, strip_label: fn(&str) -> &str) -> Vec<String> {
    split_unescaped(field, ';')
        .iter()
        .map(|entry| unescape(strip_label(entry.trim())).trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn question_text(field: &str) -> Result<String, LineParseError> {
    let text = unescape(field.trim()).trim().to_string();
    if text.is_empty() {
        return Err(LineParseError::EmptyText);
    }
    Ok(text)
}

/// Parse one trimmed, non-blank line into a typed question.
///
/// The line must satisfy every structural invariant of its shape; a line
/// that parses here never fails downstream schema validation.
pub fn parse_line(raw: &str) -> Result<Question, LineParseError> {
    let fields = split_unescaped(raw.trim(), '|');
    match fields[0].trim().to_ascii_uppercase().as_str() {
        "MC" => parse_mc(&fields),
        "TF" => {
            let (text, correct) = parse_bool_fields(&fields, 'T', 'F', "T or F")?;
            Ok(Question::TrueFalse { text, correct })
        }
        "YN" => {
            let (text, correct) = parse_bool_fields(&fields, 'Y', 'N', "Y or N")?;
            Ok(Question::YesNo { text, correct })
        }
        "MT" => parse_mt(&fields),
        _ => Err(LineParseError::UnknownFormat),
    }
}

fn parse_mc(fields: &[String]) -> Result<Question, LineParseError> {
    if fields.len() != 4 {
        return Err(LineParseError::FieldCount {
            expected: 4,
            found: fields.len(),
        });
    }
    let text = question_text(&fields[1])?;

    let options = list_entries(&fields[2], strip_letter_label);
    if options.len() < 2 {
        return Err(LineParseError::TooFewOptions);
    }

    let mut correct = Vec::new();
    for token in fields[3].split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let mut chars = token.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => return Err(LineParseError::BadAnswerToken(token.to_string())),
        };
        let index = (letter as u8 - b'A') as usize;
        if index >= options.len() {
            return Err(LineParseError::AnswerOutOfRange(letter));
        }
        if correct.contains(&index) {
            return Err(LineParseError::DuplicateAnswer(letter));
        }
        correct.push(index);
    }
    if correct.is_empty() {
        return Err(LineParseError::NoAnswers);
    }
    correct.sort_unstable();

    Ok(Question::MultipleChoice {
        text,
        options,
        correct,
    })
}

fn parse_bool_fields(
    fields: &[String],
    yes: char,
    no: char,
    expected: &'static str,
) -> Result<(String, bool), LineParseError> {
    if fields.len() != 3 {
        return Err(LineParseError::FieldCount {
            expected: 3,
            found: fields.len(),
        });
    }
    let text = question_text(&fields[1])?;
    let answer = fields[2].trim();
    let mut chars = answer.chars();
    let correct = match (chars.next(), chars.next()) {
        (Some(c), None) if c.eq_ignore_ascii_case(&yes) => true,
        (Some(c), None) if c.eq_ignore_ascii_case(&no) => false,
        _ => return Err(LineParseError::BadAnswer { expected }),
    };
    Ok((text, correct))
}

fn parse_mt(fields: &[String]) -> Result<Question, LineParseError> {
    if fields.len() != 5 {
        return Err(LineParseError::FieldCount {
            expected: 5,
            found: fields.len(),
        });
    }
    let text = question_text(&fields[1])?;

    let left = list_entries(&fields[2], strip_ordinal_label);
    let right = list_entries(&fields[3], strip_letter_label);
    if left.len() < 2 || right.len() < 2 {
        return Err(LineParseError::TooFewMatchItems);
    }

    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for token in fields[4].split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let Some((left_part, right_part)) = token.split_once('-') else {
            return Err(LineParseError::BadPairToken(token.to_string()));
        };
        let left_index = left_part
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| LineParseError::BadPairToken(token.to_string()))?;
        let right_index = letter_to_index(right_part.trim())
            .ok_or_else(|| LineParseError::BadPairToken(token.to_string()))?;
        if left_index >= left.len() || right_index >= right.len() {
            return Err(LineParseError::PairOutOfRange);
        }
        if pairs.iter().any(|(l, _)| *l == left_index) {
            return Err(LineParseError::DuplicateLeft(left_index + 1));
        }
        pairs.push((left_index, right_index));
    }

    // Every left item must be consumed by exactly one pair.
    for index in 0..left.len() {
        if !pairs.iter().any(|(l, _)| *l == index) {
            return Err(LineParseError::UnmatchedLeft(index + 1));
        }
    }

    Ok(Question::Matching {
        text,
        left,
        right,
        pairs,
    })
}
