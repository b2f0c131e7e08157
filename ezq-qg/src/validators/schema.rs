//! Quiz schema validator
//!
//! Pure function over an already-shaped quiz: no parsing knowledge, no
//! mutation. Every violation is accumulated (no short-circuit) so callers
//! can report all problems at once, with 1-based human-readable messages.
//!
//! The lenient parsers upstream are designed to only emit questions that
//! pass these checks; this validator is the last line of defense before a
//! quiz is handed to consumers that trust it unconditionally.

use ezq_common::text::index_to_letter;
use ezq_common::{Question, Quiz};

/// Validation outcome: `valid` iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Check a quiz against the structural invariants of the canonical model.
pub fn validate_quiz(quiz: &Quiz) -> ValidationReport {
    let mut errors = Vec::new();

    if quiz.questions.is_empty() {
        errors.push("Quiz must include a non-empty questions array.".to_string());
        return ValidationReport {
            valid: false,
            errors,
        };
    }

    for (index, question) in quiz.questions.iter().enumerate() {
        let base = format!("Question {}", index + 1);

        if question.text().trim().is_empty() {
            errors.push(format!("{base}: text is required."));
        }

        match question {
            Question::MultipleChoice {
                options, correct, ..
            } => {
                validate_multiple_choice(&base, options, correct, &mut errors);
            }
            Question::TrueFalse { .. } | Question::YesNo { .. } => {}
            Question::Matching {
                left, right, pairs, ..
            } => {
                validate_matching(&base, left, right, pairs, &mut errors);
            }
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

fn validate_multiple_choice(
    base: &str,
    options: &[String],
    correct: &[usize],
    errors: &mut Vec<String>,
) {
    if options.len() < 2 {
        errors.push(format!(
            "{base}: multiple choice questions require at least two options."
        ));
    }
    for (i, option) in options.iter().enumerate() {
        if option.trim().is_empty() {
            errors.push(format!("{base}: option {} must be a non-empty string.", i + 1));
        }
    }

    if correct.is_empty() {
        errors.push(format!(
            "{base}: correct answers must include at least one index."
        ));
        return;
    }
    for index in correct {
        if *index >= options.len() {
            errors.push(format!("{base}: correct answer index out of range."));
        }
    }
    for window in correct.windows(2) {
        if window[0] == window[1] {
            errors.push(format!(
                "{base}: correct answer index {} repeated.",
                window[0]
            ));
        } else if window[0] > window[1] {
            errors.push(format!(
                "{base}: correct answer indices must be sorted ascending."
            ));
        }
    }
}

fn validate_matching(
    base: &str,
    left: &[String],
    right: &[String],
    pairs: &[(usize, usize)],
    errors: &mut Vec<String>,
) {
    if left.len() < 2 {
        errors.push(format!(
            "{base}: matching questions require at least two left items."
        ));
    }
    if right.len() < 2 {
        errors.push(format!(
            "{base}: matching questions require at least two right items."
        ));
    }

    for (i, item) in left.iter().enumerate() {
        if item.trim().is_empty() {
            errors.push(format!(
                "{base}: left item {} must be a non-empty string.",
                i + 1
            ));
        }
    }
    for (i, item) in right.iter().enumerate() {
        if item.trim().is_empty() {
            let label = index_to_letter(i).map(String::from).unwrap_or_else(|| (i + 1).to_string());
            errors.push(format!(
                "{base}: right item {label} must be a non-empty string."
            ));
        }
    }

    if pairs.len() != left.len() {
        errors.push(format!("{base}: number of pairs must match left items."));
    }

    let mut left_seen = vec![false; left.len()];
    for (left_index, right_index) in pairs {
        if *left_index >= left.len() {
            errors.push(format!("{base}: left index {left_index} is out of range."));
        } else if left_seen[*left_index] {
            errors.push(format!(
                "{base}: left item {} mapped more than once.",
                left_index + 1
            ));
        } else {
            left_seen[*left_index] = true;
        }
        if *right_index >= right.len() {
            errors.push(format!(
                "{base}: right index {right_index} is out of range."
            ));
        }
    }
    for (index, seen) in left_seen.iter().enumerate() {
        if !seen {
            errors.push(format!("{base}: left item {} is not matched.", index + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz_of(questions: Vec<Question>) -> Quiz {
        Quiz {
            title: "T".to_string(),
            topic: "t".to_string(),
            questions,
        }
    }

    fn valid_mc() -> Question {
        Question::MultipleChoice {
            text: "Pick one".to_string(),
            options: vec!["A".to_string(), "B".to_string()],
            correct: vec![1],
        }
    }

    #[test]
    fn accepts_a_well_formed_quiz() {
        let report = validate_quiz(&quiz_of(vec![
            valid_mc(),
            Question::TrueFalse {
                text: "Sky?".to_string(),
                correct: true,
            },
            Question::Matching {
                text: "Match".to_string(),
                left: vec!["L1".to_string(), "L2".to_string()],
                right: vec!["R1".to_string(), "R2".to_string()],
                pairs: vec![(0, 1), (1, 0)],
            },
        ]));
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn rejects_empty_question_list() {
        let report = validate_quiz(&quiz_of(vec![]));
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec!["Quiz must include a non-empty questions array.".to_string()]
        );
    }

    #[test]
    fn accumulates_every_violation() {
        let report = validate_quiz(&quiz_of(vec![
            Question::MultipleChoice {
                text: "".to_string(),
                options: vec!["only".to_string()],
                correct: vec![],
            },
            valid_mc(),
        ]));
        assert!(!report.valid);
        assert!(report.errors.len() >= 3);
        assert!(report.errors.iter().all(|e| e.starts_with("Question 1:")));
    }

    #[test]
    fn flags_out_of_range_unsorted_and_repeated_mc_answers() {
        let bad = |correct: Vec<usize>| {
            Question::MultipleChoice {
                text: "Q".to_string(),
                options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                correct,
            }
        };

        let report = validate_quiz(&quiz_of(vec![bad(vec![0, 5])]));
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("correct answer index out of range")));

        let report = validate_quiz(&quiz_of(vec![bad(vec![2, 0])]));
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("sorted ascending")));

        let report = validate_quiz(&quiz_of(vec![bad(vec![1, 1])]));
        assert!(report.errors.iter().any(|e| e.contains("repeated")));
    }

    #[test]
    fn flags_unmatched_left_item() {
        let report = validate_quiz(&quiz_of(vec![Question::Matching {
            text: "Match".to_string(),
            left: vec!["L1".to_string(), "L2".to_string(), "L3".to_string()],
            right: vec!["R1".to_string(), "R2".to_string(), "R3".to_string()],
            pairs: vec![(0, 0), (0, 1), (2, 2)],
        }]));
        assert!(!report.valid);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("left item 1 mapped more than once")));
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("left item 2 is not matched")));
    }

    #[test]
    fn allows_right_item_reuse() {
        let report = validate_quiz(&quiz_of(vec![Question::Matching {
            text: "Match".to_string(),
            left: vec!["L1".to_string(), "L2".to_string()],
            right: vec!["R1".to_string(), "R2".to_string()],
            pairs: vec![(0, 0), (1, 0)],
        }]));
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn flags_pair_count_mismatch() {
        let report = validate_quiz(&quiz_of(vec![Question::Matching {
            text: "Match".to_string(),
            left: vec!["L1".to_string(), "L2".to_string()],
            right: vec!["R1".to_string(), "R2".to_string()],
            pairs: vec![(0, 0)],
        }]));
        assert!(!report.valid);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("number of pairs must match left items")));
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("left item 2 is not matched")));
    }
}
