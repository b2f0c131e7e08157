//! Structural validation of canonical quizzes

mod schema;

pub use schema::{validate_quiz, ValidationReport};
