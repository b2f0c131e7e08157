//! Error types for the quiz authoring service

use thiserror::Error;

/// Failure modes of quiz normalization.
///
/// Per-line and per-question problems are not represented here: the lenient
/// paths drop them and the strict parser collects them as
/// [`crate::parser::LineIssue`] values. Only the aggregate failures below
/// abort a normalization call.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// No structurally valid question could be extracted by any strategy.
    /// Carries the raw input length, never the content, to keep logs lean.
    #[error("no valid quiz questions found in input ({input_len} bytes)")]
    NoQuestions { input_len: usize },

    /// An already-shaped quiz failed schema validation. Carries the full
    /// list of human-readable violations.
    #[error("quiz failed validation: {}", details.join("; "))]
    InvalidQuiz { details: Vec<String> },
}

/// Errors from the external text-generation capability.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No provider registered under the configured name.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// The provider failed to produce text.
    #[error("provider error: {0}")]
    Provider(String),
}
