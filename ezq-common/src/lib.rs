//! # EZQ Common Library
//!
//! Shared code for the EZQ quiz services including:
//! - The canonical quiz model (`Quiz`, tagged `Question` union)
//! - Text helpers (stem keys, answer-letter mapping)
//! - Shared error types

pub mod error;
pub mod quiz;
pub mod text;

pub use error::{Error, Result};
pub use quiz::{Question, QuestionKind, Quiz};
