//! ezq-qg - Quiz Authoring and Generation Service
//!
//! Turns uncontrolled quiz input into the canonical quiz model the rest of
//! the application trusts. Input arrives from three sources that must
//! converge on one representation: a human typing the pipe-delimited line
//! language, an LLM asked to emit those same lines, or an LLM asked to emit
//! structured JSON.
//!
//! The crate also drives batched LLM generation: repeated calls to an
//! abstract text-generation capability, with cross-pass deduplication by
//! question stem and a bounded pass budget.

pub mod config;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod services;
pub mod validators;

pub use crate::error::{GenerateError, NormalizeError};
