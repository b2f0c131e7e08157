//! Generation services
//!
//! The external text-generation capability and everything built on top of
//! it: prompt construction and the batched, deduplicating controller.

mod batcher;
mod prompt;
mod provider;

pub use batcher::{generate_in_batches, BatchOutcome, BatchRequest};
pub use prompt::build_prompt;
pub use provider::{resolve_provider, EchoProvider, TextGenerate};
