//! Text-generation capability
//!
//! The only thing the authoring core knows about an LLM is
//! `generate(prompt) -> text`. Auth, retries and timeouts belong to the
//! provider implementation or its caller; an HTTP-backed provider plugs in
//! behind [`TextGenerate`] without the core changing.

use async_trait::async_trait;

use crate::config::GenerationConfig;
use crate::error::GenerateError;

/// An opaque text-completion capability.
#[async_trait]
pub trait TextGenerate: Send + Sync {
    /// Provider name, recorded in generation results.
    fn name(&self) -> &'static str;

    /// Model identifier, recorded in generation results.
    fn model(&self) -> String;

    /// Produce raw text for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Deterministic no-network provider.
///
/// Cycles the four line shapes for whatever count and topic the prompt asks
/// for. Used for tests and keyless operation.
#[derive(Debug, Default)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }

    /// Pull `count` and `topic` back out of the prompt's first line
    /// (`Create EXACTLY <n> quiz lines about <topic>.`).
    fn parse_request(prompt: &str) -> (usize, String) {
        let first = prompt.lines().next().unwrap_or_default();
        let count = first
            .split_whitespace()
            .skip_while(|w| *w != "EXACTLY")
            .nth(1)
            .and_then(|w| w.parse::<usize>().ok())
            .unwrap_or(10);
        let topic = first
            .split_once(" about ")
            .map(|(_, rest)| rest.trim_end_matches('.').trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "General knowledge".to_string());
        (count, topic)
    }
}

#[async_trait]
impl TextGenerate for EchoProvider {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn model(&self) -> String {
        "stub".to_string()
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let (count, topic) = Self::parse_request(prompt);
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let n = i + 1;
            let line = match i % 4 {
                0 => format!("MC|{topic}: Sample MC {n}?|A) One;B) Two;C) Three;D) Four|A"),
                1 => format!("TF|{topic}: Sample TF {n}.|T"),
                2 => format!("YN|{topic}: Sample YN {n}?|Y"),
                _ => format!("MT|{topic}: Match {n}.|1) L1;2) L2|A) R1;B) R2|1-A,2-B"),
            };
            out.push(line);
        }
        Ok(out.join("\n"))
    }
}

/// Resolve the configured provider by name.
///
/// Only the echo stub is built in; HTTP-backed providers live outside the
/// core and are injected by their callers.
pub fn resolve_provider(config: &GenerationConfig) -> Result<Box<dyn TextGenerate>, GenerateError> {
    match config.provider.trim().to_ascii_lowercase().as_str() {
        "echo" => Ok(Box::new(EchoProvider::new())),
        other => Err(GenerateError::UnknownProvider(other.to_string())),
    }
}
