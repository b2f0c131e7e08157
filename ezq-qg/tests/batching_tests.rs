//! Batched generation controller tests
//!
//! Uses a scripted provider that replays canned pass outputs, the same way
//! the real capability would feed the controller one response per pass.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use ezq_qg::services::{generate_in_batches, BatchRequest, TextGenerate};
use ezq_qg::GenerateError;

enum Response {
    Text(&'static str),
    Fail,
}

/// Replays scripted responses in order; an exhausted script fails.
struct ScriptedProvider {
    responses: Mutex<VecDeque<Response>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<Response>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
        }
    }
}

#[async_trait]
impl TextGenerate for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> String {
        "test".to_string()
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        let next = self
            .responses
            .lock()
            .expect("script lock poisoned")
            .pop_front();
        match next {
            Some(Response::Text(text)) => Ok(text.to_string()),
            Some(Response::Fail) | None => {
                Err(GenerateError::Provider("scripted failure".to_string()))
            }
        }
    }
}

fn request(count: usize, batch_size: usize, max_passes: usize) -> BatchRequest {
    BatchRequest {
        topic: "Chunked Topic".to_string(),
        count,
        batch_size: Some(batch_size),
        max_passes: Some(max_passes),
        ..BatchRequest::default()
    }
}

#[tokio::test]
async fn trims_to_count_keeps_first_title_and_skips_duplicate_stems() {
    let provider = ScriptedProvider::new(vec![
        Response::Text(
            "TITLE: First Title\n\
             MC|Alpha stem?|A) 1;B) 2;C) 3;D) 4|A\n\
             MC|Beta stem?|A) 1;B) 2;C) 3;D) 4|B\n\
             MC|Gamma stem?|A) 1;B) 2;C) 3;D) 4|C",
        ),
        Response::Text(
            "TITLE: Second Title\n\
             MC|Alpha stem?|A) 1;B) 2;C) 3;D) 4|A\n\
             MC|Delta stem?|A) 1;B) 2;C) 3;D) 4|D\n\
             MC|Epsilon stem?|A) 1;B) 2;C) 3;D) 4|A",
        ),
    ]);

    let outcome = generate_in_batches(&provider, &request(4, 3, 3))
        .await
        .unwrap();

    assert_eq!(outcome.title, "First Title");
    assert_eq!(outcome.provider, "scripted");
    assert_eq!(outcome.model, "test");
    assert_eq!(outcome.passes, 2);

    let lines: Vec<&str> = outcome.lines.lines().collect();
    assert_eq!(
        lines,
        vec![
            "MC|Alpha stem?|A) 1;B) 2;C) 3;D) 4|A",
            "MC|Beta stem?|A) 1;B) 2;C) 3;D) 4|B",
            "MC|Gamma stem?|A) 1;B) 2;C) 3;D) 4|C",
            "MC|Delta stem?|A) 1;B) 2;C) 3;D) 4|D",
        ]
    );
}

#[tokio::test]
async fn returns_collected_lines_when_duplicates_exhaust_the_budget() {
    let provider = ScriptedProvider::new(vec![
        Response::Text(
            "TITLE: Sparse Batch\n\
             MC|Alpha stem?|A) 1;B) 2;C) 3;D) 4|A\n\
             MC|Beta stem?|A) 1;B) 2;C) 3;D) 4|B",
        ),
        Response::Text("MC|Alpha stem?|A) 1;B) 2;C) 3;D) 4|A"),
        Response::Text("MC|Beta stem?|A) 1;B) 2;C) 3;D) 4|B"),
    ]);

    let outcome = generate_in_batches(&provider, &request(5, 2, 3))
        .await
        .unwrap();

    assert_eq!(outcome.title, "Sparse Batch");
    assert_eq!(outcome.passes, 3);
    let lines: Vec<&str> = outcome.lines.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Alpha stem?"));
    assert!(lines[1].contains("Beta stem?"));
}

#[tokio::test]
async fn dedup_ignores_trivial_whitespace_before_punctuation() {
    let provider = ScriptedProvider::new(vec![
        Response::Text(
            "MC|Alpha stem?|A) 1;B) 2|A\n\
             MC|Beta stem?|A) 1;B) 2|B",
        ),
        Response::Text(
            "MC|Alpha stem ?|A) 1;B) 2|A\n\
             MC|Gamma stem?|A) 1;B) 2|B",
        ),
    ]);

    let outcome = generate_in_batches(&provider, &request(3, 2, 2))
        .await
        .unwrap();

    let lines: Vec<&str> = outcome.lines.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().any(|l| l.contains("Gamma stem?")));
    // The first rendering of the Alpha stem is the one that survives.
    assert!(lines.iter().any(|l| l.contains("Alpha stem?")));
    assert!(!lines.iter().any(|l| l.contains("Alpha stem ?")));
}

#[tokio::test]
async fn passes_with_no_usable_lines_spend_budget_but_do_not_abort() {
    let provider = ScriptedProvider::new(vec![
        Response::Text("I am sorry, I cannot produce quiz lines today."),
        Response::Text("TF|Recovered?|T"),
    ]);

    let outcome = generate_in_batches(&provider, &request(1, 1, 3))
        .await
        .unwrap();

    assert_eq!(outcome.passes, 2);
    assert_eq!(outcome.lines, "TF|Recovered?|T");
}

#[tokio::test]
async fn provider_failure_before_any_result_propagates() {
    let provider = ScriptedProvider::new(vec![Response::Fail]);
    let err = generate_in_batches(&provider, &request(3, 2, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::Provider(_)));
}

#[tokio::test]
async fn provider_failure_after_a_productive_pass_returns_partial_result() {
    let provider = ScriptedProvider::new(vec![
        Response::Text("TF|First pass worked?|T"),
        Response::Fail,
    ]);

    let outcome = generate_in_batches(&provider, &request(3, 1, 3))
        .await
        .unwrap();

    assert_eq!(outcome.passes, 2);
    assert_eq!(outcome.lines, "TF|First pass worked?|T");
}
