//! Batched generation controller
//!
//! Drives repeated calls to the text-generation capability until a target
//! number of unique questions is collected or the pass budget runs out.
//! Each pass goes through one full normalization round; questions are
//! deduplicated across passes by stem key, so a model that keeps repeating
//! itself cannot fill the quiz with one question.
//!
//! Effort is bounded: the loop always terminates within the pass budget and
//! a partial result is a success, not a failure. Passes run sequentially;
//! each pass needs the accumulated dedup state of the previous ones.

use std::collections::HashSet;

use ezq_common::QuestionKind;
use tracing::{debug, warn};

use crate::error::GenerateError;
use crate::normalizer::{question_to_legacy_line, quiz_from_legacy_text, NormalizeOptions};
use crate::services::{build_prompt, TextGenerate};

const MAX_COUNT: usize = 100;
const MAX_BATCH: usize = 50;
const DEFAULT_BATCH_CAP: usize = 40;
const MIN_PASSES: usize = 2;
const MAX_PASSES: usize = 12;
const MAX_ASK: usize = 50;

/// Parameters for one batched generation run.
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    pub topic: String,
    /// Target question count, clamped to 1..=100.
    pub count: usize,
    /// Restrict generated questions to these kinds.
    pub kinds: Option<Vec<QuestionKind>>,
    pub difficulty: Option<String>,
    /// Lines requested per pass; defaults to `min(40, target)`, clamped to
    /// 1..=50.
    pub batch_size: Option<usize>,
    /// Pass budget; defaults to `ceil(target / batch) + 2`, clamped to
    /// 2..=12.
    pub max_passes: Option<usize>,
}

/// Result of a batched run.
///
/// `lines` may hold fewer than the requested count when the provider keeps
/// returning duplicates; callers must treat that as an expected outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub title: String,
    pub lines: String,
    pub provider: String,
    pub model: String,
    pub passes: usize,
}

/// Generate quiz lines in deduplicated batches.
pub async fn generate_in_batches(
    provider: &dyn TextGenerate,
    request: &BatchRequest,
) -> Result<BatchOutcome, GenerateError> {
    let target = request.count.clamp(1, MAX_COUNT);
    let batch = request
        .batch_size
        .unwrap_or_else(|| DEFAULT_BATCH_CAP.min(target))
        .clamp(1, MAX_BATCH);
    let budget = request
        .max_passes
        .unwrap_or((target + batch - 1) / batch + 2)
        .clamp(MIN_PASSES, MAX_PASSES);

    let mut seen: HashSet<String> = HashSet::new();
    let mut collected: Vec<String> = Vec::new();
    let mut title = String::new();
    let mut passes = 0usize;

    while passes < budget && collected.len() < target {
        passes += 1;
        let remaining = target - collected.len();
        let ask = MAX_ASK.min(batch.max(remaining));
        let prompt = build_prompt(
            &request.topic,
            ask,
            request.kinds.as_deref(),
            request.difficulty.as_deref(),
        );

        let raw = match provider.generate(&prompt).await {
            Ok(raw) => raw,
            Err(err) if collected.is_empty() => return Err(err),
            Err(err) => {
                warn!(pass = passes, error = %err, "generation pass failed, keeping partial result");
                break;
            }
        };

        // One full normalization round per pass. Noisy output is expected;
        // a pass with zero usable questions just spends budget.
        let opts = NormalizeOptions {
            topic: request.topic.clone(),
            count: Some(ask),
            kinds: request.kinds.clone(),
        };
        let quiz = match quiz_from_legacy_text(&raw, &opts) {
            Ok(quiz) => quiz,
            Err(err) => {
                debug!(pass = passes, error = %err, "pass produced no usable questions");
                continue;
            }
        };

        // First pass to supply a title wins; later passes legitimately
        // return empty or placeholder titles.
        if title.is_empty() && !quiz.title.trim().is_empty() {
            title = quiz.title.trim().to_string();
        }

        for question in &quiz.questions {
            if collected.len() >= target {
                break;
            }
            if !seen.insert(question.stem_key()) {
                continue;
            }
            collected.push(question_to_legacy_line(question));
        }

        debug!(
            pass = passes,
            collected = collected.len(),
            target,
            "generation pass complete"
        );
    }

    if collected.len() < target {
        warn!(
            collected = collected.len(),
            target,
            passes,
            "pass budget exhausted before reaching target"
        );
    }

    Ok(BatchOutcome {
        title,
        lines: collected.join("\n"),
        provider: provider.name().to_string(),
        model: provider.model(),
        passes,
    })
}
