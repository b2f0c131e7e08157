//! Prompt construction for line generation
//!
//! The prompt pins the model to the exact line grammar the lenient parser
//! accepts; everything else in a response is dropped downstream.

use ezq_common::QuestionKind;

/// Build the strict line-format prompt for one generation pass.
pub fn build_prompt(
    topic: &str,
    count: usize,
    kinds: Option<&[QuestionKind]>,
    difficulty: Option<&str>,
) -> String {
    let mut lines = vec![
        format!("Create EXACTLY {count} quiz lines about {topic}."),
        "Output ONLY the lines, no commentary or numbering, one per line.".to_string(),
        "Allowed formats ONLY (mix them):".to_string(),
        "MC|Question?|A) Option 1;B) Option 2;C) Option 3;D) Option 4|A".to_string(),
        "MC|Question with multiple answers?|A) 1;B) 2;C) 3;D) 4|A,C".to_string(),
        "TF|A true/false statement.|T".to_string(),
        "YN|A yes/no question.|Y".to_string(),
        "MT|Match.|1) L1;2) L2;3) L3|A) R1;B) R2;C) R3|1-A,2-B,3-C".to_string(),
        "Rules:".to_string(),
        format!("- EXACTLY {count} lines."),
    ];

    match kinds.filter(|k| !k.is_empty()) {
        Some(kinds) => {
            let tags = kinds
                .iter()
                .map(|k| k.as_tag())
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("- Use only {tags}."));
        }
        None => lines.push("- Use only MC, TF, YN, MT.".to_string()),
    }
    lines.push("- MC correct field may be single (A) or multiple (A,C).".to_string());
    if let Some(difficulty) = difficulty.map(str::trim).filter(|d| !d.is_empty()) {
        lines.push(format!("- Difficulty: {difficulty}."));
    }
    lines.push("- No blank lines or extra prose.".to_string());

    lines.join("\n")
}
