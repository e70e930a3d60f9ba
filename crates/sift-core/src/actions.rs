//! Suggested action steps for the instructor.

use std::sync::LazyLock;

use regex::Regex;
use sift_types::ActionStep;
use tracing::{debug, warn};

use crate::llm::{Llm, Sampling};
use crate::prompts;

const BULLET_MARKERS: &[char] = &['-', '*', '•'];

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence pattern is valid"));

/// Ask the model for action steps toward `instruction` and parse its list.
///
/// Returns an empty list without calling the model when `items` is empty,
/// and an empty list when the call fails.
pub async fn extract_actions(items: &[String], instruction: &str, llm: &Llm) -> Vec<ActionStep> {
    if items.is_empty() {
        return Vec::new();
    }

    match llm
        .complete(
            &prompts::action_steps(items, instruction),
            Sampling::ACTIONS,
        )
        .await
    {
        Ok(text) => {
            let steps = parse_action_steps(&text);
            debug!(steps = steps.len(), "action steps extracted");
            steps
        }
        Err(e) => {
            warn!(error = %e, "action extraction failed, returning no steps");
            Vec::new()
        }
    }
}

/// Parse a completion into individual steps.
///
/// 1. Lines starting with `-`, `*` or `•` are steps, marker removed.
/// 2. With no bullets, each non-empty line is a step when there are at
///    least two of them.
/// 3. Otherwise the text is split into sentences after `.`, `!` or `?`
///    followed by whitespace.
///
/// Non-empty text always yields at least one step.
pub fn parse_action_steps(text: &str) -> Vec<String> {
    let bulleted: Vec<String> = text
        .lines()
        .filter_map(|line| line.trim().strip_prefix(BULLET_MARKERS))
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(String::from)
        .collect();
    if !bulleted.is_empty() {
        return bulleted;
    }

    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    if lines.len() > 1 {
        return lines;
    }

    split_sentences(text)
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_END.find_iter(text) {
        // The punctuation mark is ASCII, so `start() + 1` is a char boundary.
        sentences.push(&text[start..boundary.start() + 1]);
        start = boundary.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
