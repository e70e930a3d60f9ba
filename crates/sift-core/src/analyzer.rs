//! Aggregate analysis: one thematic summary plus a sentiment tally over
//! every clean item.

use serde_json::{Map, Value};
use sift_llm::ProviderError;
use sift_types::{AggregateAnalysis, SentimentCounts};
use tracing::{debug, warn};

use crate::json_cleanup::{parse_object, scrape_count_field, scrape_string_field};
use crate::llm::{Llm, Sampling};
use crate::prompts;

const SENTIMENT_KEYS: [&str; 2] = ["sentiment", "sentiment_analysis"];

/// Summarize `items` and count them by tone.
///
/// An empty slice returns [`AggregateAnalysis::no_data`] without calling the
/// model. Malformed output never fails: fields are scraped from the text
/// when it does not parse, anything missing stays empty or zero, and a
/// response with no usable completion yields an empty analysis. Call
/// failures (transport, auth, exhausted retries) are returned.
pub async fn analyze(items: &[String], llm: &Llm) -> Result<AggregateAnalysis, ProviderError> {
    if items.is_empty() {
        return Ok(AggregateAnalysis::no_data());
    }

    match llm
        .complete(&prompts::analysis(items), Sampling::ANALYZE)
        .await
    {
        Ok(raw) => Ok(interpret(&raw)),
        // An empty or undecodable completion is malformed output, not a
        // failed call.
        Err(ProviderError::InvalidResponse(detail)) => {
            warn!(%detail, "analysis response unusable, returning empty analysis");
            Ok(interpret(""))
        }
        Err(e) => Err(e),
    }
}

/// Turn the model's reply into an [`AggregateAnalysis`].
pub fn interpret(raw: &str) -> AggregateAnalysis {
    if let Some(Value::Object(object)) = parse_object::<Value>(raw) {
        return from_object(&object);
    }

    warn!("analysis reply was not valid JSON, scraping fields");
    debug!(reply = %raw, "unparseable analysis reply");
    AggregateAnalysis {
        summary: scrape_string_field(raw, "summary").unwrap_or_default(),
        sentiment: SentimentCounts {
            positive: scrape_count_field(raw, "positive").unwrap_or(0),
            neutral: scrape_count_field(raw, "neutral").unwrap_or(0),
            negative: scrape_count_field(raw, "negative").unwrap_or(0),
        },
    }
}

fn from_object(object: &Map<String, Value>) -> AggregateAnalysis {
    let summary = object
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let sentiment = SENTIMENT_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_object))
        .map(|counts| SentimentCounts {
            positive: count(counts, "positive"),
            neutral: count(counts, "neutral"),
            negative: count(counts, "negative"),
        })
        .unwrap_or_default();

    AggregateAnalysis { summary, sentiment }
}

/// A non-negative integer count; anything else reads as 0.
fn count(counts: &Map<String, Value>, key: &str) -> u32 {
    counts
        .get(key)
        .and_then(Value::as_u64)
        .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX))
}
