//! Data model for one report request.
//!
//! Nothing here is persisted: every value is produced and dropped within a
//! single request.

use serde::{Deserialize, Serialize};

/// A single recommended improvement, in the order the model listed it.
pub type ActionStep = String;

/// Summary used when the aggregate analyzer is handed no items.
pub const NO_DATA_SUMMARY: &str = "No feedback available for analysis.";

/// Outcome of classifying one feedback item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The item contains abusive or otherwise inappropriate content.
    #[serde(alias = "containsInappropriate")]
    pub contains_inappropriate: bool,

    /// The item contains personally identifying information.
    #[serde(alias = "containsPii")]
    pub contains_pii: bool,

    /// The item text with PII replaced by `[REDACTED]`.
    #[serde(alias = "cleanedText")]
    pub cleaned_text: String,
}

impl ClassificationResult {
    /// Result used when the model could not classify the item: both flags
    /// cleared and the text scrubbed by the regex redactor instead.
    pub fn unflagged(cleaned_text: impl Into<String>) -> Self {
        Self {
            contains_inappropriate: false,
            contains_pii: false,
            cleaned_text: cleaned_text.into(),
        }
    }

    /// Whether the item may take part in aggregate analysis.
    pub fn is_clean(&self) -> bool {
        !self.contains_inappropriate && !self.contains_pii
    }
}

/// Tone tally across the cleaned corpus.
///
/// The counts reflect the model's holistic judgement and are not required
/// to add up to the number of items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentCounts {
    pub fn total(&self) -> u64 {
        u64::from(self.positive) + u64::from(self.neutral) + u64::from(self.negative)
    }
}

/// Thematic summary and sentiment for a batch of feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateAnalysis {
    pub summary: String,
    pub sentiment: SentimentCounts,
}

impl AggregateAnalysis {
    /// The sentinel returned for an empty corpus.
    pub fn no_data() -> Self {
        Self {
            summary: NO_DATA_SUMMARY.into(),
            sentiment: SentimentCounts::default(),
        }
    }
}

/// The final report returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    pub summary: String,
    pub sentiment: SentimentCounts,
    pub actions: Vec<ActionStep>,
    /// Number of items the caller submitted.
    pub raw_count: usize,
    /// Number of items that survived filtering.
    pub clean_count: usize,
}
