//! Pipeline error types.

use std::fmt;

use sift_llm::ProviderError;
use thiserror::Error;

/// Where a report request is in its lifecycle.
///
/// `Received -> Filtering -> Filtered -> Analyzing -> Extracting -> Assembled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Filtering,
    Filtered,
    Analyzing,
    Extracting,
    Assembled,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Filtering => "filtering",
            Self::Filtered => "filtered",
            Self::Analyzing => "analyzing",
            Self::Extracting => "extracting",
            Self::Assembled => "assembled",
        };
        f.write_str(name)
    }
}

/// Terminal failure states of a report request.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Every item was discarded by the filter; the caller can fix this by
    /// sending different input.
    #[error("no valid feedback after filtering ({raw_count} items received)")]
    NoValidFeedback { raw_count: usize },

    /// A provider failure that no stage-level fallback absorbed.
    #[error("internal failure while {stage}: {source}")]
    Internal {
        stage: Stage,
        #[source]
        source: ProviderError,
    },
}

impl PipelineError {
    /// Whether the caller can correct the failure by changing the input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NoValidFeedback { .. })
    }
}
