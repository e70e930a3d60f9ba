//! Report orchestration.
//!
//! [`ReportPipeline::run`] walks one request through the stages in
//! [`Stage`] order:
//!
//! 1. **Received** -- record how many items arrived.
//! 2. **Filtering** -- classify every item (bounded concurrency, input order kept).
//! 3. **Filtered** -- keep the cleaned text of items with neither flag set;
//!    stop with [`PipelineError::NoValidFeedback`] if none remain.
//! 4. **Analyzing** / **Extracting** -- aggregate analysis and action
//!    extraction, run concurrently over the clean list.
//! 5. **Assembled** -- merge everything into a [`FeedbackReport`].
//!
//! A pipeline holds no per-request state, so one instance is shared by
//! every concurrent request.

use std::sync::Arc;

use sift_llm::{Provider, RetryConfig};
use sift_types::{Config, FeedbackReport};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::actions::extract_actions;
use crate::analyzer::analyze;
use crate::classifier::classify_all;
use crate::error::{PipelineError, Stage};
use crate::llm::Llm;
use crate::prompts::REPORT_ACTION_INSTRUCTION;

/// Turns raw feedback into a [`FeedbackReport`].
#[derive(Debug, Clone)]
pub struct ReportPipeline {
    llm: Llm,
    classify_concurrency: usize,
}

impl ReportPipeline {
    /// Build a pipeline over `provider` using the model, retry and
    /// concurrency settings from `config`.
    pub fn new(provider: Arc<dyn Provider>, config: &Config) -> Self {
        let retry = RetryConfig::from(&config.pipeline);
        Self::from_llm(
            Llm::new(provider, config.provider.model.clone(), retry),
            config.pipeline.classify_concurrency,
        )
    }

    pub fn from_llm(llm: Llm, classify_concurrency: usize) -> Self {
        Self {
            llm,
            classify_concurrency: classify_concurrency.max(1),
        }
    }

    /// The model identifier every call is made with.
    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Run the full pipeline over `feedback`.
    pub async fn run(&self, feedback: &[String]) -> Result<FeedbackReport, PipelineError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("report", %request_id, raw_count = feedback.len());
        self.run_stages(feedback).instrument(span).await
    }

    async fn run_stages(&self, feedback: &[String]) -> Result<FeedbackReport, PipelineError> {
        let raw_count = feedback.len();
        debug!(stage = %Stage::Received, raw_count, "report requested");

        debug!(stage = %Stage::Filtering, concurrency = self.classify_concurrency, "classifying items");
        let classifications = classify_all(feedback, &self.llm, self.classify_concurrency).await;

        let clean: Vec<String> = classifications
            .into_iter()
            .filter(|c| c.is_clean())
            .map(|c| c.cleaned_text)
            .collect();
        let clean_count = clean.len();

        if clean.is_empty() {
            warn!(stage = %Stage::Filtered, raw_count, "every item was filtered out");
            return Err(PipelineError::NoValidFeedback { raw_count });
        }
        info!(stage = %Stage::Filtered, raw_count, clean_count, "feedback filtered");

        debug!(stage = %Stage::Analyzing, "analysis and action extraction started");
        let (analysis, actions) = tokio::join!(
            analyze(&clean, &self.llm),
            extract_actions(&clean, REPORT_ACTION_INSTRUCTION, &self.llm),
        );
        let analysis = analysis.map_err(|source| {
            error!(stage = %Stage::Analyzing, error = %source, "aggregate analysis failed");
            PipelineError::Internal {
                stage: Stage::Analyzing,
                source,
            }
        })?;
        debug!(stage = %Stage::Extracting, steps = actions.len(), "action steps ready");

        info!(
            stage = %Stage::Assembled,
            raw_count,
            clean_count,
            steps = actions.len(),
            "report assembled"
        );
        Ok(FeedbackReport {
            summary: analysis.summary,
            sentiment: analysis.sentiment,
            actions,
            raw_count,
            clean_count,
        })
    }
}
