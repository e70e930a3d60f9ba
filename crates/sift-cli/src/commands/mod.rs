//! CLI command implementations for `sift`.
//!
//! - [`serve`] -- HTTP API server.
//! - [`report`] -- One-shot report over a file or stdin.
//! - [`config_cmd`] -- Resolved configuration display.

pub mod config_cmd;
pub mod report;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use sift_core::ReportPipeline;
use sift_llm::OpenAiCompatProvider;
use sift_types::Config;

use crate::config_loader::{self, ProcessEnv};

/// Load configuration from the given path override or via auto-discovery,
/// with environment overrides applied.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<Config> {
    config_loader::load_config(config_override.map(Path::new), &ProcessEnv, dirs::home_dir())
}

/// Build the report pipeline over the configured provider.
pub fn build_pipeline(config: &Config) -> anyhow::Result<ReportPipeline> {
    let provider = OpenAiCompatProvider::from_settings(&config.provider)
        .map_err(|e| anyhow::anyhow!("failed to create provider: {e}"))?;
    tracing::info!(
        provider = %sift_llm::Provider::name(&provider),
        model = %config.provider.model,
        max_retries = config.pipeline.max_retries,
        "provider ready"
    );
    Ok(ReportPipeline::new(Arc::new(provider), config))
}
