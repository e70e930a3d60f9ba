//! Feedback processing pipeline for sift.
//!
//! Raw feedback flows through the stages below, leaf modules first:
//!
//! - [`redact`] -- regex PII scrubbing, the fallback when the model is unavailable
//! - [`json_cleanup`] -- fence stripping, structured parse, and field scraping for model output
//! - [`llm`] -- [`Llm`], the retrying completion handle every stage calls through
//! - [`classifier`] -- per-item inappropriate/PII classification
//! - [`analyzer`] -- thematic summary and sentiment tally over the clean corpus
//! - [`actions`] -- suggested action steps and the bullet-list parser
//! - [`pipeline`] -- [`ReportPipeline`], which wires the stages into one report

pub mod actions;
pub mod analyzer;
pub mod classifier;
pub mod error;
pub mod json_cleanup;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod redact;

pub use error::{PipelineError, Stage};
pub use llm::{Llm, Sampling};
pub use pipeline::ReportPipeline;
