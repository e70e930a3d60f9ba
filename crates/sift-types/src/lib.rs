//! # sift-types
//!
//! Core type definitions for the sift feedback analysis service.
//!
//! This crate is the foundation of the dependency graph -- all other
//! sift crates depend on it. It contains:
//!
//! - **[`config`]** -- Configuration schema (provider, pipeline, gateway)
//! - **[`report`]** -- Classification, analysis, and report data model
//! - **[`secret`]** -- [`SecretString`] wrapper for credentials

pub mod config;
pub mod report;
pub mod secret;

pub use config::Config;
pub use report::{
    ActionStep, AggregateAnalysis, ClassificationResult, FeedbackReport, SentimentCounts,
};
pub use secret::SecretString;
