//! `sift report` -- run the pipeline once and print the report.
//!
//! Input is read from FILE, or from stdin when no file is given, in one of
//! three shapes:
//!
//! ```text
//! ["Great labs", "Too fast"]
//! {"feedback": ["Great labs", "Too fast"]}
//! Great labs
//! Too fast
//! ```
//!
//! Blank items are dropped before the pipeline runs.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use serde_json::Value;

/// Arguments for `sift report`.
#[derive(Args)]
pub struct ReportArgs {
    /// Feedback file (JSON array, `{"feedback": [...]}`, or one item per line).
    pub file: Option<PathBuf>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Deserialize)]
struct FeedbackDocument {
    feedback: Vec<String>,
}

pub async fn run(args: ReportArgs) -> anyhow::Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    let input = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    let feedback = parse_feedback(&input)?;

    let pipeline = super::build_pipeline(&config)?;
    let report = pipeline.run(&feedback).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Parse feedback items from any of the accepted input shapes.
pub fn parse_feedback(input: &str) -> anyhow::Result<Vec<String>> {
    let trimmed = input.trim();
    let items = if trimmed.starts_with('[') || trimmed.starts_with('{') {
        let value: Value = serde_json::from_str(trimmed).context("invalid JSON input")?;
        if value.is_array() {
            serde_json::from_value::<Vec<String>>(value)
                .context("expected a JSON array of strings")?
        } else {
            serde_json::from_value::<FeedbackDocument>(value)
                .context("expected an object with a \"feedback\" array of strings")?
                .feedback
        }
    } else {
        trimmed.lines().map(String::from).collect()
    };

    let items: Vec<String> = items
        .into_iter()
        .filter(|item| !item.trim().is_empty())
        .collect();
    if items.is_empty() {
        anyhow::bail!("no feedback items found in input");
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_array() {
        let items = parse_feedback(r#"["Great labs", " ", "Too fast"]"#).unwrap();
        assert_eq!(items, ["Great labs", "Too fast"]);
    }

    #[test]
    fn parses_feedback_object() {
        let items = parse_feedback("  {\"feedback\": [\"only one\"]}\n").unwrap();
        assert_eq!(items, ["only one"]);
    }

    #[test]
    fn parses_lines() {
        let items = parse_feedback("Great labs\n\nToo fast\n").unwrap();
        assert_eq!(items, ["Great labs", "Too fast"]);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_feedback("").is_err());
        assert!(parse_feedback("[]").is_err());
        assert!(parse_feedback("\n  \n").is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_feedback("[\"unterminated").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
        assert!(parse_feedback("{\"comments\": []}").is_err());
        assert!(parse_feedback("[1, 2]").is_err());
    }
}
