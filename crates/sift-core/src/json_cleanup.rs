//! Cleanup for JSON that comes back from the model.
//!
//! Models asked for "raw JSON" still regularly return:
//!
//! - Markdown fences (`` ```json ... ``` ``), sometimes mid-text
//! - A bare `json` language tag on the first line
//! - Prose before or after the object
//! - Truncated or otherwise invalid JSON
//!
//! Handling is a fixed sequence of stages: [`strip_code_fences`], then a
//! structured parse ([`parse_object`], which also tries the outermost
//! `{...}` span), and finally best-effort field scraping
//! ([`scrape_string_field`], [`scrape_count_field`]) for callers that can
//! live with partial data. None of these functions fail loudly.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```[a-z]*").expect("fence pattern is valid"));

static LEADING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^json\b\s*").expect("tag pattern is valid"));

/// Remove every markdown fence marker and a leading `json` tag, then trim.
pub fn strip_code_fences(raw: &str) -> String {
    let unfenced = FENCE.replace_all(raw, "");
    let trimmed = unfenced.trim();
    LEADING_TAG.replace(trimmed, "").trim().to_string()
}

/// The span from the first `{` to the last `}`, if there is one.
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Strip fences and deserialize `raw` as `T`.
///
/// When the cleaned text does not parse, the outermost `{...}` span is
/// tried as well, which recovers objects wrapped in prose.
pub fn parse_object<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let cleaned = strip_code_fences(raw);
    if let Ok(value) = serde_json::from_str(&cleaned) {
        return Some(value);
    }
    outermost_object(&cleaned).and_then(|span| serde_json::from_str(span).ok())
}

/// Scrape `"key": "value"` out of text that is not valid JSON.
///
/// JSON string escapes in the value are decoded when possible.
pub fn scrape_string_field(text: &str, key: &str) -> Option<String> {
    let pattern = format!(r#""{}"\s*:\s*"((?:[^"\\]|\\.)*)""#, regex::escape(key));
    let re = Regex::new(&pattern).ok()?;
    let raw = re.captures(text)?.get(1)?.as_str();
    let decoded = serde_json::from_str::<String>(&format!("\"{raw}\""));
    Some(decoded.unwrap_or_else(|_| raw.to_string()))
}

/// Scrape `"key": <digits>` out of text that is not valid JSON.
///
/// Values too large for `u32` saturate.
pub fn scrape_count_field(text: &str, key: &str) -> Option<u32> {
    let pattern = format!(r#""{}"\s*:\s*([0-9]+)"#, regex::escape(key));
    let re = Regex::new(&pattern).ok()?;
    let digits = re.captures(text)?.get(1)?.as_str();
    Some(
        digits
            .parse::<u64>()
            .map_or(u32::MAX, |n| n.min(u64::from(u32::MAX)) as u32),
    )
}
