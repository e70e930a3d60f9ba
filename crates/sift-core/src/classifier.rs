//! Per-item classification.
//!
//! Each feedback item is sent to the model on its own and comes back with
//! two flags (inappropriate, contains PII) and a redacted copy of the text.
//! Classification never fails: whenever the model cannot give a usable
//! answer the item is treated as unflagged and scrubbed with
//! [`redact`](crate::redact::redact) instead.

use futures_util::{StreamExt, stream};
use serde::Deserialize;
use sift_types::ClassificationResult;
use tracing::{debug, warn};

use crate::json_cleanup::parse_object;
use crate::llm::{Llm, Sampling};
use crate::prompts;
use crate::redact::redact;

/// Wire shape of a classification answer. `cleaned_text` is optional so
/// an answer that only carries the flags is still usable.
#[derive(Debug, Deserialize)]
struct ClassificationReply {
    #[serde(alias = "containsInappropriate")]
    contains_inappropriate: bool,
    #[serde(alias = "containsPii")]
    contains_pii: bool,
    #[serde(default, alias = "cleanedText")]
    cleaned_text: Option<String>,
}

impl ClassificationReply {
    fn into_result(self, original: &str) -> ClassificationResult {
        let cleaned_text = match self.cleaned_text {
            Some(text) if !text.trim().is_empty() => text,
            _ => redact(original),
        };
        ClassificationResult {
            contains_inappropriate: self.contains_inappropriate,
            contains_pii: self.contains_pii,
            cleaned_text,
        }
    }
}

/// Classify one feedback item.
pub async fn classify(text: &str, llm: &Llm) -> ClassificationResult {
    let raw = match llm
        .complete(&prompts::classification(text), Sampling::CLASSIFY)
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "classification call failed, falling back to regex redaction");
            return ClassificationResult::unflagged(redact(text));
        }
    };

    match parse_object::<ClassificationReply>(&raw) {
        Some(reply) => reply.into_result(text),
        None => {
            warn!("classification reply was not valid JSON, falling back to regex redaction");
            debug!(reply = %raw, "unparseable classification reply");
            ClassificationResult::unflagged(redact(text))
        }
    }
}

/// Classify every item, at most `concurrency` calls in flight.
///
/// Results come back in input order regardless of which call finishes
/// first. A `concurrency` of 0 is treated as 1.
pub async fn classify_all(
    items: &[String],
    llm: &Llm,
    concurrency: usize,
) -> Vec<ClassificationResult> {
    // Boxed to work around rustc's higher-ranked `Send` inference for
    // closures returning async blocks (rust-lang/rust#102211).
    let results: futures_util::future::BoxFuture<'_, Vec<ClassificationResult>> = Box::pin(
        stream::iter(items.iter().enumerate())
            .map(|(index, text)| async move {
                let result = classify(text, llm).await;
                debug!(
                    index,
                    inappropriate = result.contains_inappropriate,
                    pii = result.contains_pii,
                    "item classified"
                );
                result
            })
            .buffered(concurrency.max(1))
            .collect::<Vec<_>>(),
    );
    results.await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_llm::testing::ScriptedProvider;
    use sift_llm::{ProviderError, RetryConfig};
    use std::sync::Arc;
    use std::time::Duration;

    fn llm(provider: ScriptedProvider) -> (Arc<ScriptedProvider>, Llm) {
        let provider = Arc::new(provider);
        let retry = RetryConfig {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        };
        (provider.clone(), Llm::new(provider, "test-model", retry))
    }

    #[tokio::test]
    async fn parses_model_answer() {
        let (provider, llm) = llm(ScriptedProvider::new().then_text(
            r#"{"contains_inappropriate": false, "contains_pii": true, "cleaned_text": "I am [REDACTED]"}"#,
        ));

        let result = classify("I am Jane Doe", &llm).await;
        assert!(!result.contains_inappropriate);
        assert!(result.contains_pii);
        assert_eq!(result.cleaned_text, "I am [REDACTED]");

        let request = &provider.requests()[0];
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.max_tokens, Some(256));
        assert!(request.user_text().ends_with("I am Jane Doe"));
    }

    #[tokio::test]
    async fn accepts_fenced_camel_case_answer() {
        let (_, llm) = llm(ScriptedProvider::new().then_text(
            "```json\n{\"containsInappropriate\": true, \"containsPii\": false, \"cleanedText\": \"rude\"}\n```",
        ));

        let result = classify("rude", &llm).await;
        assert!(result.contains_inappropriate);
        assert!(!result.contains_pii);
    }

    #[tokio::test]
    async fn missing_cleaned_text_uses_regex_redaction() {
        let (_, llm) = llm(ScriptedProvider::new()
            .then_text(r#"{"contains_inappropriate": false, "contains_pii": false}"#));

        let result = classify("id 1234567", &llm).await;
        assert_eq!(result.cleaned_text, "id [REDACTED]");
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_redaction() {
        let text = "Reach me at x.y@uni.edu, id 20231234";
        let (provider, llm) =
            llm(ScriptedProvider::new().then_err(ProviderError::AuthFailed("bad key".into())));

        let result = classify(text, &llm).await;
        assert_eq!(result, ClassificationResult::unflagged(redact(text)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn exhausted_rate_limit_falls_back_to_redaction() {
        let (provider, llm) = llm(ScriptedProvider::with_responder(|_| {
            Err(ProviderError::RateLimited { retry_after_ms: 0 })
        }));

        let result = classify("call 5551234567", &llm).await;
        assert_eq!(result.cleaned_text, "call [REDACTED]");
        assert!(result.is_clean());
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn malformed_answer_falls_back_to_redaction() {
        for reply in [
            "",
            "I cannot help with that.",
            "{\"contains_pii\": \"maybe\"}",
        ] {
            let (_, llm) = llm(ScriptedProvider::new().then_text(reply));
            let result = classify("fine text", &llm).await;
            assert_eq!(
                result,
                ClassificationResult::unflagged("fine text"),
                "reply {reply:?}"
            );
        }
    }

    #[tokio::test]
    async fn classify_all_preserves_input_order() {
        let (provider, llm) = llm(ScriptedProvider::with_responder(|request| {
            let text = request.user_text();
            let flagged = text.ends_with("bad");
            Ok(format!(
                r#"{{"contains_inappropriate": {flagged}, "contains_pii": false, "cleaned_text": "{}"}}"#,
                text.rsplit('\n').next().unwrap_or_default()
            ))
        }));
        let items: Vec<String> = ["one", "two bad", "three", "four", "five bad"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let results = classify_all(&items, &llm, 3).await;
        let texts: Vec<_> = results.iter().map(|r| r.cleaned_text.as_str()).collect();
        assert_eq!(texts, ["one", "two bad", "three", "four", "five bad"]);
        let flags: Vec<_> = results.iter().map(|r| r.contains_inappropriate).collect();
        assert_eq!(flags, [false, true, false, false, true]);
        assert_eq!(provider.call_count(), 5);
    }

    #[tokio::test]
    async fn classify_all_zero_concurrency_is_sequential() {
        let (_, llm) = llm(ScriptedProvider::new().then_text("nope"));
        let results = classify_all(&["a".to_string()], &llm, 0).await;
        assert_eq!(results, vec![ClassificationResult::unflagged("a")]);
    }
}
