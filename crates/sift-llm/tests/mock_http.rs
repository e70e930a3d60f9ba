//! Mock HTTP server tests for `OpenAiCompatProvider::complete()`.
//!
//! Uses [`wiremock`] to stand up a local server that emulates the
//! OpenAI-compatible chat completion endpoint, covering the status-code
//! mapping, per-call timeout, and the retry wrapper against real HTTP.

use std::time::Duration;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sift_llm::{
    ChatMessage, ChatRequest, OpenAiCompatProvider, Provider, ProviderError, RetryConfig,
    RetryPolicy,
};
use sift_types::SecretString;

fn provider_for(server: &MockServer, timeout: Duration) -> OpenAiCompatProvider {
    OpenAiCompatProvider::new(
        "mock",
        server.uri(),
        SecretString::new("gsk_mock_key"),
        timeout,
    )
    .unwrap()
}

fn test_request() -> ChatRequest {
    ChatRequest::new("llama-3.3-70b-versatile", vec![ChatMessage::user("Hello")])
        .with_temperature(0.0)
        .with_max_tokens(256)
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13 }
    })
}

#[tokio::test]
async fn complete_success_sends_model_and_sampling_options() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer gsk_mock_key"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama-3.3-70b-versatile",
            "max_tokens": 256,
            "temperature": 0.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{\"ok\": true}")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let response = provider.complete(&test_request()).await.unwrap();

    assert_eq!(response.text().unwrap(), "{\"ok\": true}");
    assert_eq!(response.usage.unwrap().total_tokens, 13);
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited_with_header_delay() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "2")
                .set_body_json(serde_json::json!({"error": {"message": "Rate limit reached"}})),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let err = provider.complete(&test_request()).await.unwrap_err();

    match err {
        ProviderError::RateLimited { retry_after_ms } => assert_eq!(retry_after_ms, 2000),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn quota_exhaustion_is_not_a_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {"message": "You exceeded your quota", "code": "insufficient_quota"}
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let err = provider.complete(&test_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::RequestFailed(_)));
}

#[tokio::test]
async fn unauthorized_maps_to_auth_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"error": {"message": "Invalid API Key"}})),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let err = provider.complete(&test_request()).await.unwrap_err();
    match err {
        ProviderError::AuthFailed(msg) => assert_eq!(msg, "Invalid API Key"),
        other => panic!("expected AuthFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn not_found_maps_to_model_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such model"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let err = provider.complete(&test_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::ModelNotFound(_)));
    assert!(err.to_string().contains("llama-3.3-70b-versatile"));
}

#[tokio::test]
async fn server_error_maps_to_request_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let err = provider.complete(&test_request()).await.unwrap_err();
    match err {
        ProviderError::RequestFailed(msg) => assert!(msg.starts_with("HTTP 500")),
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let err = provider.complete(&test_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_millis(50));
    let err = provider.complete(&test_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Timeout));
}

#[tokio::test]
async fn retry_policy_recovers_from_rate_limit_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("{}"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RetryPolicy::new(
        provider_for(&server, Duration::from_secs(5)),
        RetryConfig {
            max_retries: 5,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
        },
    );

    let response = provider.complete(&test_request()).await.unwrap();
    assert_eq!(response.text().unwrap(), "recovered");
}

#[tokio::test]
async fn retry_policy_gives_up_after_max_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("{}"))
        .expect(3)
        .mount(&server)
        .await;

    let provider = RetryPolicy::new(
        provider_for(&server, Duration::from_secs(5)),
        RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
        },
    );

    let err = provider.complete(&test_request()).await.unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn groq_rate_limit_body_is_retried_until_max_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {
                "message": "Rate limit reached for model `llama-3.3-70b-versatile` in organization `org_x` \
on tokens per minute (TPM): Limit 6000, Used 5990, Requested 400. Please try again in 1ms. \
Need more tokens? Upgrade to Dev Tier today at https://console.groq.com/settings/billing",
                "type": "tokens",
                "code": "rate_limit_exceeded"
            }
        })))
        .expect(3)
        .mount(&server)
        .await;

    let provider = RetryPolicy::new(
        provider_for(&server, Duration::from_secs(5)),
        RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
        },
    );

    let err = provider.complete(&test_request()).await.unwrap_err();
    assert!(
        matches!(err, ProviderError::RateLimited { .. }),
        "expected RateLimited, got {err:?}"
    );
}
