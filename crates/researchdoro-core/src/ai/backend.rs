//! Backend strategy trait and the request pipeline every backend shares.
//!
//! A backend only knows how to shape a request and where the reply text
//! lives in its envelope. Sending, status classification and error
//! translation happen here, once, for all of them.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use super::prompt::Conversation;
use super::providers::{
    AnthropicBackend, GeminiBackend, OllamaBackend, OpenAiBackend, OpenRouterBackend,
};
use super::settings::{AiProvider, AiSettings};
use crate::error::GatewayError;

/// Longest provider error snippet carried into `GatewayError::Failed`.
const ERROR_SNIPPET_LEN: usize = 200;

/// One HTTP/JSON text-generation vendor.
pub trait Backend: Send + Sync {
    fn provider(&self) -> AiProvider;

    /// Build the request for `conversation`, including endpoint and auth.
    fn request(
        &self,
        http: &Client,
        settings: &AiSettings,
        conversation: &Conversation,
    ) -> RequestBuilder;

    /// Reply text from a successful response body, `None` if the envelope
    /// does not have the expected shape.
    fn extract_text(&self, body: &Value) -> Option<String>;
}

/// Factory keyed on the provider enum.
pub fn backend_for(provider: AiProvider) -> Box<dyn Backend> {
    match provider {
        AiProvider::OpenAi => Box::new(OpenAiBackend),
        AiProvider::Anthropic => Box::new(AnthropicBackend),
        AiProvider::Gemini => Box::new(GeminiBackend),
        AiProvider::OpenRouter => Box::new(OpenRouterBackend),
        AiProvider::Ollama => Box::new(OllamaBackend),
    }
}

/// Send `conversation` through `backend` and return the reply text.
pub(crate) async fn complete(
    http: &Client,
    backend: &dyn Backend,
    settings: &AiSettings,
    conversation: &Conversation,
) -> Result<String, GatewayError> {
    let provider = backend.provider();
    let response = backend
        .request(http, settings, conversation)
        .send()
        .await
        .map_err(|e| classify_transport(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(status, &body));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| GatewayError::Failed(format!("malformed response body: {}", e.without_url())))?;
    backend
        .extract_text(&body)
        .ok_or(GatewayError::InvalidResponse)
}

/// Map a failed send onto the taxonomy. The URL is stripped so a query
/// string key never reaches the message.
pub(crate) fn classify_transport(provider: AiProvider, err: reqwest::Error) -> GatewayError {
    if err.is_connect() && provider == AiProvider::Ollama {
        return GatewayError::LocalServiceUnavailable;
    }
    if err.is_timeout() {
        return GatewayError::Failed("request timed out".into());
    }
    GatewayError::Failed(err.without_url().to_string())
}

pub(crate) fn classify_status(status: StatusCode, body: &str) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED => GatewayError::InvalidApiKey,
        StatusCode::PAYMENT_REQUIRED => GatewayError::InsufficientCredits,
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited,
        other => match provider_message(body) {
            Some(message) => GatewayError::Failed(format!("HTTP {}: {message}", other.as_u16())),
            None => GatewayError::Failed(format!("HTTP {}", other.as_u16())),
        },
    }
}

/// Best-effort error message from a provider error body.
fn provider_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let message = match serde_json::from_str::<Value>(body) {
        Ok(json) => json
            .pointer("/error/message")
            .or_else(|| json.get("error"))
            .or_else(|| json.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(_) => None,
    }
    .unwrap_or_else(|| body.to_string());
    Some(message.chars().take(ERROR_SNIPPET_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_taxonomy() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, ""),
            GatewayError::InvalidApiKey
        );
        assert_eq!(
            classify_status(StatusCode::PAYMENT_REQUIRED, ""),
            GatewayError::InsufficientCredits
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "{}"),
            GatewayError::RateLimited
        );
    }

    #[test]
    fn other_status_carries_provider_message() {
        let body = r#"{"error":{"message":"model not found","type":"invalid_request_error"}}"#;
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, body),
            GatewayError::Failed("HTTP 404: model not found".into())
        );
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#),
            GatewayError::Failed("HTTP 500: boom".into())
        );
        assert_eq!(
            classify_status(StatusCode::BAD_GATEWAY, ""),
            GatewayError::Failed("HTTP 502".into())
        );
    }

    #[test]
    fn plain_text_error_body_is_truncated() {
        let body = "x".repeat(500);
        match classify_status(StatusCode::BAD_REQUEST, &body) {
            GatewayError::Failed(msg) => assert_eq!(msg.len(), "HTTP 400: ".len() + ERROR_SNIPPET_LEN),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn factory_covers_every_provider() {
        for provider in AiProvider::ALL {
            assert_eq!(backend_for(provider).provider(), provider);
        }
    }
}
