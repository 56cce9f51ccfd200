//! OpenAI chat completions.

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use super::role_messages;
use crate::ai::backend::Backend;
use crate::ai::prompt::Conversation;
use crate::ai::settings::{AiProvider, AiSettings};

pub struct OpenAiBackend;

/// Request body shared with other OpenAI-compatible endpoints.
pub(super) fn chat_completions_body(settings: &AiSettings, conversation: &Conversation) -> Value {
    json!({
        "model": settings.effective_model(),
        "messages": role_messages(conversation),
        "max_tokens": settings.max_tokens,
        "temperature": settings.temperature,
    })
}

/// `choices[0].message.content`
pub(super) fn chat_completions_text(body: &Value) -> Option<String> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl Backend for OpenAiBackend {
    fn provider(&self) -> AiProvider {
        AiProvider::OpenAi
    }

    fn request(
        &self,
        http: &Client,
        settings: &AiSettings,
        conversation: &Conversation,
    ) -> RequestBuilder {
        http.post(format!("{}/chat/completions", settings.effective_base_url()))
            .bearer_auth(&settings.api_key)
            .json(&chat_completions_body(settings, conversation))
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        chat_completions_text(body)
    }
}
