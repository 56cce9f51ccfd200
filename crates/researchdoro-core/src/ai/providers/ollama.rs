//! Ollama local chat endpoint. No auth.

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use super::role_messages;
use crate::ai::backend::Backend;
use crate::ai::prompt::Conversation;
use crate::ai::settings::{AiProvider, AiSettings};

pub struct OllamaBackend;

impl Backend for OllamaBackend {
    fn provider(&self) -> AiProvider {
        AiProvider::Ollama
    }

    fn request(
        &self,
        http: &Client,
        settings: &AiSettings,
        conversation: &Conversation,
    ) -> RequestBuilder {
        http.post(format!("{}/api/chat", settings.effective_base_url()))
            .json(&json!({
                "model": settings.effective_model(),
                "messages": role_messages(conversation),
                "stream": false,
                "options": {
                    "temperature": settings.temperature,
                    "num_predict": settings.max_tokens,
                },
            }))
    }

    /// `message.content`
    fn extract_text(&self, body: &Value) -> Option<String> {
        body.pointer("/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
