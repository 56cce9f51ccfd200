//! Google Gemini `generateContent`.
//!
//! Gemini has no system role, so the instruction and research context are
//! sent as a synthetic first user/model exchange.

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use crate::ai::backend::Backend;
use crate::ai::prompt::{ChatRole, Conversation};
use crate::ai::settings::{AiProvider, AiSettings};

const CONTEXT_ACK: &str = "Understood. I will keep this context in mind.";

pub struct GeminiBackend;

fn contents(conversation: &Conversation) -> Vec<Value> {
    let mut contents = Vec::with_capacity(conversation.messages.len() + 2);
    contents.push(json!({ "role": "user", "parts": [{ "text": conversation.system }] }));
    contents.push(json!({ "role": "model", "parts": [{ "text": CONTEXT_ACK }] }));
    contents.extend(conversation.messages.iter().map(|m| {
        json!({
            "role": match m.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "model",
            },
            "parts": [{ "text": m.content }],
        })
    }));
    contents
}

impl Backend for GeminiBackend {
    fn provider(&self) -> AiProvider {
        AiProvider::Gemini
    }

    fn request(
        &self,
        http: &Client,
        settings: &AiSettings,
        conversation: &Conversation,
    ) -> RequestBuilder {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            settings.effective_base_url(),
            settings.effective_model()
        );
        http.post(url)
            .query(&[("key", settings.api_key.as_str())])
            .json(&json!({
                "contents": contents(conversation),
                "generationConfig": {
                    "maxOutputTokens": settings.max_tokens,
                    "temperature": settings.temperature,
                },
            }))
    }

    /// `candidates[0].content.parts[0].text`
    fn extract_text(&self, body: &Value) -> Option<String> {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
