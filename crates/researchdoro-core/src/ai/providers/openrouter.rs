//! OpenRouter: OpenAI-compatible envelope behind a bearer key.

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use super::openai::{chat_completions_body, chat_completions_text};
use crate::ai::backend::Backend;
use crate::ai::prompt::Conversation;
use crate::ai::settings::{AiProvider, AiSettings};

const APP_TITLE: &str = "Researchdoro";

pub struct OpenRouterBackend;

impl Backend for OpenRouterBackend {
    fn provider(&self) -> AiProvider {
        AiProvider::OpenRouter
    }

    fn request(
        &self,
        http: &Client,
        settings: &AiSettings,
        conversation: &Conversation,
    ) -> RequestBuilder {
        http.post(format!("{}/chat/completions", settings.effective_base_url()))
            .bearer_auth(&settings.api_key)
            .header("X-Title", APP_TITLE)
            .json(&chat_completions_body(settings, conversation))
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        chat_completions_text(body)
    }
}
