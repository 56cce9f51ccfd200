//! Anthropic messages API.

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use crate::ai::backend::Backend;
use crate::ai::prompt::{ChatRole, Conversation};
use crate::ai::settings::{AiProvider, AiSettings};

const API_VERSION: &str = "2023-06-01";

pub struct AnthropicBackend;

fn body(settings: &AiSettings, conversation: &Conversation) -> Value {
    let messages: Vec<Value> = conversation
        .messages
        .iter()
        .map(|m| {
            json!({
                "role": match m.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                },
                "content": m.content,
            })
        })
        .collect();
    json!({
        "model": settings.effective_model(),
        "max_tokens": settings.max_tokens,
        "temperature": settings.temperature,
        "system": conversation.system,
        "messages": messages,
    })
}

impl Backend for AnthropicBackend {
    fn provider(&self) -> AiProvider {
        AiProvider::Anthropic
    }

    fn request(
        &self,
        http: &Client,
        settings: &AiSettings,
        conversation: &Conversation,
    ) -> RequestBuilder {
        http.post(format!("{}/v1/messages", settings.effective_base_url()))
            .header("x-api-key", &settings.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body(settings, conversation))
    }

    /// `content[0].text`
    fn extract_text(&self, body: &Value) -> Option<String> {
        body.pointer("/content/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::prompt::ChatMessage;

    #[test]
    fn system_is_top_level() {
        let convo = Conversation {
            system: "context here".into(),
            messages: vec![ChatMessage::user("q")],
        };
        let settings = AiSettings {
            provider: AiProvider::Anthropic,
            ..AiSettings::default()
        };
        let body = body(&settings, &convo);
        assert_eq!(body["system"], "context here");
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["model"], "claude-3-5-haiku-latest");
    }
}
