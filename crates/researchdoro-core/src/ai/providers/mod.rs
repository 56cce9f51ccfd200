//! One strategy per vendor. Each differs only in endpoint, auth and
//! envelope shape.

mod anthropic;
mod gemini;
mod ollama;
mod openai;
mod openrouter;

pub use anthropic::AnthropicBackend;
pub use gemini::GeminiBackend;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;
pub use openrouter::OpenRouterBackend;

use serde_json::{json, Value};

use super::prompt::{ChatRole, Conversation};

/// `system`/`user`/`assistant` message list used by the OpenAI-style and
/// Ollama chat endpoints.
fn role_messages(conversation: &Conversation) -> Vec<Value> {
    let mut messages = Vec::with_capacity(conversation.messages.len() + 1);
    messages.push(json!({ "role": "system", "content": conversation.system }));
    messages.extend(conversation.messages.iter().map(|m| {
        json!({
            "role": match m.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            },
            "content": m.content,
        })
    }));
    messages
}
