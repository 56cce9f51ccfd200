//! Provider selection and generation parameters.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::GatewayError;

/// Closed set of supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAi,
    Anthropic,
    Gemini,
    OpenRouter,
    /// Local inference server; needs no API key.
    Ollama,
}

impl AiProvider {
    pub const ALL: [AiProvider; 5] = [
        AiProvider::OpenAi,
        AiProvider::Anthropic,
        AiProvider::Gemini,
        AiProvider::OpenRouter,
        AiProvider::Ollama,
    ];

    /// Unique identifier (e.g. "openai", "ollama").
    pub fn name(self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::Anthropic => "anthropic",
            AiProvider::Gemini => "gemini",
            AiProvider::OpenRouter => "openrouter",
            AiProvider::Ollama => "ollama",
        }
    }

    /// Human-readable display name.
    pub fn display_name(self) -> &'static str {
        match self {
            AiProvider::OpenAi => "OpenAI",
            AiProvider::Anthropic => "Anthropic Claude",
            AiProvider::Gemini => "Google Gemini",
            AiProvider::OpenRouter => "OpenRouter",
            AiProvider::Ollama => "Ollama (local)",
        }
    }

    pub fn requires_api_key(self) -> bool {
        !matches!(self, AiProvider::Ollama)
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            AiProvider::OpenAi => "https://api.openai.com/v1",
            AiProvider::Anthropic => "https://api.anthropic.com",
            AiProvider::Gemini => "https://generativelanguage.googleapis.com",
            AiProvider::OpenRouter => "https://openrouter.ai/api/v1",
            AiProvider::Ollama => "http://localhost:11434",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            AiProvider::OpenAi => "gpt-4o-mini",
            AiProvider::Anthropic => "claude-3-5-haiku-latest",
            AiProvider::Gemini => "gemini-1.5-flash",
            AiProvider::OpenRouter => "openai/gpt-4o-mini",
            AiProvider::Ollama => "llama3.2",
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        AiProvider::ALL
            .into_iter()
            .find(|p| p.name() == lowered)
            .ok_or_else(|| format!("unknown AI provider: {s}"))
    }
}

/// User-supplied AI configuration, stored under `[ai]` in config.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default = "default_provider")]
    pub provider: AiProvider,
    #[serde(default)]
    pub api_key: String,
    /// Overrides the provider's default endpoint root.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Empty means the provider's default model.
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub enabled: bool,
}

fn default_provider() -> AiProvider {
    AiProvider::OpenAi
}
fn default_max_tokens() -> u32 {
    1000
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            base_url: None,
            model: String::new(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            enabled: false,
        }
    }
}

impl AiSettings {
    pub fn effective_model(&self) -> &str {
        if self.model.trim().is_empty() {
            self.provider.default_model()
        } else {
            self.model.trim()
        }
    }

    /// Endpoint root without a trailing slash.
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }

    /// Check the settings can back an enabled provider.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.provider.requires_api_key() && self.api_key.trim().is_empty() {
            return Err(GatewayError::InvalidSettings(format!(
                "{} requires an API key",
                self.provider.display_name()
            )));
        }
        if self.max_tokens == 0 {
            return Err(GatewayError::InvalidSettings(
                "max_tokens must be greater than zero".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(GatewayError::InvalidSettings(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }
        let base = self.effective_base_url();
        match Url::parse(base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            Ok(url) => Err(GatewayError::InvalidSettings(format!(
                "unsupported base_url scheme: {}",
                url.scheme()
            ))),
            Err(e) => Err(GatewayError::InvalidSettings(format!(
                "invalid base_url '{base}': {e}"
            ))),
        }
    }
}
