//! Uniform entry point over the configured backend.
//!
//! The active backend is swapped wholesale by [`AiGateway::reconfigure`].
//! Each call clones the current `Arc` before doing any I/O, so an in-flight
//! call finishes against the configuration it started with.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::Client;

use super::backend::{backend_for, complete, Backend};
use super::context::ResearchContext;
use super::prompt::{self, ChatMessage, Conversation, SessionData};
use super::settings::{AiProvider, AiSettings};
use crate::error::GatewayError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

struct ActiveBackend {
    settings: AiSettings,
    backend: Box<dyn Backend>,
    http: Client,
}

impl ActiveBackend {
    fn build(settings: AiSettings) -> Result<Self, GatewayError> {
        settings.validate()?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Failed(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            backend: backend_for(settings.provider),
            settings,
            http,
        })
    }

    async fn complete(&self, conversation: &Conversation) -> Result<String, GatewayError> {
        let result = complete(&self.http, self.backend.as_ref(), &self.settings, conversation).await;
        if let Err(ref e) = result {
            tracing::warn!(provider = %self.settings.provider, error = %e, "AI request failed");
        }
        result
    }
}

/// AI provider gateway held by the consuming layer.
#[derive(Default)]
pub struct AiGateway {
    active: RwLock<Option<Arc<ActiveBackend>>>,
}

impl AiGateway {
    /// A gateway with no active backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from settings. Invalid settings leave the gateway unconfigured.
    pub fn from_settings(settings: AiSettings) -> Self {
        let gateway = Self::new();
        if let Err(e) = gateway.reconfigure(settings) {
            tracing::warn!(error = %e, "AI gateway left unconfigured");
        }
        gateway
    }

    /// Replace the active backend.
    ///
    /// Disabled settings clear it and succeed. Invalid settings clear it and
    /// return the validation error.
    pub fn reconfigure(&self, settings: AiSettings) -> Result<(), GatewayError> {
        let next = if settings.enabled {
            match ActiveBackend::build(settings) {
                Ok(active) => Some(Arc::new(active)),
                Err(e) => {
                    self.replace(None);
                    return Err(e);
                }
            }
        } else {
            None
        };
        if let Some(active) = &next {
            tracing::debug!(provider = %active.settings.provider, model = active.settings.effective_model(), "AI backend selected");
        }
        self.replace(next);
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.current().is_some()
    }

    pub fn active_provider(&self) -> Option<AiProvider> {
        self.current().map(|active| active.settings.provider)
    }

    /// One-shot question.
    pub async fn quick_query(
        &self,
        query: &str,
        context: Option<&ResearchContext>,
    ) -> Result<String, GatewayError> {
        let active = self.snapshot()?;
        active.complete(&prompt::quick_query(query, context)).await
    }

    /// Multi-turn chat; `messages` are replayed in order.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        context: Option<&ResearchContext>,
    ) -> Result<String, GatewayError> {
        let active = self.snapshot()?;
        active.complete(&prompt::chat(messages, context)).await
    }

    pub async fn analyze_session(
        &self,
        session: &SessionData,
        context: Option<&ResearchContext>,
    ) -> Result<String, GatewayError> {
        let active = self.snapshot()?;
        active.complete(&prompt::analyze_session(session, context)).await
    }

    /// Up to five bullet insights about `data`.
    pub async fn generate_insights(
        &self,
        data: &serde_json::Value,
        context: Option<&ResearchContext>,
    ) -> Result<Vec<String>, GatewayError> {
        let active = self.snapshot()?;
        let text = active.complete(&prompt::generate_insights(data, context)).await?;
        Ok(prompt::parse_insights(&text))
    }

    /// Verify credentials and endpoint with a minimal request.
    pub async fn test_connection(&self) -> Result<(), GatewayError> {
        let active = self.snapshot()?;
        active.complete(&prompt::connection_probe()).await.map(|_| ())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn snapshot(&self) -> Result<Arc<ActiveBackend>, GatewayError> {
        self.current().ok_or(GatewayError::NotConfigured)
    }

    fn current(&self) -> Option<Arc<ActiveBackend>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
    }

    fn replace(&self, next: Option<Arc<ActiveBackend>>) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}
