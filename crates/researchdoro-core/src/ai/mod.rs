//! AI provider gateway: a uniform interface over interchangeable
//! text-generation backends, with research context injected into prompts.

pub mod backend;
pub mod context;
pub mod gateway;
pub mod prompt;
pub mod providers;
pub mod settings;

pub use backend::{backend_for, Backend};
pub use context::ResearchContext;
pub use gateway::AiGateway;
pub use prompt::{parse_insights, ChatMessage, ChatRole, Conversation, SessionData};
pub use settings::{AiProvider, AiSettings};
