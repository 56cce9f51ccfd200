//! # Researchdoro Core Library
//!
//! Core logic for Researchdoro, a Pomodoro timer for researchers with
//! optional AI assistance. The CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine; the caller invokes
//!   `tick()` once per second while running
//! - **Timer Controller**: a tokio task owning the engine, running the tick
//!   source and the auto-transition policy
//! - **AI Provider Gateway**: one interface over OpenAI, Anthropic, Gemini,
//!   OpenRouter and Ollama, with research context injected into prompts
//! - **Storage**: TOML configuration and the JSON research context
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerController`]: Drives a [`TimerEngine`] in real time
//! - [`AiGateway`]: Provider-independent AI operations
//! - [`Config`]: Application configuration management

pub mod ai;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use ai::{AiGateway, AiProvider, AiSettings, ChatMessage, ResearchContext, SessionData};
pub use error::{ConfigError, CoreError, GatewayError};
pub use events::Event;
pub use storage::{Config, ContextStore};
pub use timer::{
    next_mode, AutoTransitionPolicy, TimerController, TimerEngine, TimerHandle, TimerMode,
    TimerSettings, TimerState, TimerStatus,
};
