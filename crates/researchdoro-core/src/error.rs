//! Core error types for researchdoro-core.
//!
//! The timer engine has no error paths; these types cover configuration
//! and the AI provider gateway.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for researchdoro-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// AI provider errors
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Errors surfaced by the AI provider gateway.
///
/// Every backend translates transport and HTTP failures into one of these
/// variants; nothing raw escapes the gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No backend is active (disabled, or construction failed).
    #[error("AI provider is not configured")]
    NotConfigured,

    /// Settings rejected by `reconfigure`.
    #[error("invalid AI settings: {0}")]
    InvalidSettings(String),

    /// HTTP 401
    #[error("invalid API key")]
    InvalidApiKey,

    /// HTTP 429
    #[error("rate limit exceeded, retry later")]
    RateLimited,

    /// HTTP 402
    #[error("insufficient credits")]
    InsufficientCredits,

    /// The local inference server could not be reached.
    #[error("cannot connect to local service, ensure it is running")]
    LocalServiceUnavailable,

    /// The response envelope is missing the expected text field.
    #[error("invalid response format from provider")]
    InvalidResponse,

    /// Catch-all for any other failure.
    #[error("operation failed: {0}")]
    Failed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_messages_are_user_facing() {
        assert_eq!(GatewayError::InvalidApiKey.to_string(), "invalid API key");
        assert_eq!(
            GatewayError::RateLimited.to_string(),
            "rate limit exceeded, retry later"
        );
        assert_eq!(
            GatewayError::Failed("timed out".into()).to_string(),
            "operation failed: timed out"
        );
    }

    #[test]
    fn core_error_is_transparent_over_gateway() {
        let err: CoreError = GatewayError::NotConfigured.into();
        assert_eq!(err.to_string(), "AI provider is not configured");
    }
}
