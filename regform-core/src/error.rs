//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Network failure, non-success status or unparseable body
    #[error("Transport error: {endpoint} - {detail}")]
    Transport { endpoint: String, detail: String },

    /// Request was cancelled by a newer trigger for the same level
    #[error("Request superseded")]
    Superseded,

    /// The public key was never loaded or its fetch failed
    #[error("Encryption key unavailable: {0}")]
    KeyUnavailable(String),

    /// The cipher rejected the input or the key
    #[error("Encryption failed: {0}")]
    CipherFailure(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Whether it is expected behavior (superseded lookup, missing key, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Superseded | Self::KeyUnavailable(_) => true,
            Self::Transport { .. } | Self::CipherFailure(_) | Self::Config(_) => false,
        }
    }

    /// Shorthand for a transport error against `endpoint`.
    pub fn transport(endpoint: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            detail: detail.into(),
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
