//! Public key lifecycle

use serde::Serialize;

/// Lifecycle of the page's encryption key
///
/// `Uninitialized → Loading → Ready | Failed`. Both terminal states hold for the
/// rest of the page lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum KeyState {
    #[default]
    Uninitialized,
    Loading,
    Ready(String),
    Failed(String),
}

impl KeyState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Whether `initialize` has already been started
    pub fn is_started(&self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    /// Human-readable reason why no key is available
    pub fn unavailable_reason(&self) -> String {
        match self {
            Self::Uninitialized => "public key was never requested".to_string(),
            Self::Loading => "public key is still loading".to_string(),
            Self::Ready(_) => "public key is loaded".to_string(),
            Self::Failed(reason) => format!("public key fetch failed: {reason}"),
        }
    }
}
