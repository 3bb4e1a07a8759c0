//! Public key distribution abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// Public key distribution Trait
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Fetch the PEM-encoded public key
    ///
    /// A response without a usable key must be reported as an error.
    async fn fetch_public_key(&self) -> CoreResult<String>;
}
