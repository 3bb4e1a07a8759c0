//! Registration Form Core Library
//!
//! Provides the client-side behavior of the registration page, including:
//! - Cascading state → district → block selects with request supersession
//! - Public key lifecycle and submit-time password encryption
//! - Navigation overlay and password visibility toggles
//!
//! This library is host-independent: option lookups, key distribution, the cipher
//! and page events all come in through traits, so the same logic runs under a
//! browser shim, a headless driver or tests.

pub mod crypto;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{PageService, ServiceContext};
pub use traits::{EventSource, KeySource, OptionSource, PasswordCipher};
