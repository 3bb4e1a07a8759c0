//! Asymmetric cipher capability

use crate::error::CoreResult;

/// `encrypt(plaintext, public_key) → ciphertext`
///
/// Implementations must be pure apart from randomness; failures are reported as
/// `CoreError::CipherFailure`.
pub trait PasswordCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str, public_key: &str) -> CoreResult<String>;
}
