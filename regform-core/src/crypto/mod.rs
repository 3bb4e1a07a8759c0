//! encryption module
//!
//! Provides RSA PKCS#1 v1.5 encryption of password fields with the server-supplied public key.
//! The ciphertext is Base64 encoded (standard alphabet), the format the server decrypts.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand_core::OsRng;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use crate::error::{CoreError, CoreResult};
use crate::traits::PasswordCipher;

/// Parse a PEM public key
///
/// Accepts SubjectPublicKeyInfo (`BEGIN PUBLIC KEY`) and falls back to PKCS#1
/// (`BEGIN RSA PUBLIC KEY`).
pub fn parse_public_key(pem: &str) -> CoreResult<RsaPublicKey> {
    let pem = pem.trim();
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|spki_err| {
            RsaPublicKey::from_pkcs1_pem(pem).map_err(|pkcs1_err| {
                CoreError::CipherFailure(format!(
                    "Invalid public key: {spki_err} (PKCS#1: {pkcs1_err})"
                ))
            })
        })
}

/// RSA PKCS#1 v1.5 cipher
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaPkcs1Cipher;

impl RsaPkcs1Cipher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PasswordCipher for RsaPkcs1Cipher {
    fn encrypt(&self, plaintext: &str, public_key: &str) -> CoreResult<String> {
        let key = parse_public_key(public_key)?;

        let ciphertext = key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext.as_bytes())
            .map_err(|e| CoreError::CipherFailure(format!("Encryption failed: {e}")))?;

        Ok(BASE64.encode(ciphertext))
    }
}
