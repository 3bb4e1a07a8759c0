//! 密码加密服务
//!
//! Encrypts every not-yet-encrypted, non-empty password field of a form.
//! All ciphertexts are computed before any field is written, so a failure
//! leaves the whole form untouched.

use std::sync::Arc;

use crate::error::CoreResult;
use crate::services::PublicKeyStore;
use crate::traits::PasswordCipher;
use crate::types::{EncryptionReport, Form};

/// 密码加密服务
pub struct PasswordEncryptionService {
    key_store: Arc<PublicKeyStore>,
    cipher: Arc<dyn PasswordCipher>,
}

impl PasswordEncryptionService {
    #[must_use]
    pub fn new(key_store: Arc<PublicKeyStore>, cipher: Arc<dyn PasswordCipher>) -> Self {
        Self { key_store, cipher }
    }

    /// 就地加密表单中的密码字段
    ///
    /// # Returns
    /// * `Ok(report)` - 所有待加密字段均已替换为密文
    /// * `Err(CoreError::KeyUnavailable)` - 需要加密但公钥未加载
    /// * `Err(CoreError::CipherFailure)` - 某个字段加密失败
    ///
    /// 出错时不修改任何字段。
    pub fn encrypt_all(&self, form: &mut Form) -> CoreResult<EncryptionReport> {
        let mut report = EncryptionReport::default();
        let mut pending = Vec::new();

        for (index, field) in form.password_fields() {
            if field.encrypted {
                report.already_encrypted += 1;
            } else if field.value.trim().is_empty() {
                report.skipped_empty += 1;
            } else {
                pending.push(index);
            }
        }

        if pending.is_empty() {
            return Ok(report);
        }

        let key = self.key_store.require_key()?;

        let mut ciphertexts = Vec::with_capacity(pending.len());
        for &index in &pending {
            let field = &form.fields[index];
            let ciphertext = self.cipher.encrypt(&field.value, &key).map_err(|e| {
                log::error!("Failed to encrypt field {} of form {}: {e}", field.name, form.id);
                e
            })?;
            ciphertexts.push((index, ciphertext));
        }

        for (index, ciphertext) in ciphertexts {
            let field = &mut form.fields[index];
            field.value = ciphertext;
            field.encrypted = true;
            report.encrypted += 1;
        }

        log::debug!(
            "Form {}: {} encrypted, {} empty, {} already encrypted",
            form.id,
            report.encrypted,
            report.skipped_empty,
            report.already_encrypted
        );
        Ok(report)
    }
}
