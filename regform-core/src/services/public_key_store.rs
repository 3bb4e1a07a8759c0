//! 公钥存储服务
//!
//! Holds the page's encryption key. Initialized once at page load; both success
//! and failure are final for the page lifetime.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{CoreError, CoreResult};
use crate::traits::KeySource;
use crate::types::KeyState;

/// 公钥存储服务
pub struct PublicKeyStore {
    source: Arc<dyn KeySource>,
    state: RwLock<KeyState>,
}

impl PublicKeyStore {
    #[must_use]
    pub fn new(source: Arc<dyn KeySource>) -> Self {
        Self {
            source,
            state: RwLock::new(KeyState::Uninitialized),
        }
    }

    /// 初始化公钥（只获取一次）
    ///
    /// 之后的调用不会重新获取，直接返回当前状态。
    pub async fn initialize(&self) -> KeyState {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if state.is_started() {
                log::debug!("Public key store already initialized");
                return state.clone();
            }
            *state = KeyState::Loading;
        }

        let next = match self.source.fetch_public_key().await {
            Ok(key) if !key.trim().is_empty() => {
                log::info!("Public key loaded ({} bytes)", key.len());
                KeyState::Ready(key)
            }
            Ok(_) => {
                log::error!("Public key response carried an empty key");
                KeyState::Failed("empty public key".to_string())
            }
            Err(e) => {
                log::error!("Failed to load public key: {e}");
                KeyState::Failed(e.to_string())
            }
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = next.clone();
        next
    }

    /// 获取当前生命周期状态
    pub fn state(&self) -> KeyState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_loaded()
    }

    /// 获取公钥，未加载时返回 `None`
    pub fn get_key(&self) -> Option<String> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            KeyState::Ready(key) => Some(key.clone()),
            _ => None,
        }
    }

    /// 获取公钥，不可用时返回说明原因的 `KeyUnavailable`
    pub fn require_key(&self) -> CoreResult<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match &*state {
            KeyState::Ready(key) => Ok(key.clone()),
            other => Err(CoreError::KeyUnavailable(other.unavailable_reason())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockKeySource;

    #[tokio::test]
    async fn loads_key_once() {
        let source = Arc::new(MockKeySource::ready("-----BEGIN PUBLIC KEY-----"));
        let store = PublicKeyStore::new(source.clone());
        assert_eq!(store.state(), KeyState::Uninitialized);
        assert!(store.get_key().is_none());

        let state = store.initialize().await;
        assert!(state.is_loaded());
        assert!(store.is_loaded());
        assert_eq!(store.get_key().as_deref(), Some("-----BEGIN PUBLIC KEY-----"));

        store.initialize().await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failure_is_terminal() {
        let source = Arc::new(MockKeySource::failing("HTTP 500"));
        let store = PublicKeyStore::new(source.clone());

        let state = store.initialize().await;
        assert!(matches!(state, KeyState::Failed(_)));
        assert!(!store.is_loaded());

        // No retry on a second initialize
        assert!(matches!(store.initialize().await, KeyState::Failed(_)));
        assert_eq!(source.calls(), 1);

        let err = store.require_key().unwrap_err();
        assert!(matches!(err, CoreError::KeyUnavailable(ref reason) if reason.contains("HTTP 500")));
    }

    #[tokio::test]
    async fn blank_key_counts_as_failure() {
        let store = PublicKeyStore::new(Arc::new(MockKeySource::ready("   ")));
        assert!(matches!(store.initialize().await, KeyState::Failed(_)));
        assert!(store.get_key().is_none());
    }

    #[test]
    fn uninitialized_store_reports_unavailable() {
        let store = PublicKeyStore::new(Arc::new(MockKeySource::ready("key")));
        assert!(matches!(
            store.require_key(),
            Err(CoreError::KeyUnavailable(ref reason)) if reason.contains("never requested")
        ));
    }
}
