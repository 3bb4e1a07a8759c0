//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::{CoreError, CoreResult};
use crate::traits::{KeySource, OptionSource, PasswordCipher};
use crate::types::{Level, SelectOption};

pub fn options(items: &[(&str, &str)]) -> Vec<SelectOption> {
    items
        .iter()
        .map(|(id, label)| SelectOption::new(*id, *label))
        .collect()
}

// ===== ScriptedOptionSource =====

type LookupKey = (Level, Option<String>);
type Reply = CoreResult<Vec<SelectOption>>;

/// Option source whose answers are scripted per (level, parent id)
///
/// `respond_later` hands the test a sender so it can decide when (and in which
/// order) responses arrive.
pub struct ScriptedOptionSource {
    immediate: Mutex<HashMap<LookupKey, Result<Vec<SelectOption>, String>>>,
    deferred: Mutex<HashMap<LookupKey, VecDeque<oneshot::Receiver<Reply>>>>,
    calls: Mutex<HashMap<Level, usize>>,
}

impl ScriptedOptionSource {
    pub fn new() -> Self {
        Self {
            immediate: Mutex::new(HashMap::new()),
            deferred: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Answer every lookup of (level, parent) right away; `Err` becomes a transport error
    pub fn respond_with(
        &self,
        level: Level,
        parent: Option<&str>,
        result: Result<Vec<SelectOption>, String>,
    ) {
        self.immediate
            .lock()
            .unwrap()
            .insert((level, parent.map(str::to_string)), result);
    }

    /// Answer the next lookup of (level, parent) when the returned sender fires
    pub fn respond_later(&self, level: Level, parent: Option<&str>) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.deferred
            .lock()
            .unwrap()
            .entry((level, parent.map(str::to_string)))
            .or_default()
            .push_back(rx);
        tx
    }

    /// Number of lookups actually started for `level`
    pub fn calls(&self, level: Level) -> usize {
        self.calls.lock().unwrap().get(&level).copied().unwrap_or(0)
    }
}

#[async_trait]
impl OptionSource for ScriptedOptionSource {
    fn endpoint(&self, level: Level, parent_id: Option<&str>) -> String {
        match parent_id {
            Some(parent) => format!("/{}/{parent}", level.plural()),
            None => format!("/{}", level.plural()),
        }
    }

    async fn fetch_options(
        &self,
        level: Level,
        parent_id: Option<&str>,
    ) -> CoreResult<Vec<SelectOption>> {
        *self.calls.lock().unwrap().entry(level).or_default() += 1;
        let endpoint = self.endpoint(level, parent_id);
        let key = (level, parent_id.map(str::to_string));

        let deferred = {
            let mut deferred = self.deferred.lock().unwrap();
            deferred.get_mut(&key).and_then(VecDeque::pop_front)
        };
        if let Some(rx) = deferred {
            return rx
                .await
                .unwrap_or_else(|_| Err(CoreError::transport(endpoint, "response dropped")));
        }

        let scripted = self.immediate.lock().unwrap().get(&key).cloned();
        match scripted {
            Some(Ok(items)) => Ok(items),
            Some(Err(detail)) => Err(CoreError::transport(endpoint, detail)),
            None => Err(CoreError::transport(endpoint, "no scripted response")),
        }
    }
}

// ===== MockKeySource =====

pub struct MockKeySource {
    result: Result<String, String>,
    calls: AtomicUsize,
}

impl MockKeySource {
    pub fn ready(key: &str) -> Self {
        Self {
            result: Ok(key.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            result: Err(detail.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeySource for MockKeySource {
    async fn fetch_public_key(&self) -> CoreResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .map_err(|detail| CoreError::transport("/api/decrypt_keys", detail))
    }
}

// ===== ReversingCipher =====

/// Deterministic stand-in cipher: `"{key}:{reversed plaintext}"`
pub struct ReversingCipher;

impl ReversingCipher {
    /// Plaintext this cipher refuses to encrypt
    pub const REJECTED: &'static str = "reject-me";

    pub fn new() -> Self {
        Self
    }
}

impl PasswordCipher for ReversingCipher {
    fn encrypt(&self, plaintext: &str, public_key: &str) -> CoreResult<String> {
        if plaintext == Self::REJECTED {
            return Err(CoreError::CipherFailure("plaintext rejected".to_string()));
        }
        let reversed: String = plaintext.chars().rev().collect();
        Ok(format!("{public_key}:{reversed}"))
    }
}
