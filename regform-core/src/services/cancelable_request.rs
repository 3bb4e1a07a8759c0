//! 可取消请求
//!
//! One outstanding lookup per cascade level. Cancelling the token makes the
//! pending future resolve to `CoreError::Superseded` at its next poll.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{CoreError, CoreResult};
use crate::types::Level;

/// 某一级别正在进行的查询
#[derive(Debug, Clone)]
pub struct CancelableRequest {
    id: u64,
    token: CancellationToken,
    endpoint: String,
    level: Level,
}

impl CancelableRequest {
    pub fn new(id: u64, level: Level, endpoint: impl Into<String>) -> Self {
        Self {
            id,
            token: CancellationToken::new(),
            endpoint: endpoint.into(),
            level,
        }
    }

    /// 请求代号，在同一加载器内唯一
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 执行 `lookup`，若请求先被取消则返回 `CoreError::Superseded`
    pub async fn run<T, F>(&self, lookup: F) -> CoreResult<T>
    where
        F: Future<Output = CoreResult<T>>,
    {
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(CoreError::Superseded),
            result = lookup => result,
        }
    }
}
