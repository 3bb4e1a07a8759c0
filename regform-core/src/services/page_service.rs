//! 页面事件服务
//!
//! Routes page events to the cascade, the key store, the encryption pipeline,
//! the overlay and the visibility toggles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::runtime::Handle;
use url::Url;

use crate::services::{
    LocationCascade, NavigationOverlay, PasswordEncryptionService, PasswordVisibility,
    PublicKeyStore, ServiceContext,
};
use crate::traits::{EventDisposition, EventSource, PageEventHandler};
use crate::types::{KeyState, LoadOutcome, PageEvent, SubmitPolicy};

/// 提交守卫：表单提交前加密密码字段
pub struct SubmitGuard {
    encryption: Arc<PasswordEncryptionService>,
    policy: SubmitPolicy,
}

impl SubmitGuard {
    #[must_use]
    pub fn new(encryption: Arc<PasswordEncryptionService>, policy: SubmitPolicy) -> Self {
        Self { encryption, policy }
    }
}

impl PageEventHandler for SubmitGuard {
    fn handle(&self, event: &PageEvent, default_prevented: bool) -> EventDisposition {
        let PageEvent::Submit { form } = event else {
            return EventDisposition::Continue;
        };
        if default_prevented {
            return EventDisposition::Continue;
        }

        let mut form = form.lock().unwrap_or_else(PoisonError::into_inner);
        match self.encryption.encrypt_all(&mut form) {
            Ok(_) => EventDisposition::Continue,
            Err(e) => match self.policy {
                SubmitPolicy::FailClosed => {
                    log::error!("Blocking submission of form {}: {e}", form.id);
                    EventDisposition::PreventDefault
                }
                SubmitPolicy::FailOpen => {
                    log::warn!(
                        "Submitting form {} without password encryption: {e}",
                        form.id
                    );
                    EventDisposition::Continue
                }
            },
        }
    }
}

/// 页面服务
pub struct PageService {
    cascade: Arc<LocationCascade>,
    key_store: Arc<PublicKeyStore>,
    encryption: Arc<PasswordEncryptionService>,
    overlay: Arc<NavigationOverlay>,
    visibility: Mutex<HashMap<String, PasswordVisibility>>,
    policy: SubmitPolicy,
}

impl PageService {
    /// 创建页面服务
    ///
    /// # Arguments
    /// * `ctx` - 注入的传输实现与加密器
    /// * `page_url` - 当前页面 URL，用于同源判断
    /// * `policy` - 加密失败时的提交策略
    #[must_use]
    pub fn new(ctx: &ServiceContext, page_url: Url, policy: SubmitPolicy) -> Self {
        let key_store = Arc::new(PublicKeyStore::new(Arc::clone(&ctx.key_source)));
        let encryption = Arc::new(PasswordEncryptionService::new(
            Arc::clone(&key_store),
            Arc::clone(&ctx.cipher),
        ));

        Self {
            cascade: Arc::new(LocationCascade::new(Arc::clone(&ctx.option_source))),
            key_store,
            encryption,
            overlay: Arc::new(NavigationOverlay::new(page_url)),
            visibility: Mutex::new(HashMap::new()),
            policy,
        }
    }

    /// 按顺序注册提交守卫、遮罩和事件路由
    pub fn register(self: &Arc<Self>, events: &dyn EventSource) {
        events.register(Arc::new(SubmitGuard::new(
            Arc::clone(&self.encryption),
            self.policy,
        )));
        events.register(Arc::clone(&self.overlay) as Arc<dyn PageEventHandler>);
        events.register(Arc::clone(self) as Arc<dyn PageEventHandler>);
    }

    pub fn cascade(&self) -> &Arc<LocationCascade> {
        &self.cascade
    }

    pub fn key_store(&self) -> &Arc<PublicKeyStore> {
        &self.key_store
    }

    pub fn encryption(&self) -> &Arc<PasswordEncryptionService> {
        &self.encryption
    }

    pub fn overlay(&self) -> &Arc<NavigationOverlay> {
        &self.overlay
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    /// 获取密码字段 `field` 的显示状态
    pub fn visibility(&self, field: &str) -> PasswordVisibility {
        self.visibility
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(field)
            .copied()
            .unwrap_or_default()
    }

    /// 页面加载：并发获取公钥并加载邦列表
    pub fn start(&self) -> BoxFuture<'static, (KeyState, LoadOutcome)> {
        let key_store = Arc::clone(&self.key_store);
        let states = self.cascade.load_states();
        async move { futures::join!(key_store.initialize(), states) }.boxed()
    }

    fn on_selection_changed(&self, select_id: &str, value: &str) {
        let Some(loader) = self.cascade.loader_for_select(select_id) else {
            log::trace!("Ignoring change of unrelated select {select_id}");
            return;
        };
        // choose() 会同步重置下级，没有运行时则加载永远不会完成
        let Some(runtime) = runtime("dependent option load") else {
            return;
        };
        if let Some(load) = self.cascade.choose(loader.level(), value) {
            runtime.spawn(load.map(|_| ()));
        }
    }

    fn with_visibility(&self, field: &str, update: impl FnOnce(&mut PasswordVisibility)) {
        let mut toggles = self.visibility.lock().unwrap_or_else(PoisonError::into_inner);
        update(toggles.entry(field.to_string()).or_default());
    }
}

impl PageEventHandler for PageService {
    fn handle(&self, event: &PageEvent, _default_prevented: bool) -> EventDisposition {
        match event {
            PageEvent::DomContentLoaded => {
                if let Some(runtime) = runtime("page start") {
                    runtime.spawn(self.start().map(|_| ()));
                }
            }
            PageEvent::SelectionChanged { select_id, value } => {
                self.on_selection_changed(select_id, value);
            }
            PageEvent::PasswordInput { field, value } => {
                self.with_visibility(field, |v| v.on_input(value));
            }
            PageEvent::ToggleVisibility { field } => {
                self.with_visibility(field, PasswordVisibility::toggle);
            }
            _ => {}
        }
        EventDisposition::Continue
    }
}

/// 获取当前 tokio 运行时
///
/// 没有运行时时记录错误并返回 `None`，调用方不得修改任何选择框状态。
fn runtime(task: &str) -> Option<Handle> {
    match Handle::try_current() {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::error!("Cannot run {task}: no async runtime ({e})");
            None
        }
    }
}
