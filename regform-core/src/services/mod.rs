//! 业务逻辑服务层

mod cancelable_request;
mod dependent_option_loader;
mod navigation_overlay;
mod page_service;
mod password_encryption_service;
mod password_visibility;
mod public_key_store;
mod select_resetter;

pub use cancelable_request::CancelableRequest;
pub use dependent_option_loader::{DependentOptionLoader, LocationCascade};
pub use navigation_overlay::NavigationOverlay;
pub use page_service::{PageService, SubmitGuard};
pub use password_encryption_service::PasswordEncryptionService;
pub use password_visibility::{PasswordVisibility, ICON_MASKED, ICON_REVEALED};
pub use public_key_store::PublicKeyStore;
pub use select_resetter::SelectResetter;

use std::sync::Arc;

use crate::traits::{KeySource, OptionSource, PasswordCipher};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的传输实现。
pub struct ServiceContext {
    /// 选项列表查询
    pub option_source: Arc<dyn OptionSource>,
    /// 公钥分发
    pub key_source: Arc<dyn KeySource>,
    /// 密码加密
    pub cipher: Arc<dyn PasswordCipher>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        option_source: Arc<dyn OptionSource>,
        key_source: Arc<dyn KeySource>,
        cipher: Arc<dyn PasswordCipher>,
    ) -> Self {
        Self {
            option_source,
            key_source,
            cipher,
        }
    }
}
