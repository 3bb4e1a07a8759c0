//! 导航遮罩控制
//!
//! A coarse latency mask: shown optimistically when the page is about to be
//! replaced (submit, same-origin navigation) and hidden on the next lifecycle
//! event of a freshly shown page.

use std::sync::atomic::{AtomicBool, Ordering};

use url::Url;

use crate::traits::{EventDisposition, PageEventHandler};
use crate::types::{LinkClick, PageEvent};

/// 仍在当前浏览上下文中导航的 target
const SAME_CONTEXT_TARGETS: [&str; 3] = ["_self", "_parent", "_top"];

/// 导航遮罩控制器
pub struct NavigationOverlay {
    page_url: Url,
    visible: AtomicBool,
}

impl NavigationOverlay {
    /// 创建遮罩控制器（初始可见）
    #[must_use]
    pub fn new(page_url: Url) -> Self {
        Self {
            page_url,
            visible: AtomicBool::new(true),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn show(&self) {
        if !self.visible.swap(true, Ordering::SeqCst) {
            log::trace!("Overlay shown");
        }
    }

    pub fn hide(&self) {
        if self.visible.swap(false, Ordering::SeqCst) {
            log::trace!("Overlay hidden");
        }
    }

    /// 判断点击链接是否会在当前标签页替换本页面
    pub fn is_in_page_navigation(&self, click: &LinkClick) -> bool {
        if click.button != 0 || click.modifier_keys || click.download {
            return false;
        }

        if let Some(target) = click.target.as_deref().map(str::trim) {
            if !target.is_empty()
                && !SAME_CONTEXT_TARGETS
                    .iter()
                    .any(|t| t.eq_ignore_ascii_case(target))
            {
                return false;
            }
        }

        let href = click.href.trim();
        if href.is_empty() {
            return false;
        }
        let Ok(destination) = self.page_url.join(href) else {
            log::debug!("Ignoring click on unparseable href {href}");
            return false;
        };

        if destination.origin() != self.page_url.origin() {
            return false;
        }

        // Jumping to an anchor of this document never unloads it
        !(destination.fragment().is_some() && same_document(&destination, &self.page_url))
    }
}

fn same_document(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}

impl PageEventHandler for NavigationOverlay {
    fn handle(&self, event: &PageEvent, default_prevented: bool) -> EventDisposition {
        match event {
            PageEvent::Submit { .. } if !default_prevented => self.show(),
            PageEvent::LinkClick(click) if !default_prevented => {
                if self.is_in_page_navigation(click) {
                    self.show();
                }
            }
            PageEvent::DomContentLoaded | PageEvent::Load | PageEvent::PageShow { .. } => {
                self.hide();
            }
            _ => {}
        }
        EventDisposition::Continue
    }
}
