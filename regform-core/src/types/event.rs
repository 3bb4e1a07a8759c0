//! Page events forwarded by the host

use std::sync::{Arc, Mutex};

use super::Form;

/// Form shared between the host and the submit handlers
pub type SharedForm = Arc<Mutex<Form>>;

/// A click on a hyperlink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkClick {
    /// `href` attribute as written, possibly relative
    pub href: String,
    /// Mouse button, 0 is primary
    pub button: u16,
    /// `target` attribute
    pub target: Option<String>,
    /// Whether the link carries a `download` attribute
    pub download: bool,
    /// Ctrl/Meta/Shift/Alt held during the click
    pub modifier_keys: bool,
}

impl LinkClick {
    /// Plain primary-button click on `href`
    pub fn primary(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_download(mut self) -> Self {
        self.download = true;
        self
    }
}

/// Events the page reacts to
#[derive(Debug, Clone)]
pub enum PageEvent {
    DomContentLoaded,
    Load,
    /// `pageshow`; `persisted` is set when restored from the back/forward cache
    PageShow { persisted: bool },
    /// A select control changed its value
    SelectionChanged { select_id: String, value: String },
    Submit { form: SharedForm },
    LinkClick(LinkClick),
    /// Text typed into a password field
    PasswordInput { field: String, value: String },
    /// Click on a password field's visibility button
    ToggleVisibility { field: String },
}

impl PageEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Load => "load",
            Self::PageShow { .. } => "pageshow",
            Self::SelectionChanged { .. } => "change",
            Self::Submit { .. } => "submit",
            Self::LinkClick(_) => "click",
            Self::PasswordInput { .. } => "input",
            Self::ToggleVisibility { .. } => "toggle",
        }
    }
}
