//! Application bootstrap for the registration page.
//!
//! Provides `PageState` (service container), `PageStateBuilder` (adapter injection)
//! and the HTTP adapters that back the core traits by default.

pub mod adapters;
pub mod config;
pub mod utils;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use regform_core::crypto::RsaPkcs1Cipher;
use regform_core::error::CoreResult;
use regform_core::services::{PageService, ServiceContext};
use regform_core::traits::{
    EventDisposition, InMemoryEventSource, KeySource, OptionSource, PasswordCipher,
};
use regform_core::types::{KeyState, LoadOutcome, PageEvent};
use url::Url;

use crate::adapters::{build_client, HttpKeySource, HttpOptionSource};
pub use crate::config::ClientConfig;

/// Registration page state.
///
/// Holds the page service and the event source its handlers are registered
/// with. Hosts construct this once per page via `PageStateBuilder`.
pub struct PageState {
    /// Effective client configuration
    pub config: Arc<ClientConfig>,
    /// Service context (holds the injected transports and cipher)
    pub ctx: Arc<ServiceContext>,
    /// Page service
    pub page_service: Arc<PageService>,
    /// Event source the page handlers are registered with
    pub events: Arc<InMemoryEventSource>,
    /// Whether the page-load sequence has completed
    pub startup_completed: AtomicBool,
}

impl PageState {
    /// Run the page-load sequence without going through `DomContentLoaded`:
    /// key fetch and state lookup run concurrently.
    ///
    /// Hosts that forward `DomContentLoaded` get the same work spawned for them
    /// and should not call this as well.
    pub async fn run_startup(&self) -> (KeyState, LoadOutcome) {
        let (key, states) = self.page_service.start().await;

        match &key {
            KeyState::Ready(_) => log::info!("Public key loaded"),
            other => log::warn!("Public key not available: {}", other.unavailable_reason()),
        }
        match &states {
            LoadOutcome::Populated(count) => log::info!("Loaded {count} states"),
            LoadOutcome::Empty => log::warn!("No states returned"),
            LoadOutcome::Failed(e) => log::error!("Failed to load states: {e}"),
            LoadOutcome::Superseded => log::debug!("State load superseded"),
        }

        self.startup_completed.store(true, Ordering::SeqCst);
        (key, states)
    }

    /// Forward a page event to the registered handlers.
    pub fn dispatch(&self, event: &PageEvent) -> EventDisposition {
        self.events.dispatch(event)
    }
}

/// Builder for constructing `PageState`.
///
/// # Optional
/// - `config`: defaults to `ClientConfig::default()`
/// - `page_url`: defaults to the configured base URL
/// - `option_source` / `key_source`: default to the HTTP adapters
/// - `cipher`: defaults to `RsaPkcs1Cipher`
pub struct PageStateBuilder {
    config: Option<ClientConfig>,
    page_url: Option<Url>,
    option_source: Option<Arc<dyn OptionSource>>,
    key_source: Option<Arc<dyn KeySource>>,
    cipher: Option<Arc<dyn PasswordCipher>>,
}

impl PageStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: None,
            page_url: None,
            option_source: None,
            key_source: None,
            cipher: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn page_url(mut self, page_url: Url) -> Self {
        self.page_url = Some(page_url);
        self
    }

    #[must_use]
    pub fn option_source(mut self, source: Arc<dyn OptionSource>) -> Self {
        self.option_source = Some(source);
        self
    }

    #[must_use]
    pub fn key_source(mut self, source: Arc<dyn KeySource>) -> Self {
        self.key_source = Some(source);
        self
    }

    #[must_use]
    pub fn cipher(mut self, cipher: Arc<dyn PasswordCipher>) -> Self {
        self.cipher = Some(cipher);
        self
    }

    /// Build the `PageState` and register the page handlers.
    ///
    /// # Errors
    /// Returns `CoreError::Config` if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn build(self) -> CoreResult<PageState> {
        let config = Arc::new(self.config.unwrap_or_default());
        let base_url = config.validate()?;

        let client = build_client(&config)?;
        let option_source = self.option_source.unwrap_or_else(|| {
            Arc::new(HttpOptionSource::new(client.clone(), Arc::clone(&config)))
        });
        let key_source = self
            .key_source
            .unwrap_or_else(|| Arc::new(HttpKeySource::new(client, Arc::clone(&config))));
        let cipher = self
            .cipher
            .unwrap_or_else(|| Arc::new(RsaPkcs1Cipher::new()));

        let ctx = Arc::new(ServiceContext::new(option_source, key_source, cipher));
        let page_url = self.page_url.unwrap_or(base_url);
        let page_service = Arc::new(PageService::new(&ctx, page_url, config.submit_policy));

        let events = Arc::new(InMemoryEventSource::new());
        page_service.register(events.as_ref());

        Ok(PageState {
            config,
            ctx,
            page_service,
            events,
            startup_completed: AtomicBool::new(false),
        })
    }
}

impl Default for PageStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
