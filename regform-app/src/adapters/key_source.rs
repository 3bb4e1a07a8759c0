//! `KeySource` over the public key endpoint

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use regform_core::error::{CoreError, CoreResult};
use regform_core::traits::KeySource;

use crate::adapters::HttpUtils;
use crate::config::ClientConfig;
use crate::utils::log_sanitizer::redact;

const TAG: &str = "keys";

#[derive(Debug, Deserialize)]
struct KeyResponse {
    #[serde(rename = "publicKey")]
    public_key: Option<String>,
}

pub struct HttpKeySource {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl HttpKeySource {
    #[must_use]
    pub fn new(client: reqwest::Client, config: Arc<ClientConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch_public_key(&self) -> CoreResult<String> {
        let url = self.config.public_key_url()?;
        let endpoint = url.to_string();
        let request = self.client.get(url).header(ACCEPT, "application/json");

        let body = HttpUtils::execute_request(request, TAG, "GET", &endpoint).await?;
        let response: KeyResponse = HttpUtils::parse_json(&body, TAG, &endpoint)?;

        match response.public_key {
            Some(key) if !key.trim().is_empty() => {
                log::debug!("[{TAG}] Received public key {}", redact(&key));
                Ok(key)
            }
            _ => Err(CoreError::transport(endpoint, "response has no publicKey")),
        }
    }
}
