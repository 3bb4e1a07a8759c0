//! `OptionSource` over the JSON lookup endpoints

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use regform_core::error::CoreResult;
use regform_core::traits::OptionSource;
use regform_core::types::{Level, SelectOption};

use crate::adapters::HttpUtils;
use crate::config::ClientConfig;

/// Server ids arrive as JSON numbers or strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteId {
    Text(String),
    Number(serde_json::Number),
}

impl RemoteId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemoteOption {
    id: RemoteId,
    name: String,
}

impl From<RemoteOption> for SelectOption {
    fn from(remote: RemoteOption) -> Self {
        SelectOption::new(remote.id.into_string(), remote.name)
    }
}

pub struct HttpOptionSource {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl HttpOptionSource {
    #[must_use]
    pub fn new(client: reqwest::Client, config: Arc<ClientConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl OptionSource for HttpOptionSource {
    fn endpoint(&self, level: Level, parent_id: Option<&str>) -> String {
        self.config.endpoint_path(level, parent_id)
    }

    async fn fetch_options(
        &self,
        level: Level,
        parent_id: Option<&str>,
    ) -> CoreResult<Vec<SelectOption>> {
        let url = self.config.endpoint_url(level, parent_id)?;
        let endpoint = url.to_string();
        let request = self.client.get(url).header(ACCEPT, "application/json");

        let body = HttpUtils::execute_request(request, level.select_id(), "GET", &endpoint).await?;
        let remote: Vec<RemoteOption> =
            HttpUtils::parse_json(&body, level.select_id(), &endpoint)?;

        Ok(remote.into_iter().map(SelectOption::from).collect())
    }
}
