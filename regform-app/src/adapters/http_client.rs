//! Shared HTTP plumbing for the adapters
//!
//! Sending, logging, status checks and JSON decoding live here so the
//! adapters only describe what they request and how to read the answer.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use regform_core::error::{CoreError, CoreResult};

use crate::config::ClientConfig;
use crate::utils::log_sanitizer::truncate_for_log;

/// Build the reqwest client shared by all adapters
pub fn build_client(config: &ClientConfig) -> CoreResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| CoreError::Config(format!("Failed to build HTTP client: {e}")))
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the response text
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers)
    /// * `tag` - log prefix, usually the level being loaded
    /// * `method_name` - request method, for logs
    /// * `endpoint` - URL, for logs and error reports
    ///
    /// # Returns
    /// * `Ok(body)` for a 2xx/3xx response
    /// * `Err(CoreError::Transport)` for network failures and status ≥ 400
    pub async fn execute_request(
        request_builder: RequestBuilder,
        tag: &str,
        method_name: &str,
        endpoint: &str,
    ) -> CoreResult<String> {
        log::debug!("[{tag}] {method_name} {endpoint}");

        let response = request_builder.send().await.map_err(|e| {
            let detail = if e.is_timeout() {
                format!("timed out: {e}")
            } else {
                e.to_string()
            };
            CoreError::transport(endpoint, detail)
        })?;

        let status = response.status();
        log::debug!("[{tag}] Response Status: {}", status.as_u16());

        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            log::warn!(
                "[{tag}] HTTP {} from {endpoint}: {}",
                status.as_u16(),
                truncate_for_log(&body)
            );
            return Err(CoreError::transport(
                endpoint,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| CoreError::transport(endpoint, format!("Failed to read response body: {e}")))?;

        log::debug!("[{tag}] Response Body: {}", truncate_for_log(&response_text));

        Ok(response_text)
    }

    /// Parse a JSON response body
    pub fn parse_json<T>(response_text: &str, tag: &str, endpoint: &str) -> CoreResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{tag}] JSON parse failed: {e}");
            log::error!("[{tag}] Raw response: {}", truncate_for_log(response_text));
            CoreError::transport(endpoint, format!("Invalid JSON: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Probe {
        ok: bool,
    }

    #[test]
    fn parse_json_maps_errors_to_transport() {
        let probe: Probe = HttpUtils::parse_json(r#"{"ok": true}"#, "test", "/probe").unwrap();
        assert!(probe.ok);

        let err = HttpUtils::parse_json::<Probe>("<html>", "test", "/probe").unwrap_err();
        assert!(matches!(err, CoreError::Transport { ref endpoint, .. } if endpoint == "/probe"));
    }

    #[test]
    fn client_builds_from_default_config() {
        assert!(build_client(&ClientConfig::default()).is_ok());
    }
}
