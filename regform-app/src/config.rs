//! 客户端配置
//!
//! Where the page's lookups go and how submissions behave when encryption
//! is impossible. Hosts either embed a JSON blob or rely on the environment.

use std::time::Duration;

use regform_core::error::{CoreError, CoreResult};
use regform_core::types::{Level, SubmitPolicy};
use serde::{Deserialize, Serialize};
use url::Url;

/// Placeholder replaced by the parent id in dependent path templates
pub const ID_PLACEHOLDER: &str = "{id}";

pub const ENV_BASE_URL: &str = "REGFORM_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "REGFORM_TIMEOUT_SECS";
pub const ENV_SUBMIT_POLICY: &str = "REGFORM_SUBMIT_POLICY";

/// 客户端配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin (and optional path prefix) serving the lookup endpoints
    pub base_url: String,
    pub states_path: String,
    /// Template containing `{id}`, the selected state
    pub districts_path: String,
    /// Template containing `{id}`, the selected district
    pub blocks_path: String,
    pub public_key_path: String,
    /// Per-request timeout; `None` leaves reqwest's default
    pub timeout_secs: Option<u64>,
    pub submit_policy: SubmitPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            states_path: "/states".to_string(),
            districts_path: "/districts/{id}".to_string(),
            blocks_path: "/blocks/{id}".to_string(),
            public_key_path: "/api/decrypt_keys".to_string(),
            timeout_secs: Some(15),
            submit_policy: SubmitPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `REGFORM_*` environment variables
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for the `REGFORM_*` names
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                CoreError::Config(format!("{ENV_TIMEOUT_SECS}={raw:?} is not a number: {e}"))
            })?;
            config.timeout_secs = (secs > 0).then_some(secs);
        }
        if let Some(raw) = lookup(ENV_SUBMIT_POLICY) {
            config.submit_policy =
                serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
                    .map_err(|_| {
                        CoreError::Config(format!(
                            "{ENV_SUBMIT_POLICY}={raw:?}; expected fail-closed or fail-open"
                        ))
                    })?;
        }

        Ok(config)
    }

    /// Parse a JSON config blob; missing keys keep their defaults
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::Config(format!("Invalid config: {e}")))
    }

    /// Check the base URL and path templates, returning the parsed base URL
    pub fn validate(&self) -> CoreResult<Url> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| CoreError::Config(format!("base_url {:?}: {e}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "base_url must be http or https, got {}",
                base.scheme()
            )));
        }
        if base.query().is_some() || base.fragment().is_some() {
            return Err(CoreError::Config(format!(
                "base_url must not carry a query or fragment, got {:?}",
                self.base_url
            )));
        }

        for (name, path) in [
            ("states_path", &self.states_path),
            ("public_key_path", &self.public_key_path),
        ] {
            check_path(name, path, false)?;
        }
        for (name, path) in [
            ("districts_path", &self.districts_path),
            ("blocks_path", &self.blocks_path),
        ] {
            check_path(name, path, true)?;
        }

        Ok(base)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Path of the lookup for `level`, with the parent id filled in
    pub fn endpoint_path(&self, level: Level, parent_id: Option<&str>) -> String {
        let template = match level {
            Level::State => &self.states_path,
            Level::District => &self.districts_path,
            Level::Block => &self.blocks_path,
        };
        let Some(parent) = parent_id else {
            return template.clone();
        };

        // Path segments are percent-encoded; a placeholder inside the query is form-encoded.
        match template.split_once('?') {
            Some((path, query)) => {
                let in_query: String =
                    url::form_urlencoded::byte_serialize(parent.as_bytes()).collect();
                format!(
                    "{}?{}",
                    path.replace(ID_PLACEHOLDER, &urlencoding::encode(parent)),
                    query.replace(ID_PLACEHOLDER, &in_query)
                )
            }
            None => template.replace(ID_PLACEHOLDER, &urlencoding::encode(parent)),
        }
    }

    pub fn endpoint_url(&self, level: Level, parent_id: Option<&str>) -> CoreResult<Url> {
        self.join(&self.endpoint_path(level, parent_id))
    }

    pub fn public_key_url(&self) -> CoreResult<Url> {
        self.join(&self.public_key_path)
    }

    // Concatenate rather than `Url::join` so a path prefix in base_url survives.
    fn join(&self, path: &str) -> CoreResult<Url> {
        let joined = format!("{}{path}", self.base_url.trim_end_matches('/'));
        Url::parse(&joined).map_err(|e| CoreError::Config(format!("endpoint {joined:?}: {e}")))
    }
}

fn check_path(name: &str, path: &str, needs_id: bool) -> CoreResult<()> {
    if !path.starts_with('/') {
        return Err(CoreError::Config(format!(
            "{name} must start with '/', got {path:?}"
        )));
    }
    if needs_id != path.contains(ID_PLACEHOLDER) {
        let expectation = if needs_id { "must" } else { "must not" };
        return Err(CoreError::Config(format!(
            "{name} {expectation} contain {ID_PLACEHOLDER}, got {path:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.submit_policy, SubmitPolicy::FailClosed);
    }

    #[test]
    fn env_overrides_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://lms.example.org/portal/"),
            (ENV_TIMEOUT_SECS, "3"),
            (ENV_SUBMIT_POLICY, "fail-open"),
        ]))
        .unwrap();

        assert_eq!(config.timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.submit_policy, SubmitPolicy::FailOpen);
        assert_eq!(
            config.endpoint_url(Level::District, Some("7")).unwrap().as_str(),
            "https://lms.example.org/portal/districts/7"
        );
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")])).unwrap();
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn bad_env_values_are_config_errors() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));

        let err =
            ClientConfig::from_lookup(lookup(&[(ENV_SUBMIT_POLICY, "maybe")])).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn json_keeps_defaults_for_missing_keys() {
        let config = ClientConfig::from_json(
            r#"{"districts_path": "/api/districts?state_id={id}", "submit_policy": "fail-open"}"#,
        )
        .unwrap();

        assert_eq!(config.states_path, "/states");
        assert_eq!(
            config.endpoint_path(Level::District, Some("12")),
            "/api/districts?state_id=12"
        );
        assert_eq!(config.submit_policy, SubmitPolicy::FailOpen);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = ClientConfig {
            base_url: "ftp://example.org".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config = ClientConfig {
            blocks_path: "/blocks".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        config = ClientConfig {
            states_path: "states".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parent_ids_are_encoded_as_path_segments() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint_path(Level::Block, Some("a/b c")),
            "/blocks/a%2Fb%20c"
        );
        assert_eq!(config.endpoint_path(Level::State, None), "/states");

        let url = config.endpoint_url(Level::Block, Some("a b")).unwrap();
        assert_eq!(url.path(), "/blocks/a%20b");
        assert_eq!(url.path_segments().and_then(Iterator::last), Some("a%20b"));
    }

    #[test]
    fn parent_ids_in_query_are_form_encoded() {
        let config = ClientConfig {
            districts_path: "/api/districts?state_id={id}".to_string(),
            ..ClientConfig::default()
        };
        let url = config.endpoint_url(Level::District, Some("a b&c")).unwrap();

        assert_eq!(url.path(), "/api/districts");
        assert_eq!(
            url.query_pairs().next().map(|(k, v)| (k.into_owned(), v.into_owned())),
            Some(("state_id".to_string(), "a b&c".to_string()))
        );
    }

    #[test]
    fn base_url_with_query_or_fragment_is_rejected() {
        for base_url in ["https://lms.example.org/?a=1", "https://lms.example.org/#top"] {
            let config = ClientConfig {
                base_url: base_url.to_string(),
                ..ClientConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(CoreError::Config(_))),
                "{base_url} should be rejected"
            );
        }
    }
}
