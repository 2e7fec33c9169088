//! HTTP bridge configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Paths of the analytics endpoints, relative to `base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPaths {
    /// Template catalog (GET)
    pub template_list: String,
    /// Full-text search (POST)
    pub full_text: String,
    /// Template execution (POST)
    pub template_execute: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            template_list: "/api/graph/template/list".to_string(),
            full_text: "/api/graph/fulltext".to_string(),
            template_execute: "/api/graph/template/execute".to_string(),
        }
    }
}

/// Where and how to reach the analytics service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpBridgeConfig {
    /// Service root, e.g. `https://osgraph.example.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token sent with every request
    #[serde(default)]
    pub api_token: Option<String>,

    /// Endpoint paths
    #[serde(default)]
    pub endpoints: EndpointPaths,
}

impl Default for HttpBridgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_token: None,
            endpoints: EndpointPaths::default(),
        }
    }
}

impl HttpBridgeConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let config = HttpBridgeConfig {
            base_url: "https://osgraph.example.com/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.url(&config.endpoints.full_text),
            "https://osgraph.example.com/api/graph/fulltext"
        );
    }

    #[test]
    fn partial_document_keeps_default_paths() {
        let config: HttpBridgeConfig =
            serde_json::from_str(r#"{"base_url":"http://analytics:9000","endpoints":{"full_text":"/search"}}"#)
                .unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.endpoints.full_text, "/search");
        assert_eq!(config.endpoints.template_list, "/api/graph/template/list");
    }
}
