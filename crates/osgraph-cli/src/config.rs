//! CLI configuration
//!
//! One TOML file with a section per layer:
//!
//! ```toml
//! [controller]
//! debounce_ms = 300
//! stale_response_policy = "discard"
//!
//! [http]
//! base_url = "https://osgraph.example.com"
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use osgraph_app::ControllerConfig;
use osgraph_http::HttpBridgeConfig;
use serde::{Deserialize, Serialize};

/// Resolve the default config file location.
///
/// Priority:
/// 1. `$OSGRAPH_CONFIG` if set
/// 2. `~/.osgraph/config.toml`, or `./.osgraph/config.toml` when the home
///    directory is unknown
pub fn default_config_path() -> PathBuf {
    std::env::var("OSGRAPH_CONFIG")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".osgraph")
                .join("config.toml")
        })
}

/// Full CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Controller behavior
    pub controller: ControllerConfig,
    /// Analytics service connection
    pub http: HttpBridgeConfig,
}

impl CliConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse configuration")
    }

    /// Load `path`, or the default location when `None`.
    ///
    /// A missing default file yields defaults; a missing explicit file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (default_config_path(), false),
        };

        if !path.exists() {
            if explicit {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config in {}", path.display()))
    }
}
