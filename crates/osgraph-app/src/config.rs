//! Controller Configuration
//!
//! Static settings fixed when the controller mounts. Host-driven, changeable
//! inputs live in [`ControllerProps`](crate::props::ControllerProps).

use serde::{Deserialize, Serialize};

use crate::families::DEFAULT_FAMILY;

fn default_debounce_ms() -> u64 {
    300
}

fn default_family() -> String {
    DEFAULT_FAMILY.to_string()
}

fn default_results_route() -> String {
    "/graphs".to_string()
}

/// What to do with a response that arrives after a newer request was sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResponsePolicy {
    /// Drop responses from superseded requests.
    #[default]
    Discard,
    /// Apply every response in arrival order; the last to arrive wins.
    Apply,
}

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Debounce window for keyword search, in milliseconds.
    ///
    /// Used unless the host supplies `debounce_duration_ms` in its props.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Family selected when the host does not preselect one.
    #[serde(default = "default_family")]
    pub default_family: String,

    /// Handling of out-of-order search and execution responses.
    #[serde(default)]
    pub stale_response_policy: StaleResponsePolicy,

    /// Route handed to navigation in standalone mode.
    #[serde(default = "default_results_route")]
    pub results_route: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            default_family: default_family(),
            stale_response_policy: StaleResponsePolicy::default(),
            results_route: default_results_route(),
        }
    }
}
