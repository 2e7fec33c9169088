//! # Host Props and Cascade Triggers
//!
//! A parent view drives the controller through [`ControllerProps`]. Each time
//! the host supplies a new set, [`triggers_between`] compares it with the
//! previous one and yields only the reconciliation triggers whose inputs
//! changed, so a re-render with identical props does nothing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ParameterSpec;

/// Inputs supplied by the host. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerProps {
    /// Host renders the search bar pinned to the top of the page.
    pub needs_fixed_layout: bool,
    /// Override of the keyword debounce window.
    pub debounce_duration_ms: Option<u64>,
    /// Target preselected by the host.
    pub preset_target: Option<String>,
    /// Family preselected by the host.
    pub preset_family: Option<String>,
    /// Full-text index of a search context being restored.
    pub preset_query_source: Option<String>,
    /// Keyword of a search context being restored.
    pub preset_keyword: Option<String>,
    /// Template seeded into the initial state.
    pub preset_template_id: Option<String>,
    /// Parameter list seeded into the initial state.
    pub preset_parameter_list: Option<Vec<ParameterSpec>>,
    /// Hand results to the host callback instead of navigating.
    pub embedded_mode: bool,
    /// Force a family type, resetting target and candidates.
    pub family_type_override: Option<String>,
}

impl ControllerProps {
    /// Debounce window requested by the host, if any.
    #[must_use]
    pub fn debounce_window(&self) -> Option<Duration> {
        self.debounce_duration_ms.map(Duration::from_millis)
    }

    fn restore_pair(&self) -> Option<(&str, &str)> {
        match (&self.preset_query_source, &self.preset_keyword) {
            (Some(source), Some(keyword)) if !source.is_empty() && !keyword.is_empty() => {
                Some((source.as_str(), keyword.as_str()))
            }
            _ => None,
        }
    }
}

/// One reconciliation step caused by a props change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropsTrigger {
    /// Preselected family changed (absent means "use the default family").
    Family(Option<String>),
    /// Preselected target changed (absent clears it).
    Target(Option<String>),
    /// Restore a previous search context right away.
    RestoreSearch {
        /// Index to search
        query_source: String,
        /// Keyword to search for
        keyword: String,
    },
    /// Force a family type.
    FamilyTypeOverride(String),
    /// Debounce window changed (absent means "use the configured default").
    DebounceWindow(Option<Duration>),
}

impl PropsTrigger {
    /// Whether the trigger waits on the search service.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, PropsTrigger::RestoreSearch { .. })
    }
}

/// Triggers fired by moving from `previous` to `next` props.
///
/// With no previous props (first mount) every trigger whose input is
/// meaningful fires, mirroring effects that run on mount.
///
/// Triggers come back in application order: the family preset, then the
/// family-type override (which wins over the preset and clears candidates),
/// then the target preset (which survives the override), then the debounce
/// window, and last the restore search, so restored candidates are never
/// wiped by a synchronous trigger of the same props change.
#[must_use]
pub fn triggers_between(previous: Option<&ControllerProps>, next: &ControllerProps) -> Vec<PropsTrigger> {
    let mut triggers = Vec::new();

    if previous.map_or(true, |p| p.preset_family != next.preset_family) {
        triggers.push(PropsTrigger::Family(next.preset_family.clone()));
    }

    if previous.map_or(true, |p| p.family_type_override != next.family_type_override) {
        if let Some(family) = next.family_type_override.as_ref().filter(|f| !f.is_empty()) {
            triggers.push(PropsTrigger::FamilyTypeOverride(family.clone()));
        }
    }

    if previous.map_or(true, |p| p.preset_target != next.preset_target) {
        triggers.push(PropsTrigger::Target(next.preset_target.clone()));
    }

    if let Some(previous) = previous {
        if previous.debounce_duration_ms != next.debounce_duration_ms {
            triggers.push(PropsTrigger::DebounceWindow(next.debounce_window()));
        }
    }

    if previous.map_or(true, |p| p.restore_pair() != next.restore_pair()) {
        if let Some((query_source, keyword)) = next.restore_pair() {
            triggers.push(PropsTrigger::RestoreSearch {
                query_source: query_source.to_string(),
                keyword: keyword.to_string(),
            });
        }
    }

    triggers
}
