//! # Catalog and Search Types
//!
//! Plain data carried between the collaborator services and the controller.
//! Field names serialize in camelCase to match the analytics service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A query family as published by the template catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    /// Stable family key (e.g. `REPO_CONTRIBUTE`)
    pub family_id: String,
    /// Human-readable name
    pub display_name: String,
    /// Full-text index the family searches (e.g. `github_repo`)
    pub query_source: String,
    /// Server-side template executed for this family
    pub template_id: String,
    /// Declared template parameters, in execution order
    #[serde(default)]
    pub parameter_list: Vec<ParameterSpec>,
}

/// A concrete parameter value.
///
/// Timestamps resolve to integers; everything else travels as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Whole number (epoch seconds, limits)
    Integer(i64),
    /// Free text (target names, ids)
    Text(String),
}

impl ParameterValue {
    /// True when the value carries nothing usable as a default.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Integer(_) => false,
            Self::Text(s) => s.is_empty(),
        }
    }

    /// Integer view, if this is a number.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// A declared template parameter with its optional stored default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    /// Parameter name; some names are computed at execution time
    pub parameter_name: String,
    /// Stored default, if any
    #[serde(default)]
    pub parameter_value: Option<ParameterValue>,
    /// Service-side type tag (e.g. `STRING`, `LONG`)
    #[serde(default)]
    pub value_type: String,
}

impl ParameterSpec {
    /// Declare a parameter without a default.
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            parameter_name: name.into(),
            parameter_value: None,
            value_type: value_type.into(),
        }
    }

    /// Attach a stored default.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<ParameterValue>) -> Self {
        self.parameter_value = Some(value.into());
        self
    }
}

/// A parameter with its concrete execution-time value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedParameter {
    /// Parameter name, copied from the declaration
    pub parameter_name: String,
    /// Concrete value
    pub parameter_value: ParameterValue,
    /// Type tag, copied from the declaration
    #[serde(default)]
    pub value_type: String,
}

/// One full-text search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Target identifier used for execution
    pub id: String,
    /// Display name (e.g. `acme/widget`)
    pub name: String,
}

impl SearchResult {
    /// Create a search hit.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
