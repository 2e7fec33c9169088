//! Result envelopes
//!
//! What a successful execution hands to the host. In standalone mode the
//! [`ResultEnvelope`] becomes navigation state for the results view; embedded
//! hosts receive an [`EmbeddedEnvelope`], which repeats the graph and the
//! execution key under the names the parent view reads.
//!
//! Resolved parameters are spread into the top level by name, so a host can
//! read `repo_name` or `end_timestamp` directly.

use indexmap::IndexMap;
use serde::Serialize;

use crate::translate::DisplayGraph;
use crate::types::{ParameterSpec, ParameterValue};

/// Execution result plus the selection that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    /// Translated graph
    pub data: DisplayGraph,
    /// Family executed
    pub family_value: Option<String>,
    /// Index the target came from
    pub query_source: String,
    /// Keyword of the latest search
    pub keyword: String,
    /// Template executed
    pub template_id: String,
    /// Resolved values, comma-joined in list order
    pub joined_parameter_values: String,
    /// Declared parameters, before resolution
    pub original_parameter_list: Vec<ParameterSpec>,
    /// Target id
    pub target_value: String,
    /// Target display name from the latest search, if known
    pub target_display_name: Option<String>,
    /// Resolved parameters by name
    #[serde(flatten)]
    pub properties: IndexMap<String, ParameterValue>,
}

/// Envelope passed to an embedding host's search callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedEnvelope {
    /// Common envelope fields
    #[serde(flatten)]
    pub envelope: ResultEnvelope,
    /// Same graph as `data`
    pub search_data: DisplayGraph,
    /// Same as `templateId`
    pub search_template_id: String,
    /// Same as `joinedParameterValues`
    pub search_parameter_values: String,
}

impl From<ResultEnvelope> for EmbeddedEnvelope {
    fn from(envelope: ResultEnvelope) -> Self {
        Self {
            search_data: envelope.data.clone(),
            search_template_id: envelope.template_id.clone(),
            search_parameter_values: envelope.joined_parameter_values.clone(),
            envelope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> ResultEnvelope {
        let mut properties = IndexMap::new();
        properties.insert("repo_name".to_string(), ParameterValue::from("acme/widget"));
        properties.insert("end_timestamp".to_string(), ParameterValue::Integer(1_700_000_000));
        ResultEnvelope {
            data: DisplayGraph::default(),
            family_value: Some("REPO_CONTRIBUTE".into()),
            query_source: "github_repo".into(),
            keyword: "widget".into(),
            template_id: "1".into(),
            joined_parameter_values: "acme/widget,1700000000".into(),
            original_parameter_list: vec![ParameterSpec::new("repo_name", "STRING")],
            target_value: "42".into(),
            target_display_name: Some("acme/widget".into()),
            properties,
        }
    }

    #[test]
    fn properties_flatten_into_top_level() {
        let json = serde_json::to_value(envelope()).unwrap();
        assert_eq!(json["repo_name"], "acme/widget");
        assert_eq!(json["end_timestamp"], 1_700_000_000);
        assert_eq!(json["targetValue"], "42");
        assert_eq!(json["originalParameterList"][0]["parameterName"], "repo_name");
    }

    #[test]
    fn embedded_envelope_mirrors_execution_key() {
        let embedded = EmbeddedEnvelope::from(envelope());
        assert_eq!(embedded.search_template_id, "1");
        assert_eq!(embedded.search_parameter_values, "acme/widget,1700000000");
        let json = serde_json::to_value(&embedded).unwrap();
        assert_eq!(json["templateId"], "1");
        assert_eq!(json["searchTemplateId"], "1");
        assert!(json["searchData"]["nodes"].is_array());
    }
}
