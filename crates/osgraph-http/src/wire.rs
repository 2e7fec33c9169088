//! Wire shapes of the analytics REST API.
//!
//! Every endpoint wraps its payload as `{success, data, message}`. Ids come
//! back as numbers or strings depending on the backing store.

use osgraph_app::{
    BridgeError, ExecutionResponse, Family, ParameterSpec, RawGraph, ResolvedParameter,
    SearchResult,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response wrapper shared by all endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the service handled the request
    #[serde(default)]
    pub success: bool,
    /// Payload
    pub data: Option<T>,
    /// Human-readable status
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Payload of a successful response.
    ///
    /// # Errors
    ///
    /// [`BridgeError::Rejected`] when `success` is false or `data` is absent.
    pub fn into_data(self) -> Result<T, BridgeError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(BridgeError::Rejected {
                message: self.message.unwrap_or_default(),
            }),
        }
    }
}

/// Decode a response body.
///
/// # Errors
///
/// [`BridgeError::Decode`] if `body` is not an `ApiResponse<T>`.
pub fn decode<T: DeserializeOwned>(what: &'static str, body: &str) -> Result<ApiResponse<T>, BridgeError> {
    serde_json::from_str(body).map_err(|e| BridgeError::decode(what, e))
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Catalog entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    /// Template id
    pub id: Value,
    /// Family key, e.g. `REPO_CONTRIBUTE`
    pub template_type: String,
    /// Display name
    #[serde(default)]
    pub template_name: Option<String>,
    /// Full-text index for targets
    pub query_source: String,
    /// Declared parameters
    #[serde(default)]
    pub template_parameter_list: Vec<ParameterSpec>,
}

impl From<TemplateRecord> for Family {
    fn from(record: TemplateRecord) -> Self {
        Family {
            display_name: record
                .template_name
                .unwrap_or_else(|| record.template_type.clone()),
            family_id: record.template_type,
            query_source: record.query_source,
            template_id: id_string(&record.id),
            parameter_list: record.template_parameter_list,
        }
    }
}

/// Full-text search request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullTextRequest<'a> {
    /// Index to search
    pub index_name: &'a str,
    /// Keyword
    pub keyword: &'a str,
}

/// Full-text search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// Target id
    pub id: Value,
    /// Display name
    #[serde(default)]
    pub name: String,
}

impl From<SearchHit> for SearchResult {
    fn from(hit: SearchHit) -> Self {
        SearchResult::new(id_string(&hit.id), hit.name)
    }
}

/// Template execution request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest<'a> {
    /// Template id
    pub template_id: &'a str,
    /// Resolved parameters
    pub template_parameter_list: &'a [ResolvedParameter],
}

impl From<ApiResponse<RawGraph>> for ExecutionResponse {
    fn from(response: ApiResponse<RawGraph>) -> Self {
        ExecutionResponse {
            success: response.success,
            data: response.data,
            message: response.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osgraph_app::ParameterValue;

    #[test]
    fn catalog_entries_become_families() {
        let body = r#"{
            "success": true,
            "data": [{
                "id": 1,
                "templateType": "REPO_CONTRIBUTE",
                "templateName": "Repository contribution",
                "querySource": "github_repo",
                "templateParameterList": [
                    {"parameterName": "repo_name", "valueType": "STRING"},
                    {"parameterName": "top_n", "parameterValue": 50, "valueType": "INT"}
                ]
            }]
        }"#;
        let records = decode::<Vec<TemplateRecord>>("template list", body)
            .unwrap()
            .into_data()
            .unwrap();
        let family = Family::from(records.into_iter().next().unwrap());

        assert_eq!(family.family_id, "REPO_CONTRIBUTE");
        assert_eq!(family.template_id, "1");
        assert_eq!(family.display_name, "Repository contribution");
        assert_eq!(
            family.parameter_list[1].parameter_value,
            Some(ParameterValue::Integer(50))
        );
    }

    #[test]
    fn search_hits_accept_numeric_ids() {
        let body = r#"{"success":true,"data":[{"id":42,"name":"acme/widget"},{"id":"u-7","name":"octocat"}]}"#;
        let hits: Vec<SearchResult> = decode::<Vec<SearchHit>>("search", body)
            .unwrap()
            .into_data()
            .unwrap()
            .into_iter()
            .map(SearchResult::from)
            .collect();
        assert_eq!(hits[0], SearchResult::new("42", "acme/widget"));
        assert_eq!(hits[1].id, "u-7");
    }

    #[test]
    fn refused_request_keeps_service_message() {
        let body = r#"{"success":false,"message":"index unavailable"}"#;
        let err = decode::<Vec<SearchHit>>("search", body)
            .unwrap()
            .into_data()
            .unwrap_err();
        assert_eq!(
            err,
            BridgeError::Rejected {
                message: "index unavailable".into()
            }
        );
    }

    #[test]
    fn execution_failure_is_data_not_error() {
        let body = r#"{"success":false,"data":null,"message":"not found"}"#;
        let response = ExecutionResponse::from(decode::<RawGraph>("execution", body).unwrap());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("not found"));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode::<RawGraph>("execution", "<html>").unwrap_err();
        assert_eq!(err.code(), "DECODE");
    }

    #[test]
    fn execute_request_uses_service_field_names() {
        let params = vec![ResolvedParameter {
            parameter_name: "repo_name".into(),
            parameter_value: "acme/widget".into(),
            value_type: "STRING".into(),
        }];
        let json = serde_json::to_value(ExecuteRequest {
            template_id: "1",
            template_parameter_list: &params,
        })
        .unwrap();
        assert_eq!(json["templateId"], "1");
        assert_eq!(json["templateParameterList"][0]["parameterValue"], "acme/widget");
    }
}
