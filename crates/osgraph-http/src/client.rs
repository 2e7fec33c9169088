//! reqwest implementation of [`QueryServiceBridge`].

use async_trait::async_trait;
use osgraph_app::{
    BridgeError, ExecutionResponse, Family, QueryServiceBridge, RawGraph, ResolvedParameter,
    SearchResult,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::HttpBridgeConfig;
use crate::wire::{self, ApiResponse, ExecuteRequest, FullTextRequest, SearchHit, TemplateRecord};

/// Analytics API client.
#[derive(Debug, Clone)]
pub struct HttpQueryService {
    client: Client,
    config: HttpBridgeConfig,
}

impl HttpQueryService {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: HttpBridgeConfig) -> Result<Self, BridgeError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BridgeError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &HttpBridgeConfig {
        &self.config
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        what: &'static str,
    ) -> Result<ApiResponse<T>, BridgeError> {
        let response = self
            .authorized(req)
            .send()
            .await
            .map_err(|e| transport_error(what, &e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(what, &e))?;

        if !status.is_success() {
            tracing::debug!(%status, what, "analytics service returned an error status");
            return Err(BridgeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        wire::decode(what, &body)
    }
}

fn transport_error(what: &str, error: &reqwest::Error) -> BridgeError {
    BridgeError::Transport {
        reason: format!("{what} request failed: {error}"),
        timed_out: error.is_timeout(),
    }
}

#[async_trait]
impl QueryServiceBridge for HttpQueryService {
    async fn list_query_templates(&self) -> Result<Vec<Family>, BridgeError> {
        let url = self.config.url(&self.config.endpoints.template_list);
        let records: Vec<TemplateRecord> = self
            .send(self.client.get(&url), "template list")
            .await?
            .into_data()?;

        Ok(records.into_iter().map(Family::from).collect())
    }

    async fn full_text_search(
        &self,
        query_source: &str,
        keyword: &str,
    ) -> Result<Vec<SearchResult>, BridgeError> {
        let url = self.config.url(&self.config.endpoints.full_text);
        let request = FullTextRequest {
            index_name: query_source,
            keyword,
        };
        let hits: Vec<SearchHit> = self
            .send(self.client.post(&url).json(&request), "full-text search")
            .await?
            .into_data()?;

        Ok(hits.into_iter().map(SearchResult::from).collect())
    }

    async fn execute_query_template(
        &self,
        template_id: &str,
        parameters: &[ResolvedParameter],
    ) -> Result<ExecutionResponse, BridgeError> {
        let url = self.config.url(&self.config.endpoints.template_execute);
        let request = ExecuteRequest {
            template_id,
            template_parameter_list: parameters,
        };
        let response: ApiResponse<RawGraph> = self
            .send(self.client.post(&url).json(&request), "template execution")
            .await?;

        Ok(response.into())
    }
}
