//! Recording doubles for the service bridge and the host.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use osgraph_app::{
    BridgeError, EmbeddedEnvelope, ExecutionResponse, Family, Notice, ParameterSpec, QueryHost,
    QueryServiceBridge, RawGraph, ResolvedParameter, ResultEnvelope, SearchResult,
};

/// A recorded execution request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionCall {
    pub template_id: String,
    pub parameters: Vec<ResolvedParameter>,
}

type Scripted = (Duration, Result<ExecutionResponse, BridgeError>);

/// In-memory analytics service.
#[derive(Default)]
pub struct MockServices {
    catalog: Mutex<Vec<Family>>,
    hits: Mutex<HashMap<String, Vec<SearchResult>>>,
    search_delays: Mutex<HashMap<String, Duration>>,
    search_failures: Mutex<HashMap<String, BridgeError>>,
    executions: Mutex<VecDeque<Scripted>>,
    pub search_calls: Mutex<Vec<(String, String)>>,
    pub execution_calls: Mutex<Vec<ExecutionCall>>,
    pub catalog_calls: Mutex<usize>,
}

impl MockServices {
    pub fn with_catalog(catalog: Vec<Family>) -> Arc<Self> {
        let services = Self::default();
        *services.catalog.lock() = catalog;
        Arc::new(services)
    }

    pub fn hits(&self, keyword: &str, results: Vec<SearchResult>) {
        self.hits.lock().insert(keyword.to_string(), results);
    }

    pub fn search_delay(&self, keyword: &str, delay: Duration) {
        self.search_delays.lock().insert(keyword.to_string(), delay);
    }

    pub fn fail_search(&self, keyword: &str, error: BridgeError) {
        self.search_failures.lock().insert(keyword.to_string(), error);
    }

    pub fn respond(&self, response: Result<ExecutionResponse, BridgeError>) {
        self.respond_after(Duration::ZERO, response);
    }

    pub fn respond_after(&self, delay: Duration, response: Result<ExecutionResponse, BridgeError>) {
        self.executions.lock().push_back((delay, response));
    }

    pub fn searches(&self) -> Vec<(String, String)> {
        self.search_calls.lock().clone()
    }

    pub fn executions(&self) -> Vec<ExecutionCall> {
        self.execution_calls.lock().clone()
    }
}

#[async_trait]
impl QueryServiceBridge for MockServices {
    async fn list_query_templates(&self) -> Result<Vec<Family>, BridgeError> {
        *self.catalog_calls.lock() += 1;
        Ok(self.catalog.lock().clone())
    }

    async fn full_text_search(
        &self,
        query_source: &str,
        keyword: &str,
    ) -> Result<Vec<SearchResult>, BridgeError> {
        self.search_calls
            .lock()
            .push((query_source.to_string(), keyword.to_string()));
        let delay = self.search_delays.lock().get(keyword).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.search_failures.lock().get(keyword).cloned() {
            return Err(error);
        }
        Ok(self.hits.lock().get(keyword).cloned().unwrap_or_default())
    }

    async fn execute_query_template(
        &self,
        template_id: &str,
        parameters: &[ResolvedParameter],
    ) -> Result<ExecutionResponse, BridgeError> {
        self.execution_calls.lock().push(ExecutionCall {
            template_id: template_id.to_string(),
            parameters: parameters.to_vec(),
        });
        let scripted = self.executions.lock().pop_front();
        let (delay, response) =
            scripted.unwrap_or((Duration::ZERO, Ok(ExecutionResponse::ok(RawGraph::default()))));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        response
    }
}

/// Everything the controller told the host, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Loading(bool),
    Search(EmbeddedEnvelope),
    Navigate(String, ResultEnvelope),
    Notify(Notice),
}

#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().clone()
    }

    pub fn navigations(&self) -> Vec<(String, ResultEnvelope)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Navigate(route, envelope) => Some((route, envelope)),
                _ => None,
            })
            .collect()
    }
}

impl QueryHost for RecordingHost {
    fn on_loading_change(&self, loading: bool) {
        self.events.lock().push(HostEvent::Loading(loading));
    }

    fn on_search(&self, envelope: EmbeddedEnvelope) {
        self.events.lock().push(HostEvent::Search(envelope));
    }

    fn navigate(&self, route: &str, envelope: ResultEnvelope) {
        self.events
            .lock()
            .push(HostEvent::Navigate(route.to_string(), envelope));
    }

    fn notify(&self, notice: Notice) {
        self.events.lock().push(HostEvent::Notify(notice));
    }
}

fn family(id: &str, source: &str, template: &str, params: Vec<ParameterSpec>) -> Family {
    Family {
        family_id: id.to_string(),
        display_name: id.to_lowercase().replace('_', " "),
        query_source: source.to_string(),
        template_id: template.to_string(),
        parameter_list: params,
    }
}

/// Three families across two search categories.
pub fn catalog() -> Vec<Family> {
    vec![
        family(
            "REPO_CONTRIBUTE",
            "github_repo",
            "1",
            vec![
                ParameterSpec::new("repo_name", "STRING"),
                ParameterSpec::new("start_timestamp", "LONG"),
                ParameterSpec::new("end_timestamp", "LONG"),
            ],
        ),
        family(
            "REPO_ECOLOGY",
            "github_repo",
            "2",
            vec![
                ParameterSpec::new("repo_name", "STRING"),
                ParameterSpec::new("top_n", "INT").with_default("50"),
            ],
        ),
        family(
            "ACCT_ACTIVITY",
            "github_user",
            "4",
            vec![ParameterSpec::new("github_user", "STRING")],
        ),
    ]
}
