//! # Collaborator Bridges
//!
//! The controller is pure orchestration. Everything that touches the network
//! or the UI goes through one of two traits:
//!
//! ```text
//!            ┌────────────────────┐
//! catalog ──►│                    │──► on_loading_change
//! search  ──►│  QueryController   │──► on_search / navigate
//! execute ──►│                    │──► notify
//!            └────────────────────┘
//!  QueryServiceBridge                QueryHost
//! ```
//!
//! `osgraph-http` implements [`QueryServiceBridge`] over the analytics REST
//! API; tests implement both with recording mocks.

use async_trait::async_trait;

use crate::envelope::{EmbeddedEnvelope, ResultEnvelope};
use crate::errors::{BridgeError, Notice};
use crate::translate::RawGraph;
use crate::types::{Family, ResolvedParameter, SearchResult};

/// Answer of the template execution service.
///
/// Application-level failure is data (`success = false`), not an error:
/// the controller turns it into a host notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResponse {
    /// Whether execution succeeded
    pub success: bool,
    /// Graph payload, present on success
    pub data: Option<RawGraph>,
    /// Service message, usually present on failure
    pub message: Option<String>,
}

impl ExecutionResponse {
    /// Successful response carrying `graph`.
    pub fn ok(graph: RawGraph) -> Self {
        Self {
            success: true,
            data: Some(graph),
            message: None,
        }
    }

    /// Failed response with an optional service message.
    pub fn failed(message: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            message,
        }
    }
}

/// Remote services the controller depends on.
#[async_trait]
pub trait QueryServiceBridge: Send + Sync {
    /// All families the analytics service can execute.
    async fn list_query_templates(&self) -> Result<Vec<Family>, BridgeError>;

    /// Ranked candidates for `keyword` in the `query_source` index.
    async fn full_text_search(
        &self,
        query_source: &str,
        keyword: &str,
    ) -> Result<Vec<SearchResult>, BridgeError>;

    /// Execute `template_id` with fully resolved parameters.
    ///
    /// `Err` is reserved for transport failures; a refused execution is an
    /// `Ok` response with `success = false`.
    async fn execute_query_template(
        &self,
        template_id: &str,
        parameters: &[ResolvedParameter],
    ) -> Result<ExecutionResponse, BridgeError>;
}

/// Callbacks into the view hosting the controller.
///
/// Every method has a no-op default so hosts implement only what they render.
pub trait QueryHost: Send + Sync {
    /// An execution started (`true`) or the last one settled (`false`).
    fn on_loading_change(&self, _loading: bool) {}

    /// Embedded mode: results handed back to the parent view.
    fn on_search(&self, _envelope: EmbeddedEnvelope) {}

    /// Standalone mode: open `route` with `envelope` as navigation state.
    fn navigate(&self, _route: &str, _envelope: ResultEnvelope) {}

    /// Show a transient notification.
    fn notify(&self, _notice: Notice) {}
}

/// Host that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl QueryHost for NullHost {}
