//! # Execution Orchestrator
//!
//! Pure half of template execution. The controller drives the I/O; this
//! module decides what to send and what the answer means.
//!
//! ```text
//! Idle ─► Resolving ─► Executing ─┬─► Succeeded ─► Idle
//!                                 └─► Failed ────► Idle
//! ```
//!
//! - [`ExecutionPlan::prepare`] covers `Resolving`: it snapshots the selection
//!   and resolves parameters against the target.
//! - [`settle`] covers the exit from `Executing`: a response is a success
//!   only if it says so *and* carries a graph.

use serde::Serialize;

use crate::clock::Clock;
use crate::envelope::ResultEnvelope;
use crate::params;
use crate::state::SelectionState;
use crate::bridge::ExecutionResponse;
use crate::translate::{DisplayGraph, GraphTranslator};
use crate::types::{ParameterSpec, ResolvedParameter};

/// Where the latest execution stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ExecutionPhase {
    /// Nothing running
    #[default]
    Idle,
    /// Parameters being resolved
    Resolving,
    /// Waiting for the execution service
    Executing,
    /// Last execution dispatched a result
    Succeeded,
    /// Last execution failed
    Failed,
}

/// Everything needed to execute once and describe the result.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    /// Template to execute
    pub template_id: String,
    /// Target id
    pub target: String,
    /// Declared parameters, before resolution
    pub original_parameter_list: Vec<ParameterSpec>,
    /// Parameters sent to the service
    pub resolved: Vec<ResolvedParameter>,
    /// Comma-joined resolved values
    pub joined_values: String,
    /// Family at preparation time
    pub family_value: Option<String>,
    /// Search index at preparation time
    pub query_source: String,
    /// Latest keyword at preparation time
    pub keyword: String,
    /// Target name from the latest search, if known
    pub target_display_name: Option<String>,
}

impl ExecutionPlan {
    /// Resolve the current selection against `target`.
    ///
    /// Returns `None` for an empty target.
    pub fn prepare(state: &SelectionState, target: &str, clock: &dyn Clock) -> Option<Self> {
        if target.is_empty() {
            return None;
        }

        let resolved = params::resolve(&state.parameter_list, target, clock);
        let joined_values = params::joined_values(&resolved);

        Some(Self {
            template_id: state.template_id.clone(),
            target: target.to_string(),
            original_parameter_list: state.parameter_list.clone(),
            resolved,
            joined_values,
            family_value: state.family_value.clone(),
            query_source: state.query_source.clone(),
            keyword: state.keyword.clone(),
            target_display_name: state.target_display_name(target).map(str::to_string),
        })
    }

    /// Wrap `data` with the selection that produced it.
    #[must_use]
    pub fn into_envelope(self, data: DisplayGraph) -> ResultEnvelope {
        let properties = params::property_map(&self.resolved);
        ResultEnvelope {
            data,
            family_value: self.family_value,
            query_source: self.query_source,
            keyword: self.keyword,
            template_id: self.template_id,
            joined_parameter_values: self.joined_values,
            original_parameter_list: self.original_parameter_list,
            target_value: self.target,
            target_display_name: self.target_display_name,
            properties,
        }
    }
}

/// Meaning of an execution response.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Dispatch this envelope
    Succeeded(Box<ResultEnvelope>),
    /// Notify with the message, if the service sent a non-empty one
    Failed {
        /// Service-supplied message
        message: Option<String>,
    },
}

/// What one execution request ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// No target, nothing sent
    Skipped,
    /// Result handed to the host
    Dispatched(Box<ResultEnvelope>),
    /// Service refused or returned no graph
    Failed {
        /// Message shown to the user, if any
        message: Option<String>,
    },
    /// A newer execution started before this one answered; result dropped
    Superseded,
}

/// Interpret `response` for `plan`.
pub fn settle(
    plan: ExecutionPlan,
    response: ExecutionResponse,
    translator: &dyn GraphTranslator,
) -> Verdict {
    match response {
        ExecutionResponse {
            success: true,
            data: Some(raw),
            ..
        } => {
            let graph = translator.translate(&raw);
            Verdict::Succeeded(Box::new(plan.into_envelope(graph)))
        }
        ExecutionResponse { message, .. } => Verdict::Failed {
            message: message.filter(|m| !m.is_empty()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::ControllerConfig;
    use crate::props::ControllerProps;
    use crate::translate::{DefaultGraphTranslator, RawGraph};
    use chrono::{TimeZone, Utc};

    fn state() -> SelectionState {
        let props = ControllerProps {
            preset_template_id: Some("7".into()),
            preset_parameter_list: Some(vec![
                ParameterSpec::new("repo_name", "STRING"),
                ParameterSpec::new(params::END_TIMESTAMP, "LONG"),
            ]),
            ..Default::default()
        };
        SelectionState::initial(&props, &ControllerConfig::default())
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn empty_target_has_no_plan() {
        assert!(ExecutionPlan::prepare(&state(), "", &clock()).is_none());
    }

    #[test]
    fn plan_resolves_against_target() {
        let plan = ExecutionPlan::prepare(&state(), "acme/widget", &clock()).unwrap();
        assert_eq!(plan.template_id, "7");
        assert_eq!(plan.joined_values, "acme/widget,1704067200");
        assert_eq!(plan.original_parameter_list.len(), 2);
        assert!(plan.target_display_name.is_none());
    }

    #[test]
    fn success_with_graph_builds_envelope() {
        let plan = ExecutionPlan::prepare(&state(), "acme/widget", &clock()).unwrap();
        let verdict = settle(plan, ExecutionResponse::ok(RawGraph::default()), &DefaultGraphTranslator);
        let Verdict::Succeeded(envelope) = verdict else {
            panic!("expected success");
        };
        assert_eq!(envelope.target_value, "acme/widget");
        assert_eq!(envelope.properties["repo_name"].to_string(), "acme/widget");
        assert_eq!(envelope.family_value.as_deref(), Some("REPO_CONTRIBUTE"));
    }

    #[test]
    fn success_without_graph_is_a_failure() {
        let plan = ExecutionPlan::prepare(&state(), "acme/widget", &clock()).unwrap();
        let response = ExecutionResponse {
            success: true,
            data: None,
            message: Some("empty result".into()),
        };
        assert_eq!(
            settle(plan, response, &DefaultGraphTranslator),
            Verdict::Failed {
                message: Some("empty result".into())
            }
        );
    }

    #[test]
    fn blank_failure_message_is_dropped() {
        let plan = ExecutionPlan::prepare(&state(), "acme/widget", &clock()).unwrap();
        assert_eq!(
            settle(plan, ExecutionResponse::failed(Some(String::new())), &DefaultGraphTranslator),
            Verdict::Failed { message: None }
        );
    }
}
