//! # OSGraph App - Headless Query Composition
//!
//! The behavior behind OSGraph's project search bar, with no UI attached:
//! pick a query family, search for a target, resolve the family's template
//! parameters, execute the template and hand the graph to the host.
//!
//! ## Architecture
//!
//! ```text
//!  host props ─► props::triggers_between ─┐
//!  user input ─────────────────────────────┤
//!                                          ▼
//!                              QueryController ──► QueryHost
//!                               │    │     │
//!                  state::reduce    │     orchestrator + params
//!                          debounce::Debouncer
//!                                   │
//!                            QueryServiceBridge (osgraph-http)
//! ```
//!
//! ## What Belongs Here
//!
//! - Selection state and its reducer
//! - Parameter resolution and result envelopes
//! - Debouncing and stale-response handling
//!
//! ## What Does NOT Belong Here
//!
//! - HTTP transport (belongs in osgraph-http)
//! - Terminal output and argument parsing (belongs in osgraph-cli)

// ============================================================================
// Submodules
// ============================================================================

pub mod bridge;
pub mod clock;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod envelope;
pub mod errors;
pub mod families;
pub mod loading;
pub mod orchestrator;
pub mod params;
pub mod props;
pub mod state;
pub mod translate;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use bridge::{ExecutionResponse, NullHost, QueryHost, QueryServiceBridge};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ControllerConfig, StaleResponsePolicy};
pub use controller::{ControllerBuilder, ControllerSnapshot, QueryController};
pub use envelope::{EmbeddedEnvelope, ResultEnvelope};
pub use errors::{BridgeError, ControllerError, ErrorCategory, Notice, ResolveError, ToastLevel};
pub use orchestrator::{ExecutionOutcome, ExecutionPhase};
pub use props::ControllerProps;
pub use state::SelectionState;
pub use translate::{DefaultGraphTranslator, DisplayGraph, GraphTranslator, RawGraph};
pub use types::{Family, ParameterSpec, ParameterValue, ResolvedParameter, SearchResult};
