//! # Query Controller
//!
//! Owns the selection state and drives every collaborator call. Hosts build
//! one controller per mounted search bar:
//!
//! ```rust,ignore
//! let controller = ControllerBuilder::new(services)
//!     .with_host(host)
//!     .with_props(props)
//!     .build();
//! controller.mount().await?;
//! controller.type_keyword("octo");
//! controller.select_target("42").await?;
//! ```
//!
//! All state changes go through [`reduce`]. Locks are never held across an
//! `.await`, so the controller is `Send + Sync` and cheap to clone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::task::JoinHandle;

use crate::bridge::{NullHost, QueryHost, QueryServiceBridge};
use crate::clock::{Clock, SystemClock};
use crate::config::{ControllerConfig, StaleResponsePolicy};
use crate::debounce::Debouncer;
use crate::envelope::EmbeddedEnvelope;
use crate::errors::{ControllerError, ErrorCategory, Notice};
use crate::loading::LoadingTracker;
use crate::orchestrator::{settle, ExecutionOutcome, ExecutionPhase, ExecutionPlan, Verdict};
use crate::props::{triggers_between, ControllerProps, PropsTrigger};
use crate::state::{reduce, FollowUp, Reduction, SelectionEvent, SelectionState};
use crate::translate::{DefaultGraphTranslator, GraphTranslator};

/// Point-in-time view of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSnapshot {
    /// Selection state
    pub selection: SelectionState,
    /// Phase of the latest execution
    pub phase: ExecutionPhase,
    /// Executions awaiting the service
    pub executions_in_flight: usize,
}

/// Builder for [`QueryController`].
pub struct ControllerBuilder {
    services: Arc<dyn QueryServiceBridge>,
    host: Arc<dyn QueryHost>,
    translator: Arc<dyn GraphTranslator>,
    clock: Arc<dyn Clock>,
    config: ControllerConfig,
    props: ControllerProps,
}

impl ControllerBuilder {
    /// Start a builder around the remote services.
    pub fn new(services: Arc<dyn QueryServiceBridge>) -> Self {
        Self {
            services,
            host: Arc::new(NullHost),
            translator: Arc::new(DefaultGraphTranslator),
            clock: Arc::new(SystemClock),
            config: ControllerConfig::default(),
            props: ControllerProps::default(),
        }
    }

    /// Set the host receiving callbacks
    pub fn with_host(mut self, host: Arc<dyn QueryHost>) -> Self {
        self.host = host;
        self
    }

    /// Set the graph translator
    pub fn with_translator(mut self, translator: Arc<dyn GraphTranslator>) -> Self {
        self.translator = translator;
        self
    }

    /// Set the clock used for timestamp parameters
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the configuration
    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the props supplied at mount
    pub fn with_props(mut self, props: ControllerProps) -> Self {
        self.props = props;
        self
    }

    /// Build the controller. Call [`QueryController::mount`] next.
    pub fn build(self) -> QueryController {
        let window = self
            .props
            .debounce_window()
            .unwrap_or_else(|| Duration::from_millis(self.config.debounce_ms));
        let state = SelectionState::initial(&self.props, &self.config);

        QueryController {
            inner: Arc::new(Inner {
                loading: LoadingTracker::new(Arc::clone(&self.host)),
                services: self.services,
                host: self.host,
                translator: self.translator,
                clock: self.clock,
                config: self.config,
                state: RwLock::new(state),
                pending_props: RwLock::new(Some(self.props)),
                props: RwLock::new(None),
                debouncer: RwLock::new(Debouncer::new(window)),
                execution_generation: AtomicU64::new(0),
                phase: RwLock::new(ExecutionPhase::Idle),
            }),
        }
    }
}

/// Headless search-bar controller.
#[derive(Clone)]
pub struct QueryController {
    inner: Arc<Inner>,
}

struct Inner {
    services: Arc<dyn QueryServiceBridge>,
    host: Arc<dyn QueryHost>,
    translator: Arc<dyn GraphTranslator>,
    clock: Arc<dyn Clock>,
    config: ControllerConfig,
    state: RwLock<SelectionState>,
    /// Props supplied at build time, consumed by `mount`
    pending_props: RwLock<Option<ControllerProps>>,
    /// Props last reconciled
    props: RwLock<Option<ControllerProps>>,
    debouncer: RwLock<Debouncer>,
    loading: LoadingTracker,
    execution_generation: AtomicU64,
    phase: RwLock<ExecutionPhase>,
}

impl QueryController {
    /// Builder around `services`.
    pub fn builder(services: Arc<dyn QueryServiceBridge>) -> ControllerBuilder {
        ControllerBuilder::new(services)
    }

    /// Reconcile the initial props and load the template catalog.
    ///
    /// The catalog is fetched even when restoring a preset search fails.
    ///
    /// # Errors
    ///
    /// Propagates a failed catalog fetch, then a failed preset search.
    pub async fn mount(&self) -> Result<(), ControllerError> {
        let props = self.inner.pending_props.write().take().unwrap_or_default();
        tracing::debug!(embedded = props.embedded_mode, "mounting query controller");
        let restored = self.set_props(props).await;
        self.load_catalog().await?;
        restored
    }

    /// Apply new host props, running only the triggers whose inputs changed.
    ///
    /// Local triggers are applied before any search is sent, so every
    /// trigger of one props change takes effect even if the search fails.
    ///
    /// # Errors
    ///
    /// Propagates a failed preset search.
    pub async fn set_props(&self, props: ControllerProps) -> Result<(), ControllerError> {
        let triggers = {
            let mut current = self.inner.props.write();
            let triggers = triggers_between(current.as_ref(), &props);
            *current = Some(props);
            triggers
        };

        let (remote, local): (Vec<_>, Vec<_>) =
            triggers.into_iter().partition(PropsTrigger::is_remote);
        for trigger in local {
            self.inner.apply_local(trigger);
        }

        let mut first_error = None;
        for trigger in remote {
            if let Err(error) = self.inner.apply_remote(trigger).await {
                tracing::warn!(
                    %error,
                    category = %error.category(),
                    transient = error.category().is_transient(),
                    "restoring search context failed"
                );
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Fetch the template catalog and adopt the selected family's template.
    ///
    /// Returns the number of families loaded.
    ///
    /// # Errors
    ///
    /// Propagates the catalog fetch failure; state is left untouched.
    pub async fn load_catalog(&self) -> Result<usize, ControllerError> {
        let families = self.inner.services.list_query_templates().await?;
        let count = families.len();
        self.inner.apply(SelectionEvent::CatalogLoaded { families });
        tracing::info!(families = count, "template catalog loaded");
        Ok(count)
    }

    /// The user picked a family.
    ///
    /// Switching within a search category re-executes against the current
    /// target; switching across categories clears it.
    ///
    /// # Errors
    ///
    /// [`ControllerError::UnknownFamily`] if the catalog has no such family,
    /// or a transport failure of the re-execution.
    pub async fn select_family(&self, family_id: &str) -> Result<ExecutionOutcome, ControllerError> {
        let family = self
            .inner
            .state
            .read()
            .catalog
            .iter()
            .find(|f| f.family_id == family_id)
            .cloned()
            .ok_or_else(|| ControllerError::UnknownFamily {
                family_id: family_id.to_string(),
            })?;

        tracing::debug!(family = family_id, template = %family.template_id, "family selected");
        let reduction = self.inner.apply(SelectionEvent::FamilySelected { family });
        match reduction.follow_up {
            Some(FollowUp::Execute { target }) => self.inner.execute(&target).await,
            None => Ok(ExecutionOutcome::Skipped),
        }
    }

    /// A keystroke in the target input.
    ///
    /// The search runs once the debounce window passes without another
    /// keystroke, against the query source current at typing time. Must be
    /// called from within a tokio runtime.
    pub fn type_keyword(&self, keyword: &str) -> JoinHandle<()> {
        let query_source = self.inner.state.read().query_source.clone();
        let keyword = keyword.to_string();
        let inner = Arc::clone(&self.inner);

        self.inner.debouncer.read().schedule(async move {
            if let Err(error) = inner.run_search(query_source, keyword).await {
                tracing::warn!(%error, category = %error.category(), "debounced search failed");
            }
        })
    }

    /// Search immediately, bypassing the debouncer.
    ///
    /// # Errors
    ///
    /// Propagates a transport failure of the search service.
    pub async fn search_now(&self, keyword: &str) -> Result<(), ControllerError> {
        let query_source = self.inner.state.read().query_source.clone();
        self.inner.run_search(query_source, keyword.to_string()).await
    }

    /// The user picked a target; execute the selected family's template.
    ///
    /// An empty target is ignored.
    ///
    /// # Errors
    ///
    /// Propagates a transport failure of the execution service. Refusals by
    /// the service are reported through the host and returned as
    /// [`ExecutionOutcome::Failed`].
    pub async fn select_target(&self, target: &str) -> Result<ExecutionOutcome, ControllerError> {
        if target.is_empty() {
            return Ok(ExecutionOutcome::Skipped);
        }
        self.inner.apply(SelectionEvent::TargetSelected {
            target: target.to_string(),
        });
        self.inner.execute(target).await
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            selection: self.inner.state.read().clone(),
            phase: *self.inner.phase.read(),
            executions_in_flight: self.inner.loading.in_flight(),
        }
    }

    /// Drop any search still waiting out its debounce window.
    ///
    /// Requests already sent are left to finish.
    pub fn unmount(&self) {
        self.inner.debouncer.read().cancel_pending();
        tracing::debug!("query controller unmounted");
    }
}

impl std::fmt::Debug for QueryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryController")
            .field("config", &self.inner.config)
            .field("phase", &*self.inner.phase.read())
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn apply(&self, event: SelectionEvent) -> Reduction {
        let mut state = self.state.write();
        let reduction = reduce(&state, event);
        *state = reduction.state.clone();
        reduction
    }

    fn policy(&self) -> StaleResponsePolicy {
        self.config.stale_response_policy
    }

    fn apply_local(&self, trigger: PropsTrigger) {
        match trigger {
            PropsTrigger::Family(family) => {
                let family_id = family
                    .filter(|f| !f.is_empty())
                    .unwrap_or_else(|| self.config.default_family.clone());
                self.apply(SelectionEvent::FamilyPreset { family_id });
            }
            PropsTrigger::Target(target) => {
                self.apply(SelectionEvent::TargetPreset { target });
            }
            PropsTrigger::FamilyTypeOverride(family_id) => {
                self.apply(SelectionEvent::FamilyTypeOverride { family_id });
            }
            PropsTrigger::DebounceWindow(window) => {
                let window = window.unwrap_or_else(|| Duration::from_millis(self.config.debounce_ms));
                tracing::debug!(?window, "debounce window changed");
                let mut debouncer = self.debouncer.write();
                debouncer.cancel_pending();
                *debouncer = Debouncer::new(window);
            }
            // sent by `apply_remote`
            PropsTrigger::RestoreSearch { .. } => {}
        }
    }

    async fn apply_remote(&self, trigger: PropsTrigger) -> Result<(), ControllerError> {
        if let PropsTrigger::RestoreSearch {
            query_source,
            keyword,
        } = trigger
        {
            tracing::debug!(%query_source, %keyword, "restoring search context");
            self.run_search(query_source, keyword).await?;
        }
        Ok(())
    }

    async fn run_search(&self, query_source: String, keyword: String) -> Result<(), ControllerError> {
        let generation = self
            .apply(SelectionEvent::SearchDispatched {
                query_source: query_source.clone(),
            })
            .state
            .search_generation;

        match self.services.full_text_search(&query_source, &keyword).await {
            Ok(results) => {
                tracing::debug!(generation, %keyword, hits = results.len(), "search answered");
                let latest = self
                    .apply(SelectionEvent::SearchResolved {
                        generation,
                        keyword,
                        results,
                        policy: self.policy(),
                    })
                    .state
                    .search_generation;
                if latest != generation {
                    tracing::trace!(generation, latest, policy = ?self.policy(), "stale search response");
                }
                Ok(())
            }
            Err(error) => {
                self.apply(SelectionEvent::SearchFailed { generation });
                Err(error.into())
            }
        }
    }

    fn set_phase(&self, generation: u64, phase: ExecutionPhase) {
        if self.execution_generation.load(Ordering::SeqCst) == generation {
            *self.phase.write() = phase;
        }
    }

    async fn execute(&self, target: &str) -> Result<ExecutionOutcome, ControllerError> {
        let generation = self.execution_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_phase(generation, ExecutionPhase::Resolving);

        let plan = {
            let state = self.state.read();
            ExecutionPlan::prepare(&state, target, self.clock.as_ref())
        };
        let Some(plan) = plan else {
            self.set_phase(generation, ExecutionPhase::Idle);
            return Ok(ExecutionOutcome::Skipped);
        };

        tracing::info!(
            generation,
            template = %plan.template_id,
            params = %plan.joined_values,
            "executing query template"
        );
        self.set_phase(generation, ExecutionPhase::Executing);

        let response = {
            let _loading = self.loading.begin();
            self.services
                .execute_query_template(&plan.template_id, &plan.resolved)
                .await
        };
        let response = match response {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(
                    generation,
                    %error,
                    code = error.code(),
                    transient = error.category().is_transient(),
                    "execution transport failed"
                );
                self.set_phase(generation, ExecutionPhase::Failed);
                return Err(error.into());
            }
        };

        let latest = self.execution_generation.load(Ordering::SeqCst);
        if latest != generation && self.policy() == StaleResponsePolicy::Discard {
            tracing::debug!(generation, latest, "dropping superseded execution response");
            return Ok(ExecutionOutcome::Superseded);
        }

        match settle(plan, response, self.translator.as_ref()) {
            Verdict::Succeeded(envelope) => {
                self.set_phase(generation, ExecutionPhase::Succeeded);
                self.dispatch(&envelope);
                Ok(ExecutionOutcome::Dispatched(envelope))
            }
            Verdict::Failed { message } => {
                tracing::warn!(generation, message = ?message, "query template execution failed");
                self.set_phase(generation, ExecutionPhase::Failed);
                if let Some(text) = &message {
                    self.host.notify(Notice::for_category(ErrorCategory::Operation, text.clone()));
                }
                Ok(ExecutionOutcome::Failed { message })
            }
        }
    }

    fn dispatch(&self, envelope: &crate::envelope::ResultEnvelope) {
        let embedded = self
            .props
            .read()
            .as_ref()
            .map_or(false, |p| p.embedded_mode);

        if embedded {
            self.host.on_search(EmbeddedEnvelope::from(envelope.clone()));
        } else {
            self.host.navigate(&self.config.results_route, envelope.clone());
        }
    }
}
