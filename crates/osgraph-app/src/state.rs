//! # Selection State Reducer
//!
//! The single mutable record behind the search bar, and the only function
//! allowed to change it:
//!
//! ```text
//! SelectionEvent ──► reduce(&state, event) ──► Reduction { state, follow_up }
//! ```
//!
//! `reduce` is pure. Anything that needs I/O (re-executing after a family
//! switch) is returned as a [`FollowUp`] for the controller to carry out.
//!
//! Invariants maintained here:
//! - `template_id`/`parameter_list` track the selected family's catalog entry
//!   whenever the catalog knows that family.
//! - Switching to a family of a different search category clears the target
//!   and the candidate list.
//! - `is_searching` is only true while the newest search is outstanding.

use std::collections::HashMap;

use crate::config::{ControllerConfig, StaleResponsePolicy};
use crate::families::{self, REPO_SOURCE};
use crate::props::ControllerProps;
use crate::types::{Family, ParameterSpec, SearchResult};

const DEFAULT_TEMPLATE_ID: &str = "1";

/// Everything the controller knows about the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "debug-serialize", derive(serde::Serialize))]
pub struct SelectionState {
    /// Families published by the template catalog
    pub catalog: Vec<Family>,
    /// Full-text index searched for targets
    pub query_source: String,
    /// Template executed for the selected family
    pub template_id: String,
    /// Declared parameters of that template
    pub parameter_list: Vec<ParameterSpec>,
    /// Candidates from the latest applied search
    pub search_results: Vec<SearchResult>,
    /// Selected target id
    pub target_value: Option<String>,
    /// Selected family id
    pub family_value: Option<String>,
    /// Prompt for the target input
    pub placeholder_text: String,
    /// Keyword of the latest applied search
    pub keyword: String,
    /// A search is outstanding
    pub is_searching: bool,
    /// Generation of the newest dispatched search
    pub search_generation: u64,
    lookup: HashMap<String, String>,
}

impl SelectionState {
    /// Initial state for a freshly mounted controller.
    pub fn initial(props: &ControllerProps, config: &ControllerConfig) -> Self {
        let family = props
            .preset_family
            .clone()
            .unwrap_or_else(|| config.default_family.clone());

        Self {
            catalog: Vec::new(),
            query_source: props
                .preset_query_source
                .clone()
                .unwrap_or_else(|| REPO_SOURCE.to_string()),
            template_id: props
                .preset_template_id
                .clone()
                .unwrap_or_else(|| DEFAULT_TEMPLATE_ID.to_string()),
            parameter_list: props.preset_parameter_list.clone().unwrap_or_default(),
            search_results: Vec::new(),
            target_value: None,
            placeholder_text: families::placeholder_for(&family).to_string(),
            family_value: Some(family),
            keyword: String::new(),
            is_searching: false,
            search_generation: 0,
            lookup: HashMap::new(),
        }
    }

    /// Display name of a candidate id from the latest search, if present.
    #[must_use]
    pub fn target_display_name(&self, target: &str) -> Option<&str> {
        self.lookup.get(target).map(String::as_str)
    }

    /// id → name for the current candidates.
    #[must_use]
    pub fn lookup(&self) -> &HashMap<String, String> {
        &self.lookup
    }

    /// Catalog entry for the selected family.
    #[must_use]
    pub fn selected_family(&self) -> Option<&Family> {
        let id = self.family_value.as_deref()?;
        self.catalog.iter().find(|f| f.family_id == id)
    }

    fn set_results(&mut self, results: Vec<SearchResult>) {
        self.lookup = results
            .iter()
            .map(|r| (r.id.clone(), r.name.clone()))
            .collect();
        self.search_results = results;
    }

    fn clear_target(&mut self) {
        self.target_value = None;
        self.set_results(Vec::new());
    }

    fn adopt_catalog_template(&mut self) {
        if let Some(family) = self.selected_family() {
            let (template_id, parameter_list) =
                (family.template_id.clone(), family.parameter_list.clone());
            self.template_id = template_id;
            self.parameter_list = parameter_list;
        }
    }
}

/// Events that move the selection forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The template catalog arrived.
    CatalogLoaded {
        /// Published families
        families: Vec<Family>,
    },
    /// The user picked a family from the catalog.
    FamilySelected {
        /// Catalog entry of the picked family
        family: Family,
    },
    /// The host preselected a family.
    FamilyPreset {
        /// Family id
        family_id: String,
    },
    /// The host preselected (or cleared) a target.
    TargetPreset {
        /// Target id
        target: Option<String>,
    },
    /// The host forced a family type.
    FamilyTypeOverride {
        /// Family id
        family_id: String,
    },
    /// A full-text search was sent.
    SearchDispatched {
        /// Index searched
        query_source: String,
    },
    /// A full-text search answered.
    SearchResolved {
        /// Generation assigned at dispatch
        generation: u64,
        /// Keyword searched
        keyword: String,
        /// Ranked hits
        results: Vec<SearchResult>,
        /// Whether a superseded answer may still apply
        policy: StaleResponsePolicy,
    },
    /// A full-text search failed in transport.
    SearchFailed {
        /// Generation assigned at dispatch
        generation: u64,
    },
    /// The user picked a target.
    TargetSelected {
        /// Target id
        target: String,
    },
}

/// Work the controller must perform after a reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    /// Execute the (new) template against the still-valid target.
    Execute {
        /// Target id
        target: String,
    },
}

/// Result of reducing one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    /// Next state
    pub state: SelectionState,
    /// Side effect requested by the transition
    pub follow_up: Option<FollowUp>,
}

impl Reduction {
    fn settled(state: SelectionState) -> Self {
        Self {
            state,
            follow_up: None,
        }
    }
}

/// Apply `event` to `state`.
pub fn reduce(state: &SelectionState, event: SelectionEvent) -> Reduction {
    match event {
        SelectionEvent::CatalogLoaded { families } => reduce_catalog_loaded(state, families),
        SelectionEvent::FamilySelected { family } => reduce_family_selected(state, family),
        SelectionEvent::FamilyPreset { family_id } => reduce_family_preset(state, family_id),
        SelectionEvent::TargetPreset { target } => {
            let mut next = state.clone();
            next.target_value = target.filter(|t| !t.is_empty());
            Reduction::settled(next)
        }
        SelectionEvent::FamilyTypeOverride { family_id } => {
            reduce_family_type_override(state, family_id)
        }
        SelectionEvent::SearchDispatched { query_source } => {
            let mut next = state.clone();
            next.search_generation += 1;
            next.is_searching = true;
            next.query_source = query_source;
            Reduction::settled(next)
        }
        SelectionEvent::SearchResolved {
            generation,
            keyword,
            results,
            policy,
        } => reduce_search_resolved(state, generation, keyword, results, policy),
        SelectionEvent::SearchFailed { generation } => {
            let mut next = state.clone();
            if generation == state.search_generation {
                next.is_searching = false;
            }
            Reduction::settled(next)
        }
        SelectionEvent::TargetSelected { target } => {
            let mut next = state.clone();
            next.target_value = Some(target);
            Reduction::settled(next)
        }
    }
}

fn reduce_catalog_loaded(state: &SelectionState, families: Vec<Family>) -> Reduction {
    let mut next = state.clone();
    next.catalog = families;
    next.adopt_catalog_template();
    Reduction::settled(next)
}

fn reduce_family_selected(state: &SelectionState, family: Family) -> Reduction {
    let mut next = state.clone();

    let follow_up = match state.family_value.as_deref() {
        Some(previous)
            if !families::same_category(
                previous,
                &state.query_source,
                &family.family_id,
                &family.query_source,
            ) =>
        {
            next.clear_target();
            None
        }
        _ => state
            .target_value
            .clone()
            .filter(|t| !t.is_empty())
            .map(|target| FollowUp::Execute { target }),
    };

    next.placeholder_text = families::placeholder_for(&family.family_id).to_string();
    next.query_source = family.query_source;
    next.template_id = family.template_id;
    next.parameter_list = family.parameter_list;
    next.family_value = Some(family.family_id);

    Reduction {
        state: next,
        follow_up,
    }
}

fn reduce_family_preset(state: &SelectionState, family_id: String) -> Reduction {
    let mut next = state.clone();
    if state.family_value.as_deref() != Some(family_id.as_str()) {
        next.placeholder_text = families::placeholder_for(&family_id).to_string();
        let source = families::category_of(&family_id).map(str::to_string).or_else(|| {
            state
                .catalog
                .iter()
                .find(|f| f.family_id == family_id)
                .map(|f| f.query_source.clone())
        });
        if let Some(source) = source {
            next.query_source = source;
        }
    }
    next.family_value = Some(family_id);
    next.adopt_catalog_template();
    Reduction::settled(next)
}

fn reduce_family_type_override(state: &SelectionState, family_id: String) -> Reduction {
    let mut next = state.clone();
    if let Some(category) = families::category_of(&family_id) {
        next.query_source = category.to_string();
    }
    next.placeholder_text = families::placeholder_for(&family_id).to_string();
    next.family_value = Some(family_id);
    next.clear_target();
    next.adopt_catalog_template();
    Reduction::settled(next)
}

fn reduce_search_resolved(
    state: &SelectionState,
    generation: u64,
    keyword: String,
    results: Vec<SearchResult>,
    policy: StaleResponsePolicy,
) -> Reduction {
    let stale = generation != state.search_generation;
    if stale && policy == StaleResponsePolicy::Discard {
        return Reduction::settled(state.clone());
    }

    let mut next = state.clone();
    next.set_results(results);
    next.keyword = keyword;
    next.is_searching = false;
    Reduction::settled(next)
}
