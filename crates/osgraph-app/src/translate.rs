//! Graph translation
//!
//! The execution service answers with `{vertices, edges}` whose ids may be
//! numbers or strings. Hosts render `{nodes, edges}` with string ids. The
//! [`GraphTranslator`] trait is the seam between the two; hosts with their own
//! display model plug in a different implementation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Vertex as returned by the execution service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawVertex {
    /// Vertex id (number or string)
    pub id: Value,
    /// Vertex label (e.g. `github_repo`)
    #[serde(default)]
    pub label: Option<String>,
    /// Remaining vertex fields
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Edge as returned by the execution service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    /// Edge id, absent for some templates
    #[serde(default)]
    pub id: Option<Value>,
    /// Source vertex id
    pub source: Value,
    /// Target vertex id
    pub target: Value,
    /// Edge label
    #[serde(default)]
    pub label: Option<String>,
    /// Remaining edge fields
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Graph payload of a successful execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGraph {
    /// Vertices
    #[serde(default)]
    pub vertices: Vec<RawVertex>,
    /// Edges
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

/// Node in display form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayNode {
    /// String id
    pub id: String,
    /// Label, empty when the service sent none
    pub label: String,
    /// Passed-through vertex fields
    pub properties: Map<String, Value>,
}

/// Edge in display form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayEdge {
    /// String id, synthesized when the service sent none
    pub id: String,
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Label, empty when the service sent none
    pub label: String,
    /// Passed-through edge fields
    pub properties: Map<String, Value>,
}

/// Graph in display form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayGraph {
    /// Nodes
    pub nodes: Vec<DisplayNode>,
    /// Edges
    pub edges: Vec<DisplayEdge>,
}

/// Converts a service graph into the host's display form.
pub trait GraphTranslator: Send + Sync {
    /// Translate `raw`.
    fn translate(&self, raw: &RawGraph) -> DisplayGraph;
}

/// Straight field mapping with ids rendered as strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGraphTranslator;

impl GraphTranslator for DefaultGraphTranslator {
    fn translate(&self, raw: &RawGraph) -> DisplayGraph {
        let nodes = raw
            .vertices
            .iter()
            .map(|v| DisplayNode {
                id: id_string(&v.id),
                label: v.label.clone().unwrap_or_default(),
                properties: v.properties.clone(),
            })
            .collect();

        let edges = raw
            .edges
            .iter()
            .enumerate()
            .map(|(index, e)| {
                let source = id_string(&e.source);
                let target = id_string(&e.target);
                let id = match &e.id {
                    Some(id) if !id.is_null() => id_string(id),
                    _ => format!("{source}->{target}#{index}"),
                };
                DisplayEdge {
                    id,
                    source,
                    target,
                    label: e.label.clone().unwrap_or_default(),
                    properties: e.properties.clone(),
                }
            })
            .collect();

        DisplayGraph { nodes, edges }
    }
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
