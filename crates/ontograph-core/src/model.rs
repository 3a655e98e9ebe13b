//! Visual graph model and knowledge-graph maps
//!
//! `OntologyGraph` is the shared vocabulary between the HTTP layer and the
//! codecs. It validates on construction and cannot be built any other way:
//! deserialization goes through the same gate via `try_from`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{OntographError, Result};

/// Maximum number of nodes in a single graph
pub const MAX_NODES: usize = 1000;

/// Maximum number of edges in a single graph
pub const MAX_EDGES: usize = 5000;

/// Maximum length of node and edge ids
pub const MAX_ID_LEN: usize = 100;

/// Maximum length of a node type tag
pub const MAX_TYPE_LEN: usize = 50;

/// Maximum length of node and edge labels
pub const MAX_LABEL_LEN: usize = 200;

/// Coordinates must fall within [-COORD_LIMIT, COORD_LIMIT]
pub const COORD_LIMIT: f64 = 1e6;

/// Edge label used when the client omits one
pub const DEFAULT_EDGE_LABEL: &str = "relatedTo";

/// Canvas position of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A class node on the canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique within a graph
    pub id: String,

    /// Render type tag, pass-through for the frontend
    #[serde(default = "default_node_type")]
    pub r#type: String,

    pub position: Position,

    /// Human-readable class name; the semantic key on the RDF side
    pub label: String,

    /// Opaque styling, pass-through only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,
}

fn default_node_type() -> String {
    "default".to_string()
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            r#type: default_node_type(),
            position,
            label: label.into(),
            style: None,
        }
    }
}

/// A relation edge between two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,

    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Predicate name; `relatedTo` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: Some(label.into()),
            animated: None,
            style: None,
        }
    }

    /// Predicate name with the default applied
    pub fn predicate(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_EDGE_LABEL)
    }
}

/// A validated node/edge graph.
///
/// Edge endpoints should reference node ids, but dangling references are
/// tolerated here and dropped by the codec, since graphs are user-edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct OntologyGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

/// Unvalidated wire shape; only exists to funnel deserialization
/// through the validation gate.
#[derive(Debug, Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl TryFrom<RawGraph> for OntologyGraph {
    type Error = OntographError;

    fn try_from(raw: RawGraph) -> Result<Self> {
        OntologyGraph::new(raw.nodes, raw.edges)
    }
}

impl OntologyGraph {
    /// Validate and construct. Length bounds count characters, not
    /// bytes. Reports the first violation found; never truncates or
    /// clamps.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        if nodes.len() > MAX_NODES {
            return Err(OntographError::Validation(format!(
                "graph has {} nodes, maximum is {MAX_NODES}",
                nodes.len()
            )));
        }
        if edges.len() > MAX_EDGES {
            return Err(OntographError::Validation(format!(
                "graph has {} edges, maximum is {MAX_EDGES}",
                edges.len()
            )));
        }

        for node in &nodes {
            if node.id.chars().count() > MAX_ID_LEN {
                return Err(OntographError::Validation(format!(
                    "node id '{}…' exceeds {MAX_ID_LEN} characters",
                    truncate_for_message(&node.id)
                )));
            }
            if node.r#type.chars().count() > MAX_TYPE_LEN {
                return Err(OntographError::Validation(format!(
                    "node '{}' type tag exceeds {MAX_TYPE_LEN} characters",
                    node.id
                )));
            }
            if node.label.chars().count() > MAX_LABEL_LEN {
                return Err(OntographError::Validation(format!(
                    "node '{}' label exceeds {MAX_LABEL_LEN} characters",
                    node.id
                )));
            }
            for (axis, value) in [("x", node.position.x), ("y", node.position.y)] {
                if !value.is_finite() || value.abs() > COORD_LIMIT {
                    return Err(OntographError::Validation(format!(
                        "node '{}' position.{axis} = {value} is out of range",
                        node.id
                    )));
                }
            }
        }

        for edge in &edges {
            if edge.id.chars().count() > MAX_ID_LEN {
                return Err(OntographError::Validation(format!(
                    "edge id '{}…' exceeds {MAX_ID_LEN} characters",
                    truncate_for_message(&edge.id)
                )));
            }
            if let Some(label) = &edge.label {
                if label.chars().count() > MAX_LABEL_LEN {
                    return Err(OntographError::Validation(format!(
                        "edge '{}' label exceeds {MAX_LABEL_LEN} characters",
                        edge.id
                    )));
                }
            }
        }

        Ok(Self { nodes, edges })
    }

    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}

fn truncate_for_message(s: &str) -> String {
    s.chars().take(32).collect()
}

/// A colon-delimited relationship key: `SourceClass:predicate:TargetClass`.
///
/// Component names must not themselves contain `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationKey {
    pub source_class: String,
    pub predicate: String,
    pub target_class: String,
}

impl RelationKey {
    pub fn new(
        source_class: impl Into<String>,
        predicate: impl Into<String>,
        target_class: impl Into<String>,
    ) -> Self {
        Self {
            source_class: source_class.into(),
            predicate: predicate.into(),
            target_class: target_class.into(),
        }
    }

    pub fn parse(key: &str) -> Result<Self> {
        let parts: Vec<&str> = key.split(':').collect();
        match parts.as_slice() {
            [source, predicate, target]
                if !source.is_empty() && !predicate.is_empty() && !target.is_empty() =>
            {
                Ok(Self::new(*source, *predicate, *target))
            }
            _ => Err(OntographError::Validation(format!(
                "relationship key '{key}' is not of the form Source:predicate:Target"
            ))),
        }
    }
}

impl std::fmt::Display for RelationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.source_class, self.predicate, self.target_class
        )
    }
}

/// Instance/relationship maps for a knowledge graph.
///
/// Instance and target lists keep insertion order with duplicates suppressed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub instances: BTreeMap<String, Vec<String>>,

    /// Keyed by `SourceClass:predicate:TargetClass`
    #[serde(default)]
    pub relationships: BTreeMap<String, Vec<String>>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an instance of a class, suppressing duplicates.
    pub fn add_instance(&mut self, class: impl Into<String>, name: impl Into<String>) {
        let entry = self.instances.entry(class.into()).or_default();
        let name = name.into();
        if !entry.contains(&name) {
            entry.push(name);
        }
    }

    /// Record a relationship target, suppressing duplicates.
    pub fn add_relationship(&mut self, key: &RelationKey, target_name: impl Into<String>) {
        let entry = self.relationships.entry(key.to_string()).or_default();
        let target = target_name.into();
        if !entry.contains(&target) {
            entry.push(target);
        }
    }

    /// Names of instances of `class`, empty when the class is unknown.
    pub fn instances_of(&self, class: &str) -> &[String] {
        self.instances.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty() && self.relationships.is_empty()
    }
}
