//! Import/export of external JSON-LD using the `aiia` vocabulary
//!
//! External documents describe flat entity/relationship lists rather than
//! a laid-out graph, so import generates a layout: parent classes on one
//! row, entities on the next, fixed horizontal spacing.

use serde_json::{json, Value};
use std::collections::HashMap;

use ontograph_core::{Edge, Node, OntographError, OntologyGraph, Position, Result};

/// `aiia` namespace used by the external assistant vocabulary
pub const AIIA: &str = "http://ai-assistant.local/vocab#";

const CLASS_ROW_Y: f64 = 80.0;
const ENTITY_ROW_Y: f64 = 260.0;
const COLUMN_SPACING: f64 = 220.0;
const FIRST_COLUMN_X: f64 = 120.0;

/// Convert an external `aiia:entities`/`aiia:relationships` document into
/// an editor graph.
///
/// The input must carry a `@context` of type string, object, or array;
/// anything else fails with [`OntographError::NotJsonLd`] before any
/// conversion is attempted.
pub fn from_external(document: &Value) -> Result<OntologyGraph> {
    require_context(document)?;

    let entities = document
        .get("aiia:entities")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let relationships = document
        .get("aiia:relationships")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut nodes: Vec<Node> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();

    // Parent classes in order of first appearance
    let mut class_nodes: HashMap<String, String> = HashMap::new();
    let mut class_count = 0usize;
    // Entity name -> node id
    let mut entity_nodes: HashMap<String, String> = HashMap::new();
    let mut entity_count = 0usize;
    let mut edge_count = 0usize;

    for entity in &entities {
        let Some(name) = entity_name(entity) else {
            continue;
        };
        if entity_nodes.contains_key(&name) {
            continue;
        }

        let node_id = format!("n{}", entity_count + 1);
        nodes.push(Node::new(
            node_id.clone(),
            name.clone(),
            Position::new(
                FIRST_COLUMN_X + entity_count as f64 * COLUMN_SPACING,
                ENTITY_ROW_Y,
            ),
        ));
        entity_nodes.insert(name, node_id.clone());
        entity_count += 1;

        let Some(parent) = entity
            .get("aiia:class")
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            continue;
        };
        let parent_id = class_nodes.entry(parent.clone()).or_insert_with(|| {
            let id = format!("c{}", class_count + 1);
            nodes.push(Node::new(
                id.clone(),
                parent,
                Position::new(
                    FIRST_COLUMN_X + class_count as f64 * COLUMN_SPACING,
                    CLASS_ROW_Y,
                ),
            ));
            class_count += 1;
            id
        });
        edge_count += 1;
        edges.push(Edge::new(
            format!("e{edge_count}"),
            node_id,
            parent_id.clone(),
            "subClassOf",
        ));
    }

    for rel in &relationships {
        let source = rel.get("aiia:source").and_then(Value::as_str);
        let target = rel.get("aiia:target").and_then(Value::as_str);
        let predicate = rel
            .get("aiia:predicate")
            .and_then(Value::as_str)
            .unwrap_or("relatedTo");
        let (Some(source), Some(target)) = (source, target) else {
            continue;
        };
        // References to entities the document never declared are skipped
        let (Some(source_id), Some(target_id)) =
            (entity_nodes.get(source), entity_nodes.get(target))
        else {
            continue;
        };
        edge_count += 1;
        edges.push(Edge::new(
            format!("e{edge_count}"),
            source_id.clone(),
            target_id.clone(),
            predicate,
        ));
    }

    OntologyGraph::new(nodes, edges)
}

/// Export an editor graph into the external vocabulary shape.
///
/// Nodes that are the source of a `subClassOf` edge become entities with
/// their parent attached; all other nodes are plain entities.
pub fn to_external(graph: &OntologyGraph) -> Value {
    let id_to_label: HashMap<&str, &str> = graph
        .nodes()
        .iter()
        .map(|n| (n.id.as_str(), n.label.as_str()))
        .collect();

    let mut parents: HashMap<&str, &str> = HashMap::new();
    for edge in graph.edges() {
        if edge.predicate() == "subClassOf" {
            if let Some(target_label) = id_to_label.get(edge.target.as_str()) {
                parents.insert(edge.source.as_str(), *target_label);
            }
        }
    }

    let entities: Vec<Value> = graph
        .nodes()
        .iter()
        .map(|node| match parents.get(node.id.as_str()) {
            Some(parent) => json!({"aiia:name": node.label, "aiia:class": parent}),
            None => json!({"aiia:name": node.label}),
        })
        .collect();

    let relationships: Vec<Value> = graph
        .edges()
        .iter()
        .filter(|e| e.predicate() != "subClassOf")
        .filter_map(|e| {
            let source = id_to_label.get(e.source.as_str())?;
            let target = id_to_label.get(e.target.as_str())?;
            Some(json!({
                "aiia:source": source,
                "aiia:predicate": e.predicate(),
                "aiia:target": target,
            }))
        })
        .collect();

    json!({
        "@context": {"aiia": AIIA},
        "aiia:entities": entities,
        "aiia:relationships": relationships,
    })
}

/// Entities may be bare name strings or `{"aiia:name": …}` objects
fn entity_name(entity: &Value) -> Option<String> {
    match entity {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("aiia:name")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn require_context(document: &Value) -> Result<()> {
    match document.get("@context") {
        Some(Value::String(_)) | Some(Value::Object(_)) | Some(Value::Array(_)) => Ok(()),
        Some(other) => Err(OntographError::NotJsonLd(format!(
            "@context has unsupported type: {other}"
        ))),
        None => Err(OntographError::NotJsonLd(
            "missing @context key".to_string(),
        )),
    }
}
