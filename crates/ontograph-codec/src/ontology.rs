//! Ontology codec: editor graph ⇄ OWL-flavored JSON-LD
//!
//! Encoding keys classes by label-derived URI and merges `subClassOf`
//! edges into the source class entry. ObjectProperty entries are
//! type-level in RDF, so only the first edge per predicate URI survives
//! encoding; the rest are returned in `dropped` so callers can surface
//! the loss instead of hiding it.

use serde_json::{json, Value};
use std::collections::HashMap;

use ontograph_core::{Edge, Node, OntologyGraph, Position, Result};

use crate::{classify_entry, deurlify, standard_context, urlify, EntryKind};

/// Result of encoding a graph, with the dedup loss made explicit
#[derive(Debug)]
pub struct EncodedOntology {
    pub document: Value,
    /// Edges represented in the document
    pub kept: Vec<Edge>,
    /// Edges dropped by the one-entry-per-predicate rule
    pub dropped: Vec<Edge>,
}

/// Result of decoding a document, with unrecognized entries retained
#[derive(Debug)]
pub struct DecodedOntology {
    pub graph: OntologyGraph,
    /// Entries that matched no recognized shape, kept for diagnostics
    pub skipped: Vec<Value>,
}

/// Encode an editor graph as a JSON-LD ontology document.
///
/// Edges whose endpoints reference no node are silently skipped; graphs
/// are user-edited and dangling references are expected.
pub fn encode_ontology(graph: &OntologyGraph, ontology_name: &str) -> EncodedOntology {
    let id_to_label: HashMap<&str, &str> = graph
        .nodes()
        .iter()
        .map(|n| (n.id.as_str(), n.label.as_str()))
        .collect();

    let mut entries: Vec<Value> = Vec::new();

    for node in graph.nodes() {
        entries.push(json!({
            "@id": urlify(&node.label),
            "@type": "owl:Class",
            "rdfs:label": node.label,
            "_nodeId": node.id,
            "_position": format_position(node.position),
        }));
    }

    let mut kept: Vec<Edge> = Vec::new();
    let mut dropped: Vec<Edge> = Vec::new();

    for edge in graph.edges() {
        let (Some(source_label), Some(target_label)) = (
            id_to_label.get(edge.source.as_str()),
            id_to_label.get(edge.target.as_str()),
        ) else {
            tracing::debug!(edge = %edge.id, "skipping edge with dangling endpoint");
            continue;
        };

        if edge.predicate() == "subClassOf" {
            let source_uri = urlify(source_label);
            if let Some(entry) = entries
                .iter_mut()
                .filter_map(Value::as_object_mut)
                .find(|e| e.get("@id").and_then(Value::as_str) == Some(source_uri.as_str()))
            {
                entry.insert(
                    "rdfs:subClassOf".to_string(),
                    json!({"@id": urlify(target_label)}),
                );
                kept.push(edge.clone());
            }
        } else {
            let predicate_uri = urlify(edge.predicate());
            let exists = entries.iter().filter_map(Value::as_object).any(|e| {
                e.get("@id").and_then(Value::as_str) == Some(predicate_uri.as_str())
                    && e.get("@type").and_then(Value::as_str) == Some("owl:ObjectProperty")
            });
            if exists {
                // First edge per predicate wins; RDF property declarations
                // are type-level, not edge-level.
                dropped.push(edge.clone());
                continue;
            }
            entries.push(json!({
                "@id": predicate_uri,
                "@type": "owl:ObjectProperty",
                "rdfs:domain": {"@id": urlify(source_label)},
                "rdfs:range": {"@id": urlify(target_label)},
                "_edgeId": edge.id,
            }));
            kept.push(edge.clone());
        }
    }

    if !dropped.is_empty() {
        tracing::warn!(
            count = dropped.len(),
            "edges dropped by per-predicate deduplication"
        );
    }

    let document = json!({
        "@context": standard_context(),
        "@id": urlify(ontology_name),
        "@type": "owl:Ontology",
        "rdfs:label": ontology_name,
        "@graph": entries,
    });

    EncodedOntology {
        document,
        kept,
        dropped,
    }
}

/// Decode a JSON-LD ontology document back into an editor graph.
///
/// Unrecognized entries are collected, not rejected. ObjectProperty
/// entries whose domain or range resolves to no class are dropped.
pub fn decode_ontology(document: &Value) -> Result<DecodedOntology> {
    let entries = graph_entries(document);

    let mut nodes: Vec<Node> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    let mut skipped: Vec<Value> = Vec::new();

    // Class URI -> node id, built in the first pass
    let mut uri_to_node: HashMap<String, String> = HashMap::new();
    // Deferred subClassOf links: (source node id, target class URI)
    let mut subclass_links: Vec<(String, String)> = Vec::new();

    let mut ids = IdGenerator::new();
    for entry in &entries {
        match classify_entry(entry) {
            EntryKind::Class => ids.reserve(entry.get("_nodeId").and_then(Value::as_str)),
            EntryKind::ObjectProperty => {
                ids.reserve(entry.get("_edgeId").and_then(Value::as_str))
            }
            _ => {}
        }
    }

    for entry in &entries {
        match classify_entry(entry) {
            EntryKind::Class => {
                let Some(uri) = entry.get("@id").and_then(Value::as_str) else {
                    skipped.push(entry.clone());
                    continue;
                };
                let order = nodes.len();
                let node_id = match entry.get("_nodeId").and_then(Value::as_str) {
                    Some(id) => id.to_string(),
                    None => ids.next_node_id(),
                };
                let label = entry
                    .get("rdfs:label")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| deurlify(uri));
                let position = entry
                    .get("_position")
                    .and_then(parse_position)
                    .unwrap_or_else(|| fallback_position(order));

                if let Some(target) = subclass_target(entry) {
                    subclass_links.push((node_id.clone(), target));
                }

                uri_to_node.insert(uri.to_string(), node_id.clone());
                nodes.push(Node::new(node_id, label, position));
            }
            EntryKind::ObjectProperty | EntryKind::OntologyHeader => {}
            EntryKind::Individual | EntryKind::Unknown => skipped.push(entry.clone()),
        }
    }

    for (source_id, target_uri) in subclass_links {
        let Some(target_id) = uri_to_node.get(&target_uri) else {
            continue;
        };
        edges.push(Edge::new(
            ids.next_edge_id(),
            source_id,
            target_id.clone(),
            "subClassOf",
        ));
    }

    for entry in &entries {
        if classify_entry(entry) != EntryKind::ObjectProperty {
            continue;
        }
        let Some(uri) = entry.get("@id").and_then(Value::as_str) else {
            skipped.push(entry.clone());
            continue;
        };
        let domain = reference_target(entry.get("rdfs:domain"));
        let range = reference_target(entry.get("rdfs:range"));
        let (Some(domain), Some(range)) = (domain, range) else {
            skipped.push(entry.clone());
            continue;
        };
        // Entries whose domain or range cannot be resolved are dropped.
        let (Some(source_id), Some(target_id)) =
            (uri_to_node.get(&domain), uri_to_node.get(&range))
        else {
            continue;
        };
        let edge_id = match entry.get("_edgeId").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => ids.next_edge_id(),
        };
        edges.push(Edge::new(
            edge_id,
            source_id.clone(),
            target_id.clone(),
            deurlify(uri),
        ));
    }

    let graph = OntologyGraph::new(nodes, edges)?;
    Ok(DecodedOntology { graph, skipped })
}

/// `@graph` entries, or the document itself when it is a lone entry
fn graph_entries(document: &Value) -> Vec<Value> {
    match document.get("@graph").and_then(Value::as_array) {
        Some(entries) => entries.clone(),
        None if document.get("@id").is_some() => vec![document.clone()],
        None => Vec::new(),
    }
}

fn subclass_target(entry: &Value) -> Option<String> {
    reference_target(entry.get("rdfs:subClassOf"))
}

/// Accepts `{"@id": "X"}` or a bare `"X"`
fn reference_target(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Object(obj) => obj.get("@id")?.as_str().map(str::to_string),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn format_position(position: Position) -> String {
    format!("{},{}", position.x, position.y)
}

/// Accepts the stored `"x,y"` literal or a raw `{x, y}` object
fn parse_position(value: &Value) -> Option<Position> {
    match value {
        Value::String(s) => {
            let (x, y) = s.split_once(',')?;
            Some(Position::new(
                x.trim().parse().ok()?,
                y.trim().parse().ok()?,
            ))
        }
        Value::Object(obj) => Some(Position::new(
            obj.get("x")?.as_f64()?,
            obj.get("y")?.as_f64()?,
        )),
        _ => None,
    }
}

/// Deterministic grid layout for classes that carry no position hint
fn fallback_position(order: usize) -> Position {
    Position::new(
        100.0 + (order % 5) as f64 * 200.0,
        100.0 + (order / 5) as f64 * 150.0,
    )
}

/// Sequential id generation that avoids ids already present in the document
struct IdGenerator {
    taken: std::collections::HashSet<String>,
    next_node: usize,
    next_edge: usize,
}

impl IdGenerator {
    fn new() -> Self {
        Self {
            taken: std::collections::HashSet::new(),
            next_node: 1,
            next_edge: 1,
        }
    }

    fn reserve(&mut self, id: Option<&str>) {
        if let Some(id) = id {
            self.taken.insert(id.to_string());
        }
    }

    fn next_node_id(&mut self) -> String {
        loop {
            let candidate = format!("n{}", self.next_node);
            self.next_node += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn next_edge_id(&mut self) -> String {
        loop {
            let candidate = format!("e{}", self.next_edge);
            self.next_edge += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontograph_core::sample::sandwich_graph;

    fn graph(nodes: Vec<Node>, edges: Vec<Edge>) -> OntologyGraph {
        OntologyGraph::new(nodes, edges).unwrap()
    }

    fn node(id: &str, label: &str) -> Node {
        Node::new(id, label, Position::new(10.0, 20.0))
    }

    #[test]
    fn subclass_edge_round_trips() {
        let g = graph(
            vec![node("a", "A"), node("b", "B")],
            vec![Edge::new("e1", "a", "b", "subClassOf")],
        );
        let encoded = encode_ontology(&g, "Test");
        assert!(encoded.dropped.is_empty());

        let class_a = encoded.document["@graph"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["@id"] == "A")
            .unwrap();
        assert_eq!(class_a["rdfs:subClassOf"]["@id"], "B");

        let decoded = decode_ontology(&encoded.document).unwrap();
        assert_eq!(decoded.graph.nodes().len(), 2);
        assert_eq!(decoded.graph.edges().len(), 1);
        let edge = &decoded.graph.edges()[0];
        assert_eq!(edge.predicate(), "subClassOf");

        let by_id = |id: &str| {
            decoded
                .graph
                .nodes()
                .iter()
                .find(|n| n.id == id)
                .unwrap()
                .label
                .clone()
        };
        assert_eq!(by_id(&edge.source), "A");
        assert_eq!(by_id(&edge.target), "B");
    }

    #[test]
    fn duplicate_predicate_loses_second_edge() {
        // Two `knows` edges between different node pairs collapse into one
        // ObjectProperty entry; the second edge is lost by design.
        let g = graph(
            vec![node("a", "A"), node("b", "B"), node("c", "C"), node("d", "D")],
            vec![
                Edge::new("e1", "a", "b", "knows"),
                Edge::new("e2", "c", "d", "knows"),
            ],
        );
        let encoded = encode_ontology(&g, "Test");

        let knows_entries: Vec<&Value> = encoded.document["@graph"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|e| e["@type"] == "owl:ObjectProperty" && e["@id"] == "knows")
            .collect();
        assert_eq!(knows_entries.len(), 1);
        assert_eq!(knows_entries[0]["rdfs:domain"]["@id"], "A");
        assert_eq!(knows_entries[0]["rdfs:range"]["@id"], "B");

        assert_eq!(encoded.kept.len(), 1);
        assert_eq!(encoded.dropped.len(), 1);
        assert_eq!(encoded.dropped[0].id, "e2");

        let decoded = decode_ontology(&encoded.document).unwrap();
        assert_eq!(decoded.graph.edges().len(), 1);
        assert_eq!(decoded.graph.edges()[0].predicate(), "knows");
    }

    #[test]
    fn dangling_edge_is_skipped_on_encode() {
        let g = graph(
            vec![node("a", "A")],
            vec![Edge::new("e1", "a", "ghost", "knows")],
        );
        let encoded = encode_ontology(&g, "Test");
        let props = encoded.document["@graph"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|e| e["@type"] == "owl:ObjectProperty")
            .count();
        assert_eq!(props, 0);
        assert!(encoded.kept.is_empty());
        assert!(encoded.dropped.is_empty());
    }

    #[test]
    fn unresolved_domain_is_dropped_on_decode() {
        let doc = json!({
            "@context": standard_context(),
            "@graph": [
                {"@id": "A", "@type": "owl:Class", "rdfs:label": "A"},
                {
                    "@id": "knows",
                    "@type": "owl:ObjectProperty",
                    "rdfs:domain": {"@id": "Nowhere"},
                    "rdfs:range": {"@id": "A"}
                }
            ]
        });
        let decoded = decode_ontology(&doc).unwrap();
        assert_eq!(decoded.graph.nodes().len(), 1);
        assert!(decoded.graph.edges().is_empty());
    }

    #[test]
    fn unknown_entries_are_kept_in_side_list() {
        let doc = json!({
            "@context": standard_context(),
            "@graph": [
                {"@id": "A", "@type": "owl:Class", "rdfs:label": "A"},
                {"@id": "weird", "@type": "ex:Widget", "foo": 1},
                {"not": "even close"}
            ]
        });
        let decoded = decode_ontology(&doc).unwrap();
        assert_eq!(decoded.graph.nodes().len(), 1);
        assert_eq!(decoded.skipped.len(), 2);
    }

    #[test]
    fn missing_hints_get_generated_ids_and_layout() {
        let doc = json!({
            "@context": standard_context(),
            "@graph": [
                {"@id": "First_Class", "@type": "owl:Class"},
                {"@id": "Second", "@type": "owl:Class", "rdfs:label": "Second"}
            ]
        });
        let decoded = decode_ontology(&doc).unwrap();
        let nodes = decoded.graph.nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id, "n1");
        assert_eq!(nodes[0].label, "First Class");
        assert_eq!(nodes[0].position, fallback_position(0));
        assert_eq!(nodes[1].position, fallback_position(1));
    }

    #[test]
    fn position_hint_round_trips() {
        let g = graph(vec![node("a", "A")], vec![]);
        let encoded = encode_ontology(&g, "Test");
        let decoded = decode_ontology(&encoded.document).unwrap();
        let n = &decoded.graph.nodes()[0];
        assert_eq!(n.id, "a");
        assert_eq!(n.position, Position::new(10.0, 20.0));
    }

    #[test]
    fn sandwich_round_trips_losslessly() {
        let g = sandwich_graph();
        let encoded = encode_ontology(&g, "Sandwich");
        assert!(encoded.dropped.is_empty());

        let decoded = decode_ontology(&encoded.document).unwrap();
        assert_eq!(decoded.graph.nodes().len(), 9);
        assert_eq!(decoded.graph.edges().len(), 10);
        let subclass = decoded
            .graph
            .edges()
            .iter()
            .filter(|e| e.predicate() == "subClassOf")
            .count();
        assert_eq!(subclass, 5);
    }
}
