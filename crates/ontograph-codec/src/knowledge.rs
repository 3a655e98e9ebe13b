//! Knowledge-graph codec: instance/relationship maps ⇄ JSON-LD individuals
//!
//! Encoding follows JSON-LD compaction conventions: a relationship with
//! exactly one resolved target is stored as a bare reference object, two
//! or more become a list. Decoding accepts either shape.

use serde_json::{json, Map, Value};
use std::collections::HashMap;

use ontograph_core::{KnowledgeGraph, RelationKey};

use crate::{deurlify, standard_context, urlify};

/// Encode an instance/relationship map as a JSON-LD document
pub fn encode_knowledge_graph(kg: &KnowledgeGraph) -> Value {
    // Individual entries in insertion order, indexed by instance @id
    let mut order: Vec<String> = Vec::new();
    let mut individuals: HashMap<String, Map<String, Value>> = HashMap::new();

    for (class, names) in &kg.instances {
        for name in names {
            let id = format!("instance:{}", urlify(name));
            if individuals.contains_key(&id) {
                continue;
            }
            let mut entry = Map::new();
            entry.insert("@id".to_string(), json!(id));
            entry.insert("@type".to_string(), json!(urlify(class)));
            entry.insert("rdfs:label".to_string(), json!(name));
            order.push(id.clone());
            individuals.insert(id, entry);
        }
    }

    for (raw_key, targets) in &kg.relationships {
        let Ok(key) = RelationKey::parse(raw_key) else {
            tracing::warn!(key = %raw_key, "skipping malformed relationship key");
            continue;
        };

        // Only targets actually present in the target class resolve
        let target_instances = kg.instances_of(&key.target_class);
        let refs: Vec<Value> = targets
            .iter()
            .filter(|t| target_instances.contains(t))
            .map(|t| json!({"@id": format!("instance:{}", urlify(t))}))
            .collect();
        if refs.is_empty() {
            continue;
        }

        // Bare object for a single target, list otherwise
        let value = if refs.len() == 1 {
            refs.into_iter().next().unwrap_or(Value::Null)
        } else {
            Value::Array(refs)
        };

        let predicate = urlify(&key.predicate);
        for source in kg.instances_of(&key.source_class) {
            let id = format!("instance:{}", urlify(source));
            if let Some(entry) = individuals.get_mut(&id) {
                entry.insert(predicate.clone(), value.clone());
            }
        }
    }

    let entries: Vec<Value> = order
        .into_iter()
        .filter_map(|id| individuals.remove(&id))
        .map(Value::Object)
        .collect();

    json!({
        "@context": standard_context(),
        "@graph": entries,
    })
}

/// Decode a JSON-LD document of individuals back into the map form.
///
/// Malformed entries are skipped: decoding is resilient but lossy.
pub fn decode_knowledge_graph(document: &Value) -> KnowledgeGraph {
    let entries: Vec<&Value> = document
        .get("@graph")
        .and_then(Value::as_array)
        .map(|a| a.iter().collect())
        .unwrap_or_default();

    let mut kg = KnowledgeGraph::new();

    // First pass: index instance URIs to (class, label)
    let mut index: HashMap<String, (String, String)> = HashMap::new();
    for entry in &entries {
        let Some(obj) = entry.as_object() else {
            continue;
        };
        let (Some(id), Some(class_term)) = (
            obj.get("@id").and_then(Value::as_str),
            obj.get("@type").and_then(Value::as_str),
        ) else {
            continue;
        };
        let class = deurlify(class_term);
        let label = obj
            .get("rdfs:label")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| deurlify(id.strip_prefix("instance:").unwrap_or(id)));
        kg.add_instance(class.clone(), label.clone());
        index.insert(id.to_string(), (class, label));
    }

    // Second pass: every non-reserved key is a candidate relationship
    for entry in &entries {
        let Some(obj) = entry.as_object() else {
            continue;
        };
        let Some(id) = obj.get("@id").and_then(Value::as_str) else {
            continue;
        };
        let Some((source_class, _)) = index.get(id).cloned() else {
            continue;
        };

        for (prop, value) in obj {
            if prop.starts_with('@') || prop.starts_with("rdfs:") || prop.starts_with('_') {
                continue;
            }
            let predicate = deurlify(prop);
            for reference in reference_list(value) {
                let Some((target_class, target_label)) = index.get(&reference) else {
                    continue;
                };
                let key = RelationKey::new(source_class.clone(), predicate.clone(), target_class);
                kg.add_relationship(&key, target_label);
            }
        }
    }

    kg
}

/// Accepts a bare `{"@id": …}` reference or a list of them
fn reference_list(value: &Value) -> Vec<String> {
    let as_ref = |v: &Value| -> Option<String> {
        v.as_object()?.get("@id")?.as_str().map(str::to_string)
    };
    match value {
        Value::Array(items) => items.iter().filter_map(as_ref).collect(),
        other => as_ref(other).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_kg(knows: &[&str]) -> KnowledgeGraph {
        let mut kg = KnowledgeGraph::new();
        for name in ["Alice", "Bob", "Carol"] {
            kg.add_instance("Person", name);
        }
        let key = RelationKey::new("Person", "knows", "Person");
        for target in knows {
            kg.add_relationship(&key, *target);
        }
        kg
    }

    fn individual<'a>(doc: &'a Value, id: &str) -> &'a Value {
        doc["@graph"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["@id"] == id)
            .unwrap()
    }

    #[test]
    fn single_target_is_a_bare_object() {
        let doc = encode_knowledge_graph(&person_kg(&["Bob"]));
        let alice = individual(&doc, "instance:Alice");
        let knows = &alice["knows"];
        assert!(knows.is_object(), "expected bare object, got {knows}");
        assert_eq!(knows["@id"], "instance:Bob");
    }

    #[test]
    fn two_targets_are_a_list() {
        let doc = encode_knowledge_graph(&person_kg(&["Bob", "Carol"]));
        let alice = individual(&doc, "instance:Alice");
        let knows = alice["knows"].as_array().expect("expected a list");
        assert_eq!(knows.len(), 2);
    }

    #[test]
    fn unresolvable_targets_are_filtered() {
        // "Mallory" is not a Person instance, so the reference never appears.
        let doc = encode_knowledge_graph(&person_kg(&["Mallory"]));
        let alice = individual(&doc, "instance:Alice");
        assert!(alice.get("knows").is_none());
    }

    #[test]
    fn round_trip_preserves_instances_and_relationships() {
        let kg = person_kg(&["Bob", "Carol"]);
        let decoded = decode_knowledge_graph(&encode_knowledge_graph(&kg));

        assert_eq!(decoded.instances_of("Person"), ["Alice", "Bob", "Carol"]);
        let targets = &decoded.relationships["Person:knows:Person"];
        assert_eq!(targets, &vec!["Bob".to_string(), "Carol".to_string()]);
    }

    #[test]
    fn instance_names_with_spaces_round_trip() {
        let mut kg = KnowledgeGraph::new();
        kg.add_instance("Sandwich Shop", "Corner Deli");

        let doc = encode_knowledge_graph(&kg);
        let entry = individual(&doc, "instance:Corner_Deli");
        assert_eq!(entry["@type"], "Sandwich_Shop");
        assert_eq!(entry["rdfs:label"], "Corner Deli");

        let decoded = decode_knowledge_graph(&doc);
        assert_eq!(decoded.instances_of("Sandwich Shop"), ["Corner Deli"]);
    }

    #[test]
    fn malformed_entries_are_skipped_not_rejected() {
        let doc = json!({
            "@context": standard_context(),
            "@graph": [
                {"@id": "instance:Alice", "@type": "Person", "rdfs:label": "Alice"},
                {"@type": "Person"},
                "not an object",
                {"@id": "instance:Ghost"}
            ]
        });
        let kg = decode_knowledge_graph(&doc);
        assert_eq!(kg.instances_of("Person"), ["Alice"]);
    }

    #[test]
    fn references_to_unknown_individuals_are_ignored() {
        let doc = json!({
            "@context": standard_context(),
            "@graph": [
                {
                    "@id": "instance:Alice",
                    "@type": "Person",
                    "rdfs:label": "Alice",
                    "knows": {"@id": "instance:Nobody"}
                }
            ]
        });
        let kg = decode_knowledge_graph(&doc);
        assert!(kg.relationships.is_empty());
    }
}
