//! Compaction of expanded JSON-LD into the canonical document shape
//!
//! CONSTRUCT responses come back as expanded JSON-LD: full IRIs for every
//! key, values wrapped in `@value`/`@id` objects and arrays. This module
//! folds that back into the compacted shape the codecs emit, so the
//! private round-trip hints (`_nodeId`, `_position`, `_edgeId`) survive a
//! trip through the store unmodified.

use serde_json::{json, Map, Value};

use crate::{standard_context, INSTANCE, OWL, RDFS, RDF_TYPE, VOCAB, XSD};

/// Compact an expanded JSON-LD array (or already-wrapped document) into
/// `{"@context": …, "@graph": […]}`.
pub fn compact(expanded: &Value) -> Value {
    let entities: Vec<&Value> = match expanded {
        Value::Array(items) => items.iter().collect(),
        Value::Object(obj) => match obj.get("@graph").and_then(Value::as_array) {
            Some(items) => items.iter().collect(),
            None => vec![expanded],
        },
        _ => Vec::new(),
    };

    let entries: Vec<Value> = entities.iter().filter_map(|e| compact_entity(e)).collect();

    json!({
        "@context": standard_context(),
        "@graph": entries,
    })
}

fn compact_entity(entity: &Value) -> Option<Value> {
    let obj = entity.as_object()?;
    let id = obj.get("@id")?.as_str()?;

    let mut entry = Map::new();
    entry.insert("@id".to_string(), json!(compact_iri(id)));

    for (key, value) in obj {
        if key == "@id" {
            continue;
        }
        if key == "@type" || key == RDF_TYPE {
            if let Some(t) = first_string(value) {
                entry.insert("@type".to_string(), json!(compact_iri(&t)));
            }
            continue;
        }
        entry.insert(compact_iri(key), compact_values(value));
    }
    Some(Value::Object(entry))
}

/// Compact a full IRI against the fixed vocabulary prefixes
pub fn compact_iri(iri: &str) -> String {
    for (base, prefix) in [
        (VOCAB, ""),
        (RDFS, "rdfs:"),
        (OWL, "owl:"),
        (XSD, "xsd:"),
        (INSTANCE, "instance:"),
    ] {
        if let Some(local) = iri.strip_prefix(base) {
            return format!("{prefix}{local}");
        }
    }
    iri.to_string()
}

/// `@type` may be a bare IRI string, an array of them, or an array of
/// `@id` reference objects when it arrives as an rdf:type predicate
fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => first_string(items.first()?),
        Value::Object(obj) => obj.get("@id")?.as_str().map(str::to_string),
        _ => None,
    }
}

/// Unwrap expanded value objects; single-element arrays collapse to a
/// bare value per the compaction convention.
fn compact_values(value: &Value) -> Value {
    let items: Vec<Value> = match value {
        Value::Array(items) => items.iter().map(compact_value).collect(),
        other => vec![compact_value(other)],
    };
    if items.len() == 1 {
        items.into_iter().next().unwrap_or(Value::Null)
    } else {
        Value::Array(items)
    }
}

fn compact_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return value.clone();
    };
    if let Some(id) = obj.get("@id").and_then(Value::as_str) {
        return json!({"@id": compact_iri(id)});
    }
    if let Some(v) = obj.get("@value") {
        return v.clone();
    }
    value.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expanded_class_entry_compacts_to_codec_shape() {
        let expanded = json!([{
            "@id": format!("{VOCAB}Bread"),
            "@type": [format!("{OWL}Class")],
            format!("{RDFS}label"): [{"@value": "Bread"}],
            format!("{VOCAB}_nodeId"): [{"@value": "2"}],
            format!("{VOCAB}_position"): [{"@value": "150,200"}]
        }]);

        let doc = compact(&expanded);
        let entry = &doc["@graph"][0];
        assert_eq!(entry["@id"], "Bread");
        assert_eq!(entry["@type"], "owl:Class");
        assert_eq!(entry["rdfs:label"], "Bread");
        assert_eq!(entry["_nodeId"], "2");
        assert_eq!(entry["_position"], "150,200");
    }

    #[test]
    fn rdf_type_predicate_folds_into_at_type() {
        let expanded = json!([{
            "@id": format!("{INSTANCE}Alice"),
            RDF_TYPE: [{"@id": format!("{VOCAB}Person")}]
        }]);
        let doc = compact(&expanded);
        let entry = &doc["@graph"][0];
        assert_eq!(entry["@id"], "instance:Alice");
        assert_eq!(entry["@type"], "Person");
    }

    #[test]
    fn reference_values_keep_id_objects() {
        let expanded = json!([{
            "@id": format!("{VOCAB}Cheese"),
            "@type": [format!("{OWL}Class")],
            format!("{RDFS}subClassOf"): [{"@id": format!("{VOCAB}Filling")}]
        }]);
        let doc = compact(&expanded);
        assert_eq!(doc["@graph"][0]["rdfs:subClassOf"]["@id"], "Filling");
    }

    #[test]
    fn multiple_values_stay_a_list() {
        let expanded = json!([{
            "@id": format!("{INSTANCE}Alice"),
            "@type": [format!("{VOCAB}Person")],
            format!("{VOCAB}knows"): [
                {"@id": format!("{INSTANCE}Bob")},
                {"@id": format!("{INSTANCE}Carol")}
            ]
        }]);
        let doc = compact(&expanded);
        let knows = doc["@graph"][0]["knows"].as_array().unwrap();
        assert_eq!(knows.len(), 2);
        assert_eq!(knows[0]["@id"], "instance:Bob");
    }

    #[test]
    fn foreign_iris_pass_through_uncompacted() {
        let expanded = json!([{
            "@id": "http://elsewhere.example/x",
            "@type": ["http://elsewhere.example/Thing"]
        }]);
        let doc = compact(&expanded);
        assert_eq!(doc["@graph"][0]["@id"], "http://elsewhere.example/x");
    }
}
