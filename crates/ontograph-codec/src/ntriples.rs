//! Fixed-vocabulary flattening of JSON-LD documents into N-Triples
//!
//! Only the namespaces this application emits are understood; general
//! JSON-LD expansion is out of scope. The root `@id`/`@type` header of an
//! ontology document is not stored, only the `@graph` entries are,
//! matching how documents are read back by CONSTRUCT.

use serde_json::Value;

use crate::{urlify, INSTANCE, OWL, RDFS, RDF_TYPE, VOCAB, XSD};

/// One RDF statement
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: TripleObject,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TripleObject {
    Iri(String),
    Literal {
        value: String,
        datatype: Option<String>,
    },
}

/// Flatten a document's `@graph` entries into triples.
///
/// Entries without an `@id`, and values of shapes the fixed vocabulary
/// cannot express, are skipped silently.
pub fn flatten(document: &Value) -> Vec<Triple> {
    let entries: Vec<&Value> = match document.get("@graph").and_then(Value::as_array) {
        Some(items) => items.iter().collect(),
        None if document.get("@id").is_some() => vec![document],
        None => Vec::new(),
    };

    let mut triples = Vec::new();
    for entry in entries {
        let Some(obj) = entry.as_object() else {
            continue;
        };
        let Some(id) = obj.get("@id").and_then(Value::as_str) else {
            continue;
        };
        let subject = expand_term(id);

        for (key, value) in obj {
            match key.as_str() {
                "@id" | "@context" => {}
                "@type" => {
                    if let Some(t) = value.as_str() {
                        triples.push(Triple {
                            subject: subject.clone(),
                            predicate: RDF_TYPE.to_string(),
                            object: TripleObject::Iri(expand_term(t)),
                        });
                    }
                }
                _ => {
                    let predicate = expand_term(key);
                    for object in object_values(value) {
                        triples.push(Triple {
                            subject: subject.clone(),
                            predicate: predicate.clone(),
                            object,
                        });
                    }
                }
            }
        }
    }
    triples
}

/// Serialize triples as N-Triples text
pub fn to_ntriples(triples: &[Triple]) -> String {
    let mut out = String::new();
    for triple in triples {
        out.push('<');
        out.push_str(&triple.subject);
        out.push_str("> <");
        out.push_str(&triple.predicate);
        out.push_str("> ");
        match &triple.object {
            TripleObject::Iri(iri) => {
                out.push('<');
                out.push_str(iri);
                out.push('>');
            }
            TripleObject::Literal { value, datatype } => {
                out.push('"');
                out.push_str(&escape_literal(value));
                out.push('"');
                if let Some(dt) = datatype {
                    out.push_str("^^<");
                    out.push_str(dt);
                    out.push('>');
                }
            }
        }
        out.push_str(" .\n");
    }
    out
}

/// Expand a compacted term against the fixed vocabulary
pub fn expand_term(term: &str) -> String {
    if term.starts_with("http://") || term.starts_with("https://") {
        return term.to_string();
    }
    for (prefix, base) in [
        ("rdfs:", RDFS),
        ("owl:", OWL),
        ("xsd:", XSD),
        ("instance:", INSTANCE),
    ] {
        if let Some(local) = term.strip_prefix(prefix) {
            return format!("{base}{local}");
        }
    }
    // Spaces are not valid in IRIs
    format!("{VOCAB}{}", urlify(term))
}

/// Escape a literal for N-Triples / SPARQL string syntax
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

fn object_values(value: &Value) -> Vec<TripleObject> {
    match value {
        Value::Array(items) => items.iter().flat_map(object_values).collect(),
        Value::Object(obj) => obj
            .get("@id")
            .and_then(Value::as_str)
            .map(|id| vec![TripleObject::Iri(expand_term(id))])
            .unwrap_or_default(),
        Value::String(s) => vec![TripleObject::Literal {
            value: s.clone(),
            datatype: None,
        }],
        Value::Number(n) => {
            let datatype = if n.is_i64() || n.is_u64() {
                format!("{XSD}integer")
            } else {
                format!("{XSD}double")
            };
            vec![TripleObject::Literal {
                value: n.to_string(),
                datatype: Some(datatype),
            }]
        }
        Value::Bool(b) => vec![TripleObject::Literal {
            value: b.to_string(),
            datatype: Some(format!("{XSD}boolean")),
        }],
        Value::Null => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn class_entry_flattens_to_typed_triples() {
        let doc = json!({
            "@context": crate::standard_context(),
            "@graph": [{
                "@id": "Bread",
                "@type": "owl:Class",
                "rdfs:label": "Bread",
                "_nodeId": "2",
                "_position": "150,200"
            }]
        });
        let triples = flatten(&doc);
        assert_eq!(triples.len(), 4);

        let type_triple = triples.iter().find(|t| t.predicate == RDF_TYPE).unwrap();
        assert_eq!(
            type_triple.object,
            TripleObject::Iri(format!("{OWL}Class"))
        );

        let node_id = triples
            .iter()
            .find(|t| t.predicate == format!("{VOCAB}_nodeId"))
            .unwrap();
        assert_eq!(
            node_id.object,
            TripleObject::Literal {
                value: "2".to_string(),
                datatype: None
            }
        );
    }

    #[test]
    fn root_header_is_not_stored_when_graph_present() {
        let doc = json!({
            "@context": crate::standard_context(),
            "@id": "Sandwich",
            "@type": "owl:Ontology",
            "@graph": [{"@id": "A", "@type": "owl:Class"}]
        });
        let triples = flatten(&doc);
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, format!("{VOCAB}A"));
    }

    #[test]
    fn lone_entry_document_is_flattened() {
        let doc = json!({"@id": "instance:Alice", "@type": "Person"});
        let triples = flatten(&doc);
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, format!("{INSTANCE}Alice"));
    }

    #[test]
    fn reference_lists_become_multiple_triples() {
        let doc = json!({
            "@graph": [{
                "@id": "instance:Alice",
                "knows": [{"@id": "instance:Bob"}, {"@id": "instance:Carol"}]
            }]
        });
        let triples = flatten(&doc);
        assert_eq!(triples.len(), 2);
    }

    #[test]
    fn ntriples_serialization_and_escaping() {
        let triples = vec![Triple {
            subject: format!("{VOCAB}A"),
            predicate: format!("{RDFS}label"),
            object: TripleObject::Literal {
                value: "line\none \"quoted\"".to_string(),
                datatype: None,
            },
        }];
        let text = to_ntriples(&triples);
        assert_eq!(
            text,
            format!("<{VOCAB}A> <{RDFS}label> \"line\\none \\\"quoted\\\"\" .\n")
        );
    }

    #[test]
    fn expand_term_handles_all_prefixes() {
        assert_eq!(expand_term("rdfs:label"), format!("{RDFS}label"));
        assert_eq!(expand_term("owl:Class"), format!("{OWL}Class"));
        assert_eq!(expand_term("instance:Bob"), format!("{INSTANCE}Bob"));
        assert_eq!(expand_term("knows"), format!("{VOCAB}knows"));
        assert_eq!(expand_term("http://a/b"), "http://a/b");
    }
}
