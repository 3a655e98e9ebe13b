//! Ontograph Codec - visual graph ⇄ JSON-LD conversion
//!
//! This crate implements the bidirectional mapping engine:
//! - `ontology`: class/property documents for the editor graph
//! - `knowledge`: individual documents for instance data
//! - `import`: external JSON-LD (aiia vocabulary) with auto layout
//! - `ntriples`: flattening documents into N-Triples for SPARQL INSERT
//! - `jsonld`: compacting expanded CONSTRUCT results back into the
//!   canonical document shape
//!
//! Decoding is resilient but lossy: entries the codec does not recognize
//! are skipped and collected in a side list, never turned into errors.

pub mod import;
pub mod jsonld;
pub mod knowledge;
pub mod ntriples;
pub mod ontology;

pub use import::{from_external, to_external};
pub use jsonld::compact;
pub use knowledge::{decode_knowledge_graph, encode_knowledge_graph};
pub use ntriples::{flatten, to_ntriples, Triple, TripleObject};
pub use ontology::{decode_ontology, encode_ontology, DecodedOntology, EncodedOntology};

use serde_json::Value;

// Fixed vocabulary. General-purpose JSON-LD processing is out of scope;
// every document this system produces or consumes uses these namespaces.
pub const VOCAB: &str = "http://example.org/ontology#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const INSTANCE: &str = "http://ontology-editor.local/instances/";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// The `@context` object shared by every document this crate emits
pub fn standard_context() -> Value {
    serde_json::json!({
        "@vocab": VOCAB,
        "rdfs": RDFS,
        "owl": OWL,
        "xsd": XSD,
        "instance": INSTANCE,
    })
}

/// Turn a label into a URI-safe term (spaces become underscores).
///
/// The label, not the node id, is the semantic key: two nodes with the
/// same label collide in URI space. Accepted ambiguity.
pub fn urlify(label: &str) -> String {
    label.replace(' ', "_")
}

/// Inverse of [`urlify`]
pub fn deurlify(term: &str) -> String {
    term.replace('_', " ")
}

/// Detected on-disk/wire shape of a stored document.
///
/// Detection is an explicit decode step; callers choose a decoder based
/// on the result instead of falling back implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// The editor's internal nodes/edges shape
    VisualGraph,
    /// A JSON-LD document (has `@context`)
    JsonLd,
    Unknown,
}

/// Classify a raw JSON document
pub fn detect(doc: &Value) -> DocumentFormat {
    let Some(obj) = doc.as_object() else {
        return DocumentFormat::Unknown;
    };
    if obj.contains_key("@context") {
        DocumentFormat::JsonLd
    } else if obj.contains_key("nodes") || obj.contains_key("edges") {
        DocumentFormat::VisualGraph
    } else {
        DocumentFormat::Unknown
    }
}

/// Recognized `@graph` entry shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Class,
    ObjectProperty,
    /// The document-level ontology header, recognized and ignored
    OntologyHeader,
    Individual,
    Unknown,
}

/// Variant dispatch over entry shapes. Anything unrecognized is
/// `Unknown`; decoders keep those in a side list for diagnostics.
pub fn classify_entry(entry: &Value) -> EntryKind {
    let Some(obj) = entry.as_object() else {
        return EntryKind::Unknown;
    };
    match obj.get("@type").and_then(Value::as_str) {
        Some("owl:Class") => EntryKind::Class,
        Some("owl:ObjectProperty") => EntryKind::ObjectProperty,
        Some("owl:Ontology") => EntryKind::OntologyHeader,
        Some(_) if obj.contains_key("@id") => EntryKind::Individual,
        _ => EntryKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn urlify_round_trip() {
        assert_eq!(urlify("My Class"), "My_Class");
        assert_eq!(deurlify("My_Class"), "My Class");
    }

    #[test]
    fn detect_visual_graph() {
        assert_eq!(
            detect(&json!({"nodes": [], "edges": []})),
            DocumentFormat::VisualGraph
        );
    }

    #[test]
    fn detect_jsonld() {
        assert_eq!(
            detect(&json!({"@context": {}, "@graph": []})),
            DocumentFormat::JsonLd
        );
    }

    #[test]
    fn detect_unknown() {
        assert_eq!(detect(&json!([1, 2])), DocumentFormat::Unknown);
        assert_eq!(detect(&json!({"foo": 1})), DocumentFormat::Unknown);
    }

    #[test]
    fn classify_recognized_entries() {
        assert_eq!(
            classify_entry(&json!({"@id": "A", "@type": "owl:Class"})),
            EntryKind::Class
        );
        assert_eq!(
            classify_entry(&json!({"@id": "knows", "@type": "owl:ObjectProperty"})),
            EntryKind::ObjectProperty
        );
        assert_eq!(
            classify_entry(&json!({"@id": "instance:Alice", "@type": "Person"})),
            EntryKind::Individual
        );
        assert_eq!(classify_entry(&json!({"no": "type"})), EntryKind::Unknown);
        assert_eq!(classify_entry(&json!("scalar")), EntryKind::Unknown);
    }
}
