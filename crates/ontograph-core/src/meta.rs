//! Metadata catalog records
//!
//! One record per ontology or knowledge graph, stored as RDF triples in
//! the shared metadata named graph. Timestamps are fixed-width RFC 3339
//! with microseconds so lexicographic order equals temporal order.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current UTC time as a fixed-width ISO-8601 string
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Generate a fresh ontology or knowledge-graph id
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Catalog record for an ontology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyMeta {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Catalog record for a knowledge graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGraphMeta {
    pub id: String,
    pub name: String,
    pub owner: String,
    /// Graph URI of the owning ontology
    pub belongs_to: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_fixed_width_and_ordered() {
        let a = now_timestamp();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = now_timestamp();
        assert_eq!(a.len(), b.len());
        assert!(a < b, "expected {a} < {b}");
        assert!(a.ends_with('Z'));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
