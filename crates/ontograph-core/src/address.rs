//! Named-graph addressing
//!
//! Ownership is encoded in the graph URI itself, not in a separate ACL
//! table. An address is constructed once per request and passed down; the
//! store never re-derives ownership by parsing URI strings.

use serde::{Deserialize, Serialize};

/// Base URI under which all named graphs live
pub const GRAPH_BASE_URI: &str = "http://ontology-editor.local";

/// The single shared catalog graph holding ownership and timestamps
pub const METADATA_GRAPH_URI: &str = "http://ontology-editor.local/metadata";

/// Schema prefix used by metadata triples
pub const SCHEMA_PREFIX_URI: &str = "http://ontology-editor.local/schema#";

/// Address of one user's ontology graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyAddress {
    owner: String,
    ontology_id: String,
}

impl OntologyAddress {
    pub fn new(owner: impl Into<String>, ontology_id: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ontology_id: ontology_id.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn ontology_id(&self) -> &str {
        &self.ontology_id
    }

    /// Named graph URI, e.g.
    /// `http://ontology-editor.local/users/alice/ontologies/abc123`
    pub fn uri(&self) -> String {
        format!(
            "{GRAPH_BASE_URI}/users/{}/ontologies/{}",
            self.owner, self.ontology_id
        )
    }

    /// Address of a knowledge graph belonging to this ontology
    pub fn knowledge_graph(&self, kg_id: impl Into<String>) -> KnowledgeGraphAddress {
        KnowledgeGraphAddress {
            ontology: self.clone(),
            kg_id: kg_id.into(),
        }
    }
}

/// Address of a knowledge graph, always rooted in its owning ontology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGraphAddress {
    ontology: OntologyAddress,
    kg_id: String,
}

impl KnowledgeGraphAddress {
    pub fn owner(&self) -> &str {
        self.ontology.owner()
    }

    pub fn ontology(&self) -> &OntologyAddress {
        &self.ontology
    }

    pub fn kg_id(&self) -> &str {
        &self.kg_id
    }

    /// Named graph URI, e.g.
    /// `http://ontology-editor.local/users/alice/ontologies/abc123/kg/kg1`
    pub fn uri(&self) -> String {
        format!("{}/kg/{}", self.ontology.uri(), self.kg_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ontology_uri_shape() {
        let addr = OntologyAddress::new("alice", "abc123");
        assert_eq!(
            addr.uri(),
            "http://ontology-editor.local/users/alice/ontologies/abc123"
        );
    }

    #[test]
    fn knowledge_graph_uri_extends_ontology_uri() {
        let addr = OntologyAddress::new("alice", "abc123").knowledge_graph("kg1");
        assert_eq!(
            addr.uri(),
            "http://ontology-editor.local/users/alice/ontologies/abc123/kg/kg1"
        );
        assert_eq!(addr.owner(), "alice");
    }
}
