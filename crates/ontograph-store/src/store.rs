//! Named-graph CRUD over the SPARQL gateway
//!
//! Ontologies and knowledge graphs each live in their own named graph;
//! one shared metadata graph records ownership and timestamps. Writes
//! replace graph contents wholesale (clear then insert). The commit of
//! an [`UpdateTransaction`] is sequential, not atomic: a failure between
//! statements leaves the statements already sent applied. "Not found" is
//! `None`, never an error.

use serde_json::Value;
use std::sync::Arc;

use ontograph_codec::{compact, flatten, to_ntriples};
use ontograph_core::{
    now_timestamp, KnowledgeGraphAddress, KnowledgeGraphMeta, OntographError, OntologyAddress,
    OntologyMeta, Result,
};

use crate::gateway::{SparqlClient, SparqlResponse, ACCEPT_JSON_LD, ACCEPT_SPARQL_JSON};
use crate::sparql;

/// A scoped batch of update statements with an explicit commit.
///
/// Statements are executed in order; the triplestore offers no
/// transaction protocol here, so partial application on failure is a
/// documented limitation of the write path.
#[derive(Debug, Default)]
pub struct UpdateTransaction {
    statements: Vec<String>,
}

impl UpdateTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: String) {
        self.statements.push(statement);
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Execute the batch in order, stopping at the first failure.
    pub async fn commit(self, client: &dyn SparqlClient) -> Result<()> {
        for statement in self.statements {
            client.update(&statement).await?;
        }
        Ok(())
    }
}

/// Orchestrates codec output and SPARQL calls into graph lifecycle
/// operations.
pub struct GraphStore {
    client: Arc<dyn SparqlClient>,
}

impl GraphStore {
    pub fn new(client: Arc<dyn SparqlClient>) -> Self {
        Self { client }
    }

    // ------------------------------------------------------------------
    // Ontologies
    // ------------------------------------------------------------------

    /// ASK whether the ontology's named graph holds any triple
    pub async fn exists(&self, addr: &OntologyAddress) -> Result<bool> {
        self.graph_has_triples(&addr.uri()).await
    }

    /// Record a new ontology in the metadata catalog
    pub async fn create_ontology(&self, addr: &OntologyAddress, name: &str) -> Result<OntologyMeta> {
        let now = now_timestamp();
        self.client
            .update(&sparql::insert_ontology_meta(
                &addr.uri(),
                addr.ontology_id(),
                name,
                addr.owner(),
                &now,
            ))
            .await?;

        Ok(OntologyMeta {
            id: addr.ontology_id().to_string(),
            name: name.to_string(),
            owner: addr.owner().to_string(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Replace the ontology graph with the document's triples and bump
    /// its `updatedAt` (and name, when given).
    pub async fn write_ontology(
        &self,
        addr: &OntologyAddress,
        document: &Value,
        name: Option<&str>,
    ) -> Result<()> {
        self.replace_graph(&addr.uri(), document, name).await
    }

    /// Read the ontology back as a compacted JSON-LD document.
    /// An empty graph and a never-created one both map to `None`.
    pub async fn read_ontology(&self, addr: &OntologyAddress) -> Result<Option<Value>> {
        self.read_graph(&addr.uri()).await
    }

    /// Metadata record for one ontology, `None` when absent
    pub async fn ontology_meta(&self, addr: &OntologyAddress) -> Result<Option<OntologyMeta>> {
        let query = sparql::select_meta(&addr.uri(), "ont:Ontology");
        let response = self.client.query(&query, ACCEPT_SPARQL_JSON).await?;
        let Some(binding) = bindings(&response).into_iter().next() else {
            return Ok(None);
        };
        Ok(Some(OntologyMeta {
            id: addr.ontology_id().to_string(),
            name: binding_value(&binding, "name"),
            owner: addr.owner().to_string(),
            created_at: binding_value(&binding, "createdAt"),
            updated_at: binding_value(&binding, "updatedAt"),
        }))
    }

    /// All ontologies owned by `owner`, most recently updated first
    pub async fn list_ontologies(&self, owner: &str) -> Result<Vec<OntologyMeta>> {
        let response = self
            .client
            .query(&sparql::select_ontologies(owner), ACCEPT_SPARQL_JSON)
            .await?;
        Ok(bindings(&response)
            .into_iter()
            .map(|b| OntologyMeta {
                id: binding_value(&b, "id"),
                name: binding_value(&b, "name"),
                owner: owner.to_string(),
                created_at: binding_value(&b, "createdAt"),
                updated_at: binding_value(&b, "updatedAt"),
            })
            .collect())
    }

    /// Drop the ontology graph and its metadata, cascading over its
    /// knowledge graphs first. Dropping an already-gone graph is fine.
    pub async fn delete_ontology(&self, addr: &OntologyAddress) -> Result<()> {
        self.delete_all_knowledge_graphs(addr).await?;
        self.drop_graph_and_meta(&addr.uri()).await
    }

    // ------------------------------------------------------------------
    // Knowledge graphs
    // ------------------------------------------------------------------

    pub async fn kg_exists(&self, addr: &KnowledgeGraphAddress) -> Result<bool> {
        self.graph_has_triples(&addr.uri()).await
    }

    /// Record a new knowledge graph, back-linked to its ontology
    pub async fn create_knowledge_graph(
        &self,
        addr: &KnowledgeGraphAddress,
        name: &str,
    ) -> Result<KnowledgeGraphMeta> {
        let now = now_timestamp();
        self.client
            .update(&sparql::insert_kg_meta(
                &addr.uri(),
                addr.kg_id(),
                name,
                &addr.ontology().uri(),
                &now,
            ))
            .await?;

        Ok(KnowledgeGraphMeta {
            id: addr.kg_id().to_string(),
            name: name.to_string(),
            owner: addr.owner().to_string(),
            belongs_to: addr.ontology().uri(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub async fn write_knowledge_graph(
        &self,
        addr: &KnowledgeGraphAddress,
        document: &Value,
        name: Option<&str>,
    ) -> Result<()> {
        self.replace_graph(&addr.uri(), document, name).await
    }

    pub async fn read_knowledge_graph(
        &self,
        addr: &KnowledgeGraphAddress,
    ) -> Result<Option<Value>> {
        self.read_graph(&addr.uri()).await
    }

    pub async fn knowledge_graph_meta(
        &self,
        addr: &KnowledgeGraphAddress,
    ) -> Result<Option<KnowledgeGraphMeta>> {
        let query = sparql::select_meta(&addr.uri(), "ont:KnowledgeGraph");
        let response = self.client.query(&query, ACCEPT_SPARQL_JSON).await?;
        let Some(binding) = bindings(&response).into_iter().next() else {
            return Ok(None);
        };
        Ok(Some(KnowledgeGraphMeta {
            id: addr.kg_id().to_string(),
            name: binding_value(&binding, "name"),
            owner: addr.owner().to_string(),
            belongs_to: addr.ontology().uri(),
            created_at: binding_value(&binding, "createdAt"),
            updated_at: binding_value(&binding, "updatedAt"),
        }))
    }

    /// Knowledge graphs of one ontology, most recently updated first
    pub async fn list_knowledge_graphs(
        &self,
        addr: &OntologyAddress,
    ) -> Result<Vec<KnowledgeGraphMeta>> {
        let query = sparql::select_knowledge_graphs(&addr.uri());
        let response = self.client.query(&query, ACCEPT_SPARQL_JSON).await?;
        Ok(bindings(&response)
            .into_iter()
            .map(|b| KnowledgeGraphMeta {
                id: binding_value(&b, "id"),
                name: binding_value(&b, "name"),
                owner: addr.owner().to_string(),
                belongs_to: addr.uri(),
                created_at: binding_value(&b, "createdAt"),
                updated_at: binding_value(&b, "updatedAt"),
            })
            .collect())
    }

    pub async fn delete_knowledge_graph(&self, addr: &KnowledgeGraphAddress) -> Result<()> {
        self.drop_graph_and_meta(&addr.uri()).await
    }

    /// Delete every knowledge graph of an ontology; returns the count
    pub async fn delete_all_knowledge_graphs(&self, addr: &OntologyAddress) -> Result<usize> {
        let kgs = self.list_knowledge_graphs(addr).await?;
        for kg in &kgs {
            self.delete_knowledge_graph(&addr.knowledge_graph(&kg.id))
                .await?;
        }
        Ok(kgs.len())
    }

    // ------------------------------------------------------------------
    // Shared plumbing
    // ------------------------------------------------------------------

    async fn graph_has_triples(&self, graph_uri: &str) -> Result<bool> {
        let response = self
            .client
            .query(&sparql::ask_graph(graph_uri), ACCEPT_SPARQL_JSON)
            .await?;
        Ok(response
            .as_json()
            .and_then(|v| v.get("boolean"))
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }

    /// CLEAR, INSERT, touch metadata. Not atomic: a failure after the
    /// CLEAR leaves the graph empty until the next successful write.
    async fn replace_graph(
        &self,
        graph_uri: &str,
        document: &Value,
        name: Option<&str>,
    ) -> Result<()> {
        let triples = flatten(document);

        let mut tx = UpdateTransaction::new();
        tx.push(sparql::clear_graph(graph_uri));
        if !triples.is_empty() {
            tx.push(sparql::insert_data(graph_uri, &to_ntriples(&triples)));
        }
        tx.push(sparql::touch_meta(graph_uri, &now_timestamp(), name));
        tx.commit(self.client.as_ref()).await
    }

    async fn read_graph(&self, graph_uri: &str) -> Result<Option<Value>> {
        let response = self
            .client
            .query(&sparql::construct_graph(graph_uri), ACCEPT_JSON_LD)
            .await?;
        let value = match response {
            SparqlResponse::Json(value) => value,
            SparqlResponse::Text(_) => return Ok(None),
        };
        if is_empty_construct(&value) {
            return Ok(None);
        }
        Ok(Some(compact(&value)))
    }

    /// DROP the graph, tolerating "already gone", then remove metadata.
    async fn drop_graph_and_meta(&self, graph_uri: &str) -> Result<()> {
        if let Err(error) = self.client.update(&sparql::drop_graph(graph_uri)).await {
            match error {
                OntographError::Transport { .. } => {
                    tracing::warn!(graph = graph_uri, %error, "DROP GRAPH failed, continuing");
                }
                other => return Err(other),
            }
        }
        self.client.update(&sparql::delete_meta(graph_uri)).await
    }
}

fn is_empty_construct(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        // Servers answer an empty CONSTRUCT as null, [], {} or an
        // empty @graph depending on serializer.
        Value::Object(obj) => match obj.get("@graph").and_then(Value::as_array) {
            Some(entries) => entries.is_empty(),
            None => obj.is_empty(),
        },
        _ => false,
    }
}

/// Rows of a SPARQL SELECT result
fn bindings(response: &SparqlResponse) -> Vec<Value> {
    response
        .as_json()
        .and_then(|v| v.get("results"))
        .and_then(|v| v.get("bindings"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn binding_value(binding: &Value, variable: &str) -> String {
    binding
        .get(variable)
        .and_then(|v| v.get("value"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
