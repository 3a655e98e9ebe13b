//! SPARQL query and update templates
//!
//! Every statement the store sends is built here, with literals escaped.
//! The metadata vocabulary lives under the `ont:` schema prefix.

use ontograph_codec::ntriples::escape_literal;
use ontograph_core::address::SCHEMA_PREFIX_URI;
use ontograph_core::METADATA_GRAPH_URI;

const PREFIXES: &str = "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>\n\
     PREFIX ont: <http://ontology-editor.local/schema#>\n\
     PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>\n";

/// ASK whether the named graph holds any triple
pub fn ask_graph(graph_uri: &str) -> String {
    format!("ASK WHERE {{\n    GRAPH <{graph_uri}> {{ ?s ?p ?o }}\n}}")
}

/// CONSTRUCT every triple in the named graph
pub fn construct_graph(graph_uri: &str) -> String {
    format!(
        "CONSTRUCT {{ ?s ?p ?o }}\nWHERE {{\n    GRAPH <{graph_uri}> {{ ?s ?p ?o }}\n}}"
    )
}

pub fn clear_graph(graph_uri: &str) -> String {
    format!("CLEAR GRAPH <{graph_uri}>")
}

pub fn drop_graph(graph_uri: &str) -> String {
    format!("DROP GRAPH <{graph_uri}>")
}

/// INSERT pre-serialized N-Triples into the named graph
pub fn insert_data(graph_uri: &str, ntriples: &str) -> String {
    format!("INSERT DATA {{\n    GRAPH <{graph_uri}> {{\n{ntriples}    }}\n}}")
}

/// Metadata record for a new ontology; created and updated timestamps
/// are identical at creation.
pub fn insert_ontology_meta(
    graph_uri: &str,
    ontology_id: &str,
    name: &str,
    owner: &str,
    now: &str,
) -> String {
    format!(
        "{PREFIXES}\n\
         INSERT DATA {{\n\
             GRAPH <{METADATA_GRAPH_URI}> {{\n\
                 <{graph_uri}> a ont:Ontology ;\n\
                     ont:id \"{}\" ;\n\
                     ont:name \"{}\" ;\n\
                     ont:owner \"{}\" ;\n\
                     ont:createdAt \"{now}\"^^xsd:dateTime ;\n\
                     ont:updatedAt \"{now}\"^^xsd:dateTime .\n\
             }}\n\
         }}",
        escape_literal(ontology_id),
        escape_literal(name),
        escape_literal(owner),
    )
}

/// Metadata record for a new knowledge graph, back-linked to its ontology
pub fn insert_kg_meta(
    kg_uri: &str,
    kg_id: &str,
    name: &str,
    ontology_uri: &str,
    now: &str,
) -> String {
    format!(
        "{PREFIXES}\n\
         INSERT DATA {{\n\
             GRAPH <{METADATA_GRAPH_URI}> {{\n\
                 <{kg_uri}> a ont:KnowledgeGraph ;\n\
                     ont:id \"{}\" ;\n\
                     ont:name \"{}\" ;\n\
                     ont:belongsTo <{ontology_uri}> ;\n\
                     ont:createdAt \"{now}\"^^xsd:dateTime ;\n\
                     ont:updatedAt \"{now}\"^^xsd:dateTime .\n\
             }}\n\
         }}",
        escape_literal(kg_id),
        escape_literal(name),
    )
}

/// Bump `updatedAt` (and optionally the name), keyed on the existing
/// `updatedAt` triple so a record must already exist to be touched.
pub fn touch_meta(graph_uri: &str, now: &str, name: Option<&str>) -> String {
    let (delete_name, insert_name, where_name) = match name {
        Some(name) => (
            format!("        <{graph_uri}> ont:name ?oldName .\n"),
            format!(
                "        <{graph_uri}> ont:name \"{}\" .\n",
                escape_literal(name)
            ),
            format!("        OPTIONAL {{ <{graph_uri}> ont:name ?oldName . }}\n"),
        ),
        None => (String::new(), String::new(), String::new()),
    };

    format!(
        "{PREFIXES}\n\
         DELETE {{\n\
             GRAPH <{METADATA_GRAPH_URI}> {{\n\
                 <{graph_uri}> ont:updatedAt ?oldTime .\n{delete_name}    }}\n\
         }}\n\
         INSERT {{\n\
             GRAPH <{METADATA_GRAPH_URI}> {{\n\
                 <{graph_uri}> ont:updatedAt \"{now}\"^^xsd:dateTime .\n{insert_name}    }}\n\
         }}\n\
         WHERE {{\n\
             GRAPH <{METADATA_GRAPH_URI}> {{\n\
                 <{graph_uri}> ont:updatedAt ?oldTime .\n{where_name}    }}\n\
         }}"
    )
}

/// Remove every metadata triple for the graph URI
pub fn delete_meta(graph_uri: &str) -> String {
    format!(
        "DELETE WHERE {{\n\
             GRAPH <{METADATA_GRAPH_URI}> {{\n\
                 <{graph_uri}> ?p ?o .\n\
             }}\n\
         }}"
    )
}

/// All ontologies owned by `owner`, most recently updated first
pub fn select_ontologies(owner: &str) -> String {
    format!(
        "{PREFIXES}\n\
         SELECT ?id ?name ?createdAt ?updatedAt\n\
         WHERE {{\n\
             GRAPH <{METADATA_GRAPH_URI}> {{\n\
                 ?graph a ont:Ontology ;\n\
                     ont:owner \"{}\" ;\n\
                     ont:id ?id ;\n\
                     ont:name ?name ;\n\
                     ont:createdAt ?createdAt ;\n\
                     ont:updatedAt ?updatedAt .\n\
             }}\n\
         }}\n\
         ORDER BY DESC(?updatedAt)",
        escape_literal(owner),
    )
}

/// Metadata record for one specific graph
pub fn select_meta(graph_uri: &str, rdf_type: &str) -> String {
    format!(
        "{PREFIXES}\n\
         SELECT ?name ?createdAt ?updatedAt\n\
         WHERE {{\n\
             GRAPH <{METADATA_GRAPH_URI}> {{\n\
                 <{graph_uri}> a {rdf_type} ;\n\
                     ont:name ?name ;\n\
                     ont:createdAt ?createdAt ;\n\
                     ont:updatedAt ?updatedAt .\n\
             }}\n\
         }}"
    )
}

/// All knowledge graphs belonging to an ontology, most recent first
pub fn select_knowledge_graphs(ontology_uri: &str) -> String {
    format!(
        "{PREFIXES}\n\
         SELECT ?id ?name ?createdAt ?updatedAt\n\
         WHERE {{\n\
             GRAPH <{METADATA_GRAPH_URI}> {{\n\
                 ?kg a ont:KnowledgeGraph ;\n\
                     ont:belongsTo <{ontology_uri}> ;\n\
                     ont:id ?id ;\n\
                     ont:name ?name ;\n\
                     ont:createdAt ?createdAt ;\n\
                     ont:updatedAt ?updatedAt .\n\
             }}\n\
         }}\n\
         ORDER BY DESC(?updatedAt)",
    )
}

/// Keep the ont: prefix definition in one place for consumers
pub fn schema_uri(local: &str) -> String {
    format!("{SCHEMA_PREFIX_URI}{local}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_targets_the_graph() {
        let q = ask_graph("http://g/1");
        assert!(q.starts_with("ASK WHERE"));
        assert!(q.contains("GRAPH <http://g/1>"));
    }

    #[test]
    fn insert_meta_escapes_literals() {
        let q = insert_ontology_meta("http://g/1", "id1", "A \"quoted\" name", "alice", "2026-01-01T00:00:00.000000Z");
        assert!(q.contains("ont:name \"A \\\"quoted\\\" name\""));
        assert!(q.contains("ont:owner \"alice\""));
        assert!(q.contains("a ont:Ontology"));
    }

    #[test]
    fn touch_without_name_leaves_name_alone() {
        let q = touch_meta("http://g/1", "2026-01-01T00:00:00.000000Z", None);
        assert!(!q.contains("ont:name"));
        assert!(q.contains("ont:updatedAt ?oldTime"));
        assert!(q.contains("ont:updatedAt \"2026-01-01T00:00:00.000000Z\"^^xsd:dateTime"));
    }

    #[test]
    fn touch_with_name_rewrites_it() {
        let q = touch_meta("http://g/1", "2026-01-01T00:00:00.000000Z", Some("New"));
        assert!(q.contains("ont:name \"New\""));
        assert!(q.contains("OPTIONAL { <http://g/1> ont:name ?oldName . }"));
    }

    #[test]
    fn kg_meta_carries_the_back_link() {
        let q = insert_kg_meta("http://g/1/kg/2", "kg2", "KG", "http://g/1", "2026-01-01T00:00:00.000000Z");
        assert!(q.contains("a ont:KnowledgeGraph"));
        assert!(q.contains("ont:belongsTo <http://g/1>"));
    }

    #[test]
    fn listings_order_by_updated_at_descending() {
        assert!(select_ontologies("alice").ends_with("ORDER BY DESC(?updatedAt)"));
        assert!(select_knowledge_graphs("http://g/1").ends_with("ORDER BY DESC(?updatedAt)"));
    }
}
