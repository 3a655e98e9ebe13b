//! Ontograph Store - triplestore-backed named-graph storage
//!
//! Implements the graph-store protocol: named-graph lifecycle, the
//! shared metadata catalog, and SPARQL query/update dispatch against a
//! single configured repository.

pub mod gateway;
pub mod sparql;
pub mod store;

pub use gateway::{
    SparqlClient, SparqlGateway, SparqlResponse, ACCEPT_JSON_LD, ACCEPT_SPARQL_JSON,
};
pub use store::{GraphStore, UpdateTransaction};
