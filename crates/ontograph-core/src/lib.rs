//! Ontograph Core - Domain models and shared types
//!
//! This crate defines the core abstractions used throughout Ontograph:
//! - The visual graph model (nodes, edges) with its validation gate
//! - Knowledge-graph instance/relationship maps
//! - Named-graph addressing (ownership encoded in the URI)
//! - Metadata catalog records
//! - Common error types
//! - Configuration management

pub mod address;
pub mod config;
pub mod meta;
pub mod model;
pub mod sample;

pub use address::{KnowledgeGraphAddress, OntologyAddress, METADATA_GRAPH_URI};
pub use config::{AppConfig, ConfigError, LoggingConfig, StoreConfig};
pub use meta::{now_timestamp, KnowledgeGraphMeta, OntologyMeta};
pub use model::{Edge, KnowledgeGraph, Node, OntologyGraph, Position, RelationKey};

use thiserror::Error;

/// Core error types for Ontograph operations
#[derive(Error, Debug)]
pub enum OntographError {
    /// A graph-model constraint was violated. Reported to the caller,
    /// never recovered by clamping or truncation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Import input is not a JSON-LD document (missing or malformed `@context`).
    #[error("not a JSON-LD document: {0}")]
    NotJsonLd(String),

    /// The triplestore answered with a non-2xx status.
    #[error("triplestore request failed with status {status}: {body}")]
    Transport { status: u16, body: String },

    /// The triplestore could not be reached at all.
    #[error("triplestore unreachable: {0}")]
    Connection(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, OntographError>;
