//! Ontograph CLI - Command-line interface
//!
//! Usage:
//!   ontograph ping
//!   ontograph list <owner>
//!   ontograph create <owner> <name>
//!   ontograph show <owner> <id>
//!   ontograph delete <owner> <id>
//!   ontograph import <owner> <name> <file>
//!   ontograph seed <owner>

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ontograph_codec::{encode_ontology, from_external};
use ontograph_core::meta::new_id;
use ontograph_core::sample::sandwich_graph;
use ontograph_core::{AppConfig, OntologyAddress};
use ontograph_store::{GraphStore, SparqlGateway};

#[derive(Parser)]
#[command(name = "ontograph")]
#[command(about = "Visual ontology editor storage CLI")]
#[command(version)]
struct Cli {
    /// TOML configuration file; environment variables take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the triplestore and report availability
    Ping,
    /// List ontologies owned by a user, most recently updated first
    List {
        /// Owner username
        owner: String,
    },
    /// Create an empty ontology and print its id
    Create {
        owner: String,
        /// Display name
        name: String,
    },
    /// Print an ontology's metadata and stored document
    Show { owner: String, id: String },
    /// Delete an ontology and all of its knowledge graphs
    Delete { owner: String, id: String },
    /// Import an external JSON-LD file as a new ontology
    Import {
        owner: String,
        /// Display name for the imported ontology
        name: String,
        /// Path to the JSON-LD document
        file: PathBuf,
    },
    /// Create the sample sandwich ontology
    Seed { owner: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    let gateway = Arc::new(SparqlGateway::new(&config.store));
    let store = GraphStore::new(gateway.clone());

    match cli.command {
        Commands::Ping => {
            if gateway.is_available().await {
                println!("triplestore available at {}", gateway.query_endpoint());
            } else {
                bail!("triplestore not reachable at {}", gateway.query_endpoint());
            }
        }

        Commands::List { owner } => {
            let ontologies = store.list_ontologies(&owner).await?;
            if ontologies.is_empty() {
                println!("no ontologies for {owner}");
            }
            for meta in ontologies {
                println!("{}  {}  (updated {})", meta.id, meta.name, meta.updated_at);
            }
        }

        Commands::Create { owner, name } => {
            let addr = OntologyAddress::new(&owner, new_id());
            let meta = store.create_ontology(&addr, &name).await?;
            println!("{}", meta.id);
        }

        Commands::Show { owner, id } => {
            let addr = OntologyAddress::new(&owner, &id);
            let Some(meta) = store.ontology_meta(&addr).await? else {
                bail!("ontology {id} not found for {owner}");
            };
            println!("{}  {}", meta.id, meta.name);
            println!("created: {}", meta.created_at);
            println!("updated: {}", meta.updated_at);
            match store.read_ontology(&addr).await? {
                Some(document) => println!("{}", serde_json::to_string_pretty(&document)?),
                None => println!("(no stored document)"),
            }
        }

        Commands::Delete { owner, id } => {
            let addr = OntologyAddress::new(&owner, &id);
            store.delete_ontology(&addr).await?;
            println!("deleted {id}");
        }

        Commands::Import { owner, name, file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let document: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", file.display()))?;

            let graph = from_external(&document)?;
            let encoded = encode_ontology(&graph, &name);
            if !encoded.dropped.is_empty() {
                tracing::warn!(
                    count = encoded.dropped.len(),
                    "duplicate-predicate edges dropped during import"
                );
            }

            let addr = OntologyAddress::new(&owner, new_id());
            store.create_ontology(&addr, &name).await?;
            store.write_ontology(&addr, &encoded.document, None).await?;
            println!(
                "{}  ({} nodes, {} edges)",
                addr.ontology_id(),
                graph.nodes().len(),
                graph.edges().len()
            );
        }

        Commands::Seed { owner } => {
            let encoded = encode_ontology(&sandwich_graph(), "Sandwich");
            let addr = OntologyAddress::new(&owner, new_id());
            store.create_ontology(&addr, "Sandwich").await?;
            store.write_ontology(&addr, &encoded.document, None).await?;
            println!("{}", addr.ontology_id());
        }
    }

    Ok(())
}
