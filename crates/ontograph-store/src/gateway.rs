//! SPARQL 1.1 protocol gateway
//!
//! One fixed endpoint pair derived from the configured base URL and
//! repository name. Queries and updates are single blocking calls; a
//! non-2xx response is a hard failure carrying status and body. No
//! retries: every transport failure propagates to the caller.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use ontograph_core::{OntographError, Result, StoreConfig};

/// Accept header for SPARQL results JSON (ASK/SELECT)
pub const ACCEPT_SPARQL_JSON: &str = "application/json";

/// Accept header for JSON-LD (CONSTRUCT)
pub const ACCEPT_JSON_LD: &str = "application/ld+json";

const CONTENT_SPARQL_QUERY: &str = "application/sparql-query";
const CONTENT_SPARQL_UPDATE: &str = "application/sparql-update";

/// Parsed response body, driven by the Accept header
#[derive(Debug, Clone)]
pub enum SparqlResponse {
    Json(Value),
    Text(String),
}

impl SparqlResponse {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

/// The seam between the store and the triplestore. The in-memory fake
/// used by tests implements this too.
#[async_trait]
pub trait SparqlClient: Send + Sync {
    /// Execute a query (ASK/SELECT/CONSTRUCT); `accept` drives parsing
    async fn query(&self, sparql: &str, accept: &str) -> Result<SparqlResponse>;

    /// Execute an update (INSERT/DELETE/CLEAR/DROP)
    async fn update(&self, sparql: &str) -> Result<()>;
}

/// HTTP gateway to a single configured repository
pub struct SparqlGateway {
    http: reqwest::Client,
    base_url: String,
    repository: String,
    probe_timeout: Duration,
}

impl SparqlGateway {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            repository: config.repository.clone(),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        }
    }

    /// Endpoint for queries
    pub fn query_endpoint(&self) -> String {
        format!("{}/repositories/{}", self.base_url, self.repository)
    }

    /// Endpoint for updates
    pub fn update_endpoint(&self) -> String {
        format!("{}/repositories/{}/statements", self.base_url, self.repository)
    }

    /// Liveness probe; reports availability without throwing.
    pub async fn is_available(&self) -> bool {
        let url = format!(
            "{}/rest/repositories/{}/size",
            self.base_url, self.repository
        );
        match self
            .http
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                tracing::debug!(%error, "liveness probe failed");
                false
            }
        }
    }
}

#[async_trait]
impl SparqlClient for SparqlGateway {
    async fn query(&self, sparql: &str, accept: &str) -> Result<SparqlResponse> {
        tracing::debug!(endpoint = %self.query_endpoint(), accept, "dispatching SPARQL query");

        let response = self
            .http
            .post(self.query_endpoint())
            .header("Content-Type", CONTENT_SPARQL_QUERY)
            .header("Accept", accept)
            .body(sparql.to_string())
            .send()
            .await
            .map_err(|e| OntographError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OntographError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        match accept {
            ACCEPT_SPARQL_JSON | ACCEPT_JSON_LD => {
                let value: Value = response.json().await.map_err(|e| {
                    OntographError::Other(anyhow::anyhow!("malformed SPARQL response: {e}"))
                })?;
                Ok(SparqlResponse::Json(value))
            }
            _ => {
                let text = response.text().await.map_err(|e| {
                    OntographError::Other(anyhow::anyhow!("unreadable SPARQL response: {e}"))
                })?;
                Ok(SparqlResponse::Text(text))
            }
        }
    }

    async fn update(&self, sparql: &str) -> Result<()> {
        tracing::debug!(endpoint = %self.update_endpoint(), "dispatching SPARQL update");

        let response = self
            .http
            .post(self.update_endpoint())
            .header("Content-Type", CONTENT_SPARQL_UPDATE)
            .body(sparql.to_string())
            .send()
            .await
            .map_err(|e| OntographError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OntographError::Transport {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> SparqlGateway {
        SparqlGateway::new(&StoreConfig {
            base_url: "http://localhost:7200/".to_string(),
            repository: "ontology-editor".to_string(),
            probe_timeout_secs: 2,
        })
    }

    #[test]
    fn endpoints_derive_from_config() {
        let gw = gateway();
        assert_eq!(
            gw.query_endpoint(),
            "http://localhost:7200/repositories/ontology-editor"
        );
        assert_eq!(
            gw.update_endpoint(),
            "http://localhost:7200/repositories/ontology-editor/statements"
        );
    }

    #[test]
    fn response_json_accessor() {
        let json = SparqlResponse::Json(serde_json::json!({"boolean": true}));
        assert!(json.as_json().is_some());
        assert!(SparqlResponse::Text("x".into()).as_json().is_none());
    }
}
