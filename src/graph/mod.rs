//! Neptune graph client.
//!
//! Traversals are submitted to the cluster's Gremlin endpoint over HTTP with
//! an explicit bindings map. The transport is a trait seam so the query
//! layer can be exercised without a live cluster.

pub mod query;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::core::config::AppConfig;
use crate::errors::ServiceError;
use self::query::{SearchOptions, VertexLabel};

/// Submits a traversal plus bindings and returns the raw result items.
#[async_trait]
pub trait GraphTransport: Send + Sync {
    async fn submit(
        &self,
        query: &str,
        bindings: &Map<String, Value>,
    ) -> Result<Vec<Value>, ServiceError>;
}

/// Derive the Gremlin endpoint URL from a configured endpoint value, which
/// may be a bare host, an `https://` host, or an already-complete URL.
#[must_use]
pub fn endpoint_url(raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix("wss://") {
        // Already a full websocket URL; submit over HTTPS at the same path.
        format!("https://{rest}")
    } else if raw.starts_with("https://") {
        format!("{raw}:8182/gremlin")
    } else {
        format!("https://{raw}:8182/gremlin")
    }
}

/// HTTP transport to the Gremlin endpoint.
pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
}

impl HttpTransport {
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        let url = endpoint_url(endpoint);
        info!(url = %url, "connecting to Neptune");
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl GraphTransport for HttpTransport {
    async fn submit(
        &self,
        query: &str,
        bindings: &Map<String, Value>,
    ) -> Result<Vec<Value>, ServiceError> {
        let body = serde_json::json!({ "gremlin": query, "bindings": bindings });

        let response = self.http.post(&self.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Graph(format!(
                "graph endpoint returned {status}"
            )));
        }

        let payload: Value = response.json().await?;
        Ok(payload
            .get("result")
            .and_then(|result| result.get("data"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}

/// Graph client with search and lookup helpers over a [`GraphTransport`].
pub struct NeptuneClient {
    transport: Box<dyn GraphTransport>,
    text_search_enabled: bool,
}

impl NeptuneClient {
    /// # Errors
    ///
    /// Returns an error when no Neptune endpoint is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let endpoint = config.require_neptune_endpoint().map_err(ServiceError::Graph)?;
        Ok(Self {
            transport: Box::new(HttpTransport::new(endpoint)),
            text_search_enabled: config.neptune_text_search_enabled,
        })
    }

    #[must_use]
    pub fn with_transport(transport: Box<dyn GraphTransport>, text_search_enabled: bool) -> Self {
        Self {
            transport,
            text_search_enabled,
        }
    }

    /// Execute a raw traversal with explicit parameter bindings.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is unreachable or rejects the query.
    pub async fn submit(
        &self,
        query: &str,
        bindings: &Map<String, Value>,
    ) -> Result<Vec<Value>, ServiceError> {
        self.transport.submit(query, bindings).await
    }

    /// Search vertices of one label by text match across the configured
    /// fields. An empty query returns no results without touching the store.
    ///
    /// # Errors
    ///
    /// Returns an error when the traversal fails.
    pub async fn search(
        &self,
        label: VertexLabel,
        search_query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Value>, ServiceError> {
        if search_query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let (traversal, bindings) =
            query::build_search_traversal(label, search_query, options, self.text_search_enabled);
        info!(label = label.as_str(), "graph search");

        self.transport.submit(&traversal, &bindings).await
    }

    /// List vertices of one label with the short projection.
    ///
    /// # Errors
    ///
    /// Returns an error when the traversal fails.
    pub async fn find_by_label(
        &self,
        label: VertexLabel,
        limit: u32,
    ) -> Result<Vec<Value>, ServiceError> {
        let traversal = query::build_label_traversal(label, limit);
        self.transport.submit(&traversal, &Map::new()).await
    }

    /// Look up a single vertex by id.
    ///
    /// # Errors
    ///
    /// Returns an error when the traversal fails.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Value>, ServiceError> {
        let (traversal, bindings) = query::build_id_traversal(id);
        let mut items = self.transport.submit(&traversal, &bindings).await?;
        if items.is_empty() {
            Ok(None)
        } else {
            Ok(Some(items.remove(0)))
        }
    }

    /// Verify connectivity with a cheap vertex-count probe.
    pub async fn test_connection(&self) -> bool {
        match self
            .transport
            .submit(query::connection_probe(), &Map::new())
            .await
        {
            Ok(items) => {
                info!(count = ?items.first(), "Neptune connection test successful");
                true
            }
            Err(e) => {
                error!(error = %e, "Neptune connection test failed");
                false
            }
        }
    }
}
