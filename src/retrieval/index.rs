//! Search index abstraction and its hosted REST implementation.
//!
//! The index is an opaque, externally-synchronized service; this client
//! sends one POST per retrieval call and surfaces failures to the caller
//! without retrying or partially recovering.

use async_trait::async_trait;
use serde_json::Value;

use super::config::RetrievalConfig;
use super::planner::SearchRequest;
use crate::error::RetrievalError;

/// Key prefix the index uses for out-of-band result metadata.
const METADATA_PREFIX: &str = "@search.";

/// Relevance score key attached to each result row.
const SCORE_KEY: &str = "@search.score";

/// One raw result: the document fields plus the relevance score the index
/// attached out of band.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    /// Document fields as returned by the index, metadata stripped.
    pub document: Value,
    /// Relevance score; units depend on the active search mode.
    pub score: f64,
}

/// Trait for search index backends.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Executes an assembled search request.
    ///
    /// Results arrive in the index's relevance order and are consumed once;
    /// no re-sorting happens downstream.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Search`] on transport failures, auth
    /// rejections, or malformed requests.
    async fn query(&self, request: &SearchRequest) -> Result<Vec<ScoredDocument>, RetrievalError>;
}

/// REST client for a hosted search service.
#[derive(Debug, Clone)]
pub struct HostedSearchIndex {
    http: reqwest::Client,
    config: RetrievalConfig,
}

impl HostedSearchIndex {
    /// Creates a new client over the given configuration.
    #[must_use]
    pub fn new(config: RetrievalConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// URL of the document search operation for the configured index.
    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.config.endpoint, self.config.index_name, self.config.api_version
        )
    }

    /// Splits one result row into document fields and the relevance score.
    ///
    /// The index inlines `@search.*` metadata next to the document fields;
    /// only the fields themselves belong to the document handed onward.
    fn split_row(row: Value) -> ScoredDocument {
        let Value::Object(map) = row else {
            return ScoredDocument {
                document: row,
                score: 0.0,
            };
        };

        let score = map
            .get(SCORE_KEY)
            .and_then(Value::as_f64)
            .unwrap_or_default();
        let document: serde_json::Map<String, Value> = map
            .into_iter()
            .filter(|(key, _)| !key.starts_with(METADATA_PREFIX))
            .collect();

        ScoredDocument {
            document: Value::Object(document),
            score,
        }
    }
}

#[async_trait]
impl SearchIndex for HostedSearchIndex {
    async fn query(&self, request: &SearchRequest) -> Result<Vec<ScoredDocument>, RetrievalError> {
        let mut builder = self.http.post(self.search_url()).json(request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.header("api-key", key);
        }

        let response = builder.send().await.map_err(|e| RetrievalError::Search {
            message: e.to_string(),
            status: e.status().map(|s| s.as_u16()),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Search {
                message: if body.is_empty() {
                    format!("index rejected request: {status}")
                } else {
                    body
                },
                status: Some(status.as_u16()),
            });
        }

        let payload: Value = response.json().await.map_err(|e| RetrievalError::Search {
            message: format!("malformed index response: {e}"),
            status: None,
        })?;

        let rows = payload
            .get("value")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(rows.into_iter().map(Self::split_row).collect())
    }
}
