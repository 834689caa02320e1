//! Retrieval query pipeline.
//!
//! Turns a free-text user query into grounded snippets in four steps:
//!
//! ```text
//! query → embed → plan → query index → normalize → Vec<Snippet>
//! ```
//!
//! The pipeline is sequential per call and holds no mutable shared state;
//! concurrent chat turns only share the read-only [`RetrievalConfig`].

pub mod config;
pub mod embedding;
pub mod index;
pub mod planner;
pub mod snippet;

use tracing::debug;

pub use config::RetrievalConfig;
pub use embedding::{EmbeddingProvider, OpenAiEmbedder};
pub use index::{HostedSearchIndex, ScoredDocument, SearchIndex};
pub use planner::{SearchRequest, plan};
pub use snippet::{Snippet, content_id, dedup_snippets, normalize};

use crate::error::RetrievalError;

/// The retrieval tool: embedding provider, search index, and result shaping
/// composed behind one entry point.
pub struct KnowledgeBase {
    embedder: Box<dyn EmbeddingProvider>,
    index: Box<dyn SearchIndex>,
    config: RetrievalConfig,
}

impl KnowledgeBase {
    /// Composes a knowledge base from its collaborators.
    #[must_use]
    pub fn new(
        embedder: Box<dyn EmbeddingProvider>,
        index: Box<dyn SearchIndex>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    /// Wires the default hosted index and OpenAI-compatible embedder from
    /// the given configurations.
    #[must_use]
    pub fn from_config(
        retrieval: RetrievalConfig,
        api_key: &str,
        base_url: Option<&str>,
        embedding_model: &str,
    ) -> Self {
        let embedder = OpenAiEmbedder::new(api_key, base_url, embedding_model);
        let index = HostedSearchIndex::new(retrieval.clone());
        Self::new(Box::new(embedder), Box::new(index), retrieval)
    }

    /// Retrieves snippets relevant to the user query.
    ///
    /// Ordering is the index's descending relevance order; no re-sort and no
    /// deduplication happen here. The first failure (embedding or search) is
    /// propagated unchanged — a failed search never degrades to an empty
    /// result list.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Embedding`] or [`RetrievalError::Search`]
    /// from the respective stage.
    pub async fn find_relevant_content(
        &self,
        user_query: &str,
    ) -> Result<Vec<Snippet>, RetrievalError> {
        let embedding = self.embedder.embed(user_query).await?;
        debug!(dims = embedding.len(), "query embedded");

        let request = plan(user_query, &embedding, &self.config);
        debug!(
            query_type = ?request.query_type,
            vector = request.vector_search_options.is_some(),
            "search request planned"
        );

        let results = self.index.query(&request).await?;
        debug!(count = results.len(), "index results received");

        let content_field = self.config.content_field.as_deref();
        Ok(results
            .into_iter()
            .map(|scored| normalize(&scored.document, scored.score, content_field))
            .collect())
    }
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("index", &self.config.index_name)
            .field("content_field", &self.config.content_field)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    /// Embedder returning a fixed vector, or failing on demand.
    pub(crate) struct StubEmbedder {
        pub vector: Vec<f32>,
        pub fail: bool,
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, RetrievalError> {
            if self.fail {
                return Err(RetrievalError::Embedding {
                    message: "stub embedding failure".to_string(),
                });
            }
            Ok(self.vector.clone())
        }
    }

    /// Index returning canned rows, or failing on demand.
    pub(crate) struct StubIndex {
        pub rows: Vec<ScoredDocument>,
        pub fail: bool,
    }

    #[async_trait]
    impl SearchIndex for StubIndex {
        async fn query(
            &self,
            _request: &SearchRequest,
        ) -> Result<Vec<ScoredDocument>, RetrievalError> {
            if self.fail {
                return Err(RetrievalError::Search {
                    message: "stub transport failure".to_string(),
                    status: None,
                });
            }
            Ok(self
                .rows
                .iter()
                .map(|r| ScoredDocument {
                    document: r.document.clone(),
                    score: r.score,
                })
                .collect())
        }
    }

    pub(crate) fn test_config() -> RetrievalConfig {
        RetrievalConfig::builder()
            .endpoint("https://svc.search.windows.net")
            .index_name("docs")
            .content_field("contentField")
            .build()
            .unwrap_or_else(|e| panic!("config build failed: {e}"))
    }

    pub(crate) fn refund_rows() -> Vec<ScoredDocument> {
        vec![
            ScoredDocument {
                document: json!({ "contentField": "Refunds within 30 days." }),
                score: 0.92,
            },
            ScoredDocument {
                document: json!({ "contentField": "Refunds within 30 days." }),
                score: 0.81,
            },
        ]
    }

    #[tokio::test]
    async fn test_pipeline_preserves_index_order() {
        let kb = KnowledgeBase::new(
            Box::new(StubEmbedder {
                vector: vec![0.1, 0.2],
                fail: false,
            }),
            Box::new(StubIndex {
                rows: refund_rows(),
                fail: false,
            }),
            test_config(),
        );

        let snippets = kb
            .find_relevant_content("What is the refund policy?")
            .await
            .unwrap_or_else(|e| panic!("retrieval failed: {e}"));

        assert_eq!(snippets.len(), 2);
        assert!((snippets[0].similarity - 0.92).abs() < f64::EPSILON);
        assert!((snippets[1].similarity - 0.81).abs() < f64::EPSILON);
        // Identical text yields identical content ids.
        assert_eq!(snippets[0].id, snippets[1].id);
        assert_eq!(snippets[0].text, "Refunds within 30 days.");
    }

    #[tokio::test]
    async fn test_search_failure_propagates_as_search_error() {
        let kb = KnowledgeBase::new(
            Box::new(StubEmbedder {
                vector: vec![0.1],
                fail: false,
            }),
            Box::new(StubIndex {
                rows: Vec::new(),
                fail: true,
            }),
            test_config(),
        );

        let result = kb.find_relevant_content("anything").await;
        assert!(matches!(result, Err(RetrievalError::Search { .. })));
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates_as_embedding_error() {
        let kb = KnowledgeBase::new(
            Box::new(StubEmbedder {
                vector: Vec::new(),
                fail: true,
            }),
            Box::new(StubIndex {
                rows: refund_rows(),
                fail: false,
            }),
            test_config(),
        );

        let result = kb.find_relevant_content("anything").await;
        assert!(matches!(result, Err(RetrievalError::Embedding { .. })));
    }

    #[tokio::test]
    async fn test_empty_index_yields_empty_snippets() {
        let kb = KnowledgeBase::new(
            Box::new(StubEmbedder {
                vector: vec![0.5],
                fail: false,
            }),
            Box::new(StubIndex {
                rows: Vec::new(),
                fail: false,
            }),
            test_config(),
        );

        let snippets = kb
            .find_relevant_content("unmatched query")
            .await
            .unwrap_or_else(|e| panic!("retrieval failed: {e}"));
        assert!(snippets.is_empty());
    }
}
