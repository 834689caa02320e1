//! Search request planning.
//!
//! Builds the hybrid search request sent to the index: a lexical base
//! request, optionally upgraded with semantic reranking and/or a vector
//! sub-query depending on what the configuration provides. The two upgrades
//! are independent and populate disjoint parts of the request, so check
//! order does not matter.

use serde::Serialize;

use super::config::RetrievalConfig;

/// Result cap applied to every search request.
pub const DEFAULT_TOP: usize = 5;

/// Nearest-neighbor count for the vector sub-query.
pub const VECTOR_K_NEAREST: usize = 4;

/// Query type of the base request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Plain lexical matching.
    Simple,
    /// Lexical matching followed by semantic reranking.
    Semantic,
}

/// Semantic reranking layer of a search request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSearchOptions {
    /// Name of the semantic configuration defined on the index.
    pub configuration_name: String,
}

/// A single vector sub-query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorQuery {
    /// Query kind discriminator; always `"vector"` here.
    pub kind: &'static str,
    /// Index fields to match the vector against.
    pub fields: Vec<String>,
    /// How many nearest neighbors to retrieve.
    pub k_nearest_neighbors_count: usize,
    /// The query embedding. Length equals the embedding model dimensionality.
    pub vector: Vec<f32>,
}

/// Vector layer of a search request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSearchOptions {
    /// Vector sub-queries to run alongside the lexical query.
    pub queries: Vec<VectorQuery>,
}

/// A fully assembled search request.
///
/// Serializes to the index wire shape; absent optional layers are omitted
/// from the JSON body entirely rather than sent as `null`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Raw query text for the lexical match.
    pub search: String,
    /// Maximum number of results to return.
    pub top: usize,
    /// Base query type.
    pub query_type: QueryType,
    /// Semantic reranking layer, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_search_options: Option<SemanticSearchOptions>,
    /// Vector layer, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_search_options: Option<VectorSearchOptions>,
}

/// Plans a search request from a query, its embedding, and the configuration.
///
/// Pure function of its inputs. Starts from a lexical request capped at
/// [`DEFAULT_TOP`], then layers on semantic reranking and/or a vector
/// sub-query when the configuration names them. With neither configured the
/// request stays pure-lexical; that is the intended degraded mode, not an
/// error.
#[must_use]
pub fn plan(query: &str, embedding: &[f32], config: &RetrievalConfig) -> SearchRequest {
    let mut request = SearchRequest {
        search: query.to_string(),
        top: DEFAULT_TOP,
        query_type: QueryType::Simple,
        semantic_search_options: None,
        vector_search_options: None,
    };

    if let Some(ref name) = config.semantic_configuration {
        request.query_type = QueryType::Semantic;
        request.semantic_search_options = Some(SemanticSearchOptions {
            configuration_name: name.clone(),
        });
    }

    if let Some(ref field) = config.vector_field {
        request.vector_search_options = Some(VectorSearchOptions {
            queries: vec![VectorQuery {
                kind: "vector",
                fields: vec![field.clone()],
                k_nearest_neighbors_count: VECTOR_K_NEAREST,
                vector: embedding.to_vec(),
            }],
        });
    }

    request
}
