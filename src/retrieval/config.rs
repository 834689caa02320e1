//! Retrieval configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables.
//! The endpoint and index name are required; everything else is optional and
//! its absence degrades the pipeline gracefully (no semantic reranking, no
//! vector layer, whole-document text fallback) rather than failing.

use crate::error::RetrievalError;

/// Default search API version sent with every index request.
pub const DEFAULT_API_VERSION: &str = "2024-07-01";

/// Read-only configuration for the search index and result shaping.
///
/// Fixed at startup and shared by reference; retrieval calls never
/// mutate it, so concurrent chat turns need no synchronization.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Base URL of the search service (e.g. `https://myservice.search.windows.net`).
    pub endpoint: String,
    /// Name of the index to query.
    pub index_name: String,
    /// Admin/query API key. `None` relies on network-ambient auth.
    pub api_key: Option<String>,
    /// Semantic reranking profile name. `None` disables the semantic layer.
    pub semantic_configuration: Option<String>,
    /// Name of the vector field in the index. `None` disables the vector layer.
    pub vector_field: Option<String>,
    /// Name of the document field holding display text. `None` falls back to
    /// rendering the whole document.
    pub content_field: Option<String>,
    /// Search API version for REST requests.
    pub api_version: String,
}

impl RetrievalConfig {
    /// Creates a new builder for `RetrievalConfig`.
    #[must_use]
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Configuration`] if the endpoint or index
    /// name is missing.
    pub fn from_env() -> Result<Self, RetrievalError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    endpoint: Option<String>,
    index_name: Option<String>,
    api_key: Option<String>,
    semantic_configuration: Option<String>,
    vector_field: Option<String>,
    content_field: Option<String>,
    api_version: Option<String>,
}

impl RetrievalConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.endpoint.is_none() {
            self.endpoint = std::env::var("AZURE_SEARCH_ENDPOINT").ok();
        }
        if self.index_name.is_none() {
            self.index_name = std::env::var("AZURE_SEARCH_INDEX_NAME").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("AZURE_SEARCH_KEY").ok();
        }
        if self.semantic_configuration.is_none() {
            self.semantic_configuration =
                std::env::var("AZURE_SEARCH_SEMANTIC_CONFIGURATION_NAME").ok();
        }
        if self.vector_field.is_none() {
            self.vector_field = std::env::var("AZURE_SEARCH_VECTOR_FIELD").ok();
        }
        if self.content_field.is_none() {
            self.content_field = std::env::var("AZURE_SEARCH_CONTENT_FIELD").ok();
        }
        if self.api_version.is_none() {
            self.api_version = std::env::var("AZURE_SEARCH_API_VERSION").ok();
        }
        self
    }

    /// Sets the search service endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the index name.
    #[must_use]
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the semantic reranking configuration name.
    #[must_use]
    pub fn semantic_configuration(mut self, name: impl Into<String>) -> Self {
        self.semantic_configuration = Some(name.into());
        self
    }

    /// Sets the vector field name.
    #[must_use]
    pub fn vector_field(mut self, field: impl Into<String>) -> Self {
        self.vector_field = Some(field.into());
        self
    }

    /// Sets the content field name.
    #[must_use]
    pub fn content_field(mut self, field: impl Into<String>) -> Self {
        self.content_field = Some(field.into());
        self
    }

    /// Sets the search API version.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Builds the [`RetrievalConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Configuration`] if the endpoint or index
    /// name was not set.
    pub fn build(self) -> Result<RetrievalConfig, RetrievalError> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| RetrievalError::Configuration {
                message: "search endpoint not set (AZURE_SEARCH_ENDPOINT)".to_string(),
            })?;
        let index_name = self
            .index_name
            .ok_or_else(|| RetrievalError::Configuration {
                message: "index name not set (AZURE_SEARCH_INDEX_NAME)".to_string(),
            })?;

        Ok(RetrievalConfig {
            // A trailing slash would double up when joining request paths.
            endpoint: endpoint.trim_end_matches('/').to_string(),
            index_name,
            api_key: self.api_key,
            semantic_configuration: self.semantic_configuration,
            vector_field: self.vector_field,
            content_field: self.content_field,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_required_fields() {
        let config = RetrievalConfig::builder()
            .endpoint("https://svc.search.windows.net/")
            .index_name("docs")
            .build()
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(config.endpoint, "https://svc.search.windows.net");
        assert_eq!(config.index_name, "docs");
        assert!(config.api_key.is_none());
        assert!(config.semantic_configuration.is_none());
        assert!(config.vector_field.is_none());
        assert!(config.content_field.is_none());
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_builder_missing_endpoint() {
        let result = RetrievalConfig::builder().index_name("docs").build();
        assert!(matches!(
            result,
            Err(RetrievalError::Configuration { .. })
        ));
    }

    #[test]
    fn test_builder_missing_index() {
        let result = RetrievalConfig::builder()
            .endpoint("https://svc.search.windows.net")
            .build();
        assert!(matches!(
            result,
            Err(RetrievalError::Configuration { .. })
        ));
    }

    #[test]
    fn test_builder_optional_layers() {
        let config = RetrievalConfig::builder()
            .endpoint("https://svc.search.windows.net")
            .index_name("docs")
            .api_key("secret")
            .semantic_configuration("default-semantic")
            .vector_field("contentVector")
            .content_field("content")
            .api_version("2023-11-01")
            .build()
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(
            config.semantic_configuration.as_deref(),
            Some("default-semantic")
        );
        assert_eq!(config.vector_field.as_deref(), Some("contentVector"));
        assert_eq!(config.content_field.as_deref(), Some("content"));
        assert_eq!(config.api_version, "2023-11-01");
    }
}
