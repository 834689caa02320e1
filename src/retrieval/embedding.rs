//! Embedding provider abstraction and its OpenAI-compatible implementation.
//!
//! One outbound call per invocation, no retry at this layer; retry policy
//! belongs to whatever wraps the pipeline. Embeddings are produced fresh per
//! query and never cached.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::CreateEmbeddingRequestArgs;
use async_trait::async_trait;

use crate::error::RetrievalError;

/// Trait for embedding backends.
///
/// Implementations turn a text string into a fixed-length dense vector whose
/// dimensionality is determined by the underlying model.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds the given text.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Embedding`] if the upstream model call
    /// fails (network, auth, quota).
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;
}

/// OpenAI-compatible embedding provider.
///
/// Works against the OpenAI API, Azure OpenAI deployments, and local proxies
/// via the base URL override.
pub struct OpenAiEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiEmbedder {
    /// Creates a new embedder for the given model/deployment name.
    #[must_use]
    pub fn new(api_key: &str, base_url: Option<&str>, model: impl Into<String>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url {
            config = config.with_api_base(url);
        }
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }

    /// Replaces newlines with spaces.
    ///
    /// This model family is sensitive to literal newlines; flattening them
    /// improves semantic consistency of the resulting vectors.
    fn normalize_input(text: &str) -> String {
        text.replace('\n', " ")
    }
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("client", &"<async-openai::Client>")
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let input = Self::normalize_input(text);

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(input)
            .build()
            .map_err(|e| RetrievalError::Embedding {
                message: e.to_string(),
            })?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| RetrievalError::Embedding {
                message: e.to_string(),
            })?;

        response
            .data
            .into_iter()
            .next()
            .map(|e| e.embedding)
            .ok_or_else(|| RetrievalError::Embedding {
                message: "no embedding in response".to_string(),
            })
    }
}
