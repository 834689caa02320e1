//! Error types for the retrieval pipeline and the agent layer.
//!
//! Two taxonomies, kept separate so callers can tell a failed knowledge-base
//! lookup from a failed model call: [`RetrievalError`] covers the embedding →
//! plan → search → normalize pipeline, [`AgentError`] covers the chat-
//! completion transport and the tool-calling loop around it. Retrieval
//! failures cross the tool boundary unchanged via [`AgentError::Retrieval`].

use thiserror::Error;

/// Errors from the retrieval query pipeline.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The embedding request failed (auth, quota, network, malformed input).
    #[error("embedding request failed: {message}")]
    Embedding {
        /// Upstream error description.
        message: String,
    },

    /// The search index query failed (auth, network, malformed request,
    /// index unavailable).
    #[error("search request failed{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Search {
        /// Upstream error description.
        message: String,
        /// HTTP status code, when the index answered at all.
        status: Option<u16>,
    },

    /// Required configuration (endpoint, index name) is missing or invalid.
    #[error("invalid retrieval configuration: {message}")]
    Configuration {
        /// What is missing or malformed.
        message: String,
    },
}

/// Errors from the chat agent and its tool-calling loop.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No API key was provided or found in the environment.
    #[error("no API key configured (set OPENAI_API_KEY or RAGCHAT_API_KEY)")]
    ApiKeyMissing,

    /// The configured provider name has no registered implementation.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// The unrecognized provider name.
        name: String,
    },

    /// A chat completion request failed at the transport or API layer.
    #[error("chat completion request failed: {message}")]
    ApiRequest {
        /// Upstream error description.
        message: String,
        /// HTTP status code, if one was returned.
        status: Option<u16>,
    },

    /// A tool call could not be executed.
    #[error("tool '{name}' failed: {message}")]
    ToolExecution {
        /// Name of the tool that failed.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// A knowledge-base lookup failed inside a tool call.
    ///
    /// The embedding/search distinction of the inner error is preserved;
    /// the loop does not wrap or flatten it.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}
