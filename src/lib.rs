//! # ragchat-rs
//!
//! Retrieval-augmented chat agent grounded by a hosted search index.
//!
//! The core is the retrieval query pipeline: a free-text query is embedded,
//! a hybrid search request (lexical + optional semantic reranking +
//! optional vector sub-query) is assembled and sent to the index, and the
//! heterogeneous result documents are normalized into uniform
//! [`retrieval::Snippet`] values identified by a content-derived hash. The
//! pipeline is exposed to the chat model as a single callable tool inside a
//! bounded tool-round loop.
//!
//! # Modules
//!
//! - [`retrieval`] — embedding, request planning, index client, snippet
//!   normalization, and the [`retrieval::KnowledgeBase`] entry point
//! - [`agent`] — LLM provider abstraction, tool dispatch, the per-turn
//!   round loop, and [`agent::ChatSession`]
//! - [`error`] — the [`error::RetrievalError`] / [`error::AgentError`]
//!   taxonomies
//! - [`cli`] — command-line interface

pub mod agent;
pub mod cli;
pub mod error;
pub mod retrieval;

pub use agent::{AgentConfig, ChatSession};
pub use error::{AgentError, RetrievalError};
pub use retrieval::{KnowledgeBase, RetrievalConfig, Snippet};
