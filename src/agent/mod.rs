//! Chat agent layer: provider abstraction, tool calling, and the bounded
//! per-turn tool-round loop.
//!
//! # Architecture
//!
//! ```text
//! user turn → ChatSession
//!   ├── ChatRequest (history + retrieval tool definition)
//!   ├── run_tool_rounds (≤ max_tool_rounds)
//!   │   ├── LlmProvider.chat
//!   │   └── ToolExecutor → KnowledgeBase.find_relevant_content
//!   └── final assistant answer appended to history
//! ```

pub mod config;
pub mod executor;
pub mod message;
pub mod provider;
pub mod providers;
pub mod session;
pub mod tool;
pub mod turn;

// Re-export key types
pub use config::AgentConfig;
pub use executor::ToolExecutor;
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use provider::LlmProvider;
pub use providers::{OpenAiProvider, create_provider};
pub use session::ChatSession;
pub use tool::{ToolCall, ToolDefinition, ToolResult, ToolSet};
pub use turn::run_tool_rounds;
