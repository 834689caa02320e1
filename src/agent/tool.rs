//! Tool type definitions for function-calling.
//!
//! Provider-agnostic types for tool definitions, calls, and results, plus
//! the schema of the single retrieval tool this agent exposes.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Name of the knowledge-base retrieval tool.
pub const GET_INFORMATION: &str = "getInformation";

/// A tool definition that can be sent to an LLM for function-calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match the dispatch table in the executor).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema object describing the tool's parameters.
    pub parameters: serde_json::Value,
}

/// A tool call requested by the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call (assigned by the provider).
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON-encoded arguments for the tool.
    pub arguments: String,
}

/// The result of executing a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this result corresponds to.
    pub tool_call_id: String,
    /// Result content (JSON string on success, error message on failure).
    pub content: String,
    /// Whether this result represents an error the model should react to.
    pub is_error: bool,
}

/// A set of tool definitions offered to the agent for one turn.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    definitions: Vec<ToolDefinition>,
}

impl ToolSet {
    /// Returns the tool definitions in this set.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Returns `true` if this set contains no tools.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Tool set for the chat agent: the knowledge-base retrieval tool.
    #[must_use]
    pub fn chat_tools() -> Self {
        Self {
            definitions: vec![def_get_information()],
        }
    }

    /// Empty tool set (no tools available).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// Defines the `getInformation` tool.
fn def_get_information() -> ToolDefinition {
    ToolDefinition {
        name: GET_INFORMATION.to_string(),
        description: "Get information from your knowledge base to answer questions. \
                       Returns relevant text snippets with relevance scores."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The user's question to look up in the knowledge base."
                }
            },
            "required": ["question"],
            "additionalProperties": false
        }),
    }
}
