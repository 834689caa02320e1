//! Tool executor that dispatches tool calls to the knowledge base.
//!
//! Maps tool names to direct Rust calls against [`KnowledgeBase`]. Two
//! failure channels on purpose: mistakes the model can correct (unknown tool,
//! malformed arguments) come back as error-flagged [`ToolResult`]s, while
//! knowledge-base failures (embedding, search) are returned as `Err` and
//! abort the turn — the pipeline does not catch-and-suppress them.

use serde::Deserialize;
use tracing::debug;

use crate::error::AgentError;
use crate::retrieval::KnowledgeBase;

use super::tool::{GET_INFORMATION, ToolCall, ToolResult};

/// Maximum raw byte length of tool argument JSON from the LLM.
const MAX_TOOL_ARGS_LEN: usize = 10_000;

/// Executes tool calls by dispatching to the knowledge base.
pub struct ToolExecutor<'a> {
    knowledge_base: &'a KnowledgeBase,
}

impl<'a> ToolExecutor<'a> {
    /// Creates a new executor backed by the given knowledge base.
    #[must_use]
    pub const fn new(knowledge_base: &'a KnowledgeBase) -> Self {
        Self { knowledge_base }
    }

    /// Dispatches a tool call to the appropriate function.
    ///
    /// Validates raw argument size before dispatch to bound payloads.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Retrieval`] when the knowledge-base lookup
    /// itself fails; the embedding/search distinction is preserved for the
    /// caller.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult, AgentError> {
        if call.arguments.len() > MAX_TOOL_ARGS_LEN {
            return Ok(model_error(
                call,
                &format!(
                    "tool arguments too large ({} bytes, max {MAX_TOOL_ARGS_LEN})",
                    call.arguments.len()
                ),
            ));
        }

        match call.name.as_str() {
            GET_INFORMATION => self.tool_get_information(call).await,
            other => {
                debug!(tool = other, "unknown tool requested");
                Ok(model_error(call, &format!("unknown tool: {other}")))
            }
        }
    }

    /// Looks up relevant snippets for the model's question.
    async fn tool_get_information(&self, call: &ToolCall) -> Result<ToolResult, AgentError> {
        #[derive(Deserialize)]
        struct Args {
            question: String,
        }

        let args: Args = match serde_json::from_str(&call.arguments) {
            Ok(args) => args,
            Err(e) => return Ok(model_error(call, &format!("invalid arguments: {e}"))),
        };

        let snippets = self
            .knowledge_base
            .find_relevant_content(&args.question)
            .await?;
        debug!(count = snippets.len(), "knowledge base returned snippets");

        let content =
            serde_json::to_string_pretty(&snippets).map_err(|e| AgentError::ToolExecution {
                name: GET_INFORMATION.to_string(),
                message: format!("serialization error: {e}"),
            })?;

        Ok(ToolResult {
            tool_call_id: call.id.clone(),
            content,
            is_error: false,
        })
    }
}

/// Builds an error-flagged result the model can read and react to.
fn model_error(call: &ToolCall, message: &str) -> ToolResult {
    ToolResult {
        tool_call_id: call.id.clone(),
        content: message.to_string(),
        is_error: true,
    }
}
