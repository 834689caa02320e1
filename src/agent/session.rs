//! Multi-turn chat session over the knowledge base.
//!
//! Owns the conversation history and runs one bounded tool-round loop per
//! user turn. A failed turn leaves no trace: the history is rolled back to
//! its pre-turn length before the error is surfaced, so the next attempt
//! starts clean.

use tracing::{debug, warn};

use super::config::AgentConfig;
use super::executor::ToolExecutor;
use super::message::{ChatMessage, ChatRequest, assistant_message, system_message, user_message};
use super::provider::LlmProvider;
use super::tool::ToolSet;
use super::turn::run_tool_rounds;
use crate::error::AgentError;
use crate::retrieval::KnowledgeBase;

/// System prompt pinning the agent to knowledge-base answers.
const SYSTEM_PROMPT: &str = "You are a helpful assistant. Check your knowledge base before \
    answering any question. Only respond to questions using information from tool calls. \
    If no relevant information is found in the tool calls, respond \"Sorry, I don't know.\"";

/// A chat session: provider, knowledge base, and conversation history.
pub struct ChatSession {
    provider: Box<dyn LlmProvider>,
    knowledge_base: KnowledgeBase,
    config: AgentConfig,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    /// Creates a new session with an empty history.
    #[must_use]
    pub fn new(
        provider: Box<dyn LlmProvider>,
        knowledge_base: KnowledgeBase,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            knowledge_base,
            config,
            history: vec![system_message(SYSTEM_PROMPT)],
        }
    }

    /// Number of messages currently in the history (including the system
    /// prompt).
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Runs one user turn: retrieval tool rounds, then a final answer.
    ///
    /// On success the final assistant answer is appended to the history and
    /// returned. On failure the history is truncated back to its pre-turn
    /// length and the error is surfaced to the caller, who owns the
    /// user-visible message.
    ///
    /// # Errors
    ///
    /// Propagates [`AgentError`] from the provider or the retrieval tool.
    pub async fn ask(&mut self, user_text: &str) -> Result<String, AgentError> {
        let checkpoint = self.history.len();
        self.history.push(user_message(user_text));

        let mut request = ChatRequest {
            model: self.config.chat_model.clone(),
            messages: self.history.clone(),
            temperature: Some(0.0),
            max_tokens: Some(self.config.max_tokens),
            tools: ToolSet::chat_tools().definitions().to_vec(),
        };

        let executor = ToolExecutor::new(&self.knowledge_base);
        let outcome = run_tool_rounds(
            self.provider.as_ref(),
            &mut request,
            &executor,
            self.config.max_tool_rounds,
        )
        .await;

        match outcome {
            Ok(response) => {
                // Keep the full transcript (tool traffic included) so later
                // turns can refer back to retrieved snippets.
                self.history = request.messages;
                self.history.push(assistant_message(&response.content));
                debug!(
                    history_len = self.history.len(),
                    tokens = response.usage.total_tokens,
                    "turn complete"
                );
                Ok(response.content)
            }
            Err(e) => {
                self.history.truncate(checkpoint);
                warn!(error = %e, "turn failed, history rolled back");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("provider", &self.provider.name())
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}
