//! Bounded tool-round loop for one user turn.
//!
//! Drives the model ↔ tool round-trip: send the request, execute any tool
//! calls in the response, append results, repeat. A response without tool
//! calls is the final answer. Reaching the round ceiling withdraws the tool
//! definitions and forces one last completion, so the model must answer from
//! the tool output accumulated so far — a ceiling is a stop sign, not an
//! error.

use tracing::debug;

use super::executor::ToolExecutor;
use super::message::{ChatRequest, ChatResponse, assistant_tool_calls_message, tool_message};
use super::provider::LlmProvider;
use crate::error::AgentError;

/// Runs the tool-round loop for one turn.
///
/// The request is mutated in place: assistant tool-call messages and tool
/// results are appended each round so the accumulated transcript is visible
/// to later rounds (and to the caller for history keeping). The round
/// counter lives on this call's stack, so concurrent turns can never share
/// or corrupt each other's counts.
///
/// # Errors
///
/// Propagates provider failures and knowledge-base failures from tool
/// execution unchanged.
pub async fn run_tool_rounds(
    provider: &dyn LlmProvider,
    request: &mut ChatRequest,
    executor: &ToolExecutor<'_>,
    max_rounds: usize,
) -> Result<ChatResponse, AgentError> {
    for round in 0..max_rounds {
        let response = provider.chat(request).await?;

        if response.tool_calls.is_empty() {
            debug!(round, "turn completed with final text response");
            return Ok(response);
        }

        debug!(
            round,
            tool_count = response.tool_calls.len(),
            "executing tool calls"
        );

        request
            .messages
            .push(assistant_tool_calls_message(response.tool_calls.clone()));

        for call in &response.tool_calls {
            let result = executor.execute(call).await?;
            debug!(
                tool = call.name,
                call_id = call.id,
                is_error = result.is_error,
                "tool execution complete"
            );
            request
                .messages
                .push(tool_message(&result.tool_call_id, &result.content));
        }
    }

    // Round ceiling reached: no further tool calls are honored this turn.
    debug!(max_rounds, "tool round ceiling reached, forcing final answer");
    request.tools.clear();
    provider.chat(request).await
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::message::{TokenUsage, system_message, user_message};
    use crate::agent::tool::{GET_INFORMATION, ToolCall, ToolSet};
    use crate::retrieval::KnowledgeBase;
    use crate::retrieval::tests::{StubEmbedder, StubIndex, refund_rows, test_config};

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    /// Provider that keeps requesting the retrieval tool while tools are on
    /// offer, and answers with text once they are withdrawn (or after a set
    /// number of rounds).
    struct MockToolProvider {
        call_count: AtomicUsize,
        tool_rounds: usize,
    }

    impl MockToolProvider {
        const fn new(tool_rounds: usize) -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                tool_rounds,
            }
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for MockToolProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            let count = self.call_count.fetch_add(1, Ordering::SeqCst);

            if count < self.tool_rounds && !request.tools.is_empty() {
                Ok(ChatResponse {
                    content: String::new(),
                    usage: TokenUsage::default(),
                    tool_calls: vec![ToolCall {
                        id: format!("call_{count}"),
                        name: GET_INFORMATION.to_string(),
                        arguments: r#"{"question":"What is the refund policy?"}"#.to_string(),
                    }],
                    finish_reason: Some("tool_calls".to_string()),
                })
            } else {
                Ok(ChatResponse {
                    content: "Refunds are accepted within 30 days.".to_string(),
                    usage: TokenUsage {
                        prompt_tokens: 100,
                        completion_tokens: 20,
                        total_tokens: 120,
                    },
                    tool_calls: Vec::new(),
                    finish_reason: Some("stop".to_string()),
                })
            }
        }
    }

    fn knowledge_base() -> KnowledgeBase {
        KnowledgeBase::new(
            Box::new(StubEmbedder {
                vector: vec![0.1, 0.2],
                fail: false,
            }),
            Box::new(StubIndex {
                rows: refund_rows(),
                fail: false,
            }),
            test_config(),
        )
    }

    fn turn_request() -> ChatRequest {
        ChatRequest {
            model: "test".to_string(),
            messages: vec![
                system_message("Answer from the knowledge base."),
                user_message("What is the refund policy?"),
            ],
            temperature: Some(0.0),
            max_tokens: Some(1024),
            tools: ToolSet::chat_tools().definitions().to_vec(),
        }
    }

    #[tokio::test]
    async fn test_single_tool_round() {
        let kb = knowledge_base();
        let executor = ToolExecutor::new(&kb);
        let provider = MockToolProvider::new(1);
        let mut request = turn_request();

        let response = run_tool_rounds(&provider, &mut request, &executor, 4)
            .await
            .unwrap_or_else(|e| panic!("turn failed: {e}"));

        assert_eq!(response.content, "Refunds are accepted within 30 days.");
        // system + user + assistant(tool_calls) + tool(result) = 4 messages
        assert_eq!(request.messages.len(), 4);
    }

    #[tokio::test]
    async fn test_no_tool_rounds() {
        let kb = knowledge_base();
        let executor = ToolExecutor::new(&kb);
        let provider = MockToolProvider::new(0);
        let mut request = turn_request();

        let response = run_tool_rounds(&provider, &mut request, &executor, 4)
            .await
            .unwrap_or_else(|e| panic!("turn failed: {e}"));

        assert!(!response.content.is_empty());
        assert_eq!(request.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_round_cap_forces_final_answer() {
        let kb = knowledge_base();
        let executor = ToolExecutor::new(&kb);
        // Provider would request tools forever if allowed.
        let provider = MockToolProvider::new(usize::MAX);
        let mut request = turn_request();

        let response = run_tool_rounds(&provider, &mut request, &executor, 4)
            .await
            .unwrap_or_else(|e| panic!("turn failed: {e}"));

        // 4 tool rounds + 1 forced final completion, no 5th tool invocation.
        assert_eq!(provider.calls(), 5);
        assert!(request.tools.is_empty());
        assert_eq!(response.content, "Refunds are accepted within 30 days.");
        // 2 initial + 4 rounds * (assistant + tool) = 10 messages
        assert_eq!(request.messages.len(), 10);
    }

    #[tokio::test]
    async fn test_tool_failure_aborts_turn() {
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
        let executor = ToolExecutor::new(&kb);
        let provider = MockToolProvider::new(1);
        let mut request = turn_request();

        let result = run_tool_rounds(&provider, &mut request, &executor, 4).await;
        assert!(matches!(
            result,
            Err(AgentError::Retrieval(
                crate::error::RetrievalError::Search { .. }
            ))
        ));
    }
}
