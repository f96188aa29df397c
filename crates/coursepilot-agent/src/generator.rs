//! Response generator — the tool-calling loop around the provider.

use coursepilot_core::error::Result;
use coursepilot_core::traits::Provider;
use coursepilot_core::traits::provider::GenerateParams;
use coursepilot_core::types::{Message, Role};
use coursepilot_tools::ToolManager;

/// Base system prompt for every query.
const SYSTEM_PROMPT: &str = "\
You are an AI assistant specialized in course materials and educational content, \
with tools for searching course content.

Tool usage:
- search_course_content: for questions about specific course content or detailed educational materials
- get_course_outline: for questions about a course's structure, its lessons, or its link
- Use at most one round of tool calls per query when possible
- Synthesize tool results into accurate, fact-based responses
- If a tool yields no results, state this clearly without offering alternatives

Response requirements:
- Brief and focused, no meta-commentary about your search process
- General knowledge questions: answer from existing knowledge without tools
- Course-specific questions: search first, then answer
- For outline queries, include the course title, course link, and every lesson's number and title";

/// Drives query → (tool calls → tool results)* → answer against one
/// provider. Stateless between calls; history arrives pre-formatted
/// from the session manager.
pub struct AiGenerator {
    provider: Box<dyn Provider>,
    params: GenerateParams,
    max_tool_rounds: usize,
}

impl AiGenerator {
    pub fn new(provider: Box<dyn Provider>, params: GenerateParams, max_tool_rounds: usize) -> Self {
        Self {
            provider,
            params,
            max_tool_rounds,
        }
    }

    /// Produce a final text answer for one query.
    ///
    /// The model sees the tool schemas for up to `max_tool_rounds`
    /// requests; on the round after the last, tools are withheld so it
    /// must answer in text. Tool failures are relayed back to the model
    /// as result text rather than aborting the query.
    pub async fn generate(
        &self,
        query: &str,
        history: Option<&str>,
        tools: &ToolManager,
    ) -> Result<String> {
        let system = match history {
            Some(h) => format!("{SYSTEM_PROMPT}\n\nPrevious conversation:\n{h}"),
            None => SYSTEM_PROMPT.to_string(),
        };

        let mut conversation = vec![Message::system(system), Message::user(query)];
        let tool_defs = tools.definitions();

        for round in 0..=self.max_tool_rounds {
            let current_tools = if round < self.max_tool_rounds {
                tool_defs.as_slice()
            } else {
                &[]
            };

            let response = self
                .provider
                .chat(&conversation, current_tools, &self.params)
                .await?;

            // No tool calls means this is the final text answer.
            if response.tool_calls.is_empty() {
                return Ok(response
                    .content
                    .unwrap_or_else(|| "I'm not sure how to respond.".into()));
            }

            tracing::info!(
                "Tool round {}/{}: {} tool call(s)",
                round + 1,
                self.max_tool_rounds,
                response.tool_calls.len()
            );

            conversation.push(Message {
                role: Role::Assistant,
                content: response.content.unwrap_or_default(),
                tool_call_id: None,
                tool_calls: Some(response.tool_calls.clone()),
            });

            for tc in &response.tool_calls {
                tracing::debug!("  → {} ({})", tc.function.name, tc.function.arguments);
                let output = match tools.execute(&tc.function.name, &tc.function.arguments).await {
                    Ok(output) => output,
                    Err(e) => format!("Error executing tool: {e}"),
                };
                conversation.push(Message::tool(output, &tc.id));
            }
        }

        // Only reachable if the model keeps emitting tool calls even
        // after the schemas were withheld.
        Ok("I'm not sure how to respond.".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coursepilot_core::traits::Tool;
    use coursepilot_core::types::{
        FunctionCall, ProviderResponse, ToolCall, ToolDefinition,
    };
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider returning scripted responses, recording how many tool
    /// schemas each request carried.
    struct MockProvider {
        responses: Mutex<Vec<ProviderResponse>>,
        tools_seen: std::sync::Arc<Mutex<Vec<usize>>>,
    }

    impl MockProvider {
        fn new(mut responses: Vec<ProviderResponse>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                tools_seen: std::sync::Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn chat(
            &self,
            _messages: &[Message],
            tools: &[ToolDefinition],
            _params: &GenerateParams,
        ) -> Result<ProviderResponse> {
            self.tools_seen.lock().unwrap().push(tools.len());
            Ok(self.responses.lock().unwrap().pop().unwrap())
        }
    }

    struct CountingTool {
        calls: std::sync::Arc<AtomicUsize>,
        fail: bool,
    }

    impl CountingTool {
        fn with_counter(calls: std::sync::Arc<AtomicUsize>, fail: bool) -> Self {
            Self { calls, fail }
        }
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn name(&self) -> &str {
            "lookup"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "lookup".into(),
                description: "test lookup".into(),
                parameters: serde_json::json!({"type": "object", "properties": {}}),
            }
        }

        async fn execute(&self, _arguments: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(coursepilot_core::CoursePilotError::Tool("boom".into()))
            } else {
                Ok("lookup result".into())
            }
        }
    }

    fn text(content: &str) -> ProviderResponse {
        ProviderResponse {
            content: Some(content.into()),
            tool_calls: vec![],
            finish_reason: Some("stop".into()),
            usage: None,
        }
    }

    fn tool_call() -> ProviderResponse {
        ProviderResponse {
            content: None,
            tool_calls: vec![ToolCall {
                id: "call_1".into(),
                r#type: "function".into(),
                function: FunctionCall {
                    name: "lookup".into(),
                    arguments: "{}".into(),
                },
            }],
            finish_reason: Some("tool_calls".into()),
            usage: None,
        }
    }

    fn params() -> GenerateParams {
        GenerateParams {
            model: "test".into(),
            temperature: 0.0,
            max_tokens: 800,
        }
    }

    #[tokio::test]
    async fn test_direct_text_answer() {
        let generator =
            AiGenerator::new(Box::new(MockProvider::new(vec![text("Paris.")])), params(), 2);
        let answer = generator
            .generate("Capital of France?", None, &ToolManager::new())
            .await
            .unwrap();
        assert_eq!(answer, "Paris.");
    }

    #[tokio::test]
    async fn test_tool_round_then_answer() {
        let provider = MockProvider::new(vec![tool_call(), text("Answer from tool.")]);
        let generator = AiGenerator::new(Box::new(provider), params(), 2);

        let calls = std::sync::Arc::new(AtomicUsize::new(0));
        let mut tools = ToolManager::new();
        tools.register(Box::new(CountingTool::with_counter(calls.clone(), false)));

        let answer = generator.generate("q", None, &tools).await.unwrap();
        assert_eq!(answer, "Answer from tool.");
        // One tool round, one execution.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tools_withheld_after_max_rounds() {
        // Two tool rounds allowed; the model keeps calling tools, so
        // the third request must go out with zero tool schemas.
        let provider = MockProvider::new(vec![tool_call(), tool_call(), text("Forced answer.")]);
        let tools_seen = provider.tools_seen.clone();
        let generator = AiGenerator::new(Box::new(provider), params(), 2);

        let mut tools = ToolManager::new();
        tools.register(Box::new(CountingTool::with_counter(
            std::sync::Arc::new(AtomicUsize::new(0)),
            false,
        )));

        let answer = generator.generate("q", None, &tools).await.unwrap();
        assert_eq!(answer, "Forced answer.");
        assert_eq!(*tools_seen.lock().unwrap(), vec![1, 1, 0]);
    }

    #[tokio::test]
    async fn test_tool_failure_relayed_as_text() {
        let provider = MockProvider::new(vec![tool_call(), text("Recovered.")]);
        let generator = AiGenerator::new(Box::new(provider), params(), 2);

        let mut tools = ToolManager::new();
        tools.register(Box::new(CountingTool::with_counter(
            std::sync::Arc::new(AtomicUsize::new(0)),
            true,
        )));

        // The tool errors but the query still completes.
        let answer = generator.generate("q", None, &tools).await.unwrap();
        assert_eq!(answer, "Recovered.");
    }

    #[tokio::test]
    async fn test_unknown_tool_call_relayed_as_text() {
        // Model calls a tool that was never registered.
        let provider = MockProvider::new(vec![tool_call(), text("Still fine.")]);
        let generator = AiGenerator::new(Box::new(provider), params(), 2);

        let answer = generator
            .generate("q", None, &ToolManager::new())
            .await
            .unwrap();
        assert_eq!(answer, "Still fine.");
    }
}
