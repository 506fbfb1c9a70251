use travel_agent_model::{ModelProvider, ToolCallRequest};

use super::{Agent, ToolCallFn, TranscriptFn, TranscriptSource};
use crate::model_client::{ModelClient, RetryPolicy};
use crate::tool::{Manager as ToolManager, Tool};

const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// [`Agent`] builder.
pub struct AgentBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) tools: ToolManager,
    pub(crate) system_prompt: Option<String>,
    pub(crate) max_tool_rounds: usize,
    pub(crate) on_transcript: Option<TranscriptFn>,
    pub(crate) on_tool_call: Option<ToolCallFn>,
}

impl AgentBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            tools: Default::default(),
            system_prompt: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            on_transcript: None,
            on_tool_call: None,
        }
    }

    /// Sets the system prompt sent at the start of every request.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Registers a tool. A tool with the same name replaces the previous
    /// one.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        self.tools.add_tool(tool);
        self
    }

    /// Limits how many rounds of tool calls a single message may take.
    #[inline]
    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    /// Sets how failed model requests are retried.
    #[inline]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.model_client.set_retry_policy(policy);
        self
    }

    /// Attaches a callback invoked for every item added to the
    /// conversation.
    #[inline]
    pub fn on_transcript(
        mut self,
        on_transcript: impl Fn(&str, TranscriptSource) + Send + Sync + 'static,
    ) -> Self {
        self.on_transcript = Some(Box::new(on_transcript));
        self
    }

    /// Attaches a callback invoked right before a tool call is executed.
    #[inline]
    pub fn on_tool_call(
        mut self,
        on_tool_call: impl Fn(&ToolCallRequest) + Send + Sync + 'static,
    ) -> Self {
        self.on_tool_call = Some(Box::new(on_tool_call));
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent {
        Agent::from_builder(self)
    }
}
