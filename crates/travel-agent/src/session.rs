use chrono::{DateTime, FixedOffset, Local};
use travel_agent_core::{
    Agent, AgentBuilder, AgentError, RetryPolicy, TranscriptSource, Turn,
};
use travel_agent_model::{ModelProvider, ToolCallRequest};
use travel_agent_search::{SearchClient, SearchConfig};

use crate::plan::TripPlan;
use crate::tools::*;

const SYSTEM_PROMPT: &str = include_str!("./system_prompt.md");

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder,
    search_client: SearchClient,
    current_datetime: Option<DateTime<FixedOffset>>,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider, and the
    /// configuration of the search provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
        search_config: SearchConfig,
    ) -> Self {
        let agent_builder = AgentBuilder::with_model_provider(provider);
        Self {
            agent_builder,
            search_client: SearchClient::new(search_config),
            current_datetime: None,
        }
    }

    /// Sets the time the assistant is told it is. Defaults to the local
    /// time when the session is built.
    #[inline]
    pub fn with_current_datetime(
        mut self,
        current_datetime: DateTime<FixedOffset>,
    ) -> Self {
        self.current_datetime = Some(current_datetime);
        self
    }

    /// Sets how failed model requests are retried.
    #[inline]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.agent_builder = self.agent_builder.with_retry_policy(policy);
        self
    }

    /// Attaches a callback to be invoked when a transcript is generated.
    #[inline]
    pub fn on_transcript(
        mut self,
        on_transcript: impl Fn(&str, TranscriptSource) + Send + Sync + 'static,
    ) -> Self {
        self.agent_builder = self.agent_builder.on_transcript(on_transcript);
        self
    }

    /// Attaches a callback to be invoked before a tool is called.
    #[inline]
    pub fn on_tool_call(
        mut self,
        on_tool_call: impl Fn(&ToolCallRequest) + Send + Sync + 'static,
    ) -> Self {
        self.agent_builder = self.agent_builder.on_tool_call(on_tool_call);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        let current_datetime = self
            .current_datetime
            .unwrap_or_else(|| Local::now().fixed_offset());
        let prompt_template = SYSTEM_PROMPT
            .replace("{{INSTRUCTIONS}}", &TripPlan::instructions())
            .replace("{{CURRENT_DATETIME}}", &format_datetime(current_datetime));

        let agent = self
            .agent_builder
            .with_tool(SearchFlightsTool::new(self.search_client.clone()))
            .with_tool(SearchHotelsTool::new(self.search_client))
            .build();

        let mut session = Session {
            agent,
            plan: TripPlan::new(),
            prompt_template,
        };
        session.refresh_system_prompt();
        session
    }
}

#[inline]
fn format_datetime(datetime: DateTime<FixedOffset>) -> String {
    datetime.format("%A, %B %-d, %Y %H:%M (UTC%:z)").to_string()
}

/// A chat session with the travel planner.
///
/// The session holds a fully configured agent and the plan of the trip
/// being discussed. The plan advances as the agent searches and replies,
/// and the system prompt always reflects its progress.
pub struct Session {
    agent: Agent,
    plan: TripPlan,
    prompt_template: String,
}

impl Session {
    /// Sends a message and waits for the reply of the assistant.
    pub async fn send_message(
        &mut self,
        message: &str,
    ) -> Result<Turn, AgentError> {
        let turn = self.agent.send_message(message).await?;
        self.plan.record_turn(&turn);
        self.refresh_system_prompt();
        Ok(turn)
    }

    /// Returns the plan of the trip.
    #[inline]
    pub fn plan(&self) -> &TripPlan {
        &self.plan
    }

    /// Returns the underlying agent.
    #[inline]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Starts over with a new trip.
    pub fn reset(&mut self) {
        self.agent.reset();
        self.plan = TripPlan::new();
        self.refresh_system_prompt();
    }

    fn refresh_system_prompt(&mut self) {
        let prompt = self
            .prompt_template
            .replace("{{PROGRESS}}", &self.plan.checklist());
        self.agent.set_system_prompt(prompt);
    }
}
