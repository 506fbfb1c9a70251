mod builder;

use std::error::Error as StdError;
use std::fmt::{self, Display};

use serde_json::Value;
use travel_agent_model::{
    ModelMessage, ModelProviderError, ModelRequest, ToolCallRequest,
    ToolCallResult,
};

use crate::conversation::Conversation;
use crate::model_client::ModelClient;
use crate::tool::{Manager as ToolManager, ToolResult};
pub use builder::AgentBuilder;

type TranscriptFn = Box<dyn Fn(&str, TranscriptSource) + Send + Sync>;
type ToolCallFn = Box<dyn Fn(&ToolCallRequest) + Send + Sync>;

/// Who produced a conversation item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TranscriptSource {
    /// The user input.
    User,
    /// The model output.
    Assistant,
    /// A tool call result.
    Tool,
}

/// A tool call made while answering a message, with its outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCallRecord {
    /// The identifier assigned by the model.
    pub id: String,
    /// Name of the called tool.
    pub name: String,
    /// Arguments passed by the model.
    pub arguments: Value,
    /// What the tool returned.
    pub result: ToolResult,
}

/// The outcome of [`Agent::send_message`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Turn {
    /// The final reply of the model.
    pub reply: String,
    /// Tool calls made before the reply, in the order they were requested.
    pub tool_calls: Vec<ToolCallRecord>,
}

/// Errors that end a turn early.
#[derive(Debug)]
pub enum AgentError {
    /// The model request failed, after retries if the error was transient.
    Model(Box<dyn ModelProviderError>),
    /// The model kept calling tools without giving a reply.
    ToolRoundsExceeded(usize),
}

impl Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Model(err) => write!(f, "model request failed: {err}"),
            AgentError::ToolRoundsExceeded(rounds) => {
                write!(f, "no reply after {rounds} rounds of tool calls")
            }
        }
    }
}

impl StdError for AgentError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AgentError::Model(err) => Some(&**err),
            AgentError::ToolRoundsExceeded(_) => None,
        }
    }
}

/// An agent instance, which maintains a conversation, a model client and
/// the registered tools.
///
/// Every message runs the loop of asking the model, executing the tools it
/// requests and feeding the results back, until the model replies with
/// text.
pub struct Agent {
    model_client: ModelClient,
    tools: ToolManager,
    conversation: Conversation,
    system_prompt: Option<String>,
    max_tool_rounds: usize,

    on_transcript: Option<TranscriptFn>,
    on_tool_call: Option<ToolCallFn>,
}

impl Agent {
    fn from_builder(builder: AgentBuilder) -> Self {
        let AgentBuilder {
            model_client,
            tools,
            system_prompt,
            max_tool_rounds,
            on_transcript,
            on_tool_call,
        } = builder;

        Self {
            model_client,
            tools,
            conversation: Default::default(),
            system_prompt,
            max_tool_rounds,
            on_transcript,
            on_tool_call,
        }
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Replaces the system prompt used by subsequent requests.
    #[inline]
    pub fn set_system_prompt<S: Into<String>>(&mut self, system_prompt: S) {
        self.system_prompt = Some(system_prompt.into());
    }

    /// Forgets the conversation. The system prompt and tools are kept.
    #[inline]
    pub fn reset(&mut self) {
        self.conversation = Default::default();
    }

    /// Sends a user message and drives the agent until the model replies.
    ///
    /// If an error is returned, the conversation is rolled back to what it
    /// was before this call.
    pub async fn send_message<S: Into<String>>(
        &mut self,
        input: S,
    ) -> Result<Turn, AgentError> {
        let checkpoint = self.conversation.len();
        let result = self.run_turn(input.into()).await;
        if result.is_err() {
            self.conversation.items.truncate(checkpoint);
        }
        result
    }

    async fn run_turn(&mut self, input: String) -> Result<Turn, AgentError> {
        let msg = ModelMessage::User(input.clone());
        self.push(msg, input, TranscriptSource::User);

        let mut tool_calls = vec![];
        for round in 0..=self.max_tool_rounds {
            let req = self.make_request();
            let resp = self
                .model_client
                .send_request(&req)
                .await
                .map_err(AgentError::Model)?;

            let no_calls = resp.tool_calls.is_empty();
            let transcript = match (&resp.content, no_calls) {
                (Some(content), _) => content.clone(),
                (None, true) => String::new(),
                (None, false) => resp
                    .tool_calls
                    .iter()
                    .map(|call| format!("[calling {}]", call.name))
                    .collect::<Vec<_>>()
                    .join(" "),
            };
            self.push(
                resp.to_message(),
                transcript,
                TranscriptSource::Assistant,
            );

            if no_calls {
                return Ok(Turn {
                    reply: resp.content.unwrap_or_default(),
                    tool_calls,
                });
            }
            if round == self.max_tool_rounds {
                break;
            }

            if let Some(on_tool_call) = &self.on_tool_call {
                for call in &resp.tool_calls {
                    on_tool_call(call);
                }
            }
            let results = self.tools.handle_requests(&resp.tool_calls).await;
            for (req, result) in resp.tool_calls.into_iter().zip(results) {
                let content = match &result {
                    Ok(output) => output.clone(),
                    Err(err) => format!("Error: {}", err.reason()),
                };
                self.push(
                    ModelMessage::Tool(ToolCallResult {
                        id: req.id.clone(),
                        content: content.clone(),
                    }),
                    content,
                    TranscriptSource::Tool,
                );
                tool_calls.push(ToolCallRecord {
                    id: req.id,
                    name: req.name,
                    arguments: req.arguments,
                    result,
                });
            }
        }

        warn!("giving up after {} tool rounds", self.max_tool_rounds);
        Err(AgentError::ToolRoundsExceeded(self.max_tool_rounds))
    }

    fn make_request(&self) -> ModelRequest {
        let system = self
            .system_prompt
            .as_ref()
            .map(|prompt| ModelMessage::System(prompt.clone()));
        ModelRequest {
            messages: system
                .into_iter()
                .chain(self.conversation.messages().cloned())
                .collect(),
            tools: self.tools.definitions(),
        }
    }

    fn push(
        &mut self,
        msg: ModelMessage,
        transcript: String,
        source: TranscriptSource,
    ) {
        if let Some(on_transcript) = &self.on_transcript {
            on_transcript(&transcript, source);
        }
        self.conversation.push(msg, transcript, source);
    }
}
