use serde::{Deserialize, Serialize};
use travel_agent_model::{ModelFinishReason, ModelResponse, ToolCallRequest};

/// The preset response for an assistant step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Text of the response.
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls requested by the response.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
    /// If set, the request will fail in the first `failures` attempts.
    /// `Some(0)` means the request will fail infinitely.
    #[serde(default)]
    pub failures: Option<u64>,
}

impl PresetResponse {
    /// Creates a text-only `PresetResponse`.
    #[inline]
    pub fn with_message<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: vec![],
            failures: None,
        }
    }

    /// Creates a `PresetResponse` that requests the specified tool calls.
    #[inline]
    pub fn with_tool_calls(calls: impl Into<Vec<ToolCallRequest>>) -> Self {
        Self {
            content: None,
            tool_calls: calls.into(),
            failures: None,
        }
    }

    /// Sets failure times before a successful response. `0` means the
    /// response will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = Some(failures);
        self
    }

    pub(crate) fn to_response(&self) -> ModelResponse {
        ModelResponse {
            content: self.content.clone(),
            tool_calls: self.tool_calls.clone(),
            finish_reason: if self.tool_calls.is_empty() {
                ModelFinishReason::Stop
            } else {
                ModelFinishReason::ToolCalls
            },
        }
    }
}
