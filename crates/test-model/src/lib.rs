//! A local fake model for testing purpose.

mod preset;

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::sleep;
use travel_agent_model::{
    ErrorKind, ModelMessage, ModelProvider, ModelProviderError, ModelRequest,
    ModelResponse,
};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Journal {
    attempts: HashMap<usize, u64>,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the conversation script, which
/// is how the model should respond to a request. The step is selected by the
/// number of assistant messages already in the request history, so a tool
/// call round trip consumes two steps. If there are no enough steps in the
/// script, an error will be returned.
///
/// Clones share the same journal of received requests.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Vec<PresetResponse>,
    delay: Option<Duration>,
    journal: Arc<Mutex<Journal>>,
}

impl TestModelProvider {
    /// Appends an assistant step to the script.
    #[inline]
    pub fn add_assistant_step(&mut self, preset: PresetResponse) {
        self.script.push(preset);
    }

    /// Delays every response by `duration`.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns all requests received so far, including failed attempts.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .clone()
    }

    fn respond(&self, req: &ModelRequest) -> Result<ModelResponse, Error> {
        let step_idx = req
            .messages
            .iter()
            .filter(|msg| matches!(msg, ModelMessage::Assistant { .. }))
            .count();

        let mut journal =
            self.journal.lock().unwrap_or_else(PoisonError::into_inner);
        journal.requests.push(req.clone());

        let Some(preset) = self.script.get(step_idx) else {
            return Err(Error {
                message: "no enough steps",
                kind: ErrorKind::Other,
            });
        };

        let attempt = journal.attempts.entry(step_idx).or_default();
        *attempt += 1;
        match preset.failures {
            Some(0) => Err(Error {
                message: "always failing step",
                kind: ErrorKind::RateLimitExceeded,
            }),
            Some(failures) if *attempt <= failures => Err(Error {
                message: "failing step",
                kind: ErrorKind::RateLimitExceeded,
            }),
            _ => Ok(preset.to_response()),
        }
    }
}

impl Debug for TestModelProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestModelProvider")
            .field("steps", &self.script.len())
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let result = self.respond(req);
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        async move {
            sleep(delay).await;
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use travel_agent_model::{
        ModelFinishReason, ModelTool, ToolCallRequest, ToolCallResult,
    };

    use super::*;

    #[tokio::test]
    async fn test_send_request() {
        let mut provider = TestModelProvider::default();
        provider.add_assistant_step(PresetResponse::with_tool_calls([
            ToolCallRequest {
                id: "tool:1".to_owned(),
                name: "search_flights".to_owned(),
                arguments: json!({ "departure_id": "SFO" }),
            },
        ]));
        provider.add_assistant_step(PresetResponse::with_message(
            "Here are your flights.",
        ));

        let mut req = ModelRequest {
            messages: vec![ModelMessage::User("Fly me to NYC".to_owned())],
            tools: vec![ModelTool {
                name: "search_flights".to_owned(),
                description: "Finds flights".to_owned(),
                parameters: json!({ "type": "object" }),
            }],
        };
        let resp = provider.send_request(&req).await.unwrap();
        assert_eq!(resp.finish_reason, ModelFinishReason::ToolCalls);
        assert_eq!(resp.tool_calls[0].name, "search_flights");

        req.messages.push(resp.to_message());
        req.messages.push(ModelMessage::Tool(ToolCallResult {
            id: "tool:1".to_owned(),
            content: "[]".to_owned(),
        }));
        let resp = provider.send_request(&req).await.unwrap();
        assert_eq!(resp.content.as_deref(), Some("Here are your flights."));
        assert_eq!(provider.requests().len(), 2);

        req.messages.push(resp.to_message());
        let err = provider.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_failures() {
        let mut provider = TestModelProvider::default();
        provider.add_assistant_step(
            PresetResponse::with_message("Finally").with_failures(2),
        );

        let req = ModelRequest {
            messages: vec![ModelMessage::User("Hi".to_owned())],
            tools: vec![],
        };
        for _ in 0..2 {
            let err = provider.send_request(&req).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
        }
        let resp = provider.send_request(&req).await.unwrap();
        assert_eq!(resp.content.as_deref(), Some("Finally"));
    }
}
