use travel_agent_model::{ModelTool, ToolCallRequest};

use crate::tool::object::{ToolObject, ToolObjectImpl};
use crate::tool::{Error, Tool, ToolResult};

/// An object that manages toolset and handles requests from the model.
#[derive(Default)]
pub struct Manager {
    // Kept in registration order, so tool definitions are stable across
    // requests.
    tools: Vec<Box<dyn ToolObject>>,
}

impl Manager {
    /// Registers a tool, replacing any tool with the same name.
    pub fn add_tool<T: Tool>(&mut self, tool: T) {
        let tool = Box::new(ToolObjectImpl(tool));
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
    }

    #[inline]
    pub fn definitions(&self) -> Vec<ModelTool> {
        self.tools
            .iter()
            .map(|tool| ModelTool {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                parameters: tool.parameter_schema().clone(),
            })
            .collect()
    }

    #[inline]
    fn find(&self, name: &str) -> Option<&dyn ToolObject> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    /// Runs the requested tool calls concurrently and returns their results
    /// in request order. Every request gets a result, unknown tools
    /// included, since the model expects an answer for each call.
    pub async fn handle_requests(
        &self,
        requests: &[ToolCallRequest],
    ) -> Vec<ToolResult> {
        let span = debug_span!("tool manager");
        let tasks: Vec<_> = span.in_scope(|| {
            requests
                .iter()
                .map(|req| {
                    let Some(tool) = self.find(&req.name) else {
                        warn!("tool not found: {}", req.name);
                        return None;
                    };
                    trace!(
                        "spawning a tool ({}) with args: {:?}",
                        req.id, req.arguments
                    );
                    Some(tokio::spawn(tool.execute(req.arguments.clone())))
                })
                .collect()
        });

        let mut results = Vec::with_capacity(requests.len());
        for (req, task) in requests.iter().zip(tasks) {
            let result = match task {
                Some(task) => task.await.unwrap_or_else(|err| {
                    error!("tool task ({}) failed: {err}", req.id);
                    Err(Error::execution_error()
                        .with_reason("Tool execution was aborted"))
                }),
                None => Err(Error::not_found()
                    .with_reason(format!("No tool named `{}`", req.name))),
            };
            results.push(result);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;
    use std::time::Duration;

    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::*;
    use crate::tool::ErrorKind;

    static EMPTY_SCHEMA: &Value = &Value::Null;

    #[derive(Deserialize)]
    struct EchoInput {
        text: String,
        delay_ms: Option<u64>,
    }

    struct EchoTool;

    impl Tool for EchoTool {
        type Input = EchoInput;

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes the text"
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            async move {
                if let Some(delay) = input.delay_ms {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Ok(input.text)
            }
        }
    }

    struct FailingTool;

    impl Tool for FailingTool {
        type Input = Value;

        fn name(&self) -> &str {
            "fail"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            _input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Err(Error::execution_error().with_reason("boom")))
        }
    }

    fn request(id: &str, name: &str, arguments: Value) -> ToolCallRequest {
        ToolCallRequest {
            id: id.to_owned(),
            name: name.to_owned(),
            arguments,
        }
    }

    #[tokio::test]
    async fn test_handle_requests() {
        let mut manager = Manager::default();
        manager.add_tool(EchoTool);
        manager.add_tool(FailingTool);

        let requests = vec![
            request("tool:1", "echo", json!({ "text": "slow", "delay_ms": 20 })),
            request("tool:2", "echo", json!({ "text": "fast" })),
            request("tool:3", "fail", json!({})),
            request("tool:4", "read_file", json!({})),
            request("tool:5", "echo", json!({ "txt": "typo" })),
        ];
        let results = manager.handle_requests(&requests).await;

        assert_eq!(results.len(), 5);
        assert_eq!(results[0].as_deref(), Ok("slow"));
        assert_eq!(results[1].as_deref(), Ok("fast"));
        assert_eq!(results[2].as_ref().unwrap_err().reason(), "boom");
        assert_eq!(
            results[3].as_ref().unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            results[4].as_ref().unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_definitions_keep_registration_order() {
        let mut manager = Manager::default();
        manager.add_tool(FailingTool);
        manager.add_tool(EchoTool);
        manager.add_tool(FailingTool);

        let names: Vec<_> = manager
            .definitions()
            .into_iter()
            .map(|def| def.name)
            .collect();
        assert_eq!(names, ["fail", "echo"]);
    }
}
