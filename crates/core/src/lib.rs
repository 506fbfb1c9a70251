//! The agent loop: conversation history, tool dispatch and model requests
//! with retries.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod agent;
pub mod conversation;
mod model_client;
pub mod tool;

pub use agent::{
    Agent, AgentBuilder, AgentError, ToolCallRecord, TranscriptSource, Turn,
};
pub use model_client::RetryPolicy;
