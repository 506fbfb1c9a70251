//! An abstraction layer for different LLMs.
//!
//! This crate establishes a small protocol for the agent to talk to any
//! supported chat model, so that the agent can switch between providers
//! without touching the agent loop. A request carries the whole history
//! plus the tools the model may call, and a response is one complete
//! assistant turn: some text, some tool calls, or both.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
