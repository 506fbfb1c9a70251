//! A travel planner assistant that searches flights and hotels.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to bring the assistant into your own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod plan;
pub mod render;
mod session;
pub mod tools;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`travel_agent_core`] crate.
pub mod core {
    pub use travel_agent_core::*;
}

/// Re-exports of [`travel_agent_search`] crate.
pub mod search {
    pub use travel_agent_search::*;
}
