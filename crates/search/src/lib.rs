//! Flight and hotel search backed by SerpApi.
//!
//! The provider returns deeply nested documents whose shape varies from
//! result to result. This crate turns them into flat records with a fixed
//! schema, which is easy for a model (or a human) to read. Every record
//! field is optional: whatever the provider leaves out, or sends with an
//! unexpected type, becomes `null` instead of failing the whole search.
//!
//! ```no_run
//! # async fn run() -> Result<(), travel_agent_search::SearchError> {
//! use travel_agent_search::{FlightQuery, SearchClient, SearchConfigBuilder};
//!
//! let config = SearchConfigBuilder::with_api_key("secret").build();
//! let client = SearchClient::new(config);
//! let query = FlightQuery::new("JFK", "LAX", "2025-06-01", "2025-06-10");
//! let legs = client.search_flights(&query).await?;
//! println!("{}", travel_agent_search::to_json(&legs).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod client;
mod config;
mod error;
mod flights;
mod hotels;
mod proto;

use serde::Serialize;

pub use client::{Engine, SearchClient};
pub use config::{SearchConfig, SearchConfigBuilder};
pub use error::{ErrorKind, SearchError};
pub use flights::{FlightLeg, FlightQuery, normalize_flights};
pub use hotels::{Hotel, HotelQuery, normalize_hotels};

/// The currency used when a query doesn't specify one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Serializes normalized records into a JSON array.
///
/// Absent fields are kept as explicit `null`s, and fields always appear
/// in declaration order, so the same records always produce the same
/// bytes.
#[inline]
pub fn to_json<T: Serialize>(records: &[T]) -> serde_json::Result<String> {
    serde_json::to_string(records)
}
