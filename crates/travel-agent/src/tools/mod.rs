//! The search tools that models can use.

mod flights;
mod hotels;

pub use flights::{SearchFlightsParameters, SearchFlightsTool};
pub use hotels::{SearchHotelsParameters, SearchHotelsTool};

use travel_agent_core::tool::{Error as ToolError, ToolResult};
use travel_agent_search::SearchError;

/// Name of the flight search tool.
pub const SEARCH_FLIGHTS: &str = "search_flights";
/// Name of the hotel search tool.
pub const SEARCH_HOTELS: &str = "search_hotels";

#[inline]
fn into_tool_result<T: serde::Serialize>(
    records: Result<Vec<T>, SearchError>,
) -> ToolResult {
    let records = records.map_err(|err| {
        ToolError::execution_error().with_reason(err.message())
    })?;
    travel_agent_search::to_json(&records)
        .map_err(|err| ToolError::execution_error().with_reason(err.to_string()))
}
