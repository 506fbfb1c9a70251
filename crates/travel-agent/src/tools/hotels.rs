use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use travel_agent_core::tool::{Tool, ToolResult};
use travel_agent_search::{HotelQuery, SearchClient};

use super::{SEARCH_HOTELS, into_tool_result};

/// Parameters of [`SearchHotelsTool`].
#[derive(Deserialize, JsonSchema)]
pub struct SearchHotelsParameters {
    #[schemars(description = "The destination city or region.")]
    destination: String,
    #[serde(default, rename = "type")]
    #[schemars(
        description = "The type of accommodation, e.g. `Resorts` or `Hotels`."
    )]
    accommodation_type: Option<String>,
    #[schemars(description = "The check-in date in the format `YYYY-MM-DD`.")]
    check_in_date: String,
    #[schemars(description = "The check-out date in the format `YYYY-MM-DD`.")]
    check_out_date: String,
    #[serde(default)]
    #[schemars(description = "The number of adults, 1 if omitted.")]
    adults: Option<u32>,
    #[serde(default)]
    #[schemars(description = "The currency code, `USD` if omitted.")]
    currency: Option<String>,
}

impl SearchHotelsParameters {
    fn into_query(self) -> HotelQuery {
        let mut query = HotelQuery::new(
            self.destination,
            self.check_in_date,
            self.check_out_date,
        );
        if let Some(ty) = self.accommodation_type {
            query = query.with_accommodation_type(ty);
        }
        if let Some(adults) = self.adults {
            query = query.with_adults(adults);
        }
        match self.currency {
            Some(currency) if !currency.is_empty() => {
                query.with_currency(currency)
            }
            _ => query,
        }
    }
}

/// A tool for finding hotels and other accommodation.
pub struct SearchHotelsTool {
    client: SearchClient,
    parameter_schema: Value,
}

impl SearchHotelsTool {
    /// Creates a new hotel search tool that sends requests with `client`.
    #[inline]
    pub fn new(client: SearchClient) -> Self {
        SearchHotelsTool {
            client,
            parameter_schema: schema_for!(SearchHotelsParameters).to_value(),
        }
    }
}

impl Tool for SearchHotelsTool {
    type Input = SearchHotelsParameters;

    fn name(&self) -> &str {
        SEARCH_HOTELS
    }

    fn description(&self) -> &str {
        r#"
Find hotels on Google Hotels.
Returns a JSON list of properties with coordinates, check-in and check-out times, nightly and total rates, ratings and amenities."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: SearchHotelsParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let client = self.client.clone();
        let query = input.into_query();
        async move { into_tool_result(client.search_hotels(&query).await) }
    }
}
