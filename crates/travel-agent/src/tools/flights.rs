use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use travel_agent_core::tool::{Tool, ToolResult};
use travel_agent_search::{FlightQuery, SearchClient};

use super::{SEARCH_FLIGHTS, into_tool_result};

/// Parameters of [`SearchFlightsTool`].
#[derive(Deserialize, JsonSchema)]
pub struct SearchFlightsParameters {
    #[schemars(description = "The departure airport code, e.g. `JFK`.")]
    departure_id: String,
    #[schemars(description = "The arrival airport code, e.g. `LAX`.")]
    arrival_id: String,
    #[schemars(description = "The departure date in the format `YYYY-MM-DD`.")]
    departure_date: String,
    #[schemars(description = "The return date in the format `YYYY-MM-DD`.")]
    return_date: String,
    #[serde(default)]
    #[schemars(description = "The currency code, `USD` if omitted.")]
    currency: Option<String>,
}

impl SearchFlightsParameters {
    fn into_query(self) -> FlightQuery {
        let query = FlightQuery::new(
            self.departure_id,
            self.arrival_id,
            self.departure_date,
            self.return_date,
        );
        match self.currency {
            Some(currency) if !currency.is_empty() => {
                query.with_currency(currency)
            }
            _ => query,
        }
    }
}

/// A tool for finding round-trip flights.
pub struct SearchFlightsTool {
    client: SearchClient,
    parameter_schema: Value,
}

impl SearchFlightsTool {
    /// Creates a new flight search tool that sends requests with `client`.
    #[inline]
    pub fn new(client: SearchClient) -> Self {
        SearchFlightsTool {
            client,
            parameter_schema: schema_for!(SearchFlightsParameters).to_value(),
        }
    }
}

impl Tool for SearchFlightsTool {
    type Input = SearchFlightsParameters;

    fn name(&self) -> &str {
        SEARCH_FLIGHTS
    }

    fn description(&self) -> &str {
        r#"
Find round-trip flights on Google Flights.
Returns a JSON list of flight legs with airports, times, duration in minutes, airline, flight number and travel class."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: SearchFlightsParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let client = self.client.clone();
        let query = input.into_query();
        async move { into_tool_result(client.search_flights(&query).await) }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parameter_schema() {
        let schema = schema_for!(SearchFlightsParameters).to_value();
        let mut required: Vec<_> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        required.sort_unstable();
        assert_eq!(
            required,
            ["arrival_id", "departure_date", "departure_id", "return_date"]
        );
        assert!(schema["properties"]["currency"].is_object());
    }

    #[test]
    fn test_default_currency() {
        let params: SearchFlightsParameters = serde_json::from_value(json!({
            "departure_id": "JFK",
            "arrival_id": "LAX",
            "departure_date": "2025-06-01",
            "return_date": "2025-06-10",
        }))
        .unwrap();
        assert_eq!(params.into_query().currency, "USD");
    }
}
