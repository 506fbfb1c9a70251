//! Raw documents returned by the provider.
//!
//! Only the fields that end up in normalized records are modelled, and
//! every one of them is decoded leniently: a value with an unexpected
//! shape is dropped rather than failing the surrounding document.

use serde::Deserialize;
use serde_json::Value;

use crate::SearchError;

// -------
// Flights
// -------

#[derive(Debug, Default, Deserialize)]
pub struct FlightsResponse {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub best_flights: Vec<FlightGroup>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub other_flights: Vec<FlightGroup>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlightGroup {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub flights: Vec<Flight>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Flight {
    #[serde(default, deserialize_with = "lenient::value")]
    pub departure_airport: Option<Airport>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub arrival_airport: Option<Airport>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub airplane: Option<String>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub airline: Option<String>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub flight_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub travel_class: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Airport {
    #[serde(default, deserialize_with = "lenient::value")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub time: Option<String>,
}

// ------
// Hotels
// ------

#[derive(Debug, Default, Deserialize)]
pub struct HotelsResponse {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub properties: Vec<Property>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Property {
    #[serde(default, deserialize_with = "lenient::value")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub gps_coordinates: Option<Coordinates>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub check_in_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub check_out_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub rate_per_night: Option<Rate>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub total_rate: Option<Rate>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub overall_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub reviews: Option<u64>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub location_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub amenities: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Coordinates {
    #[serde(default, deserialize_with = "lenient::value")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Rate {
    #[serde(default, deserialize_with = "lenient::value")]
    pub lowest: Option<String>,
}

// --------
// Decoding
// --------

/// The outcome of decoding a successful provider response.
pub enum Decoded<T> {
    /// The provider rejected the query; the payload is its error detail.
    Rejected(Value),
    /// The provider answered with results.
    Results(T),
}

/// Decodes a response body, checking for a provider-level `error` key
/// before anything else.
pub fn decode<T>(body: Value) -> Result<Decoded<T>, SearchError>
where
    T: for<'de> Deserialize<'de>,
{
    if let Value::Object(map) = &body {
        if let Some(detail) = map.get("error") {
            return Ok(Decoded::Rejected(detail.clone()));
        }
    }
    T::deserialize(body)
        .map(Decoded::Results)
        .map_err(|err| SearchError::invalid_payload(format!("{err}")))
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Decodes a value, mapping anything of the wrong shape to `None`.
    pub fn value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(T::deserialize(value).ok())
    }

    /// Decodes an array, skipping items of the wrong shape. Anything that
    /// is not an array decodes to an empty list.
    pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let Value::Array(items) = Value::deserialize(deserializer)? else {
            return Ok(vec![]);
        };
        Ok(items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| T::deserialize(item).ok())
            .collect())
    }
}
