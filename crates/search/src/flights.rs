use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::proto::{self, Decoded, FlightsResponse};
use crate::{DEFAULT_CURRENCY, Engine, SearchClient, SearchError};

/// Parameters of a round-trip flight search.
///
/// Airport codes and dates are forwarded verbatim: malformed values are
/// left for the provider to reject.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FlightQuery {
    /// Departure airport code, e.g. `JFK`.
    pub departure_id: String,
    /// Arrival airport code, e.g. `LAX`.
    pub arrival_id: String,
    /// Outbound date in `YYYY-MM-DD`.
    pub departure_date: String,
    /// Return date in `YYYY-MM-DD`.
    pub return_date: String,
    /// Currency code for prices.
    pub currency: String,
}

impl FlightQuery {
    /// Creates a query priced in the default currency.
    pub fn new(
        departure_id: impl Into<String>,
        arrival_id: impl Into<String>,
        departure_date: impl Into<String>,
        return_date: impl Into<String>,
    ) -> Self {
        Self {
            departure_id: departure_id.into(),
            arrival_id: arrival_id.into(),
            departure_date: departure_date.into(),
            return_date: return_date.into(),
            currency: DEFAULT_CURRENCY.to_owned(),
        }
    }

    /// Sets the currency code.
    #[inline]
    pub fn with_currency<S: Into<String>>(mut self, currency: S) -> Self {
        self.currency = currency.into();
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("departure_id", self.departure_id.clone()),
            ("arrival_id", self.arrival_id.clone()),
            ("outbound_date", self.departure_date.clone()),
            ("return_date", self.return_date.clone()),
            ("currency", self.currency.clone()),
        ]
    }
}

/// One leg of a flight itinerary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightLeg {
    /// Name of the departure airport.
    pub departure_airport: Option<String>,
    /// Local departure time, as formatted by the provider.
    pub departure_time: Option<String>,
    /// Name of the arrival airport.
    pub arrival_airport: Option<String>,
    /// Local arrival time, as formatted by the provider.
    pub arrival_time: Option<String>,
    /// Flight duration in minutes.
    pub duration: Option<u64>,
    /// Airplane model.
    pub airplane: Option<String>,
    /// Airline name.
    pub airline: Option<String>,
    /// Flight number, e.g. `DL 123`.
    pub flight_number: Option<String>,
    /// Travel class, e.g. `Economy`.
    pub travel_class: Option<String>,
}

impl From<proto::Flight> for FlightLeg {
    fn from(flight: proto::Flight) -> Self {
        let (departure_airport, departure_time) = flight
            .departure_airport
            .map(|airport| (airport.name, airport.time))
            .unwrap_or_default();
        let (arrival_airport, arrival_time) = flight
            .arrival_airport
            .map(|airport| (airport.name, airport.time))
            .unwrap_or_default();
        Self {
            departure_airport,
            departure_time,
            arrival_airport,
            arrival_time,
            duration: flight.duration,
            airplane: flight.airplane,
            airline: flight.airline,
            flight_number: flight.flight_number,
            travel_class: flight.travel_class,
        }
    }
}

/// Flattens a `google_flights` response into flight legs.
///
/// Groups from `best_flights` come first, then `other_flights`, each in
/// provider order; every group contributes its legs in order. A response
/// carrying an `error` key yields no legs at all.
pub fn normalize_flights(body: Value) -> Result<Vec<FlightLeg>, SearchError> {
    let resp = match proto::decode::<FlightsResponse>(body)? {
        Decoded::Results(resp) => resp,
        Decoded::Rejected(detail) => {
            warn!("error in response: {detail}");
            return Ok(vec![]);
        }
    };

    let legs: Vec<_> = resp
        .best_flights
        .into_iter()
        .chain(resp.other_flights)
        .flat_map(|group| group.flights)
        .map(FlightLeg::from)
        .collect();
    if legs.is_empty() {
        info!("No flights found.");
    }
    Ok(legs)
}

impl SearchClient {
    /// Searches round-trip flights and returns every leg of every offer.
    pub async fn search_flights(
        &self,
        query: &FlightQuery,
    ) -> Result<Vec<FlightLeg>, SearchError> {
        let body = self.fetch(Engine::GoogleFlights, &query.params()).await?;
        normalize_flights(body)
    }
}
