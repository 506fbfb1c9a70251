use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::proto::{self, Decoded, HotelsResponse};
use crate::{DEFAULT_CURRENCY, Engine, SearchClient, SearchError};

/// Parameters of a hotel search.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HotelQuery {
    /// Destination city or region.
    pub destination: String,
    /// Kind of accommodation, e.g. `Resorts`.
    pub accommodation_type: Option<String>,
    /// Check-in date in `YYYY-MM-DD`.
    pub check_in_date: String,
    /// Check-out date in `YYYY-MM-DD`.
    pub check_out_date: String,
    /// Number of adults.
    pub adults: u32,
    /// Currency code for prices.
    pub currency: String,
}

impl HotelQuery {
    /// Creates a query for one adult, priced in the default currency.
    pub fn new(
        destination: impl Into<String>,
        check_in_date: impl Into<String>,
        check_out_date: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            accommodation_type: None,
            check_in_date: check_in_date.into(),
            check_out_date: check_out_date.into(),
            adults: 1,
            currency: DEFAULT_CURRENCY.to_owned(),
        }
    }

    /// Sets the kind of accommodation.
    #[inline]
    pub fn with_accommodation_type<S: Into<String>>(mut self, ty: S) -> Self {
        self.accommodation_type = Some(ty.into());
        self
    }

    /// Sets the number of adults.
    #[inline]
    pub fn with_adults(mut self, adults: u32) -> Self {
        self.adults = adults;
        self
    }

    /// Sets the currency code.
    #[inline]
    pub fn with_currency<S: Into<String>>(mut self, currency: S) -> Self {
        self.currency = currency.into();
        self
    }

    /// Returns the free-text query sent to the provider, which is the
    /// destination followed by the accommodation type.
    pub fn text(&self) -> String {
        let destination = self.destination.trim();
        match self.accommodation_type.as_deref().map(str::trim) {
            Some(ty) if !ty.is_empty() => format!("{destination} {ty}"),
            _ => destination.to_owned(),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.text()),
            ("check_in_date", self.check_in_date.clone()),
            ("check_out_date", self.check_out_date.clone()),
            ("adults", self.adults.to_string()),
            ("currency", self.currency.clone()),
        ]
    }
}

/// A hotel or other property offered for the stay.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    /// Property name.
    pub name: Option<String>,
    /// Latitude of the property.
    pub latitude: Option<f64>,
    /// Longitude of the property.
    pub longitude: Option<f64>,
    /// Earliest check-in time, e.g. `3:00 PM`.
    pub check_in_time: Option<String>,
    /// Latest check-out time, e.g. `11:00 AM`.
    pub check_out_time: Option<String>,
    /// Lowest nightly rate, formatted with its currency, e.g. `$120`.
    pub rate_per_night: Option<String>,
    /// Lowest rate for the whole stay, formatted with its currency.
    pub total_rate: Option<String>,
    /// Overall rating out of 5.
    pub overall_rating: Option<f64>,
    /// Number of reviews.
    pub reviews: Option<u64>,
    /// Location rating out of 5.
    pub location_rating: Option<f64>,
    /// Amenities, e.g. `Free Wi-Fi`.
    pub amenities: Option<Vec<String>>,
}

impl From<proto::Property> for Hotel {
    fn from(property: proto::Property) -> Self {
        let (latitude, longitude) = property
            .gps_coordinates
            .map(|gps| (gps.latitude, gps.longitude))
            .unwrap_or_default();
        Self {
            name: property.name,
            latitude,
            longitude,
            check_in_time: property.check_in_time,
            check_out_time: property.check_out_time,
            rate_per_night: property.rate_per_night.and_then(|r| r.lowest),
            total_rate: property.total_rate.and_then(|r| r.lowest),
            overall_rating: property.overall_rating,
            reviews: property.reviews,
            location_rating: property.location_rating,
            amenities: property.amenities,
        }
    }
}

/// Maps a `google_hotels` response to hotels, one per property, in
/// provider order. A response carrying an `error` key yields no hotels.
pub fn normalize_hotels(body: Value) -> Result<Vec<Hotel>, SearchError> {
    let resp = match proto::decode::<HotelsResponse>(body)? {
        Decoded::Results(resp) => resp,
        Decoded::Rejected(detail) => {
            warn!("error in response: {detail}");
            return Ok(vec![]);
        }
    };

    let hotels: Vec<_> = resp.properties.into_iter().map(Hotel::from).collect();
    if hotels.is_empty() {
        info!("No hotels found.");
    }
    Ok(hotels)
}

impl SearchClient {
    /// Searches hotels for a stay.
    pub async fn search_hotels(
        &self,
        query: &HotelQuery,
    ) -> Result<Vec<Hotel>, SearchError> {
        let body = self.fetch(Engine::GoogleHotels, &query.params()).await?;
        normalize_hotels(body)
    }
}
