use std::sync::Arc;

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::Instrument;

use crate::{SearchConfig, SearchError};

/// A search engine offered by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Engine {
    /// Round-trip flight offers.
    GoogleFlights,
    /// Hotels and other properties.
    GoogleHotels,
}

impl Engine {
    /// Returns the value of the `engine` query parameter.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::GoogleFlights => "google_flights",
            Engine::GoogleHotels => "google_hotels",
        }
    }
}

/// A client for the search provider.
///
/// The client is stateless apart from the connection pool, so clone it
/// freely and share it between tools.
#[derive(Clone, Debug)]
pub struct SearchClient {
    client: Client,
    config: Arc<SearchConfig>,
}

impl SearchClient {
    /// Creates a new `SearchClient` with the given configuration.
    #[inline]
    pub fn new(config: SearchConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    /// Creates a new `SearchClient` that sends requests with `client`.
    #[inline]
    pub fn with_http_client(client: Client, config: SearchConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Sends one search request and returns the parsed JSON body.
    ///
    /// Exactly one request is sent: no retries and no caching.
    pub(crate) async fn fetch(
        &self,
        engine: Engine,
        params: &[(&'static str, String)],
    ) -> Result<Value, SearchError> {
        let mut query = Vec::with_capacity(params.len() + 2);
        query.push(("engine", engine.as_str()));
        query.extend(params.iter().map(|(key, value)| (*key, value.as_str())));
        query.push(("api_key", self.config.api_key.as_str()));

        let url = Url::parse_with_params(&self.config.endpoint(), &query)
            .map_err(|err| {
                SearchError::transport(format!("invalid endpoint: {err}"))
            })?;
        let req = self.client.get(url);

        async move {
            trace!("sending request");
            // The URL carries the api key, keep it out of error messages.
            let resp = req.send().await.map_err(|err| {
                SearchError::transport(format!("{}", err.without_url()))
            })?;
            let status = resp.status();
            let body = resp.text().await.map_err(|err| {
                SearchError::transport(format!("{}", err.without_url()))
            })?;

            if !status.is_success() {
                error!(
                    "received status code {} with response: {body}",
                    status.as_u16()
                );
                return Err(SearchError::status(status.as_u16(), &body));
            }

            serde_json::from_str(&body).map_err(|err| {
                error!("response is not valid JSON: {err}");
                SearchError::invalid_payload(format!("{err}"))
            })
        }
        .instrument(debug_span!("serpapi search", engine = engine.as_str()))
        .await
    }
}
