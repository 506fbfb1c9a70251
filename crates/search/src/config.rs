use std::fmt::Debug;

/// Builder for [`SearchConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SearchConfigBuilder {
    api_key: String,
    base_url: Option<String>,
}

impl SearchConfigBuilder {
    /// Creates a builder with the given SerpApi key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    /// Sets a custom base URL, mostly useful for pointing at a mock server.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> SearchConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| "https://serpapi.com".to_string());
        SearchConfig {
            api_key: self.api_key,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

impl Debug for SearchConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfigBuilder")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Configuration for the search provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SearchConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
}

impl SearchConfig {
    /// Returns the endpoint that all searches are sent to.
    #[inline]
    pub fn endpoint(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

impl Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
