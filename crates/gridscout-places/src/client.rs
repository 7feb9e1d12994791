//! HTTP client for the places text-search and geocoding API.
//!
//! Wraps `reqwest` with provider-specific error handling, API key
//! management, and typed response deserialization. Every response carries
//! a `"status"` field; [`PlacesClient`] treats `"OK"` and `"ZERO_RESULTS"`
//! as success and surfaces everything else as [`PlacesError::ApiError`]
//! (or [`PlacesError::QuotaExceeded`] for `"OVER_QUERY_LIMIT"`).

use std::time::Duration;

use reqwest::{Client, Url};

use gridscout_core::GeoPoint;

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{GeocodeResponse, SearchPage, TextSearchResponse};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";

const TEXT_SEARCH_PATH: &str = "maps/api/place/textsearch/json";
const GEOCODE_PATH: &str = "maps/api/geocode/json";

/// Transient-error retry settings applied to every request.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_base_ms: 1_000,
        }
    }
}

/// Client for the places text-search and geocoding endpoints.
///
/// Manages the HTTP client, API key, and base URL. Use [`PlacesClient::new`]
/// for production or [`PlacesClient::with_base_url`] to point at a mock
/// server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    retry: RetryPolicy,
}

impl PlacesClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, retry: RetryPolicy) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, retry, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::ApiError`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        retry: RetryPolicy,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("gridscout/0.1 (substation-detection)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends the endpoint path instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| PlacesError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            retry,
        })
    }

    /// Runs one text search around `center` and returns the page of results
    /// plus the continuation token, if the provider issued one.
    ///
    /// Pass the token from the previous page as `page_token` to fetch the
    /// next page. `"ZERO_RESULTS"` yields an empty page, not an error.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::QuotaExceeded`] on `"OVER_QUERY_LIMIT"`.
    /// - [`PlacesError::ApiError`] on any other non-OK status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn text_search(
        &self,
        query: &str,
        center: GeoPoint,
        radius_m: u32,
        page_token: Option<&str>,
    ) -> Result<SearchPage, PlacesError> {
        let location = format!("{},{}", center.lat, center.lng);
        let radius = radius_m.to_string();
        let mut params = vec![
            ("query", query),
            ("location", location.as_str()),
            ("radius", radius.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pagetoken", token));
        }
        let url = self.build_url(TEXT_SEARCH_PATH, &params)?;

        let body = retry_with_backoff(self.retry.max_retries, self.retry.backoff_base_ms, || {
            self.request_json(&url)
        })
        .await?;

        let envelope: TextSearchResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("textsearch(query={query})"),
                source: e,
            })?;
        check_status(&envelope.status, envelope.error_message.as_deref())?;

        Ok(SearchPage {
            results: envelope.results,
            next_page_token: envelope.next_page_token,
        })
    }

    /// Resolves a free-text location to coordinates.
    ///
    /// Returns `None` when the provider finds no match (`"ZERO_RESULTS"`).
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`PlacesClient::text_search`].
    pub async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, PlacesError> {
        let url = self.build_url(GEOCODE_PATH, &[("address", address)])?;

        let body = retry_with_backoff(self.retry.max_retries, self.retry.backoff_base_ms, || {
            self.request_json(&url)
        })
        .await?;

        let envelope: GeocodeResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("geocode(address={address})"),
                source: e,
            })?;
        check_status(&envelope.status, envelope.error_message.as_deref())?;

        Ok(envelope.results.first().map(|r| {
            GeoPoint::new(r.geometry.location.lat, r.geometry.location.lng)
        }))
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters, appending the API key last.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| PlacesError::ApiError(format!("invalid endpoint path '{path}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the response
    /// body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] on network failure or a non-2xx status.
    /// Returns [`PlacesError::Deserialize`] if the body is not valid JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }
}

/// Maps a response `"status"` field to the error taxonomy.
fn check_status(status: &str, error_message: Option<&str>) -> Result<(), PlacesError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "OVER_QUERY_LIMIT" => Err(PlacesError::QuotaExceeded(
            error_message.unwrap_or("query limit reached").to_owned(),
        )),
        other => Err(PlacesError::ApiError(format!(
            "{other}: {}",
            error_message.unwrap_or("no detail")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> PlacesClient {
        PlacesClient::with_base_url("test-key", 30, RetryPolicy::default(), base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_key_last() {
        let client = test_client("https://maps.example.com");
        let url = client
            .build_url(TEXT_SEARCH_PATH, &[("query", "substation")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://maps.example.com/maps/api/place/textsearch/json?query=substation&key=test-key"
        );
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("https://maps.example.com/");
        let url = client.build_url(GEOCODE_PATH, &[("address", "Calgary")]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://maps.example.com/maps/api/geocode/json?address=Calgary&key=test-key"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://maps.example.com");
        let url = client
            .build_url(TEXT_SEARCH_PATH, &[("query", "electrical substation")])
            .unwrap();
        assert!(
            url.as_str().contains("electrical+substation")
                || url.as_str().contains("electrical%20substation"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn check_status_accepts_ok_and_zero_results() {
        assert!(check_status("OK", None).is_ok());
        assert!(check_status("ZERO_RESULTS", None).is_ok());
    }

    #[test]
    fn check_status_maps_over_query_limit_to_quota() {
        let err = check_status("OVER_QUERY_LIMIT", Some("daily cap")).unwrap_err();
        assert!(matches!(err, PlacesError::QuotaExceeded(ref m) if m == "daily cap"));
    }

    #[test]
    fn check_status_maps_other_statuses_to_api_error() {
        let err = check_status("REQUEST_DENIED", Some("bad key")).unwrap_err();
        assert!(matches!(err, PlacesError::ApiError(ref m) if m.contains("REQUEST_DENIED")));
    }
}
