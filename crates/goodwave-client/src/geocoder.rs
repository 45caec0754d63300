//! Address-to-coordinate resolution.

use std::future::Future;
use std::time::Duration;

use goodwave_core::{AppConfig, Coordinate};
use reqwest::{Client, Url};

use crate::client::parse_base_url;
use crate::error::{ClientError, GeocodeError};
use crate::types::GeocodeHit;

/// A provider that resolves free-text addresses to coordinates.
pub trait Geocoder: Send + Sync {
    /// Resolves `query` to the provider's best match.
    fn geocode(&self, query: &str) -> impl Future<Output = Result<Coordinate, GeocodeError>> + Send;
}

/// Geocoder backed by a Nominatim-compatible `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: Url,
}

impl NominatimGeocoder {
    /// Creates a geocoder from application configuration.
    ///
    /// # Errors
    ///
    /// See [`NominatimGeocoder::with_base_url`].
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.geocoder_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a geocoder against an explicit base URL.
    ///
    /// Public Nominatim instances reject requests without a descriptive
    /// `User-Agent`, so one is always sent.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] for an unusable base URL or
    /// [`ClientError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    fn search_url(&self, query: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidRequest {
                url: self.base_url.to_string(),
                reason: "base URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .push("search");
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        Ok(url)
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let url = self.search_url(query)?;

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::from_transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(url.as_str(), e))?;
        let hits = serde_json::from_str::<Vec<GeocodeHit>>(&body).map_err(|e| {
            ClientError::Decode {
                context: format!("geocode \"{query}\""),
                source: e,
            }
        })?;

        let hit = hits.into_iter().next().ok_or_else(|| GeocodeError::NoMatch {
            query: query.to_owned(),
        })?;

        let coordinate = parse_coordinate(query, &hit)?;
        tracing::debug!(
            query,
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            display_name = hit.display_name.as_deref().unwrap_or(""),
            "geocoded address"
        );
        Ok(coordinate)
    }
}

fn parse_coordinate(query: &str, hit: &GeocodeHit) -> Result<Coordinate, GeocodeError> {
    let invalid = |reason: String| GeocodeError::InvalidCoordinate {
        query: query.to_owned(),
        reason,
    };

    let latitude = hit
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(format!("lat \"{}\": {e}", hit.lat)))?;
    let longitude = hit
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(format!("lon \"{}\": {e}", hit.lon)))?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid(format!("({latitude}, {longitude}) is out of range")));
    }

    Ok(Coordinate::new(latitude, longitude))
}
