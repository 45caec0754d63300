//! HTTP client for the spots backend.

use std::time::Duration;

use goodwave_core::{AppConfig, Spot, SpotId};
use reqwest::{Client, Method, Url};

use crate::error::ClientError;
use crate::pagination::{decode_page, Page};
use crate::types::{FavoritesBody, SpotBody};

/// Client for the spots and favorites endpoints.
///
/// Non-2xx responses surface as [`ClientError::BadStatus`], connection and
/// timeout faults as [`ClientError::Unreachable`]. Nothing is retried.
#[derive(Debug, Clone)]
pub struct SpotClient {
    client: Client,
    base_url: Url,
    user_id: u64,
}

impl SpotClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// See [`SpotClient::with_base_url`].
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.api_base_url,
            config.user_id,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client against an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] if `base_url` is not an
    /// absolute URL, or [`ClientError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn with_base_url(
        base_url: &str,
        user_id: u64,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = parse_base_url(base_url)?;

        Ok(Self {
            client,
            base_url,
            user_id,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// Fetches one page of spots.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Unreachable`] / [`ClientError::Http`] on transport failure.
    /// - [`ClientError::BadStatus`] on any non-2xx status.
    /// - [`ClientError::Decode`] if the body or any single spot is malformed.
    pub async fn fetch_spots(&self, page: u32, page_size: u32) -> Result<Page<Spot>, ClientError> {
        let mut url = self.endpoint(&["spots"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string());

        let body = self.get_text(&url).await?;
        let page_data = decode_page::<Spot>(&body, &format!("spots page {page}"))?;

        tracing::debug!(
            page = page_data.current_page(),
            total_pages = page_data.total_pages(),
            items = page_data.items.len(),
            "decoded spots page"
        );
        Ok(page_data)
    }

    /// Fetches a single spot by id.
    ///
    /// # Errors
    ///
    /// Same classes as [`SpotClient::fetch_spots`].
    pub async fn fetch_spot(&self, id: &SpotId) -> Result<Spot, ClientError> {
        let url = self.endpoint(&["spots", id.as_str()])?;
        let body = self.get_text(&url).await?;
        let parsed = serde_json::from_str::<SpotBody>(&body).map_err(|e| ClientError::Decode {
            context: format!("spot {id}"),
            source: e,
        })?;
        Ok(parsed.into_spot())
    }

    /// Fetches the full favorites list of the configured user.
    ///
    /// # Errors
    ///
    /// Same classes as [`SpotClient::fetch_spots`].
    pub async fn fetch_favorites(&self) -> Result<Vec<Spot>, ClientError> {
        let url = self.favorites_url(None)?;
        let body = self.get_text(&url).await?;
        let parsed =
            serde_json::from_str::<FavoritesBody>(&body).map_err(|e| ClientError::Decode {
                context: format!("favorites of user {}", self.user_id),
                source: e,
            })?;
        let favorites = parsed.into_spots();
        tracing::debug!(user_id = self.user_id, count = favorites.len(), "fetched favorites");
        Ok(favorites)
    }

    /// Adds `id` to the user's favorites.
    ///
    /// # Errors
    ///
    /// [`ClientError::BadStatus`] on non-2xx, transport errors otherwise.
    pub async fn add_favorite(&self, id: &SpotId) -> Result<(), ClientError> {
        let url = self.favorites_url(Some(id))?;
        self.send_empty(Method::POST, &url).await
    }

    /// Removes `id` from the user's favorites.
    ///
    /// # Errors
    ///
    /// [`ClientError::BadStatus`] on non-2xx, transport errors otherwise.
    pub async fn remove_favorite(&self, id: &SpotId) -> Result<(), ClientError> {
        let url = self.favorites_url(Some(id))?;
        self.send_empty(Method::DELETE, &url).await
    }

    /// Adds or removes `id` so that its favorite status becomes `saved`.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying add or remove call.
    pub async fn set_favorite(&self, id: &SpotId, saved: bool) -> Result<(), ClientError> {
        if saved {
            self.add_favorite(id).await
        } else {
            self.remove_favorite(id).await
        }
    }

    fn favorites_url(&self, id: Option<&SpotId>) -> Result<Url, ClientError> {
        let user = self.user_id.to_string();
        match id {
            Some(id) => self.endpoint(&["users", &user, "favorites", id.as_str()]),
            None => self.endpoint(&["users", &user, "favorites"]),
        }
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidRequest {
                url: self.base_url.to_string(),
                reason: "base URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_text(&self, url: &Url) -> Result<String, ClientError> {
        let response = self.send(Method::GET, url).await?;
        response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(url.as_str(), e))
    }

    async fn send_empty(&self, method: Method, url: &Url) -> Result<(), ClientError> {
        self.send(method, url).await.map(|_| ())
    }

    /// Sends a request and asserts a 2xx status.
    async fn send(&self, method: Method, url: &Url) -> Result<reqwest::Response, ClientError> {
        tracing::debug!(%method, url = %url, "spots backend request");

        let response = self
            .client
            .request(method, url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::from_transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "spots backend returned an error status");
            return Err(ClientError::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

/// Parses and normalises a base URL so path segments append cleanly.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ClientError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| ClientError::InvalidRequest {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidRequest {
            url: base_url.to_owned(),
            reason: "not a hierarchical URL".to_owned(),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
