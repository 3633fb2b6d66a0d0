//! HTTP client for the creator-discovery REST API.
//!
//! Wraps `reqwest` with typed response deserialization and uniform failure
//! mapping: any non-2xx status becomes [`ApiError::Status`] carrying the
//! status code and canonical reason, so callers can surface one message
//! string regardless of what went wrong on the wire.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{Campaign, Creator, ResetResponse, SearchParams, SearchResult};

/// Errors returned by the discovery API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API returned {code}: {text}")]
    Status { code: StatusCode, text: String },

    /// The response body could not be deserialized into the expected type.
    #[error("unexpected response for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL is not a valid URL.
    #[error("invalid base URL '{0}'")]
    BadBaseUrl(String),
}

impl ApiError {
    /// Human-readable message for operator display.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Client for the creator-discovery REST API.
///
/// Use [`DiscoveryClient::new`] with the configured base address, or point
/// it at a mock server in tests.
pub struct DiscoveryClient {
    client: Client,
    base_url: Url,
}

impl DiscoveryClient {
    /// Creates a new client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::BadBaseUrl`] for an unparseable URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("creator-scout/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Normalise: exactly one trailing slash so joins land under the root
        // path instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|_| ApiError::BadBaseUrl(base_url.to_owned()))?;

        Ok(Self { client, base_url })
    }

    /// Runs a creator search with the given sparse parameters.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] on a non-2xx response, [`ApiError::Http`] on
    /// transport failure, [`ApiError::Deserialize`] on a malformed body.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResult, ApiError> {
        let url = self.build_url("api/creators/search", &params.to_query_pairs());
        self.get_json(url).await
    }

    /// Fetches stored creators across all past searches. Only `db_total` is
    /// consumed by the advisory totals tracker, which requests `page_size=1`
    /// to avoid transferring bulk rows.
    pub async fn database(&self, params: &SearchParams) -> Result<SearchResult, ApiError> {
        let url = self.build_url("api/creators/database", &params.to_query_pairs());
        self.get_json(url).await
    }

    /// Fetches one persisted creator by internal id.
    pub async fn get_creator(&self, creator_id: i64) -> Result<Creator, ApiError> {
        let url = self.build_url(&format!("api/creators/{creator_id}"), &[]);
        self.get_json(url).await
    }

    /// Clears the server-side seen-history deduplication record.
    pub async fn reset_seen(&self) -> Result<ResetResponse, ApiError> {
        let url = self.build_url("api/creators/reset-seen", &[]);
        let response = self.client.post(url.clone()).send().await?;
        Self::decode(url, response).await
    }

    /// Lists all campaigns (without expanded member lists).
    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        let url = self.build_url("api/campaigns", &[]);
        self.get_json(url).await
    }

    /// Fetches one campaign with its expanded member list.
    pub async fn get_campaign(&self, campaign_id: i64) -> Result<Campaign, ApiError> {
        let url = self.build_url(&format!("api/campaigns/{campaign_id}"), &[]);
        self.get_json(url).await
    }

    /// Creates a campaign, recording the current filters as an opaque snapshot.
    pub async fn create_campaign(
        &self,
        name: &str,
        filters: serde_json::Value,
    ) -> Result<Campaign, ApiError> {
        let url = self.build_url("api/campaigns", &[]);
        let body = serde_json::json!({ "name": name, "filters_json": filters });
        let response = self.client.post(url.clone()).json(&body).send().await?;
        Self::decode(url, response).await
    }

    /// Adds one persisted creator to a campaign. Success is any 2xx; the
    /// response body is not interpreted.
    pub async fn add_creator(
        &self,
        campaign_id: i64,
        creator_id: i64,
        notes: Option<&str>,
    ) -> Result<(), ApiError> {
        let url = self.build_url(&format!("api/campaigns/{campaign_id}/creators"), &[]);
        let body = serde_json::json!({
            "creator_id": creator_id,
            "notes": notes.unwrap_or(""),
        });
        let response = self.client.post(url).json(&body).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Removes one creator from a campaign.
    pub async fn remove_creator(&self, campaign_id: i64, creator_id: i64) -> Result<(), ApiError> {
        let url = self.build_url(
            &format!("api/campaigns/{campaign_id}/creators/{creator_id}"),
            &[],
        );
        let response = self.client.delete(url).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// URL of the CSV export for a campaign. The stream itself is not parsed
    /// by this client; only the address is constructed.
    pub fn export_url(&self, campaign_id: i64) -> Url {
        self.build_url(&format!("api/campaigns/{campaign_id}/export"), &[])
    }

    /// Builds a request URL with properly percent-encoded query parameters.
    fn build_url(&self, path: &str, pairs: &[(&'static str, String)]) -> Url {
        let mut url = self
            .base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone());
        if !pairs.is_empty() {
            let mut qp = url.query_pairs_mut();
            for (k, v) in pairs {
                qp.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.client.get(url.clone()).send().await?;
        Self::decode(url, response).await
    }

    /// Asserts a 2xx status and parses the body as JSON.
    async fn decode<T: DeserializeOwned>(
        url: Url,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Maps any non-2xx response to [`ApiError::Status`]. The backend puts
    /// its error message under `detail` (or `message`); fall back to the
    /// canonical reason when the body carries neither.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let fallback = || {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        };
        let text = match response.text().await {
            Ok(body) => serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("detail")
                        .or_else(|| v.get("message"))
                        .and_then(|d| d.as_str().map(ToOwned::to_owned))
                })
                .unwrap_or_else(fallback),
            Err(_) => fallback(),
        };
        Err(ApiError::Status { code: status, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> DiscoveryClient {
        DiscoveryClient::new(base_url, Duration::from_secs(30))
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_query_pairs() {
        let client = test_client("http://localhost:8000");
        let url = client.build_url(
            "api/creators/search",
            &[
                ("platform", "tiktok".into()),
                ("min_followers", "1000".into()),
            ],
        );
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/creators/search?platform=tiktok&min_followers=1000"
        );
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("http://localhost:8000///");
        let url = client.build_url("api/campaigns", &[]);
        assert_eq!(url.as_str(), "http://localhost:8000/api/campaigns");
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("http://localhost:8000");
        let url = client.build_url("api/creators/search", &[("niche", "health & wellness".into())]);
        assert!(
            url.as_str().contains("health+%26+wellness")
                || url.as_str().contains("health%20%26%20wellness"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn export_url_points_at_campaign_export() {
        let client = test_client("http://localhost:8000");
        assert_eq!(
            client.export_url(7).as_str(),
            "http://localhost:8000/api/campaigns/7/export"
        );
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(matches!(
            DiscoveryClient::new("not a url", Duration::from_secs(1)),
            Err(ApiError::BadBaseUrl(_))
        ));
    }
}
