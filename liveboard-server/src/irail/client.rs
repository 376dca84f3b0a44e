//! iRail HTTP client.
//!
//! Provides async methods for the three iRail endpoints the views use:
//! liveboard, vehicle and composition. No retries and no timeout beyond
//! reqwest's default; a failed request is returned to the caller.

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::IrailError;
use super::types::{Direction, LiveboardResponse, LiveboardResult, TrainComposition, TrainInfo};

/// Default base URL for the public iRail API.
pub const DEFAULT_BASE_URL: &str = "https://api.irail.be";

/// Default response language.
pub const DEFAULT_LANG: &str = "fr";

/// The operations the views need from iRail.
///
/// Implemented by [`IrailClient`] for the live API and by
/// [`MockIrailClient`](super::MockIrailClient) for offline use and tests.
pub trait IrailApi: Send + Sync + 'static {
    /// Fetch the liveboard of `station` in `direction`.
    fn liveboard(
        &self,
        station: &str,
        direction: Direction,
    ) -> impl Future<Output = Result<LiveboardResult, IrailError>> + Send;

    /// Fetch a train's route and stops.
    fn vehicle(&self, train_id: &str) -> impl Future<Output = Result<TrainInfo, IrailError>> + Send;

    /// Fetch a train's rolling-stock composition.
    fn composition(
        &self,
        train_id: &str,
    ) -> impl Future<Output = Result<TrainComposition, IrailError>> + Send;
}

/// Configuration for the iRail client.
#[derive(Debug, Clone)]
pub struct IrailConfig {
    /// Base URL for the API (defaults to the public iRail API)
    pub base_url: String,
    /// Language for station names (`nl`, `fr`, `en`, `de`)
    pub lang: String,
    /// User agent sent with every request
    pub user_agent: String,
}

impl IrailConfig {
    /// Create a config pointing at the public API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            user_agent: concat!("liveboard-server/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set a custom base URL (for testing or a self-hosted mirror).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the response language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for IrailConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// iRail API client.
#[derive(Debug, Clone)]
pub struct IrailClient {
    http: reqwest::Client,
    base_url: String,
    lang: String,
}

impl IrailClient {
    /// Create a new client with the given configuration.
    pub fn new(config: IrailConfig) -> Result<Self, IrailError> {
        let mut headers = HeaderMap::new();

        let user_agent =
            HeaderValue::from_str(&config.user_agent).map_err(|_| IrailError::HttpStatus {
                status: 0,
                message: "Invalid user agent".to_string(),
            })?;
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            lang: config.lang,
        })
    }

    /// Query parameters for a liveboard request.
    fn liveboard_query<'a>(
        &'a self,
        station: &'a str,
        direction: Direction,
    ) -> [(&'a str, &'a str); 4] {
        [
            ("station", station),
            ("format", "json"),
            ("arrdep", direction.as_query()),
            ("lang", self.lang.as_str()),
        ]
    }

    /// GET `{base}/{endpoint}/` and return the body of a 2xx response.
    async fn get_text(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<String, IrailError> {
        let url = format!("{}/{}/", self.base_url, endpoint);
        debug!(%url, ?query, "iRail request");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IrailError::HttpStatus {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

/// Parse a JSON body, keeping a snippet of it on failure.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, IrailError> {
    serde_json::from_str(body).map_err(|e| IrailError::parse(e.to_string(), body))
}

/// Parse a liveboard body, selecting the list for `direction`.
pub(crate) fn parse_liveboard(
    body: &str,
    direction: Direction,
) -> Result<LiveboardResult, IrailError> {
    let response: LiveboardResponse = parse_body(body)?;
    LiveboardResult::from_response(response, direction)
}

impl IrailApi for IrailClient {
    async fn liveboard(
        &self,
        station: &str,
        direction: Direction,
    ) -> Result<LiveboardResult, IrailError> {
        let body = self
            .get_text("liveboard", &self.liveboard_query(station, direction))
            .await?;
        parse_liveboard(&body, direction)
    }

    async fn vehicle(&self, train_id: &str) -> Result<TrainInfo, IrailError> {
        let body = self
            .get_text(
                "vehicle",
                &[("id", train_id), ("format", "json"), ("lang", self.lang.as_str())],
            )
            .await?;
        parse_body(&body)
    }

    async fn composition(&self, train_id: &str) -> Result<TrainComposition, IrailError> {
        let body = self
            .get_text("composition", &[("id", train_id), ("format", "json")])
            .await?;
        parse_body(&body)
    }
}
