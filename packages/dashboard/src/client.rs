//! Crash data service client.
//!
//! [`RankingClient`] is the seam between the results view and the network;
//! [`HttpRankingClient`] is the `reqwest` implementation.

use async_trait::async_trait;
use crash_map_dashboard_models::{HealthResponse, RankingQuery, RankingResponse};
use thiserror::Error;

use crate::DashboardError;
use crate::config::DashboardConfig;
use crate::query::ApiBase;

/// Failures to obtain a usable response from the service.
///
/// A response carrying an `error` field is not a `RankingError`: it decodes
/// to [`RankingResponse::Failure`].
#[derive(Debug, Error)]
pub enum RankingError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The body is not a ranking response.
    #[error("Unrecognized response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The task running the fetch panicked.
    #[error("Fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Source of hot spot rankings.
#[async_trait]
pub trait RankingClient: Send + Sync {
    /// Requests the ranking for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`RankingError`] if the service is unreachable or replies
    /// with something other than a ranking response.
    async fn fetch_ranking(&self, query: &RankingQuery) -> Result<RankingResponse, RankingError>;
}

/// [`RankingClient`] backed by the service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRankingClient {
    client: reqwest::Client,
    api: ApiBase,
}

impl HttpRankingClient {
    /// Creates a client for the service described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            api: config.api_base()?,
        })
    }

    /// The service endpoints this client talks to.
    #[must_use]
    pub const fn api(&self) -> &ApiBase {
        &self.api
    }

    /// Checks that the service root answers.
    ///
    /// # Errors
    ///
    /// Returns [`RankingError`] if the service is unreachable or the body is
    /// not a status object.
    pub async fn check_health(&self) -> Result<HealthResponse, RankingError> {
        let text = self
            .client
            .get(self.api.root().clone())
            .send()
            .await?
            .text()
            .await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RankingClient for HttpRankingClient {
    async fn fetch_ranking(&self, query: &RankingQuery) -> Result<RankingResponse, RankingError> {
        let url = self.api.ranking_url(query);
        log::debug!("GET {url}");

        // The status code is not inspected: error bodies are JSON too and
        // are classified by their shape.
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            log::warn!(
                "Ranking response is not decodable (status={status}, {} bytes): {e}",
                text.len()
            );
            RankingError::Decode(e)
        })
    }
}
