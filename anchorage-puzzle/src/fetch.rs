//! Client for the remote fleet API.
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use anchorage::{FleetDefinition, FleetError};

/// Reason a fleet could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure, timeout, or an unreadable body.
    #[error("failed to fetch fleet data: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("failed to fetch fleet data: server returned {0}")]
    Status(StatusCode),
    /// The body was not a usable fleet definition.
    #[error(transparent)]
    Fleet(#[from] FleetError),
}

/// Fetches random fleets from a fixed endpoint.
#[derive(Debug, Clone)]
pub struct FleetClient {
    http: reqwest::Client,
    url: Url,
}

impl FleetClient {
    /// Construct a client for the given endpoint.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }

    /// Endpoint this client fetches from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch one random fleet definition.
    pub async fn random_fleet(&self) -> Result<FleetDefinition, FetchError> {
        debug!(url = %self.url, "requesting fleet");
        let response = self.http.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.text().await?;
        let fleet = FleetDefinition::from_json(&body)?;
        info!(
            anchorage = %fleet.anchorage_size,
            types = fleet.fleets.len(),
            vessels = fleet.total_ship_count(),
            "fleet received"
        );
        Ok(fleet)
    }
}
