//! HTTP clients for the supported services.
//!
//! Each client implements the capability traits from [`crate::remote`]
//! its API supports.

pub mod bazarr;
pub mod plex;
pub mod sonarr;

pub use bazarr::BazarrClient;
pub use plex::PlexClient;
pub use sonarr::SonarrClient;

use crate::error::{ClientError, Result};
use reqwest::Client;
use std::time::Duration;

/// Build an HTTP client with a per-request timeout.
pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}", e);
            Client::new()
        })
}

/// Read a response body, turning non-success statuses into errors.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    tracing::debug!("Response status={}, body length={}", status, body.len());

    if !status.is_success() {
        return Err(ClientError::status(status.as_u16(), body));
    }
    Ok(body)
}
