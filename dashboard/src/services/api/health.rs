//! # Health Endpoints
//!
//! Liveness probes. These are unauthenticated and skip the session policy:
//! a failing probe never touches the session.

use super::client::ApiClient;
use crate::core::error::ApiError;
use reqwest::Url;

/// `GET /health` on the gateway.
pub async fn health_check(client: &ApiClient) -> Result<(), ApiError> {
    probe(client, client.endpoint(&["health"])).await
}

/// `GET <base>/health` on any other directly reachable service.
pub async fn probe_service(client: &ApiClient, base_url: &str) -> Result<(), ApiError> {
    let mut url = Url::parse(base_url).map_err(|e| ApiError::Network(format!("Invalid service URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::Network(format!("Service URL cannot be a base: {}", base_url)))?
        .pop_if_empty()
        .push("health");
    probe(client, url).await
}

async fn probe(client: &ApiClient, url: Url) -> Result<(), ApiError> {
    let response = client.client.get(url.clone()).send().await.map_err(|e| {
        tracing::debug!(url = %url, error = %e, "Health probe got no response");
        ApiError::Network(e.to_string())
    })?;

    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        tracing::debug!(url = %url, status = status.as_u16(), "Health probe failed");
        Err(ApiError::from_status(status, format!("health check returned {}", status)))
    }
}
