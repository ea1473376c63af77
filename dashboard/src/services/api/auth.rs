//! # Authentication Endpoints
//!
//! Login stores the returned token in the client's session; logout only
//! forgets it. Neither keeps the credentials around.

use super::client::ApiClient;
use crate::core::error::ApiError;
use reqwest::Method;
use shared::{LoginRequest, LoginResponse};

/// Login with username and password.
#[tracing::instrument(skip(client, credentials), fields(username = %credentials.username))]
pub async fn login(client: &ApiClient, credentials: LoginRequest) -> Result<LoginResponse, ApiError> {
    tracing::info!("Attempting login");
    let start = std::time::Instant::now();

    let request = client.request(Method::POST, &["login"]).json(&credentials);
    let result = client.send_json::<LoginResponse>(request).await;

    match &result {
        Ok(response) => {
            client.session().set(response.token.clone());
            tracing::info!(duration_ms = start.elapsed().as_millis(), "Login successful");
        }
        Err(e) => {
            tracing::warn!(
                status = ?e.status(),
                error = %e,
                duration_ms = start.elapsed().as_millis(),
                "Login failed"
            );
        }
    }

    result
}

/// Drop the current session.
pub fn logout(client: &ApiClient) {
    client.session().clear();
    tracing::info!("Logged out");
}
