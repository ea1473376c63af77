//! # User Endpoints
//!
//! Profile read/update and the admin-only user listing.

use super::client::ApiClient;
use crate::core::error::ApiError;
use reqwest::Method;
use shared::{ProfileUpdate, User};

/// Profile of the signed-in user.
pub async fn get_profile(client: &ApiClient) -> Result<User, ApiError> {
    client.send_json(client.request(Method::GET, &["profile"])).await
}

/// Update email and full name; returns the stored profile.
#[tracing::instrument(skip(client, update))]
pub async fn update_profile(client: &ApiClient, update: ProfileUpdate) -> Result<User, ApiError> {
    let request = client.request(Method::PUT, &["profile"]).json(&update);
    let user: User = client.send_json(request).await?;
    tracing::info!(username = %user.username, "Profile updated");
    Ok(user)
}

/// Every account. The gateway answers 403 for non-admin sessions.
pub async fn get_all_users(client: &ApiClient) -> Result<Vec<User>, ApiError> {
    let users: Vec<User> = client.send_json(client.request(Method::GET, &["users"])).await?;
    tracing::debug!(count = users.len(), "Users fetched");
    Ok(users)
}
