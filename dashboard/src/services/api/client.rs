//! # API Client
//!
//! The single HTTP transport to the bookstore gateway.
//!
//! Every facade call goes through [`ApiClient::request`] and
//! [`ApiClient::send`]:
//!
//! 1. `request` builds the URL from the fixed base and reads the
//!    [`SessionStore`]; a present token becomes `Authorization: Bearer ...`.
//! 2. `send` executes the request. Non-success statuses become a tagged
//!    [`ApiError`] carrying the server's message. A 401 first runs the
//!    [`UnauthorizedPolicy`], then the error is returned like any other.
//!
//! There is no retry, backoff or cache in here.

use super::policy::UnauthorizedPolicy;
use crate::core::config::DashboardConfig;
use crate::core::error::{ApiError, AppError};
use crate::core::service::ApiService;
use crate::session::SessionStore;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use shared::{
    Book, BookStats, ErrorResponse, LoginRequest, LoginResponse, OrderHistory, OrderRequest,
    OrderResponse, ProfileUpdate, User,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the API gateway.
///
/// Cheap to clone; clones share the connection pool, the session and the
/// unauthorized policy.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: Url,
    session: Arc<SessionStore>,
    on_unauthorized: Arc<dyn UnauthorizedPolicy>,
}

impl ApiClient {
    /// Create a client for `base_url` with the default 10 second timeout.
    pub fn new(
        base_url: &str,
        session: Arc<SessionStore>,
        on_unauthorized: Arc<dyn UnauthorizedPolicy>,
    ) -> crate::core::Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT, session, on_unauthorized)
    }

    /// Create a client from the dashboard configuration.
    pub fn from_config(
        config: &DashboardConfig,
        session: Arc<SessionStore>,
        on_unauthorized: Arc<dyn UnauthorizedPolicy>,
    ) -> crate::core::Result<Self> {
        Self::with_timeout(&config.gateway_url, config.request_timeout, session, on_unauthorized)
    }

    pub fn with_timeout(
        base_url: &str,
        timeout: Duration,
        session: Arc<SessionStore>,
        on_unauthorized: Arc<dyn UnauthorizedPolicy>,
    ) -> crate::core::Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| AppError::Config(format!("Invalid gateway URL '{}': {}", base_url, e)))?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!("Gateway URL must be http(s): {}", base_url)));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            session,
            on_unauthorized,
        })
    }

    /// Base URL every request is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session this client signs requests with.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Resolve path segments against the base URL.
    ///
    /// Segments are percent-encoded, so ids containing `/` or spaces stay
    /// one segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot-be-a-base URLs are rejected at construction
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start a request, signed with the current session token if there is one.
    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.client.request(method, self.endpoint(segments));
        match self.session.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Execute a request and classify the response.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let start = Instant::now();

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::error!(
                method = %method,
                path = %path,
                error = %e,
                duration_ms = start.elapsed().as_millis(),
                "Gateway request failed without a response"
            );
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let duration = start.elapsed();

        if status.is_success() {
            tracing::debug!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                duration_ms = duration.as_millis(),
                "Gateway request succeeded"
            );
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);

        if status == StatusCode::UNAUTHORIZED {
            self.on_unauthorized.on_unauthorized(&self.session, &path);
        }

        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            error = %message,
            duration_ms = duration.as_millis(),
            "Gateway request rejected"
        );

        Err(ApiError::from_status(status, message))
    }

    /// Execute a request and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, "Gateway response parse error");
            ApiError::Decode(e.to_string())
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish()
    }
}

/// Server message for a failed response.
///
/// Backends answer `{"error": "..."}`; anything else falls back to the raw
/// body, then to the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(error) = serde_json::from_str::<ErrorResponse>(body) {
        return error.error;
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

// Implement ApiService trait for ApiClient
#[async_trait::async_trait]
impl ApiService for ApiClient {
    async fn login(&self, credentials: LoginRequest) -> Result<LoginResponse, ApiError> {
        crate::services::api::auth::login(self, credentials).await
    }

    fn logout(&self) {
        crate::services::api::auth::logout(self)
    }

    async fn get_profile(&self) -> Result<User, ApiError> {
        crate::services::api::users::get_profile(self).await
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<User, ApiError> {
        crate::services::api::users::update_profile(self, update).await
    }

    async fn get_all_users(&self) -> Result<Vec<User>, ApiError> {
        crate::services::api::users::get_all_users(self).await
    }

    async fn get_books(&self) -> Result<Vec<Book>, ApiError> {
        crate::services::api::books::get_books(self).await
    }

    async fn get_book(&self, id: &str) -> Result<Book, ApiError> {
        crate::services::api::books::get_book(self, id).await
    }

    async fn create_book(&self, book: Book) -> Result<Book, ApiError> {
        crate::services::api::books::create_book(self, book).await
    }

    async fn delete_book(&self, id: &str) -> Result<(), ApiError> {
        crate::services::api::books::delete_book(self, id).await
    }

    async fn get_book_stats(&self) -> Result<BookStats, ApiError> {
        crate::services::api::books::get_book_stats(self).await
    }

    async fn place_order(&self, order: OrderRequest) -> Result<OrderResponse, ApiError> {
        crate::services::api::orders::place_order(self, order).await
    }

    async fn get_order_history(&self) -> Result<Vec<OrderHistory>, ApiError> {
        crate::services::api::orders::get_order_history(self).await
    }

    async fn get_all_orders(&self) -> Result<Vec<OrderHistory>, ApiError> {
        crate::services::api::orders::get_all_orders(self).await
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        crate::services::api::health::health_check(self).await
    }
}
