//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and modularity.

use crate::core::error::ApiError;
use async_trait::async_trait;
use shared::{
    Book, BookStats, LoginRequest, LoginResponse, OrderHistory, OrderRequest, OrderResponse,
    ProfileUpdate, User,
};

/// Typed operations against the bookstore gateway.
///
/// One method per backend operation. Implementations validate nothing and
/// cache nothing: every call is a fresh round trip, and role checks are left
/// to the server (an admin-only call from a regular account fails with
/// [`ApiError::Forbidden`]).
#[async_trait]
pub trait ApiService: Send + Sync {
    /// Exchange credentials for a token and store it in the session.
    async fn login(&self, credentials: LoginRequest) -> Result<LoginResponse, ApiError>;

    /// Forget the current session. No network call.
    fn logout(&self);

    /// Profile of the signed-in user
    async fn get_profile(&self) -> Result<User, ApiError>;

    async fn update_profile(&self, update: ProfileUpdate) -> Result<User, ApiError>;

    /// All accounts (admin only)
    async fn get_all_users(&self) -> Result<Vec<User>, ApiError>;

    async fn get_books(&self) -> Result<Vec<Book>, ApiError>;

    async fn get_book(&self, id: &str) -> Result<Book, ApiError>;

    async fn create_book(&self, book: Book) -> Result<Book, ApiError>;

    /// Not idempotent: deleting a missing id fails with [`ApiError::NotFound`].
    async fn delete_book(&self, id: &str) -> Result<(), ApiError>;

    async fn get_book_stats(&self) -> Result<BookStats, ApiError>;

    async fn place_order(&self, order: OrderRequest) -> Result<OrderResponse, ApiError>;

    /// Orders placed by the signed-in user
    async fn get_order_history(&self) -> Result<Vec<OrderHistory>, ApiError>;

    /// Orders of every user (admin only)
    async fn get_all_orders(&self) -> Result<Vec<OrderHistory>, ApiError>;

    /// Gateway liveness: `Ok` iff `GET /health` answers 2xx.
    async fn health_check(&self) -> Result<(), ApiError>;
}
