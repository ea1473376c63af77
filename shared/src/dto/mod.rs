//! # Data Transfer Objects (DTOs)
//!
//! All data structures exchanged with the API gateway.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login, user profile and error payloads
//! - [`catalog`] - Books and book statistics
//! - [`orders`] - Order placement and order history
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /login
//! Content-Type: application/json
//!
//! {
//!   "username": "admin",
//!   "password": "password"
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//! }
//! ```
//!
//! Failures from every backend service share one shape:
//!
//! ```text
//! HTTP/1.1 403 Forbidden
//!
//! { "error": "Admin access required" }
//! ```

pub mod auth;
pub mod catalog;
pub mod orders;

pub use auth::*;
pub use catalog::*;
pub use orders::*;
