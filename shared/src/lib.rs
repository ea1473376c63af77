//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the dashboard client and the
//! bookstore API gateway. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Login, user profile and error DTOs
//!   - **[`dto::catalog`]**: Books and catalog statistics
//!   - **[`dto::orders`]**: Order placement and order history
//!
//! ## Wire Format
//!
//! All DTOs serialize to JSON using the default `serde` behavior:
//! - Field names use **snake_case** in Rust and in JSON
//! - Enums serialize to lowercase strings
//! - Timestamps are RFC 3339 strings parsed into `chrono::DateTime<Utc>`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shared::dto::auth::{LoginRequest, LoginResponse};
//!
//! let request = LoginRequest {
//!     username: "admin".to_string(),
//!     password: "password".to_string(),
//! };
//!
//! let response: LoginResponse = reqwest::Client::new()
//!     .post("http://localhost:8080/login")
//!     .json(&request)
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

pub mod dto;

// Wildcard re-export: shared is a DTO library where all exports are public API
pub use dto::*;
