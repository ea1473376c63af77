//! # Gateway API Client Module
//!
//! HTTP client for the bookstore API gateway. Handles authentication,
//! catalog, orders, users and health checks.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs      - Module exports and documentation
//! ├── client.rs   - ApiClient: base URL, request signing, response classification
//! ├── policy.rs   - UnauthorizedPolicy and the default ForceLogout
//! ├── auth.rs     - Login / logout
//! ├── users.rs    - Profile and user listing
//! ├── books.rs    - Catalog CRUD and statistics
//! ├── orders.rs   - Order placement and history
//! └── health.rs   - Liveness probes
//! ```

pub mod auth;
pub mod books;
pub mod client;
pub mod health;
pub mod orders;
pub mod policy;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::ApiClient;
pub use policy::{ForceLogout, UnauthorizedPolicy};
