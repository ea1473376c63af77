//! # Core Abstractions
//!
//! Foundational types used throughout the dashboard client:
//!
//! - **[`config`]**: Environment-driven configuration (`DashboardConfig`)
//! - **[`error`]**: Error types (`ApiError`, `AppError`, `Result<T>`)
//! - **[`service`]**: The `ApiService` trait every screen talks to
//!
//! ## Dependency Injection
//!
//! Screens and background tasks hold an `Arc<dyn ApiService>`, so tests can
//! swap the real gateway client for a scripted one:
//!
//! ```rust,no_run
//! use dashboard::core::service::ApiService;
//! use dashboard::services::api::{ApiClient, ForceLogout};
//! use dashboard::session::SessionStore;
//! use std::sync::Arc;
//!
//! let session = Arc::new(SessionStore::in_memory());
//! let client = ApiClient::new("http://localhost:8080", session, Arc::new(ForceLogout::silent()))
//!     .expect("valid gateway url");
//! let api: Arc<dyn ApiService> = Arc::new(client);
//! ```

pub mod config;
pub mod error;
pub mod service;

pub use error::{ApiError, AppError, Result};
