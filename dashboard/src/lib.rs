//! # Bookstore Dashboard - Library Root
//!
//! Client core of the bookstore operations dashboard. It talks to the
//! bookstore API gateway over HTTP and keeps the view state a front end
//! renders from. This library crate contains all modules used by the
//! binary crate (`main.rs`).
//!
//! ## Features
//!
//! - **Session handling**: one bearer token, persisted across restarts
//! - **Typed API facade**: auth, catalog, orders, users, health
//! - **Central 401 policy**: an expired session is cleared in one place
//! - **Status board**: periodic, atomic health snapshots of the backend
//! - **Notification feed**: bounded newest-first list with unread badge
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              dashboard (this crate)                    │
//! ├────────────────────────────────────────────────────────┤
//! │  app        - Runtime, shared state, background tasks  │
//! │  services   - Gateway HTTP client and facade           │
//! │  session    - Token store and persistence              │
//! │  core       - Config, errors, service traits           │
//! │  debug      - Logging setup                            │
//! └────────────────────────────────────────────────────────┘
//!          │ HTTP (JSON, bearer auth)
//!          ▼
//! ┌─────────────────┐     ┌──────────────────────────────┐
//! │  API Gateway    │ ──▶ │ Book / Order / User services │
//! └─────────────────┘     └──────────────────────────────┘
//! ```
//!
//! ### Module Dependency Graph
//!
//! ```text
//! main.rs
//!   │
//!   ├── debug (logging)
//!   └── app (Dashboard)
//!       ├── tasks::status        -> services::api::health
//!       ├── tasks::notifications
//!       ├── analytics            -> core::service::ApiService
//!       └── services::api        -> session
//! ```
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin dashboard
//! ```

pub mod app;
pub mod core;
pub mod debug;
pub mod services;
pub mod session;

pub use app::{AppEvent, Dashboard, DashboardState};
pub use core::{ApiError, AppError, Result};
