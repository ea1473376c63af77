//! # Logging Infrastructure
//!
//! Structured `tracing` output for the dashboard binary.
//!
//! ## Features
//!
//! - **File-based logging**: `logs/dashboard.log.<date>` (daily rotation)
//! - **Console output**: optional stdout layer
//! - **Panic logging**: panics are recorded before the default hook runs
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (e.g., `dashboard=debug,info`)
//! - `DASHBOARD_LOG_DIR`: Log directory (default: `logs`)
//! - `DASHBOARD_LOG_STDOUT`: Mirror logs to stdout (1=on, 0=off, default on)

pub mod config;
pub mod logger;

pub use config::DebugConfig;
pub use logger::init as init_logger;
