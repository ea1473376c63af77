//! # External Services
//!
//! - **[`api`]**: the gateway client and the typed facade built on it

pub mod api;
