//! # Background Tasks
//!
//! Long-running tasks owned by the dashboard runtime: the service status
//! poller and the notification feed.

pub mod notifications;
pub mod status;
