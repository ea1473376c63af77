//! # Application Events
//!
//! Event types sent from background tasks and the HTTP client to the
//! runtime's event loop.

use crate::app::tasks::notifications::Notification;
use crate::app::tasks::status::StatusSnapshot;

/// Async results delivered to the runtime
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A request was rejected with 401 and the session has been cleared
    SessionExpired,
    /// The status poller committed a new snapshot
    ServiceStatusUpdated(StatusSnapshot),
    /// The notification feed received an entry
    NotificationReceived(Notification),
}
