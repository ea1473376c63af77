//! # Dashboard State
//!
//! Shared view state read by the presentation layer and written by the
//! background tasks.
//!
//! Each piece lives behind its own `parking_lot::RwLock` so the poller and
//! the feed never contend. Hold a guard only long enough to copy out what
//! you render.

use crate::app::tasks::notifications::NotificationFeed;
use crate::app::tasks::status::{MonitoredService, StatusSnapshot};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle to the dashboard's shared state.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Latest committed status snapshot
    pub status: Arc<RwLock<StatusSnapshot>>,
    pub notifications: Arc<RwLock<NotificationFeed>>,
    session_expired: Arc<AtomicBool>,
}

impl DashboardState {
    pub fn new(services: &[MonitoredService], notification_capacity: usize) -> Self {
        Self {
            status: Arc::new(RwLock::new(StatusSnapshot::initial(services))),
            notifications: Arc::new(RwLock::new(NotificationFeed::new(notification_capacity))),
            session_expired: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn status(&self) -> StatusSnapshot {
        self.status.read().clone()
    }

    pub fn notifications(&self) -> NotificationFeed {
        self.notifications.read().clone()
    }

    /// Set once a 401 cleared the session; the login view should be shown.
    pub fn session_expired(&self) -> bool {
        self.session_expired.load(Ordering::Acquire)
    }

    pub(crate) fn set_session_expired(&self, expired: bool) {
        self.session_expired.store(expired, Ordering::Release);
    }
}
