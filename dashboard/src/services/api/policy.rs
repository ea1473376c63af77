//! # Unauthorized Policy
//!
//! What the transport does when the gateway answers 401.
//!
//! The client never navigates anywhere itself. It hands the tagged failure
//! to an [`UnauthorizedPolicy`] before returning the error, and the default
//! [`ForceLogout`] policy clears the session and tells the UI to show the
//! login screen.

use crate::app::events::AppEvent;
use crate::session::SessionStore;
use async_channel::Sender;

/// Reaction to a 401 response, invoked before the error reaches the caller.
pub trait UnauthorizedPolicy: Send + Sync {
    fn on_unauthorized(&self, session: &SessionStore, path: &str);
}

/// Clear the session and request the login screen.
#[derive(Debug, Clone, Default)]
pub struct ForceLogout {
    events: Option<Sender<AppEvent>>,
}

impl ForceLogout {
    pub fn new(events: Sender<AppEvent>) -> Self {
        Self { events: Some(events) }
    }

    /// Clear the session without notifying anyone.
    pub fn silent() -> Self {
        Self { events: None }
    }
}

impl UnauthorizedPolicy for ForceLogout {
    fn on_unauthorized(&self, session: &SessionStore, path: &str) {
        let had_session = session.is_authenticated();
        session.clear();

        tracing::warn!(path = %path, had_session, "Gateway rejected credentials, session cleared");

        if let Some(tx) = &self.events {
            // unbounded channel; only fails once the receiver is gone
            if tx.try_send(AppEvent::SessionExpired).is_err() {
                tracing::debug!("Event channel closed, dropping SessionExpired");
            }
        }
    }
}
