//! # Dashboard Runtime
//!
//! [`Dashboard`] wires the client core together and owns its background
//! tasks.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Dashboard                                               │
//! │  - start() / shutdown()                                  │
//! │  - handle_event() / drain_events()                       │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │  DashboardState (Arc + parking_lot::RwLock)         │  │
//! │  │  - status snapshot, notification feed, expiry flag  │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └───────────────────────┬──────────────────────────────────┘
//!                         │ async_channel (unbounded)
//! ┌───────────────────────▼──────────────────────────────────┐
//! │  Tokio tasks                                             │
//! │  - StatusPoller       -> ServiceStatusUpdated            │
//! │  - notification feed  -> NotificationReceived            │
//! │  - ApiClient (401)    -> SessionExpired                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Background tasks commit straight into [`DashboardState`]; the events
//! only tell the consumer something changed. `SessionExpired` is the one
//! event that carries state of its own.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use dashboard::app::Dashboard;
//! use dashboard::core::config::DashboardConfig;
//!
//! # async fn run() -> dashboard::core::Result<()> {
//! let mut dashboard = Dashboard::new(DashboardConfig::from_env()?)?;
//! dashboard.start();
//!
//! let events = dashboard.events();
//! while let Ok(event) = events.recv().await {
//!     dashboard.handle_event(&event);
//! }
//! dashboard.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod events;
pub mod state;
pub mod tasks;

pub use events::AppEvent;
pub use state::DashboardState;

use crate::core::config::DashboardConfig;
use crate::core::error::{ApiError, Result};
use crate::core::service::ApiService;
use crate::services::api::{ApiClient, ForceLogout};
use crate::session::{FileTokenStorage, SessionStore};
use async_channel::{unbounded, Receiver, Sender};
use shared::{LoginRequest, LoginResponse};
use std::sync::Arc;
use tasks::notifications::{spawn_feed, NotificationFeedHandle, NotificationSource, SimulatedOrderSource};
use tasks::status::{GatewayProbe, HealthProbe, StatusPoller, StatusPollerHandle};

/// The dashboard client core: API facade, shared state and background tasks.
pub struct Dashboard {
    config: DashboardConfig,
    api: ApiClient,
    state: DashboardState,
    event_tx: Sender<AppEvent>,
    event_rx: Receiver<AppEvent>,
    poller: Option<StatusPollerHandle>,
    feed: Option<NotificationFeedHandle>,
}

impl Dashboard {
    /// Build a dashboard whose session persists under `config.session_dir`.
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let session = Arc::new(SessionStore::new(FileTokenStorage::new(&config.session_dir)));
        Self::with_session(config, session)
    }

    /// Build a dashboard around an existing session store.
    pub fn with_session(config: DashboardConfig, session: Arc<SessionStore>) -> Result<Self> {
        config.validate()?;

        let (event_tx, event_rx) = unbounded();
        let api = ApiClient::from_config(&config, session, Arc::new(ForceLogout::new(event_tx.clone())))?;
        let state = DashboardState::new(&config.services, config.notification_capacity);

        tracing::info!(
            gateway = %config.gateway_url,
            services = config.services.len(),
            authenticated = api.session().is_authenticated(),
            "Dashboard initialized"
        );

        Ok(Self {
            config,
            api,
            state,
            event_tx,
            event_rx,
            poller: None,
            feed: None,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The gateway client; clones share the session.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn api_service(&self) -> Arc<dyn ApiService> {
        Arc::new(self.api.clone())
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// A receiver on the event channel. Receivers compete for events.
    pub fn events(&self) -> Receiver<AppEvent> {
        self.event_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.poller.is_some() || self.feed.is_some()
    }

    /// Start the status poller and the simulated notification feed.
    pub fn start(&mut self) {
        let source = SimulatedOrderSource::new(
            self.config.notification_interval,
            self.config.notification_probability,
        );
        let probe = Arc::new(GatewayProbe::new(self.api.clone()));
        self.start_with(probe, Box::new(source));
    }

    /// Start with a custom probe and notification source. No-op if running.
    pub fn start_with(&mut self, probe: Arc<dyn HealthProbe>, source: Box<dyn NotificationSource>) {
        if self.is_running() {
            tracing::debug!("Dashboard already running");
            return;
        }

        let poller = StatusPoller::new(self.config.services.clone(), self.config.status_interval, probe)
            .with_board(self.state.status.clone())
            .with_events(self.event_tx.clone())
            .spawn();
        let feed = spawn_feed(source, self.state.notifications.clone(), Some(self.event_tx.clone()));

        self.poller = Some(poller);
        self.feed = Some(feed);
        tracing::info!("Dashboard background tasks started");
    }

    /// Stop both background tasks and wait for them to exit.
    pub async fn shutdown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.shutdown().await;
        }
        if let Some(feed) = self.feed.take() {
            feed.shutdown().await;
        }
        tracing::info!("Dashboard shut down");
    }

    /// Sign in and clear any previous expiry.
    pub async fn login(&self, username: &str, password: &str) -> std::result::Result<LoginResponse, ApiError> {
        let response = self
            .api
            .login(LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.state.set_session_expired(false);
        Ok(response)
    }

    pub fn logout(&self) {
        self.api.logout();
    }

    /// Apply one event to the shared state.
    pub fn handle_event(&self, event: &AppEvent) {
        match event {
            AppEvent::SessionExpired => {
                tracing::warn!("Session expired, sign-in required");
                self.state.set_session_expired(true);
            }
            AppEvent::ServiceStatusUpdated(snapshot) => {
                tracing::debug!(version = snapshot.version, "Status board updated");
            }
            AppEvent::NotificationReceived(notification) => {
                tracing::debug!(id = %notification.id, "Notification added");
            }
        }
    }

    /// Handle every pending event without waiting. Returns how many were handled.
    pub fn drain_events(&self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(&event);
            handled += 1;
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::test_support::MockGateway;
    use futures::stream::{self, BoxStream, StreamExt};
    use std::time::Duration;
    use crate::app::tasks::notifications::{Notification, NotificationKind};
    use crate::app::tasks::status::ServiceHealth;

    struct OneShotSource;

    impl NotificationSource for OneShotSource {
        fn subscribe(self: Box<Self>) -> BoxStream<'static, Notification> {
            stream::iter(vec![Notification::new(NotificationKind::System, "welcome")]).boxed()
        }
    }

    fn config_for(gateway: &MockGateway) -> DashboardConfig {
        DashboardConfig {
            gateway_url: gateway.url.clone(),
            services: crate::core::config::default_services(&gateway.url),
            ..DashboardConfig::default()
        }
    }

    fn in_memory(config: DashboardConfig) -> Dashboard {
        Dashboard::with_session(config, Arc::new(SessionStore::in_memory())).unwrap()
    }

    async fn next_event(rx: &Receiver<AppEvent>) -> AppEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event within timeout")
            .expect("channel open")
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = DashboardConfig {
            status_interval: Duration::ZERO,
            ..DashboardConfig::default()
        };
        assert!(Dashboard::with_session(config, Arc::new(SessionStore::in_memory())).is_err());
    }

    #[test]
    fn test_session_restored_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            session_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };

        let first = Dashboard::new(config.clone()).unwrap();
        first.api().session().set("persisted");

        let second = Dashboard::new(config).unwrap();
        assert_eq!(second.api().session().get().as_deref(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_start_publishes_status_and_notifications() {
        let gateway = MockGateway::start().await;
        let mut dashboard = in_memory(config_for(&gateway));
        let probe = Arc::new(GatewayProbe::new(dashboard.api().clone()));
        dashboard.start_with(probe, Box::new(OneShotSource));
        assert!(dashboard.is_running());

        let events = dashboard.events();
        let mut saw_status = false;
        let mut saw_notification = false;
        while !(saw_status && saw_notification) {
            match next_event(&events).await {
                AppEvent::ServiceStatusUpdated(snapshot) => {
                    assert_eq!(snapshot.version, 1);
                    assert!(snapshot.all_healthy());
                    saw_status = true;
                }
                AppEvent::NotificationReceived(n) => {
                    assert_eq!(n.message, "welcome");
                    saw_notification = true;
                }
                AppEvent::SessionExpired => panic!("no request was signed"),
            }
        }

        let state = dashboard.state();
        assert_eq!(state.status().get("API Gateway").unwrap().status, ServiceHealth::Healthy);
        assert_eq!(state.notifications().unread(), 1);

        dashboard.shutdown().await;
        assert!(!dashboard.is_running());
    }

    #[tokio::test]
    async fn test_session_expiry_flows_into_state() {
        let gateway = MockGateway::start().await;
        let dashboard = in_memory(config_for(&gateway));

        dashboard.login("alice", "password").await.unwrap();
        gateway.revoke_all_sessions();

        assert!(dashboard.api().get_profile().await.unwrap_err().is_unauthorized());
        assert_eq!(dashboard.drain_events(), 1);
        assert!(dashboard.state().session_expired());
        assert!(!dashboard.api().session().is_authenticated());

        dashboard.login("alice", "password").await.unwrap();
        assert!(!dashboard.state().session_expired());
    }

    #[tokio::test]
    async fn test_start_is_idempotent_and_shutdown_stops_updates() {
        let gateway = MockGateway::start().await;
        let mut dashboard = in_memory(DashboardConfig {
            status_interval: Duration::from_millis(50),
            ..config_for(&gateway)
        });
        dashboard.start();
        dashboard.start();

        let events = dashboard.events();
        next_event(&events).await;
        dashboard.shutdown().await;

        // let any in-flight tick resolve, then nothing new may arrive
        tokio::time::sleep(Duration::from_millis(200)).await;
        while events.try_recv().is_ok() {}
        let version = dashboard.state().status().version;
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(events.try_recv().is_err());
        assert_eq!(dashboard.state().status().version, version);
    }
}
