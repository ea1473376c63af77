//! # Service Status Poller
//!
//! Periodically samples the gateway and publishes one status snapshot per
//! tick.
//!
//! ## Tick
//!
//! 1. Every `Gateway` and `Direct` service is probed concurrently.
//! 2. Once all probes resolve, `ThroughGateway` services are derived from
//!    the gateway result: healthy iff the gateway is, `unknown` otherwise.
//!    The backends sit behind the gateway and cannot be probed from the
//!    client, so this is an inference, not a real check.
//! 3. The whole board is replaced under one write lock with a new
//!    version, then `ServiceStatusUpdated` is published.
//!
//! A tick that fires while the previous one is still probing is skipped.
//! Stopping the poller cancels the timer; a tick whose probes come back
//! after that is dropped without committing.

use crate::app::events::AppEvent;
use crate::services::api::{health, ApiClient};
use async_channel::Sender;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Health of one monitored service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceHealth {
    Healthy,
    Unhealthy,
    Unknown,
}

impl ServiceHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceHealth::Healthy => "healthy",
            ServiceHealth::Unhealthy => "unhealthy",
            ServiceHealth::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ServiceHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a service's health is determined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStrategy {
    /// The designated gateway, probed with `GET /health`.
    Gateway,
    /// An independently reachable service, probed at `<url>/health`.
    Direct,
    /// Reachable only through the gateway; inferred from the gateway probe.
    ThroughGateway,
}

/// A service shown on the status board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredService {
    pub name: String,
    pub url: String,
    pub port: u16,
    pub strategy: CheckStrategy,
}

impl MonitoredService {
    pub fn gateway(name: &str, url: &str, port: u16) -> Self {
        Self::with_strategy(name, url, port, CheckStrategy::Gateway)
    }

    pub fn direct(name: &str, url: &str, port: u16) -> Self {
        Self::with_strategy(name, url, port, CheckStrategy::Direct)
    }

    pub fn through_gateway(name: &str, url: &str, port: u16) -> Self {
        Self::with_strategy(name, url, port, CheckStrategy::ThroughGateway)
    }

    fn with_strategy(name: &str, url: &str, port: u16, strategy: CheckStrategy) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            port,
            strategy,
        }
    }

    fn unknown(&self) -> ServiceStatus {
        self.status(ServiceHealth::Unknown)
    }

    fn status(&self, status: ServiceHealth) -> ServiceStatus {
        ServiceStatus {
            name: self.name.clone(),
            status,
            url: self.url.clone(),
            port: self.port,
        }
    }
}

/// One row of the status board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: String,
    pub status: ServiceHealth,
    pub url: String,
    pub port: u16,
}

/// One committed tick. `version` is 0 before the first commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub version: u64,
    pub checked_at: Option<DateTime<Utc>>,
    pub services: Vec<ServiceStatus>,
}

impl StatusSnapshot {
    /// Every service `unknown`, nothing checked yet.
    pub fn initial(services: &[MonitoredService]) -> Self {
        Self {
            version: 0,
            checked_at: None,
            services: services.iter().map(MonitoredService::unknown).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ServiceStatus> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn all_healthy(&self) -> bool {
        self.services.iter().all(|s| s.status == ServiceHealth::Healthy)
    }
}

/// Liveness check for one probed service.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self, service: &MonitoredService) -> ServiceHealth;
}

/// Probes through the dashboard's own gateway client.
#[derive(Debug, Clone)]
pub struct GatewayProbe {
    api: ApiClient,
}

impl GatewayProbe {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl HealthProbe for GatewayProbe {
    async fn probe(&self, service: &MonitoredService) -> ServiceHealth {
        let result = match service.strategy {
            CheckStrategy::Gateway => health::health_check(&self.api).await,
            CheckStrategy::Direct => health::probe_service(&self.api, &service.url).await,
            CheckStrategy::ThroughGateway => return ServiceHealth::Unknown,
        };

        match result {
            Ok(()) => ServiceHealth::Healthy,
            Err(e) => {
                tracing::debug!(service = %service.name, error = %e, "Service probe failed");
                ServiceHealth::Unhealthy
            }
        }
    }
}

/// Probe every checkable service concurrently, then derive the rest.
async fn evaluate(services: &[MonitoredService], probe: &dyn HealthProbe) -> Vec<ServiceStatus> {
    let probed = join_all(
        services
            .iter()
            .filter(|s| s.strategy != CheckStrategy::ThroughGateway)
            .map(|s| async move { (s.name.as_str(), probe.probe(s).await) }),
    )
    .await;

    let gateway = services
        .iter()
        .find(|s| s.strategy == CheckStrategy::Gateway)
        .and_then(|g| probed.iter().find(|(name, _)| *name == g.name))
        .map(|(_, health)| *health)
        .unwrap_or(ServiceHealth::Unknown);

    services
        .iter()
        .map(|service| {
            let health = match service.strategy {
                CheckStrategy::ThroughGateway => match gateway {
                    ServiceHealth::Healthy => ServiceHealth::Healthy,
                    _ => ServiceHealth::Unknown,
                },
                _ => probed
                    .iter()
                    .find(|(name, _)| *name == service.name)
                    .map(|(_, health)| *health)
                    .unwrap_or(ServiceHealth::Unknown),
            };
            service.status(health)
        })
        .collect()
}

/// Clears the in-flight flag even if the tick future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        (!flag.swap(true, Ordering::AcqRel)).then_some(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Status board poller. Configure, then [`spawn`](StatusPoller::spawn) it.
pub struct StatusPoller {
    services: Vec<MonitoredService>,
    interval: Duration,
    probe: Arc<dyn HealthProbe>,
    board: Arc<RwLock<StatusSnapshot>>,
    events: Option<Sender<AppEvent>>,
    in_flight: AtomicBool,
}

impl StatusPoller {
    pub fn new(services: Vec<MonitoredService>, interval: Duration, probe: Arc<dyn HealthProbe>) -> Self {
        let board = Arc::new(RwLock::new(StatusSnapshot::initial(&services)));
        Self {
            services,
            interval,
            probe,
            board,
            events: None,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Publish every committed snapshot on `events`.
    pub fn with_events(mut self, events: Sender<AppEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Commit into an existing board instead of a private one.
    pub fn with_board(self, board: Arc<RwLock<StatusSnapshot>>) -> Self {
        *board.write() = StatusSnapshot::initial(&self.services);
        Self { board, ..self }
    }

    /// The shared board the view reads from.
    pub fn board(&self) -> Arc<RwLock<StatusSnapshot>> {
        Arc::clone(&self.board)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.board.read().clone()
    }

    /// Run one tick now. `None` if a tick is already in flight.
    pub async fn poll_once(&self) -> Option<StatusSnapshot> {
        self.tick(None).await
    }

    async fn tick(&self, cancel: Option<&CancellationToken>) -> Option<StatusSnapshot> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("Status tick skipped, previous tick still in flight");
            return None;
        };

        let start = std::time::Instant::now();
        let statuses = evaluate(&self.services, self.probe.as_ref()).await;

        if cancel.is_some_and(|c| c.is_cancelled()) {
            tracing::debug!("Status poller stopped during tick, discarding results");
            return None;
        }

        let snapshot = {
            let mut board = self.board.write();
            // stop() cancels under this lock, so a stop seen here is final
            if cancel.is_some_and(|c| c.is_cancelled()) {
                tracing::debug!("Status poller stopped before commit, discarding results");
                return None;
            }
            let next = StatusSnapshot {
                version: board.version + 1,
                checked_at: Some(lib_utils::now_utc()),
                services: statuses,
            };
            *board = next.clone();
            next
        };

        tracing::debug!(
            version = snapshot.version,
            healthy = snapshot.services.iter().filter(|s| s.status == ServiceHealth::Healthy).count(),
            total = snapshot.services.len(),
            duration_ms = start.elapsed().as_millis(),
            "Service status committed"
        );

        if let Some(tx) = &self.events {
            let _ = tx.send(AppEvent::ServiceStatusUpdated(snapshot.clone())).await;
        }

        Some(snapshot)
    }

    /// Start polling: one tick immediately, then one per interval.
    pub fn spawn(self) -> StatusPollerHandle {
        let cancel = CancellationToken::new();
        let board = self.board();
        let poller = Arc::new(self);

        tracing::info!(
            services = poller.services.len(),
            interval_secs = poller.interval.as_secs_f64(),
            "Starting status poller"
        );

        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poller.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        // ticks run detached so a slow one can overlap the next firing
                        let poller = Arc::clone(&poller);
                        let token = token.clone();
                        tokio::spawn(async move {
                            poller.tick(Some(&token)).await;
                        });
                    }
                }
            }

            tracing::info!("Status poller stopped");
        });

        StatusPollerHandle {
            cancel,
            task: Some(task),
            board,
        }
    }
}

/// Owner of a running poller. Dropping it stops the timer.
pub struct StatusPollerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    board: Arc<RwLock<StatusSnapshot>>,
}

impl StatusPollerHandle {
    pub fn snapshot(&self) -> StatusSnapshot {
        self.board.read().clone()
    }

    pub fn board(&self) -> Arc<RwLock<StatusSnapshot>> {
        Arc::clone(&self.board)
    }

    /// Cancel the timer. In-flight probes finish but do not commit.
    pub fn stop(&self) {
        let _board = self.board.write();
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop and wait for the timer task to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for StatusPollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
