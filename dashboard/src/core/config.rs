//! # Dashboard Configuration
//!
//! Configuration loaded from environment variables (a `.env` file is read
//! by the binary before this runs). All values are validated on startup to
//! fail fast if misconfigured.
//!
//! | Variable | Default |
//! |---|---|
//! | `DASHBOARD_GATEWAY_URL` | `http://localhost:8080` |
//! | `DASHBOARD_REQUEST_TIMEOUT_SECS` | `10` |
//! | `DASHBOARD_STATUS_INTERVAL_SECS` | `30` |
//! | `DASHBOARD_NOTIFICATION_INTERVAL_SECS` | `10` |
//! | `DASHBOARD_NOTIFICATION_PROBABILITY` | `0.2` |
//! | `DASHBOARD_SESSION_DIR` | `data` |

use crate::app::tasks::status::{CheckStrategy, MonitoredService};
use crate::core::error::{AppError, Result};
use lib_utils::{get_env_or, get_env_parse_or};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_NOTIFICATION_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_NOTIFICATION_PROBABILITY: f64 = 0.2;
pub const NOTIFICATION_CAPACITY: usize = 10;

/// Runtime configuration for the dashboard client.
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    /// Base URL of the API gateway; every facade call goes here
    pub gateway_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Status poller cadence
    pub status_interval: Duration,

    /// Simulated notification cadence
    pub notification_interval: Duration,

    /// Chance that one notification tick produces an entry
    pub notification_probability: f64,

    /// Maximum feed length
    pub notification_capacity: usize,

    /// Directory holding the persisted session token
    pub session_dir: PathBuf,

    /// Services shown on the status board
    pub services: Vec<MonitoredService>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            status_interval: DEFAULT_STATUS_INTERVAL,
            notification_interval: DEFAULT_NOTIFICATION_INTERVAL,
            notification_probability: DEFAULT_NOTIFICATION_PROBABILITY,
            notification_capacity: NOTIFICATION_CAPACITY,
            session_dir: PathBuf::from("data"),
            services: default_services(DEFAULT_GATEWAY_URL),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let gateway_url = get_env_or("DASHBOARD_GATEWAY_URL", DEFAULT_GATEWAY_URL)
            .trim_end_matches('/')
            .to_string();

        let config = Self {
            request_timeout: Duration::from_secs(get_env_parse_or("DASHBOARD_REQUEST_TIMEOUT_SECS", 10)?),
            status_interval: Duration::from_secs(get_env_parse_or(
                "DASHBOARD_STATUS_INTERVAL_SECS",
                DEFAULT_STATUS_INTERVAL.as_secs(),
            )?),
            notification_interval: Duration::from_secs(get_env_parse_or(
                "DASHBOARD_NOTIFICATION_INTERVAL_SECS",
                DEFAULT_NOTIFICATION_INTERVAL.as_secs(),
            )?),
            notification_probability: get_env_parse_or(
                "DASHBOARD_NOTIFICATION_PROBABILITY",
                DEFAULT_NOTIFICATION_PROBABILITY,
            )?,
            notification_capacity: NOTIFICATION_CAPACITY,
            session_dir: PathBuf::from(get_env_or("DASHBOARD_SESSION_DIR", "data")),
            services: default_services(&gateway_url),
            gateway_url,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !self.gateway_url.starts_with("http://") && !self.gateway_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "DASHBOARD_GATEWAY_URL must be an http(s) URL, got '{}'",
                self.gateway_url
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(AppError::Config("DASHBOARD_REQUEST_TIMEOUT_SECS must be at least 1".to_string()));
        }

        if self.status_interval.is_zero() {
            return Err(AppError::Config("DASHBOARD_STATUS_INTERVAL_SECS must be at least 1".to_string()));
        }

        if self.notification_interval.is_zero() {
            return Err(AppError::Config(
                "DASHBOARD_NOTIFICATION_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.notification_probability) {
            return Err(AppError::Config(
                "DASHBOARD_NOTIFICATION_PROBABILITY must be between 0 and 1".to_string(),
            ));
        }

        if self.notification_capacity == 0 {
            return Err(AppError::Config("notification capacity must be at least 1".to_string()));
        }

        let gateways = self
            .services
            .iter()
            .filter(|s| s.strategy == CheckStrategy::Gateway)
            .count();
        if gateways != 1 {
            return Err(AppError::Config(format!(
                "exactly one monitored service must be the gateway, found {}",
                gateways
            )));
        }

        Ok(())
    }
}

/// The gateway plus the services reachable only through it.
///
/// The gateway's displayed port follows `gateway_url`.
pub fn default_services(gateway_url: &str) -> Vec<MonitoredService> {
    vec![
        MonitoredService::gateway("API Gateway", gateway_url, gateway_port(gateway_url)),
        MonitoredService::through_gateway("Book Service", "http://localhost:8000", 8000),
        MonitoredService::through_gateway("Order Service", "http://localhost:8001", 8001),
        MonitoredService::through_gateway("User Service", "http://localhost:8002", 8002),
    ]
}

fn gateway_port(gateway_url: &str) -> u16 {
    reqwest::Url::parse(gateway_url)
        .ok()
        .and_then(|url| url.port_or_known_default())
        .unwrap_or(8080)
}
