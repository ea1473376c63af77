//! # Common Error Types
//!
//! Consolidated error handling for the dashboard client.
//!
//! Two layers:
//!
//! - [`ApiError`]: everything that can go wrong on one round trip to the
//!   gateway, tagged by failure class so callers can branch on it.
//! - [`AppError`]: application-wide errors (API, configuration, session
//!   storage) used by the runtime and the binary.
//!
//! ## Error Classes
//!
//! | Class | Variant | Handling |
//! |---|---|---|
//! | 401 | [`ApiError::Unauthorized`] | session cleared by the unauthorized policy, then returned |
//! | 403 | [`ApiError::Forbidden`] | returned, session untouched |
//! | 404 | [`ApiError::NotFound`] | returned verbatim |
//! | other non-2xx | [`ApiError::Rejected`] | returned with status and server message |
//! | no response | [`ApiError::Network`] | returned as a connectivity error |
//! | bad 2xx body | [`ApiError::Decode`] | returned |
//!
//! Nothing here retries.
//!
//! ## Usage Pattern
//!
//! ```rust,no_run
//! use dashboard::core::error::ApiError;
//!
//! fn describe(err: &ApiError) -> &'static str {
//!     match err {
//!         ApiError::Forbidden { .. } => "insufficient privilege",
//!         ApiError::NotFound { .. } => "not found",
//!         ApiError::Network(_) => "gateway unreachable",
//!         _ => "request failed",
//!     }
//! }
//! ```

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single gateway round trip.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// 401: the session is no longer valid.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// 403: the session is valid but lacks the required role.
    #[error("Insufficient privilege: {message}")]
    Forbidden { message: String },

    /// 404: the addressed resource does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other non-success status, including validation failures (422)
    /// and server errors.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// No response was received (connection refused, timeout, DNS).
    #[error("Network error: {0}")]
    Network(String),

    /// A success response whose body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success status and its server message.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized { message },
            StatusCode::FORBIDDEN => ApiError::Forbidden { message },
            StatusCode::NOT_FOUND => ApiError::NotFound { message },
            other => ApiError::Rejected {
                status: other.as_u16(),
                message,
            },
        }
    }

    /// HTTP status carried by the error, `None` for transport and decode failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, ApiError::Forbidden { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Gateway communication error.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session token storage failure.
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<lib_utils::envs::Error> for AppError {
    fn from(err: lib_utils::envs::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
