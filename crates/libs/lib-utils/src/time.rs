//! # Time Utilities
//!
//! Clock helpers shared by the dashboard's timers and aggregates.

use chrono::{DateTime, Duration, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Whether `moment` falls inside the trailing `window` ending at `now`.
///
/// Moments in the future relative to `now` count as inside the window.
pub fn is_within(moment: DateTime<Utc>, window: Duration, now: DateTime<Utc>) -> bool {
    moment >= now - window
}

/// Wall-clock label (`HH:MM:SS`) for feed entries.
pub fn format_clock(time: DateTime<Utc>) -> String {
    time.format("%H:%M:%S").to_string()
}
