pub mod config;
pub mod countdown;
pub mod play;
pub mod session;

use chrono::{DateTime, Utc};

/// Parse an optional RFC 3339 instant, defaulting to the current time.
pub fn instant_or_now(at: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    match at {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}
