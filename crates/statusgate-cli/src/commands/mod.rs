pub mod config;
pub mod publish;
pub mod schedule;
pub mod status;

use chrono::{Local, NaiveDateTime};

/// Parse a `--at` timestamp: RFC 3339 or plain `YYYY-MM-DDTHH:MM[:SS]`,
/// interpreted as local wall-clock time. Defaults to now.
pub fn parse_at(at: Option<&str>) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    let Some(s) = at else {
        return Ok(Local::now().naive_local());
    };
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    Err(format!("unrecognized timestamp: {s}").into())
}
