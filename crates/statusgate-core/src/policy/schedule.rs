//! Weekly block window evaluation.
//!
//! A `BlockSchedule` is a recurring weekly time-of-day interval, possibly
//! crossing midnight, restricted to a subset of weekdays. Comparisons are
//! minute-resolution local wall-clock time; seconds are ignored.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A recurring weekly block window.
///
/// Day numbering is 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSchedule {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "midnight")]
    pub start: String,
    #[serde(default = "midnight")]
    pub end: String,
    #[serde(default)]
    pub days: Vec<u8>,
}

impl Default for BlockSchedule {
    fn default() -> Self {
        Self {
            enabled: false,
            start: midnight(),
            end: midnight(),
            days: Vec::new(),
        }
    }
}

impl BlockSchedule {
    /// Best-effort extraction from raw JSON; malformed fields default.
    pub(crate) fn from_value(v: &Value) -> Self {
        Self {
            enabled: v.get("enabled").and_then(Value::as_bool).unwrap_or(false),
            start: time_field(v, "start"),
            end: time_field(v, "end"),
            days: v
                .get("days")
                .and_then(Value::as_array)
                .map(|a| {
                    a.iter()
                        .filter_map(Value::as_u64)
                        .filter(|&d| d <= 6)
                        .map(|d| d as u8)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Whether ordering is blocked at `now`.
    ///
    /// Semantics, preserved from the reference behavior:
    /// - `enabled == false` means **always blocked**, not never. A disabled
    ///   schedule represents a permanent, non-time-boxed block.
    /// - A non-empty `days` set excludes other weekdays entirely.
    /// - `start == end` is the degenerate "24/24" window: always blocked.
    /// - `start > end` crosses midnight (e.g. 19:00 -> 06:00).
    /// - Unparsable times never block: a broken document must not gate
    ///   customers indefinitely.
    pub fn is_blocked_at(&self, now: NaiveDateTime) -> bool {
        if !self.enabled {
            return true;
        }

        let day = now.weekday().num_days_from_sunday() as u8;
        if !self.days.is_empty() && !self.days.contains(&day) {
            return false;
        }

        let (Some(start_min), Some(end_min)) = (parse_hhmm(&self.start), parse_hhmm(&self.end))
        else {
            return false;
        };

        let now_min = now.hour() * 60 + now.minute();

        if start_min == end_min {
            true
        } else if start_min < end_min {
            now_min >= start_min && now_min < end_min
        } else {
            now_min >= start_min || now_min < end_min
        }
    }
}

/// Parse `"HH:MM"` into minutes since midnight. Lenient about digit
/// count, strict about structure.
fn parse_hhmm(s: &str) -> Option<u32> {
    let (h, m) = s.split_once(':')?;
    let h: u32 = h.trim().parse().ok()?;
    let m: u32 = m.trim().parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

fn time_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("00:00")
        .to_string()
}

fn midnight() -> String {
    "00:00".to_string()
}
