//! Status document schema and normalization.
//!
//! The status document is the single artifact shared between the operator
//! tooling and the consumer-facing viewer. This module defines its typed
//! shape and the pure transformation from "whatever is stored" to a
//! normalized document.
//!
//! ## Normalization contract
//!
//! `StatusDocument::normalize` is total and idempotent. It never fails:
//! a malformed field falls back to its default independently of the rest
//! of the document (soft-fail is the policy, not an accident). Legacy
//! documents that used free-form mode keys are migrated through
//! [`migrate_legacy_mode`], never by field-sniffing at call sites.

mod draft;

pub use draft::{build_publishable, DraftFields};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::policy::BlockSchedule;

/// Image shown when a mode config carries none.
pub const DEFAULT_IMAGE: &str = "images/outage.png";

/// Seconds the info overlay stays locked before it can be dismissed.
pub const DEFAULT_OK_DELAY_SECONDS: u32 = 5;

/// Message shown when the affirmative action is pressed during a warning.
pub const DEFAULT_WARNING_CLICK_MESSAGE: &str = "Ordering is currently unavailable.";

/// Which per-mode configuration is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    None,
    Info,
    Warning,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::None => "none",
            Mode::Info => "info",
            Mode::Warning => "warning",
        }
    }

    /// Parse a stored mode value. Returns `None` for free-form legacy keys.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Mode::None),
            "info" => Some(Mode::Info),
            "warning" => Some(Mode::Warning),
            _ => None,
        }
    }
}

/// Configuration for the dismissible informational overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "severity_info")]
    pub severity: String,
    #[serde(default = "default_ok_delay")]
    pub ok_delay_seconds: u32,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            image: String::new(),
            severity: severity_info(),
            ok_delay_seconds: DEFAULT_OK_DELAY_SECONDS,
        }
    }
}

impl InfoConfig {
    /// Best-effort extraction from raw JSON. Every field degrades
    /// independently to its default.
    fn from_value(v: &Value) -> Self {
        Self {
            title: str_field(v, "title"),
            message: str_field(v, "message"),
            image: str_field(v, "image"),
            severity: severity_info(),
            ok_delay_seconds: v
                .get("ok_delay_seconds")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(DEFAULT_OK_DELAY_SECONDS),
        }
    }
}

/// Configuration for the blocking warning overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "severity_warning")]
    pub severity: String,
    #[serde(default = "default_true")]
    pub block_order: bool,
    #[serde(default = "default_click_message")]
    pub warning_click_message: String,
    #[serde(default)]
    pub block_schedule: BlockSchedule,
}

impl Default for WarningConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            image: String::new(),
            severity: severity_warning(),
            block_order: true,
            warning_click_message: default_click_message(),
            block_schedule: BlockSchedule::default(),
        }
    }
}

impl WarningConfig {
    fn from_value(v: &Value) -> Self {
        Self {
            title: str_field(v, "title"),
            message: str_field(v, "message"),
            image: str_field(v, "image"),
            severity: severity_warning(),
            // Invariant: a warning always blocks ordering (subject to its
            // schedule). Stored falsy values are not honored.
            block_order: true,
            warning_click_message: v
                .get("warning_click_message")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_WARNING_CLICK_MESSAGE)
                .to_string(),
            block_schedule: v
                .get("block_schedule")
                .map(BlockSchedule::from_value)
                .unwrap_or_default(),
        }
    }
}

/// A named reusable content block. Authoring convenience only; presets
/// never carry behavior fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Preset {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "severity_info")]
    pub severity: String,
}

impl Preset {
    fn from_value(v: &Value) -> Self {
        Self {
            title: str_field(v, "title"),
            message: str_field(v, "message"),
            image: str_field(v, "image"),
            severity: v
                .get("severity")
                .and_then(Value::as_str)
                .filter(|s| matches!(*s, "info" | "warning"))
                .unwrap_or("info")
                .to_string(),
        }
    }
}

/// Per-mode configurations. Both fixed keys are always present after
/// normalization; `extra` preserves legacy free-form keys verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModeConfigs {
    #[serde(default)]
    pub info: InfoConfig,
    #[serde(default)]
    pub warning: WarningConfig,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Preset>,
}

/// The published status document.
///
/// The `*_at` fields are provenance metadata only -- the policy engine
/// never consults them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StatusDocument {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub last_update: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub starts_at: String,
    #[serde(default)]
    pub ends_at: String,
    #[serde(default)]
    pub modes: ModeConfigs,
    #[serde(default)]
    pub presets: BTreeMap<String, Preset>,
}

impl StatusDocument {
    /// Normalize an arbitrary stored value into a well-formed document.
    ///
    /// Total, pure, and idempotent: `normalize(&to_value(normalize(x)))`
    /// equals `normalize(x)` for any input, including `null` and `{}`.
    pub fn normalize(raw: &Value) -> StatusDocument {
        let modes_obj = raw.get("modes").and_then(Value::as_object);

        let mut modes = ModeConfigs {
            info: modes_obj
                .and_then(|m| m.get("info"))
                .map(InfoConfig::from_value)
                .unwrap_or_default(),
            warning: modes_obj
                .and_then(|m| m.get("warning"))
                .map(WarningConfig::from_value)
                .unwrap_or_default(),
            extra: BTreeMap::new(),
        };

        let mut presets: BTreeMap<String, Preset> = raw
            .get("presets")
            .and_then(Value::as_object)
            .map(|m| {
                m.iter()
                    .map(|(k, v)| (k.clone(), Preset::from_value(v)))
                    .collect()
            })
            .unwrap_or_default();

        // Legacy free-form mode keys are preserved in place and mirrored
        // into presets. Never overwrite operator content.
        if let Some(m) = modes_obj {
            for (key, value) in m {
                if key == "info" || key == "warning" {
                    continue;
                }
                let preset = Preset::from_value(value);
                presets.entry(key.clone()).or_insert_with(|| preset.clone());
                modes.extra.insert(key.clone(), preset);
            }
        }

        insert_builtin_presets(&mut presets);

        let active = raw.get("active").and_then(Value::as_bool).unwrap_or(false);

        let mode_raw = raw.get("mode").and_then(Value::as_str).unwrap_or("none");
        let mut mode = match Mode::parse(mode_raw) {
            Some(mode) => mode,
            None => migrate_legacy_mode(mode_raw, &mut modes),
        };

        if !active {
            mode = Mode::None;
        }

        StatusDocument {
            active,
            mode,
            last_update: str_field(raw, "last_update"),
            created_at: str_field(raw, "created_at"),
            published_at: str_field(raw, "published_at"),
            starts_at: str_field(raw, "starts_at"),
            ends_at: str_field(raw, "ends_at"),
            modes,
            presets,
        }
    }

    /// Canonical serialized form (pretty JSON, stable key order).
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Resolve a legacy free-form `mode` value against its `modes` entry.
///
/// Legacy documents predate the info/warning split: the entry's severity
/// decides which fixed mode inherits it. Display fields seed the target
/// config only where it has none, so current content wins over migrated
/// content. Returns `Mode::None` when the key has no entry.
fn migrate_legacy_mode(key: &str, modes: &mut ModeConfigs) -> Mode {
    let Some(entry) = modes.extra.get(key).cloned() else {
        return Mode::None;
    };
    if entry.severity == "warning" {
        let cfg = &mut modes.warning;
        if cfg.title.is_empty() && cfg.message.is_empty() {
            cfg.title = entry.title;
            cfg.message = entry.message;
            cfg.image = entry.image;
        }
        Mode::Warning
    } else {
        let cfg = &mut modes.info;
        if cfg.title.is_empty() && cfg.message.is_empty() {
            cfg.title = entry.title;
            cfg.message = entry.message;
            cfg.image = entry.image;
        }
        Mode::Info
    }
}

/// Built-in presets every normalized document carries. Inserted only when
/// absent -- operator edits under the same key are never clobbered.
fn insert_builtin_presets(presets: &mut BTreeMap<String, Preset>) {
    let builtins: [(&str, &str, &str, &str); 5] = [
        (
            "weather",
            "Weather alert",
            "Service may be disrupted due to severe weather.",
            "info",
        ),
        (
            "incident",
            "Ongoing incident",
            "We are handling an incident. Ordering is temporarily unavailable.",
            "warning",
        ),
        (
            "outage",
            "Service outage",
            "The service is currently down. Our team is working on it.",
            "warning",
        ),
        (
            "security",
            "Security notice",
            "Ordering is suspended for security reasons.",
            "warning",
        ),
        (
            "free_text",
            "",
            "",
            "info",
        ),
    ];

    for (key, title, message, severity) in builtins {
        presets.entry(key.to_string()).or_insert_with(|| Preset {
            title: title.to_string(),
            message: message.to_string(),
            image: DEFAULT_IMAGE.to_string(),
            severity: severity.to_string(),
        });
    }
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn severity_info() -> String {
    "info".to_string()
}

fn severity_warning() -> String {
    "warning".to_string()
}

fn default_true() -> bool {
    true
}

fn default_click_message() -> String {
    DEFAULT_WARNING_CLICK_MESSAGE.to_string()
}

fn default_ok_delay() -> u32 {
    DEFAULT_OK_DELAY_SECONDS
}
