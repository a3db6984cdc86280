//! Building a publishable document from operator edits.
//!
//! `build_publishable` is a pure value-in/value-out merge: it can run on
//! every field change without side effects, and the caller decides what
//! to do with the result. There is no shared mutable "current document".

use chrono::{DateTime, FixedOffset, SecondsFormat};

use super::{Mode, StatusDocument, DEFAULT_OK_DELAY_SECONDS};
use crate::policy::BlockSchedule;

/// Operator-edited fields. `None` means "leave the baseline value alone".
#[derive(Debug, Clone, Default)]
pub struct DraftFields {
    pub active: Option<bool>,
    pub mode: Option<Mode>,
    /// Copy this preset's display fields into the live mode config before
    /// applying the individual field edits below.
    pub apply_preset: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub image: Option<String>,
    /// Raw numeric input; clamped to the default when non-finite or negative.
    pub ok_delay_seconds: Option<f64>,
    pub warning_click_message: Option<String>,
    pub block_schedule: Option<BlockSchedule>,
}

/// Merge `draft` into a copy of `baseline` and stamp `last_update`.
///
/// Guarantees:
/// - deactivating clears the display fields of the mode that was live in
///   the baseline, so stale content cannot be re-exposed by a later bug;
/// - presets contribute display fields only (title/message/image); the
///   schedule, OK delay, and click message are never touched by a preset;
/// - `active == false` implies `mode == None` in the result.
pub fn build_publishable(
    baseline: &StatusDocument,
    draft: &DraftFields,
    now: DateTime<FixedOffset>,
) -> StatusDocument {
    let mut doc = baseline.clone();

    let was_live = if baseline.active { baseline.mode } else { Mode::None };

    if let Some(active) = draft.active {
        doc.active = active;
    }
    if let Some(mode) = draft.mode {
        doc.mode = mode;
    }

    if doc.active {
        apply_edits(&mut doc, draft);
    } else {
        doc.mode = Mode::None;
        clear_display_fields(&mut doc, was_live);
    }

    doc.last_update = now.to_rfc3339_opts(SecondsFormat::Secs, false);
    doc
}

/// Clamp a raw delay input. Non-finite and negative values fall back to
/// the documented default instead of propagating.
pub fn clamp_ok_delay(raw: f64) -> u32 {
    if raw.is_finite() && raw >= 0.0 {
        raw as u32
    } else {
        DEFAULT_OK_DELAY_SECONDS
    }
}

fn apply_edits(doc: &mut StatusDocument, draft: &DraftFields) {
    if let Some(key) = &draft.apply_preset {
        if let Some(preset) = doc.presets.get(key).cloned() {
            match doc.mode {
                Mode::Info => {
                    doc.modes.info.title = preset.title;
                    doc.modes.info.message = preset.message;
                    doc.modes.info.image = preset.image;
                }
                Mode::Warning => {
                    doc.modes.warning.title = preset.title;
                    doc.modes.warning.message = preset.message;
                    doc.modes.warning.image = preset.image;
                }
                Mode::None => {}
            }
        }
    }

    match doc.mode {
        Mode::Info => {
            let cfg = &mut doc.modes.info;
            if let Some(title) = &draft.title {
                cfg.title = title.trim().to_string();
            }
            if let Some(message) = &draft.message {
                cfg.message = message.trim().to_string();
            }
            if let Some(image) = &draft.image {
                cfg.image = image.trim().to_string();
            }
            if let Some(delay) = draft.ok_delay_seconds {
                cfg.ok_delay_seconds = clamp_ok_delay(delay);
            }
        }
        Mode::Warning => {
            let cfg = &mut doc.modes.warning;
            if let Some(title) = &draft.title {
                cfg.title = title.trim().to_string();
            }
            if let Some(message) = &draft.message {
                cfg.message = message.trim().to_string();
            }
            if let Some(image) = &draft.image {
                cfg.image = image.trim().to_string();
            }
            if let Some(click) = &draft.warning_click_message {
                cfg.warning_click_message = click.trim().to_string();
            }
            if let Some(schedule) = &draft.block_schedule {
                cfg.block_schedule = schedule.clone();
            }
        }
        Mode::None => {}
    }
}

fn clear_display_fields(doc: &mut StatusDocument, mode: Mode) {
    match mode {
        Mode::Info => {
            doc.modes.info.title.clear();
            doc.modes.info.message.clear();
            doc.modes.info.image.clear();
        }
        Mode::Warning => {
            doc.modes.warning.title.clear();
            doc.modes.warning.message.clear();
            doc.modes.warning.image.clear();
        }
        Mode::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 19, 0, 0)
            .unwrap()
    }

    fn live_warning_baseline() -> StatusDocument {
        StatusDocument::normalize(&json!({
            "active": true,
            "mode": "warning",
            "modes": {
                "warning": {
                    "title": "Closed",
                    "message": "Service interrupted",
                    "image": "images/closed.png",
                    "warning_click_message": "Not now",
                    "block_schedule": { "enabled": true, "start": "19:00", "end": "06:00", "days": [0] }
                }
            }
        }))
    }

    #[test]
    fn stamps_last_update_with_local_offset() {
        let doc = build_publishable(&StatusDocument::default(), &DraftFields::default(), fixed_now());
        assert_eq!(doc.last_update, "2024-01-01T19:00:00+01:00");
    }

    #[test]
    fn deactivating_clears_live_display_fields() {
        let baseline = live_warning_baseline();
        let draft = DraftFields {
            active: Some(false),
            ..Default::default()
        };
        let doc = build_publishable(&baseline, &draft, fixed_now());
        assert!(!doc.active);
        assert_eq!(doc.mode, Mode::None);
        assert_eq!(doc.modes.warning.title, "");
        assert_eq!(doc.modes.warning.message, "");
        assert_eq!(doc.modes.warning.image, "");
        // Behavior fields survive deactivation; only content is cleared.
        assert!(doc.modes.warning.block_schedule.enabled);
    }

    #[test]
    fn preset_copies_display_fields_only() {
        let baseline = live_warning_baseline();
        let draft = DraftFields {
            apply_preset: Some("outage".to_string()),
            ..Default::default()
        };
        let doc = build_publishable(&baseline, &draft, fixed_now());
        assert_eq!(doc.modes.warning.title, "Service outage");
        // Operational fields untouched by the preset.
        assert_eq!(doc.modes.warning.warning_click_message, "Not now");
        assert!(doc.modes.warning.block_schedule.enabled);
        assert_eq!(doc.modes.warning.block_schedule.start, "19:00");
    }

    #[test]
    fn field_edits_win_over_applied_preset() {
        let baseline = live_warning_baseline();
        let draft = DraftFields {
            apply_preset: Some("outage".to_string()),
            title: Some("  Custom title  ".to_string()),
            ..Default::default()
        };
        let doc = build_publishable(&baseline, &draft, fixed_now());
        assert_eq!(doc.modes.warning.title, "Custom title");
    }

    #[test]
    fn delay_clamps_to_default() {
        assert_eq!(clamp_ok_delay(12.0), 12);
        assert_eq!(clamp_ok_delay(0.0), 0);
        assert_eq!(clamp_ok_delay(-3.0), 5);
        assert_eq!(clamp_ok_delay(f64::NAN), 5);
        assert_eq!(clamp_ok_delay(f64::INFINITY), 5);
    }

    #[test]
    fn info_edits_apply_to_info_config() {
        let baseline = StatusDocument::normalize(&json!({ "active": true, "mode": "info" }));
        let draft = DraftFields {
            title: Some("Heads up".to_string()),
            ok_delay_seconds: Some(8.0),
            ..Default::default()
        };
        let doc = build_publishable(&baseline, &draft, fixed_now());
        assert_eq!(doc.modes.info.title, "Heads up");
        assert_eq!(doc.modes.info.ok_delay_seconds, 8);
        assert_eq!(doc.modes.warning.title, "");
    }
}
