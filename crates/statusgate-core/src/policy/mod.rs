//! Overlay policy engine.
//!
//! Given a normalized document and the current time, decide what the
//! consumer page shows and whether the dependent "place order" action is
//! enabled. The engine is pure; the only stateful piece is [`OverlayView`],
//! the per-page-view dismissal state machine.
//!
//! ## State transitions
//!
//! ```text
//! Hidden -> Shown(dismissible=false) -> Shown(dismissible=true) -> Hidden
//! ```
//!
//! `OverlayView` is wall-clock-based and has no internal thread -- the
//! caller invokes `tick()` periodically, exactly like a one-per-second
//! countdown in a UI loop.

mod schedule;

pub use schedule::BlockSchedule;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{InfoConfig, Mode, StatusDocument, WarningConfig, DEFAULT_IMAGE};

/// The effective mode config, the single gate everything else depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiveConfig<'a> {
    Info(&'a InfoConfig),
    Warning(&'a WarningConfig),
}

/// Display fields of the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OverlayContent {
    pub title: String,
    pub message: String,
    pub image: String,
}

/// What the consumer page should render and allow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDecision {
    pub show: bool,
    pub mode: Mode,
    pub content: OverlayContent,
    /// Whether the overlay is dismissible right now. For info mode this
    /// starts false and flips once the delay elapses (see [`OverlayView`]).
    pub dismissible: bool,
    /// Seconds until an info overlay becomes dismissible. `None` for
    /// warnings, which are never user-closeable.
    pub dismiss_after_seconds: Option<u32>,
    pub order_enabled: bool,
    pub secondary_message: Option<String>,
}

impl OverlayDecision {
    /// The decision when no restriction can confidently be determined:
    /// nothing shown, ordering enabled. Used for fetch failures and
    /// inactive documents alike -- never block commerce on an error.
    pub fn fail_open() -> Self {
        Self {
            show: false,
            mode: Mode::None,
            content: OverlayContent::default(),
            dismissible: false,
            dismiss_after_seconds: None,
            order_enabled: true,
            secondary_message: None,
        }
    }
}

/// Select the live mode config: `None` when the document is inactive or
/// its mode is `none`. When this returns `None`, no overlay is rendered
/// and the order action stays enabled.
pub fn live_config(doc: &StatusDocument) -> Option<LiveConfig<'_>> {
    if !doc.active {
        return None;
    }
    match doc.mode {
        Mode::None => None,
        Mode::Info => Some(LiveConfig::Info(&doc.modes.info)),
        Mode::Warning => Some(LiveConfig::Warning(&doc.modes.warning)),
    }
}

/// Compute the render/enable decision for `doc` at local wall-clock `now`.
pub fn decide(doc: &StatusDocument, now: NaiveDateTime) -> OverlayDecision {
    let Some(cfg) = live_config(doc) else {
        return OverlayDecision::fail_open();
    };

    match cfg {
        LiveConfig::Info(info) => OverlayDecision {
            show: true,
            mode: Mode::Info,
            content: content_of(&info.title, &info.message, &info.image),
            dismissible: false,
            dismiss_after_seconds: Some(info.ok_delay_seconds),
            order_enabled: true,
            secondary_message: None,
        },
        LiveConfig::Warning(warning) => {
            let blocked = warning.block_schedule.is_blocked_at(now);
            OverlayDecision {
                show: true,
                mode: Mode::Warning,
                content: content_of(&warning.title, &warning.message, &warning.image),
                dismissible: false,
                dismiss_after_seconds: None,
                order_enabled: !blocked,
                secondary_message: Some(warning.warning_click_message.clone()),
            }
        }
    }
}

fn content_of(title: &str, message: &str, image: &str) -> OverlayContent {
    OverlayContent {
        title: if title.is_empty() { "Information" } else { title }.to_string(),
        message: message.to_string(),
        image: if image.is_empty() { DEFAULT_IMAGE } else { image }.to_string(),
    }
}

/// Per-view overlay lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayViewState {
    Hidden,
    Shown { dismissible: bool },
}

/// The per-page-view dismissal state machine.
///
/// Once dismissible, a view stays dismissible -- `tick` is monotonic.
/// Closing or superseding the view cancels the countdown, so repeated
/// document refreshes never leak a running timer into the next view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayView {
    state: OverlayViewState,
    /// When the overlay was displayed; countdown origin for info mode.
    opened_at: Option<DateTime<Utc>>,
    /// Seconds after `opened_at` at which the view unlocks. `None` while
    /// shown means "never" (warning mode).
    unlock_after_secs: Option<u32>,
}

impl Default for OverlayView {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayView {
    pub fn new() -> Self {
        Self {
            state: OverlayViewState::Hidden,
            opened_at: None,
            unlock_after_secs: None,
        }
    }

    pub fn state(&self) -> OverlayViewState {
        self.state
    }

    /// Present a decision. A non-showing decision closes the view.
    pub fn open(&mut self, decision: &OverlayDecision, now: DateTime<Utc>) {
        if !decision.show {
            self.close();
            return;
        }
        match decision.dismiss_after_seconds {
            Some(0) => {
                self.state = OverlayViewState::Shown { dismissible: true };
                self.opened_at = Some(now);
                self.unlock_after_secs = None;
            }
            Some(delay) => {
                self.state = OverlayViewState::Shown { dismissible: false };
                self.opened_at = Some(now);
                self.unlock_after_secs = Some(delay);
            }
            None => {
                // Warning: locked for the entire view lifetime, only
                // superseded by the document going inactive/changing mode.
                self.state = OverlayViewState::Shown { dismissible: false };
                self.opened_at = Some(now);
                self.unlock_after_secs = None;
            }
        }
    }

    /// Advance the countdown. Unlocking is one-way within a view.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let OverlayViewState::Shown { dismissible: false } = self.state else {
            return;
        };
        let (Some(opened_at), Some(delay)) = (self.opened_at, self.unlock_after_secs) else {
            return;
        };
        let elapsed = (now - opened_at).num_seconds().max(0) as u64;
        if elapsed >= u64::from(delay) {
            self.state = OverlayViewState::Shown { dismissible: true };
            self.unlock_after_secs = None;
        }
    }

    /// Seconds left on the countdown, for a UI label. `None` when there
    /// is no running countdown.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<u64> {
        let OverlayViewState::Shown { dismissible: false } = self.state else {
            return None;
        };
        let (opened_at, delay) = (self.opened_at?, self.unlock_after_secs?);
        let elapsed = (now - opened_at).num_seconds().max(0) as u64;
        Some(u64::from(delay).saturating_sub(elapsed))
    }

    pub fn can_dismiss(&self) -> bool {
        matches!(self.state, OverlayViewState::Shown { dismissible: true })
    }

    /// Dismiss the overlay if permitted. Returns whether it closed.
    pub fn dismiss(&mut self) -> bool {
        if self.can_dismiss() {
            self.close();
            true
        } else {
            false
        }
    }

    /// Force-close the view (document superseded). Cancels the countdown.
    pub fn close(&mut self) {
        self.state = OverlayViewState::Hidden;
        self.opened_at = None;
        self.unlock_after_secs = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn noon() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn info_doc(delay: u32) -> StatusDocument {
        StatusDocument::normalize(&json!({
            "active": true,
            "mode": "info",
            "modes": { "info": { "title": "Heads up", "ok_delay_seconds": delay } }
        }))
    }

    fn warning_doc(schedule: serde_json::Value) -> StatusDocument {
        StatusDocument::normalize(&json!({
            "active": true,
            "mode": "warning",
            "modes": { "warning": { "title": "Blocked", "block_schedule": schedule } }
        }))
    }

    #[test]
    fn inactive_document_decides_fail_open() {
        let doc = StatusDocument::normalize(&json!({ "active": false, "mode": "info" }));
        let decision = decide(&doc, noon());
        assert!(!decision.show);
        assert!(decision.order_enabled);
    }

    #[test]
    fn mode_none_decides_fail_open() {
        let doc = StatusDocument::normalize(&json!({ "active": true, "mode": "none" }));
        assert_eq!(decide(&doc, noon()), OverlayDecision::fail_open());
    }

    #[test]
    fn info_shows_and_keeps_ordering_enabled() {
        let decision = decide(&info_doc(5), noon());
        assert!(decision.show);
        assert!(!decision.dismissible);
        assert_eq!(decision.dismiss_after_seconds, Some(5));
        assert!(decision.order_enabled);
        assert_eq!(decision.secondary_message, None);
    }

    #[test]
    fn warning_blocks_per_schedule_and_carries_click_message() {
        // Disabled schedule: permanently blocked.
        let decision = decide(&warning_doc(json!({ "enabled": false })), noon());
        assert!(decision.show);
        assert!(!decision.order_enabled);
        assert!(decision.secondary_message.is_some());

        // Enabled overnight window, evaluated at noon: not blocked.
        let decision = decide(
            &warning_doc(json!({ "enabled": true, "start": "19:00", "end": "06:00" })),
            noon(),
        );
        assert!(decision.show);
        assert!(decision.order_enabled);
    }

    #[test]
    fn warning_is_never_dismissible() {
        let decision = decide(&warning_doc(json!({ "enabled": false })), noon());
        assert!(!decision.dismissible);
        assert_eq!(decision.dismiss_after_seconds, None);

        let mut view = OverlayView::new();
        let t0 = Utc::now();
        view.open(&decision, t0);
        for hours in [0, 1, 24] {
            view.tick(t0 + Duration::hours(hours));
            assert!(!view.can_dismiss());
            assert!(!view.dismiss());
        }
    }

    #[test]
    fn empty_content_falls_back_to_defaults() {
        let doc = StatusDocument::normalize(&json!({ "active": true, "mode": "info" }));
        let decision = decide(&doc, noon());
        assert_eq!(decision.content.title, "Information");
        assert_eq!(decision.content.image, DEFAULT_IMAGE);
    }

    #[test]
    fn info_view_unlocks_after_delay_monotonically() {
        let decision = decide(&info_doc(5), noon());
        let mut view = OverlayView::new();
        let t0 = Utc::now();
        view.open(&decision, t0);
        assert!(!view.can_dismiss());
        assert_eq!(view.remaining_secs(t0), Some(5));

        view.tick(t0 + Duration::seconds(4));
        assert!(!view.can_dismiss());
        assert_eq!(view.remaining_secs(t0 + Duration::seconds(4)), Some(1));

        view.tick(t0 + Duration::seconds(5));
        assert!(view.can_dismiss());

        // Never reverts, even if ticked with an earlier timestamp.
        view.tick(t0);
        assert!(view.can_dismiss());

        assert!(view.dismiss());
        assert_eq!(view.state(), OverlayViewState::Hidden);
    }

    #[test]
    fn zero_delay_is_dismissible_immediately() {
        let decision = decide(&info_doc(0), noon());
        let mut view = OverlayView::new();
        view.open(&decision, Utc::now());
        assert!(view.can_dismiss());
    }

    #[test]
    fn superseding_view_cancels_countdown() {
        let mut view = OverlayView::new();
        let t0 = Utc::now();
        view.open(&decide(&info_doc(5), noon()), t0);
        assert!(view.remaining_secs(t0).is_some());

        // Document went inactive on refresh.
        view.open(&OverlayDecision::fail_open(), t0 + Duration::seconds(2));
        assert_eq!(view.state(), OverlayViewState::Hidden);
        assert_eq!(view.remaining_secs(t0 + Duration::seconds(3)), None);
    }
}
