//! Break timer engine.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()`
//! periodically (about once a second) with the current epoch time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --(countdown hits 0)--> Notifying --(start)--> Fetching --> Active
//!   ^                             |  |                   |           |
//!   +------ snooze / dismiss -----+--+---- failure ------+-- finish--+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = BreakTimer::new(25 * 60, now_ms());
//! // In a loop:
//! engine.tick(now_ms()); // Returns Some(Event::BreakDue) once the countdown expires
//! ```

use serde::{Deserialize, Serialize};

use super::AppState;
use crate::events::{at, Event};

/// Read-only view of the countdown for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub seconds_until_next: f64,
    pub is_paused: bool,
    pub app_state: AppState,
}

/// Countdown toward the next break plus the application state it gates.
///
/// Operates on wall-clock deltas so a suspended process catches up on the
/// next tick instead of drifting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakTimer {
    state: AppState,
    /// Configured sedentary interval in milliseconds.
    interval_ms: u64,
    /// Remaining time in milliseconds until the next break.
    remaining_ms: u64,
    paused: bool,
    /// Timestamp (ms since epoch) of the last tick or re-anchor.
    last_tick_epoch_ms: u64,
    /// Countdown was pushed above the interval by focus mode.
    #[serde(default)]
    focus_extended: bool,
}

impl BreakTimer {
    /// Create an idle timer with a full countdown anchored at `now_ms`.
    pub fn new(interval_secs: u64, now_ms: u64) -> Self {
        let interval_ms = interval_secs.saturating_mul(1000);
        Self {
            state: AppState::Idle,
            interval_ms,
            remaining_ms: interval_ms,
            paused: false,
            last_tick_epoch_ms: now_ms,
            focus_extended: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn seconds_until_next(&self) -> f64 {
        self.remaining_ms as f64 / 1000.0
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_focus_extended(&self) -> bool {
        self.focus_extended
    }

    pub fn view(&self) -> TimerState {
        TimerState {
            seconds_until_next: self.seconds_until_next(),
            is_paused: self.paused,
            app_state: self.state,
        }
    }

    /// 0.0 .. 1.0 progress toward the next break. Focus extensions count
    /// against the larger of interval and remaining time.
    pub fn progress(&self) -> f64 {
        let total = self.interval_ms.max(self.remaining_ms);
        if total == 0 {
            return 1.0;
        }
        1.0 - (self.remaining_ms as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now_ms: u64) -> Event {
        Event::StateSnapshot {
            state: self.state,
            is_paused: self.paused,
            seconds_until_next: self.seconds_until_next(),
            focus_extended: self.focus_extended,
            at: at(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Call periodically. Returns `Some(Event::BreakDue)` exactly once, at the
    /// tick where the countdown crosses zero.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != AppState::Idle || self.paused {
            // Re-anchor so time spent elsewhere is not applied in one burst
            // when we return to counting.
            self.last_tick_epoch_ms = now_ms;
            return None;
        }

        let elapsed = now_ms.saturating_sub(self.last_tick_epoch_ms);
        self.last_tick_epoch_ms = now_ms;
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);

        if self.focus_extended && self.remaining_ms <= self.interval_ms {
            self.focus_extended = false;
        }

        if self.remaining_ms == 0 {
            self.state = AppState::Notifying;
            tracing::debug!("countdown expired, break due");
            return Some(Event::BreakDue { at: at(now_ms) });
        }
        None
    }

    /// Suspend or resume the countdown. Idle only.
    pub fn toggle_pause(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != AppState::Idle {
            return None;
        }
        self.paused = !self.paused;
        self.last_tick_epoch_ms = now_ms;
        if self.paused {
            Some(Event::TimerPaused {
                remaining_ms: self.remaining_ms,
                at: at(now_ms),
            })
        } else {
            Some(Event::TimerResumed {
                remaining_ms: self.remaining_ms,
                at: at(now_ms),
            })
        }
    }

    /// Push the countdown to `extension_secs`, which may exceed the interval.
    /// Idle only.
    pub fn activate_focus_mode(&mut self, extension_secs: u64, now_ms: u64) -> Option<Event> {
        if self.state != AppState::Idle {
            return None;
        }
        self.remaining_ms = extension_secs.saturating_mul(1000);
        self.focus_extended = self.remaining_ms > self.interval_ms;
        self.last_tick_epoch_ms = now_ms;
        Some(Event::FocusModeStarted {
            remaining_ms: self.remaining_ms,
            at: at(now_ms),
        })
    }

    /// Drop an active focus extension back to the interval.
    pub fn cancel_focus_mode(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != AppState::Idle || !self.focus_extended {
            return None;
        }
        self.focus_extended = false;
        self.remaining_ms = self.remaining_ms.min(self.interval_ms);
        self.last_tick_epoch_ms = now_ms;
        Some(Event::FocusModeCancelled {
            remaining_ms: self.remaining_ms,
            at: at(now_ms),
        })
    }

    /// Notifying -> Idle with a short countdown.
    pub fn snooze(&mut self, snooze_secs: u64, now_ms: u64) -> Option<Event> {
        if self.state != AppState::Notifying {
            return None;
        }
        self.return_to_idle(snooze_secs.saturating_mul(1000), now_ms);
        Some(Event::Snoozed {
            remaining_ms: self.remaining_ms,
            at: at(now_ms),
        })
    }

    /// Notifying -> Idle with a full countdown.
    pub fn dismiss(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != AppState::Notifying {
            return None;
        }
        self.return_to_idle(self.interval_ms, now_ms);
        Some(Event::Dismissed {
            remaining_ms: self.remaining_ms,
            at: at(now_ms),
        })
    }

    /// Notifying -> Fetching. The user accepted the due break.
    pub fn begin_break(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != AppState::Notifying {
            return None;
        }
        self.enter_fetching(now_ms)
    }

    /// Notifying or Idle -> Fetching, for sessions the user asks for
    /// without waiting for the countdown.
    pub fn begin_fetching(&mut self, now_ms: u64) -> Option<Event> {
        match self.state {
            AppState::Notifying | AppState::Idle => self.enter_fetching(now_ms),
            _ => None,
        }
    }

    fn enter_fetching(&mut self, now_ms: u64) -> Option<Event> {
        self.state = AppState::Fetching;
        self.last_tick_epoch_ms = now_ms;
        Some(Event::FetchStarted { at: at(now_ms) })
    }

    /// Fetching -> Active. Returns false if no fetch was in progress.
    pub fn activate(&mut self, now_ms: u64) -> bool {
        if self.state != AppState::Fetching {
            return false;
        }
        self.state = AppState::Active;
        self.last_tick_epoch_ms = now_ms;
        true
    }

    /// Fetching -> Idle with a full countdown after selection failed.
    pub fn abort_fetch(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != AppState::Fetching {
            return None;
        }
        self.return_to_idle(self.interval_ms, now_ms);
        Some(Event::SelectionFailed { at: at(now_ms) })
    }

    /// Active -> Idle with a full countdown.
    pub fn finish_session(&mut self, now_ms: u64) -> bool {
        if self.state != AppState::Active {
            return false;
        }
        self.return_to_idle(self.interval_ms, now_ms);
        true
    }

    /// Force the countdown back to the full interval, cancelling any focus
    /// extension. Idle only.
    pub fn reset_countdown(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != AppState::Idle {
            return None;
        }
        self.focus_extended = false;
        self.remaining_ms = self.interval_ms;
        self.last_tick_epoch_ms = now_ms;
        Some(Event::CountdownReset {
            remaining_ms: self.remaining_ms,
            at: at(now_ms),
        })
    }

    /// Apply a new interval.
    ///
    /// A focus extension is never shortened here. Otherwise an untouched
    /// countdown follows the new interval and a longer one is clamped to it.
    pub fn set_interval(&mut self, interval_secs: u64) {
        let old_interval = self.interval_ms;
        self.interval_ms = interval_secs.saturating_mul(1000);

        if self.state != AppState::Idle || self.focus_extended {
            return;
        }
        if self.remaining_ms == old_interval || self.remaining_ms > self.interval_ms {
            self.remaining_ms = self.interval_ms;
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn return_to_idle(&mut self, remaining_ms: u64, now_ms: u64) {
        self.state = AppState::Idle;
        self.remaining_ms = remaining_ms;
        self.focus_extended = false;
        self.last_tick_epoch_ms = now_ms;
    }
}
