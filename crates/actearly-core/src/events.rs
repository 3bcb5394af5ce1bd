use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::ExerciseLogEntry;
use crate::selector::PlanSource;
use crate::settings::Theme;
use crate::timer::AppState;

/// Epoch milliseconds to a UTC timestamp for event payloads.
pub fn at(epoch_ms: u64) -> DateTime<Utc> {
    i64::try_from(epoch_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}

/// Every state change in the core produces an Event.
/// Shells render them; the core itself never touches audio or the screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Countdown reached zero; the reminder should be shown.
    BreakDue {
        at: DateTime<Utc>,
    },
    /// Play the reminder chime. Only emitted when sound is enabled.
    PlayNotification {
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    FocusModeStarted {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    FocusModeCancelled {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    Snoozed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    Dismissed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownReset {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    FetchStarted {
        at: DateTime<Utc>,
    },
    /// No exercises could be produced; back to a full countdown.
    SelectionFailed {
        at: DateTime<Utc>,
    },
    /// A background selection was issued ahead of the break.
    PrefetchStarted {
        at: DateTime<Utc>,
    },
    /// An outstanding background selection was invalidated.
    PrefetchDiscarded {
        reason: String,
        at: DateTime<Utc>,
    },
    SessionStarted {
        exercise_count: usize,
        source: PlanSource,
        ai_available: bool,
        at: DateTime<Utc>,
    },
    ExerciseAdvanced {
        index: usize,
        name: String,
        skipped: bool,
        at: DateTime<Utc>,
    },
    /// Session ended. `completed` holds the log entries written for it.
    SessionCompleted {
        completed: Vec<ExerciseLogEntry>,
        skipped: usize,
        at: DateTime<Utc>,
    },
    /// All nine parts healthy; show the celebration overlay.
    CelebrationTriggered {
        at: DateTime<Utc>,
    },
    ThemeChanged {
        theme: Theme,
        at: DateTime<Utc>,
    },
    HydrationLogged {
        count_today: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: AppState,
        is_paused: bool,
        seconds_until_next: f64,
        focus_extended: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Event::BreakDue { at }
            | Event::PlayNotification { at }
            | Event::TimerPaused { at, .. }
            | Event::TimerResumed { at, .. }
            | Event::FocusModeStarted { at, .. }
            | Event::FocusModeCancelled { at, .. }
            | Event::Snoozed { at, .. }
            | Event::Dismissed { at, .. }
            | Event::CountdownReset { at, .. }
            | Event::FetchStarted { at }
            | Event::SelectionFailed { at }
            | Event::PrefetchStarted { at }
            | Event::PrefetchDiscarded { at, .. }
            | Event::SessionStarted { at, .. }
            | Event::ExerciseAdvanced { at, .. }
            | Event::SessionCompleted { at, .. }
            | Event::CelebrationTriggered { at }
            | Event::ThemeChanged { at, .. }
            | Event::HydrationLogged { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}
