mod engine;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use engine::{BreakTimer, TimerState};

/// Where the break cycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppState {
    /// Counting down toward the next break.
    Idle,
    /// Countdown reached zero; waiting for the user.
    Notifying,
    /// Session content is being obtained.
    Fetching,
    /// A session is being played back.
    Active,
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppState::Idle => "idle",
            AppState::Notifying => "notifying",
            AppState::Fetching => "fetching",
            AppState::Active => "active",
        };
        f.write_str(s)
    }
}
