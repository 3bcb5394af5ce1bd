//! Body-health model.
//!
//! Each canonical part decays from Healthy to Warning to Critical as time
//! passes since its last completed exercise. A part that was never exercised
//! is `NeedsFocus`, which ranks worst.

use serde::{Deserialize, Serialize};

use crate::body::Category;
use crate::ledger::BodyPartHistory;

const HOUR_MS: u64 = 60 * 60 * 1000;
pub const HEALTHY_WITHIN_MS: u64 = 2 * HOUR_MS;
pub const WARNING_WITHIN_MS: u64 = 4 * HOUR_MS;
/// Minimum gap between two celebrations.
pub const CELEBRATION_COOLDOWN_MS: u64 = 4 * HOUR_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
    NeedsFocus,
}

impl HealthStatus {
    pub fn label(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Warning => "Warning",
            HealthStatus::Critical => "Critical",
            HealthStatus::NeedsFocus => "Needs Focus",
        }
    }
}

/// Status of a part last exercised at `last_done` (epoch ms).
pub fn classify(last_done: Option<u64>, now_ms: u64) -> HealthStatus {
    let Some(ts) = last_done else {
        return HealthStatus::NeedsFocus;
    };
    let elapsed = now_ms.saturating_sub(ts);
    if elapsed < HEALTHY_WITHIN_MS {
        HealthStatus::Healthy
    } else if elapsed < WARNING_WITHIN_MS {
        HealthStatus::Warning
    } else {
        HealthStatus::Critical
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartHealth {
    pub part: Category,
    pub status: HealthStatus,
    pub last_done: Option<u64>,
    pub hours_since: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyReport {
    pub parts: Vec<PartHealth>,
    pub ergo_score: u8,
    pub most_neglected: Category,
}

pub fn part_health(history: &BodyPartHistory, now_ms: u64) -> Vec<PartHealth> {
    Category::CANONICAL
        .iter()
        .map(|&part| {
            let last_done = history.last_done(part);
            PartHealth {
                part,
                status: classify(last_done, now_ms),
                last_done,
                hours_since: last_done.map(|ts| now_ms.saturating_sub(ts) as f64 / HOUR_MS as f64),
            }
        })
        .collect()
}

/// Percentage of canonical parts that are Healthy, rounded.
pub fn ergo_score(history: &BodyPartHistory, now_ms: u64) -> u8 {
    let healthy = Category::CANONICAL
        .iter()
        .filter(|p| classify(history.last_done(**p), now_ms) == HealthStatus::Healthy)
        .count();
    let total = Category::CANONICAL.len();
    ((healthy * 100 + total / 2) / total) as u8
}

/// First never-exercised part, else the one with the oldest timestamp.
pub fn most_neglected(history: &BodyPartHistory) -> Category {
    if let Some(part) = Category::CANONICAL
        .iter()
        .find(|p| history.last_done(**p).is_none())
    {
        return *part;
    }
    Category::CANONICAL
        .iter()
        .min_by_key(|p| history.last_done(**p))
        .copied()
        .unwrap_or(Category::Eyes)
}

pub fn report(history: &BodyPartHistory, now_ms: u64) -> BodyReport {
    BodyReport {
        parts: part_health(history, now_ms),
        ergo_score: ergo_score(history, now_ms),
        most_neglected: most_neglected(history),
    }
}

fn all_healthy(history: &BodyPartHistory, now_ms: u64) -> bool {
    Category::CANONICAL
        .iter()
        .all(|p| classify(history.last_done(*p), now_ms) == HealthStatus::Healthy)
}

/// Tracks when the all-healthy celebration last fired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelebrationTracker {
    last_celebrated_ms: Option<u64>,
    showing: bool,
}

impl CelebrationTracker {
    pub fn is_showing(&self) -> bool {
        self.showing
    }

    pub fn last_celebrated(&self) -> Option<u64> {
        self.last_celebrated_ms
    }

    /// Re-evaluate after the history changed. Returns true when the
    /// celebration should start now.
    pub fn check(&mut self, history: &BodyPartHistory, now_ms: u64) -> bool {
        if self.showing || !all_healthy(history, now_ms) {
            return false;
        }
        let cooled_down = self
            .last_celebrated_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= CELEBRATION_COOLDOWN_MS);
        if !cooled_down {
            return false;
        }
        self.showing = true;
        self.last_celebrated_ms = Some(now_ms);
        tracing::debug!("all body parts healthy, celebrating");
        true
    }

    /// The overlay finished.
    pub fn dismiss(&mut self) {
        self.showing = false;
    }
}
