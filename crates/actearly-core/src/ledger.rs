//! Session / history ledger.
//!
//! The log is append-only and is the source of every derived aggregate:
//! streaks, daily reps, total active minutes and the 48-hour exclusion list.
//! `BodyPartHistory` is written alongside it at session completion.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::body::Category;
use crate::exercise::Exercise;

/// Recently done exercises are kept out of new sessions for this long.
pub const EXCLUSION_WINDOW_MS: u64 = 48 * 60 * 60 * 1000;

/// Last completion time (epoch ms) per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyPartHistory(BTreeMap<Category, u64>);

impl BodyPartHistory {
    /// `None` when the part has never been exercised.
    pub fn last_done(&self, part: Category) -> Option<u64> {
        self.0.get(&part).copied().filter(|ts| *ts > 0)
    }

    /// Record a completion. Timestamps never move backwards.
    pub fn mark(&mut self, part: Category, now_ms: u64) {
        let slot = self.0.entry(part).or_insert(0);
        *slot = (*slot).max(now_ms);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        self.0.iter().map(|(c, ts)| (*c, *ts))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseLogEntry {
    pub name: String,
    pub category: Category,
    /// Epoch milliseconds.
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationSummary {
    pub count: usize,
    pub last: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    history: BodyPartHistory,
    log: Vec<ExerciseLogEntry>,
    #[serde(default)]
    hydration: Vec<u64>,
}

impl Ledger {
    pub fn new(history: BodyPartHistory, log: Vec<ExerciseLogEntry>, hydration: Vec<u64>) -> Self {
        Self {
            history,
            log,
            hydration,
        }
    }

    pub fn history(&self) -> &BodyPartHistory {
        &self.history
    }

    pub fn log(&self) -> &[ExerciseLogEntry] {
        &self.log
    }

    pub fn hydration(&self) -> &[u64] {
        &self.hydration
    }

    /// Write history and log for the exercises completed in one session.
    ///
    /// All entries share `now_ms`; when two completed exercises share a
    /// category the history simply ends up at `now_ms` once.
    pub fn record_session(&mut self, completed: &[Exercise], now_ms: u64) -> Vec<ExerciseLogEntry> {
        let entries: Vec<ExerciseLogEntry> = completed
            .iter()
            .map(|ex| ExerciseLogEntry {
                name: ex.name.clone(),
                category: ex.category,
                timestamp: now_ms,
            })
            .collect();

        for entry in &entries {
            self.history.mark(entry.category, now_ms);
        }
        self.log.extend(entries.iter().cloned());
        entries
    }

    pub fn log_hydration(&mut self, now_ms: u64) {
        self.hydration.push(now_ms);
    }

    /// Unique names done within the exclusion window before `now_ms`.
    pub fn excluded_names(&self, now_ms: u64) -> Vec<String> {
        let cutoff = now_ms.saturating_sub(EXCLUSION_WINDOW_MS);
        let mut seen = BTreeSet::new();
        self.log
            .iter()
            .filter(|e| e.timestamp > cutoff)
            .filter(|e| seen.insert(e.name.as_str()))
            .map(|e| e.name.clone())
            .collect()
    }

    /// Canonical parts ordered from most to least neglected; never-done
    /// parts first, in canonical order.
    pub fn neglect_order(&self) -> Vec<Category> {
        let mut parts = Category::CANONICAL.to_vec();
        parts.sort_by_key(|p| self.history.last_done(*p).unwrap_or(0));
        parts
    }

    /// Entries logged since the start of `now`'s local day.
    pub fn daily_reps<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> usize {
        let today = now.date_naive();
        self.log
            .iter()
            .filter_map(|e| local_date(e.timestamp, &now.timezone()))
            .filter(|d| *d >= today)
            .count()
    }

    pub fn daily_hydration<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> HydrationSummary {
        let today = now.date_naive();
        let tz = now.timezone();
        let todays: Vec<u64> = self
            .hydration
            .iter()
            .copied()
            .filter(|ts| local_date(*ts, &tz).is_some_and(|d| d >= today))
            .collect();
        HydrationSummary {
            count: todays.len(),
            last: todays.iter().copied().max(),
        }
    }

    /// Consecutive local days with at least one completed exercise, ending
    /// today or yesterday.
    pub fn streak_days<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> u32 {
        let tz = now.timezone();
        let days: BTreeSet<NaiveDate> = self
            .log
            .iter()
            .filter_map(|e| local_date(e.timestamp, &tz))
            .collect();

        let mut descending = days.into_iter().rev();
        let Some(latest) = descending.next() else {
            return 0;
        };

        let today = now.date_naive();
        let yesterday = today.pred_opt();
        if latest != today && Some(latest) != yesterday {
            return 0;
        }

        let mut streak = 1;
        let mut current = latest;
        for day in descending {
            if current.signed_duration_since(day).num_days() != 1 {
                break;
            }
            streak += 1;
            current = day;
        }
        streak
    }

    /// One log entry per fixed one-minute exercise.
    pub fn total_active_minutes(&self) -> usize {
        self.log.len()
    }
}

fn local_date<Tz: TimeZone>(epoch_ms: u64, tz: &Tz) -> Option<NaiveDate> {
    let utc = DateTime::from_timestamp_millis(i64::try_from(epoch_ms).ok()?)?;
    Some(utc.with_timezone(tz).date_naive())
}
