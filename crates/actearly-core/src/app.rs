//! Application context.
//!
//! `AppContext` owns every piece of mutable state: settings, the break
//! timer, the ledger, the celebration tracker, the active session and the
//! prefetch slot. It is driven by a single owner through `&mut self` and
//! reports side effects as [`Event`]s for the shell to carry out.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::body::Category;
use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::events::{at, Event};
use crate::health::{self, BodyReport, CelebrationTracker};
use crate::ledger::{HydrationSummary, Ledger};
use crate::prefetch::PrefetchCoordinator;
use crate::selector::{ContentProvider, SessionPlan, SessionRequest, SessionSelector, WisdomDeck};
use crate::session::{ActiveSession, Advance};
use crate::settings::Settings;
use crate::timer::{AppState, BreakTimer};

/// Exercises in an on-demand full-body session.
pub const FULL_BODY_COUNT: usize = 30;

/// Aggregates shown on the stats panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub streak_days: u32,
    pub daily_reps: usize,
    pub total_active_minutes: usize,
    pub ergo_score: u8,
    pub most_neglected: Category,
    pub hydration: HydrationSummary,
}

/// Serializable runtime state carried between process runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSnapshot {
    pub timer: BreakTimer,
    #[serde(default)]
    pub celebration: CelebrationTracker,
    #[serde(default)]
    pub session: Option<ActiveSession>,
}

pub struct AppContext<P> {
    settings: Settings,
    timer: BreakTimer,
    ledger: Ledger,
    celebration: CelebrationTracker,
    session: Option<ActiveSession>,
    prefetch: PrefetchCoordinator,
    prefetch_enabled: bool,
    selector: Arc<SessionSelector<P>>,
    clock: Arc<dyn Clock>,
}

impl<P: ContentProvider + 'static> AppContext<P> {
    pub fn new(
        settings: Settings,
        ledger: Ledger,
        selector: SessionSelector<P>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let timer = BreakTimer::new(settings.interval_seconds, clock.now_ms());
        Self {
            settings,
            timer,
            ledger,
            celebration: CelebrationTracker::default(),
            session: None,
            prefetch: PrefetchCoordinator::new(),
            prefetch_enabled: true,
            selector: Arc::new(selector),
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timer(&self) -> &BreakTimer {
        &self.timer
    }

    pub fn state(&self) -> AppState {
        self.timer.state()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    pub fn celebration(&self) -> &CelebrationTracker {
        &self.celebration
    }

    pub fn selector(&self) -> &SessionSelector<P> {
        &self.selector
    }

    /// Turn background prefetch on or off. Drivers that cannot keep the
    /// app alive until the break is started should turn it off.
    pub fn set_prefetch_enabled(&mut self, enabled: bool) {
        self.prefetch_enabled = enabled;
        if !enabled {
            self.prefetch.invalidate();
        }
    }

    pub fn is_prefetch_in_flight(&self) -> bool {
        self.prefetch.is_in_flight()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn snapshot_event(&self) -> Event {
        self.timer.snapshot(self.now_ms())
    }

    pub fn body_report(&self) -> BodyReport {
        health::report(self.ledger.history(), self.now_ms())
    }

    pub fn stats(&self) -> Stats {
        self.stats_in(&Local)
    }

    /// Stats with day boundaries taken in `tz`.
    pub fn stats_in<Tz: TimeZone>(&self, tz: &Tz) -> Stats {
        let now_ms = self.now_ms();
        let now = at(now_ms).with_timezone(tz);
        self.stats_at(&now, now_ms)
    }

    fn stats_at<Tz: TimeZone>(&self, now: &DateTime<Tz>, now_ms: u64) -> Stats {
        let history = self.ledger.history();
        Stats {
            streak_days: self.ledger.streak_days(now),
            daily_reps: self.ledger.daily_reps(now),
            total_active_minutes: self.ledger.total_active_minutes(),
            ergo_score: health::ergo_score(history, now_ms),
            most_neglected: health::most_neglected(history),
            hydration: self.ledger.daily_hydration(now),
        }
    }

    /// Priorities for a regular break: configured parts, else the most
    /// neglected parts first.
    pub fn smart_priorities(&self) -> Vec<Category> {
        if self.settings.prioritized_body_parts.is_empty() {
            self.ledger.neglect_order()
        } else {
            self.settings.prioritized_body_parts.clone()
        }
    }

    /// Request used for regular breaks and their prefetch.
    pub fn break_request(&self) -> SessionRequest {
        SessionRequest {
            count: self.settings.session_exercise_count(),
            priorities: self.smart_priorities(),
            environment: self.settings.work_environment,
            exclude_names: self.ledger.excluded_names(self.now_ms()),
            custom_instructions: self.settings.custom_instructions().map(str::to_string),
        }
    }

    // ── Timer commands ───────────────────────────────────────────────

    /// Advance the countdown. Call about once a second.
    pub fn tick(&mut self) -> Vec<Event> {
        let now = self.now_ms();
        let mut events = Vec::new();

        if let Some(due) = self.timer.tick(now) {
            events.push(due);
            if self.settings.sound_enabled {
                events.push(Event::PlayNotification { at: at(now) });
            }
        }

        if self.prefetch_enabled && self.prefetch.should_start(&self.timer) {
            let request = self.break_request();
            if self.prefetch.spawn(Arc::clone(&self.selector), request) {
                tracing::debug!("prefetching next session");
                events.push(Event::PrefetchStarted { at: at(now) });
            }
        }
        events
    }

    pub fn toggle_pause(&mut self) -> Result<Event> {
        let now = self.now_ms();
        self.timer
            .toggle_pause(now)
            .ok_or_else(|| self.invalid("pause"))
    }

    pub fn activate_focus_mode(&mut self) -> Result<Vec<Event>> {
        let now = self.now_ms();
        let extension = self.settings.focus_mode_minutes.saturating_mul(60);
        let started = self
            .timer
            .activate_focus_mode(extension, now)
            .ok_or_else(|| self.invalid("start focus mode"))?;
        let mut events = vec![started];
        self.discard_prefetch("focus mode", now, &mut events);
        Ok(events)
    }

    pub fn cancel_focus_mode(&mut self) -> Result<Event> {
        let now = self.now_ms();
        self.timer
            .cancel_focus_mode(now)
            .ok_or_else(|| self.invalid("cancel focus mode"))
    }

    pub fn snooze(&mut self) -> Result<Vec<Event>> {
        let now = self.now_ms();
        let secs = self.settings.snooze_minutes.saturating_mul(60);
        let snoozed = self
            .timer
            .snooze(secs, now)
            .ok_or_else(|| self.invalid("snooze"))?;
        let mut events = vec![snoozed];
        self.discard_prefetch("snoozed", now, &mut events);
        Ok(events)
    }

    pub fn dismiss(&mut self) -> Result<Vec<Event>> {
        let now = self.now_ms();
        let dismissed = self
            .timer
            .dismiss(now)
            .ok_or_else(|| self.invalid("dismiss"))?;
        let mut events = vec![dismissed];
        self.discard_prefetch("dismissed", now, &mut events);
        Ok(events)
    }

    pub fn reset_countdown(&mut self) -> Result<Event> {
        let now = self.now_ms();
        self.timer
            .reset_countdown(now)
            .ok_or_else(|| self.invalid("reset the countdown"))
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Start the regular break session, using the prefetched plan when one
    /// is outstanding.
    pub async fn start_session(&mut self) -> Result<Vec<Event>> {
        let now = self.now_ms();
        let fetch = self
            .timer
            .begin_break(now)
            .ok_or_else(|| self.invalid("start a session"))?;
        let mut events = vec![fetch];

        let plan = match self.prefetch.resolve().await {
            Some(plan) => {
                tracing::debug!("using prefetched session");
                plan
            }
            None => {
                let request = self.break_request();
                self.selector.select(&request).await
            }
        };
        self.enter_session(plan, &mut events);
        Ok(events)
    }

    /// On-demand session focused on one body part.
    pub async fn quick_part_session(&mut self, part: Category) -> Result<Vec<Event>> {
        let fetch = self.begin_fetching("start a quick session")?;
        let mut events = vec![fetch];

        let mut request = self.break_request();
        request.priorities = vec![part];
        let plan = self.selector.select(&request).await;
        self.enter_session(plan, &mut events);
        Ok(events)
    }

    /// On-demand session over every canonical part from the local library.
    pub fn full_body_session(&mut self) -> Result<Vec<Event>> {
        let fetch = self.begin_fetching("start a full-body session")?;
        let mut events = vec![fetch];

        let request = SessionRequest {
            count: FULL_BODY_COUNT,
            priorities: Category::CANONICAL.to_vec(),
            environment: self.settings.work_environment,
            exclude_names: self.ledger.excluded_names(self.now_ms()),
            custom_instructions: None,
        };
        let plan = self.selector.select_from_library(&request, true);
        self.enter_session(plan, &mut events);
        Ok(events)
    }

    /// Complete (or skip) the current exercise. Finishing the last one
    /// writes the ledger and returns to a full countdown.
    pub fn next_exercise(&mut self, skipped: bool) -> Result<Vec<Event>> {
        let now = self.now_ms();
        let invalid = self.invalid("advance the session");
        let session = self.session.as_mut().ok_or(invalid)?;

        let name = session
            .current()
            .map(|ex| ex.name.clone())
            .unwrap_or_default();
        let index = session.index();
        let mut events = vec![Event::ExerciseAdvanced {
            index,
            name,
            skipped,
            at: at(now),
        }];

        if let Advance::Finished { completed, skipped } = session.advance(skipped) {
            self.session = None;
            let entries = self.ledger.record_session(&completed, now);
            self.timer.finish_session(now);
            tracing::debug!(completed = entries.len(), skipped, "session finished");
            events.push(Event::SessionCompleted {
                completed: entries,
                skipped,
                at: at(now),
            });
            self.discard_prefetch("session completed", now, &mut events);

            if self.celebration.check(self.ledger.history(), now) {
                events.push(Event::CelebrationTriggered { at: at(now) });
            }
        }
        Ok(events)
    }

    pub fn dismiss_celebration(&mut self) {
        self.celebration.dismiss();
    }

    pub async fn wisdom_tips(&self) -> WisdomDeck {
        self.selector
            .wisdom_tips(self.settings.custom_instructions())
            .await
    }

    // ── Settings and hydration ───────────────────────────────────────

    /// Replace the settings and recompute what depends on them.
    pub fn update_settings(&mut self, settings: Settings) -> Result<Vec<Event>> {
        settings.validate()?;
        let now = self.now_ms();
        let mut events = Vec::new();

        if settings.theme != self.settings.theme {
            events.push(Event::ThemeChanged {
                theme: settings.theme,
                at: at(now),
            });
        }
        if settings.interval_seconds != self.settings.interval_seconds {
            self.timer.set_interval(settings.interval_seconds);
        }

        self.settings = settings;
        self.discard_prefetch("settings changed", now, &mut events);
        Ok(events)
    }

    /// Set one dotted key, as the `config set` command does.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<Vec<Event>> {
        let updated = self.settings.with_value(key, value)?;
        self.update_settings(updated)
    }

    pub fn log_hydration(&mut self) -> Event {
        let now = self.now_ms();
        self.ledger.log_hydration(now);
        let today = at(now).with_timezone(&Local);
        Event::HydrationLogged {
            count_today: self.ledger.daily_hydration(&today).count,
            at: at(now),
        }
    }

    // ── Persistence ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            timer: self.timer.clone(),
            celebration: self.celebration.clone(),
            session: self.session.clone(),
        }
    }

    /// Resume from a saved snapshot.
    ///
    /// A fetch cannot survive a restart, so a saved FETCHING state returns
    /// to a full countdown. The snapshot's interval is replaced by the
    /// current settings.
    pub fn restore(&mut self, snapshot: AppSnapshot) {
        let now = self.now_ms();
        self.timer = snapshot.timer;
        self.timer.set_interval(self.settings.interval_seconds);
        self.celebration = snapshot.celebration;
        self.session = snapshot.session;
        self.prefetch.invalidate();

        match self.timer.state() {
            AppState::Fetching => {
                self.timer.abort_fetch(now);
                self.session = None;
            }
            AppState::Active if self.session.is_none() => {
                self.timer.finish_session(now);
            }
            AppState::Active => {}
            AppState::Idle | AppState::Notifying => self.session = None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn invalid(&self, action: &'static str) -> CoreError {
        CoreError::InvalidState {
            action,
            state: self.timer.state(),
        }
    }

    fn begin_fetching(&mut self, action: &'static str) -> Result<Event> {
        let now = self.now_ms();
        self.timer
            .begin_fetching(now)
            .ok_or_else(|| self.invalid(action))
    }

    fn enter_session(&mut self, plan: SessionPlan, events: &mut Vec<Event>) {
        let now = self.now_ms();
        let source = plan.source;
        let ai_available = plan.ai_available;

        match ActiveSession::start(plan) {
            Some(session) => {
                self.timer.activate(now);
                events.push(Event::SessionStarted {
                    exercise_count: session.len(),
                    source,
                    ai_available,
                    at: at(now),
                });
                self.session = Some(session);
            }
            None => {
                tracing::warn!("no exercises available, returning to idle");
                events.extend(self.timer.abort_fetch(now));
            }
        }
    }

    fn discard_prefetch(&mut self, reason: &str, now: u64, events: &mut Vec<Event>) {
        if self.prefetch.invalidate() {
            events.push(Event::PrefetchDiscarded {
                reason: reason.to_string(),
                at: at(now),
            });
        }
    }
}
