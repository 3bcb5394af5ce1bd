//! Prefetch coordinator.
//!
//! Selection is started in the background shortly before a break is due so
//! the session is ready when the user starts it. The outstanding task lives
//! in an explicit slot; results are only ever read back through that slot,
//! so a task dropped by [`PrefetchCoordinator::invalidate`] cannot feed a
//! later cycle.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::selector::{ContentProvider, SessionPlan, SessionRequest, SessionSelector};
use crate::timer::{AppState, BreakTimer};

/// Start prefetching once the countdown is at or below this.
pub const PREFETCH_LEAD_MS: u64 = 30_000;

#[derive(Debug, Default)]
pub enum PrefetchSlot {
    #[default]
    Empty,
    InFlight(JoinHandle<SessionPlan>),
}

#[derive(Debug, Default)]
pub struct PrefetchCoordinator {
    slot: PrefetchSlot,
}

impl PrefetchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.slot, PrefetchSlot::InFlight(_))
    }

    /// Idle, counting, close to zero and nothing outstanding.
    pub fn should_start(&self, timer: &BreakTimer) -> bool {
        timer.state() == AppState::Idle
            && !timer.is_paused()
            && timer.remaining_ms() <= PREFETCH_LEAD_MS
            && !self.is_in_flight()
    }

    /// Spawn selection on the current tokio runtime. Returns false when
    /// called outside a runtime; the break then selects on demand.
    pub fn spawn<P>(&mut self, selector: Arc<SessionSelector<P>>, request: SessionRequest) -> bool
    where
        P: ContentProvider + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!("no async runtime, skipping prefetch");
            return false;
        };
        let handle = runtime.spawn(async move { selector.select(&request).await });
        self.slot = PrefetchSlot::InFlight(handle);
        true
    }

    /// Forget the outstanding task. It keeps running detached and its
    /// result is dropped. Returns true if something was discarded.
    pub fn invalidate(&mut self) -> bool {
        match std::mem::take(&mut self.slot) {
            PrefetchSlot::Empty => false,
            PrefetchSlot::InFlight(_) => {
                tracing::debug!("prefetch invalidated");
                true
            }
        }
    }

    /// Wait for the outstanding task and empty the slot. `None` when nothing
    /// was in flight, the task failed, or it produced no exercises.
    pub async fn resolve(&mut self) -> Option<SessionPlan> {
        let PrefetchSlot::InFlight(handle) = std::mem::take(&mut self.slot) else {
            return None;
        };
        match handle.await {
            Ok(plan) if !plan.is_empty() => Some(plan),
            Ok(_) => {
                tracing::warn!("prefetched session was empty, selecting again");
                None
            }
            Err(e) => {
                tracing::warn!("prefetch task failed, selecting again: {e}");
                None
            }
        }
    }
}
