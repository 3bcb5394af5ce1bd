//! Property tests for the break countdown.

use actearly_core::events::Event;
use actearly_core::{AppState, BreakTimer};
use proptest::prelude::*;

const T0: u64 = 1_700_000_000_000;

proptest! {
    /// While idle the countdown never increases and never underflows,
    /// whatever the tick spacing.
    #[test]
    fn countdown_is_monotonic(
        interval in 1u64..3_600,
        deltas in prop::collection::vec(0u64..5_000, 1..400),
    ) {
        let mut timer = BreakTimer::new(interval, T0);
        let mut now = T0;
        let mut previous = timer.remaining_ms();
        for delta in deltas {
            now += delta;
            timer.tick(now);
            let remaining = timer.remaining_ms();
            prop_assert!(remaining <= previous);
            prop_assert!(remaining <= interval * 1000);
            previous = remaining;
        }
    }

    /// The break is announced exactly once per expiry.
    #[test]
    fn break_due_fires_at_most_once(
        interval in 1u64..120,
        deltas in prop::collection::vec(1u64..10_000, 1..300),
    ) {
        let mut timer = BreakTimer::new(interval, T0);
        let mut now = T0;
        let mut fired = 0;
        for delta in deltas {
            now += delta;
            if let Some(Event::BreakDue { .. }) = timer.tick(now) {
                fired += 1;
            }
        }
        prop_assert!(fired <= 1);
        let expired = now - T0 >= interval * 1000;
        prop_assert_eq!(fired == 1, expired);
        prop_assert_eq!(timer.state() == AppState::Notifying, expired);
    }

    /// Paused time never counts.
    #[test]
    fn paused_time_is_ignored(
        pause_at in 0u64..30_000,
        paused_for in 0u64..10_000_000,
    ) {
        let mut timer = BreakTimer::new(60, T0);
        timer.tick(T0 + pause_at);
        let before = timer.remaining_ms();
        timer.toggle_pause(T0 + pause_at);
        timer.tick(T0 + pause_at + paused_for);
        timer.toggle_pause(T0 + pause_at + paused_for);
        timer.tick(T0 + pause_at + paused_for);
        prop_assert_eq!(timer.remaining_ms(), before);
    }
}
