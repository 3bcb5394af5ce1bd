use std::time::Duration;

use actearly_core::Event;

use crate::workspace::{runtime, CliResult, Workspace};

/// Tick once a second until the limit, printing every event. The
/// snapshot is written whenever something happened.
pub fn run(limit: Option<u64>) -> CliResult {
    let mut ws = Workspace::open()?;
    let status = ws.app.snapshot_event();
    ws.emit(&[status])?;
    ws.save()?;

    let result: CliResult = runtime()?.block_on(async {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        let mut ticks = 0u64;
        loop {
            interval.tick().await;
            if limit.is_some_and(|max| ticks >= max) {
                break;
            }
            ticks += 1;

            let events = ws.app.tick();
            if events.is_empty() {
                continue;
            }
            let due = events.iter().any(|e| matches!(e, Event::BreakDue { .. }));
            ws.emit(&events)?;
            if due {
                tracing::info!("break due; run `actearly session start` or `actearly timer snooze`");
            }
            ws.save()?;
        }
        ws.save()
    });
    result
}
