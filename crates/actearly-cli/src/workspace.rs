//! Loads the application from the local database and writes it back.

use std::error::Error;
use std::sync::Arc;

use actearly_core::{
    AppContext, BackendProvider, Database, Event, SessionSelector, SystemClock,
};
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn Error>>;

pub struct Workspace {
    pub db: Database,
    pub app: AppContext<BackendProvider>,
}

impl Workspace {
    /// Open the database, rebuild the app from it and catch the countdown
    /// up to the current time.
    pub fn open() -> CliResult<Self> {
        let db = Database::open()?;
        let settings = db.load_settings_or_default();
        let ledger = db.load_ledger()?;
        let provider = BackendProvider::new(settings.provider_endpoint.clone());
        let mut app = AppContext::new(
            settings,
            ledger,
            SessionSelector::new(provider),
            Arc::new(SystemClock),
        );
        // Each command is its own process, so a prefetched plan could never
        // reach the `session start` that needs it.
        app.set_prefetch_enabled(false);
        if let Some(snapshot) = db.load_snapshot() {
            app.restore(snapshot);
        }

        let mut ws = Workspace { db, app };
        let events = ws.app.tick();
        ws.emit(&events)?;
        Ok(ws)
    }

    /// Print events and persist what they imply.
    pub fn emit(&mut self, events: &[Event]) -> CliResult {
        for event in events {
            print_json(event)?;
            if let Event::SessionCompleted { completed, .. } = event {
                self.db
                    .record_completion(completed, self.app.ledger().history())?;
            }
        }
        Ok(())
    }

    /// Write the runtime snapshot. Call once the command is done.
    pub fn save(&self) -> CliResult {
        self.db.save_snapshot(&self.app.snapshot())?;
        Ok(())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn runtime() -> CliResult<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Runtime::new()?)
}
