use clap::Subcommand;

use crate::workspace::{print_json, CliResult, Workspace};

#[derive(Subcommand)]
pub enum HydrationAction {
    /// Record one glass of water
    Log,
    /// Today's count and the time of the last glass
    Today,
}

pub fn run(action: HydrationAction) -> CliResult {
    let mut ws = Workspace::open()?;

    match action {
        HydrationAction::Log => {
            let now = ws.app.now_ms();
            let event = ws.app.log_hydration();
            ws.db.log_hydration(now)?;
            print_json(&event)?;
        }
        HydrationAction::Today => print_json(&ws.app.stats().hydration)?,
    }
    ws.save()
}
