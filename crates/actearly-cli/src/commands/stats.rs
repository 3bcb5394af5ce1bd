use crate::workspace::{print_json, CliResult, Workspace};

pub fn run_stats() -> CliResult {
    let ws = Workspace::open()?;
    print_json(&ws.app.stats())?;
    ws.save()
}

pub fn run_body() -> CliResult {
    let ws = Workspace::open()?;
    print_json(&ws.app.body_report())?;
    ws.save()
}
