use crate::workspace::{print_json, runtime, CliResult, Workspace};

pub fn run() -> CliResult {
    let ws = Workspace::open()?;
    let deck = runtime()?.block_on(ws.app.wisdom_tips());
    print_json(&deck)?;
    ws.save()
}
