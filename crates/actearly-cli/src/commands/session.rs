use actearly_core::Category;
use clap::Subcommand;

use crate::workspace::{print_json, runtime, CliResult, Workspace};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start the due break session
    Start,
    /// Start a session for a single body part
    Part {
        /// Body part, e.g. "Neck" or "Lower Back"
        part: Category,
    },
    /// Start a full-body session from the built-in library
    FullBody,
    /// Complete the current exercise
    Next,
    /// Skip the current exercise
    Skip,
    /// Print the active session as JSON
    Show,
    /// Hide the celebration banner
    DismissCelebration,
}

pub fn run(action: SessionAction) -> CliResult {
    let mut ws = Workspace::open()?;

    let events = match action {
        SessionAction::Start => runtime()?.block_on(ws.app.start_session())?,
        SessionAction::Part { part } => runtime()?.block_on(ws.app.quick_part_session(part))?,
        SessionAction::FullBody => ws.app.full_body_session()?,
        SessionAction::Next => ws.app.next_exercise(false)?,
        SessionAction::Skip => ws.app.next_exercise(true)?,
        SessionAction::Show => {
            match ws.app.session() {
                Some(session) => print_json(session)?,
                None => println!("no active session"),
            }
            return ws.save();
        }
        SessionAction::DismissCelebration => {
            ws.app.dismiss_celebration();
            Vec::new()
        }
    };

    ws.emit(&events)?;
    if let Some(current) = ws.app.session().and_then(|s| s.current()) {
        print_json(current)?;
    }
    ws.save()
}
