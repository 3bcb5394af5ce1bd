use clap::Subcommand;

use crate::workspace::{CliResult, Workspace};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Extend the current countdown by the focus-mode length
    Focus,
    /// Drop a focus extension back to the regular interval
    CancelFocus,
    /// Postpone a due break
    Snooze,
    /// Skip a due break and start a new countdown
    Dismiss,
    /// Restart the countdown from the full interval
    Reset,
}

pub fn run(action: TimerAction) -> CliResult {
    let mut ws = Workspace::open()?;
    let app = &mut ws.app;

    let events = match action {
        TimerAction::Status => vec![app.snapshot_event()],
        TimerAction::Pause if app.timer().is_paused() => {
            return Err("timer is already paused".into());
        }
        TimerAction::Resume if !app.timer().is_paused() => {
            return Err("timer is not paused".into());
        }
        TimerAction::Pause | TimerAction::Resume => vec![app.toggle_pause()?],
        TimerAction::Focus => app.activate_focus_mode()?,
        TimerAction::CancelFocus => vec![app.cancel_focus_mode()?],
        TimerAction::Snooze => app.snooze()?,
        TimerAction::Dismiss => app.dismiss()?,
        TimerAction::Reset => vec![app.reset_countdown()?],
    };

    ws.emit(&events)?;
    ws.save()
}
