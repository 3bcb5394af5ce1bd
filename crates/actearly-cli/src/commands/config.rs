use actearly_core::Settings;
use clap::Subcommand;

use crate::workspace::{print_json, CliResult, Workspace};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "interval_seconds", "work_environment")
        key: String,
    },
    /// Set a config value ("null" clears optional values)
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    let mut ws = Workspace::open()?;

    match action {
        ConfigAction::Get { key } => match ws.app.settings().get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            let events = ws.app.set_setting(&key, &value)?;
            ws.db.save_settings(ws.app.settings())?;
            ws.emit(&events)?;
            println!("ok");
        }
        ConfigAction::List => print_json(ws.app.settings())?,
        ConfigAction::Reset => {
            let events = ws.app.update_settings(Settings::default())?;
            ws.db.save_settings(ws.app.settings())?;
            ws.emit(&events)?;
            println!("config reset to defaults");
        }
    }
    ws.save()
}
