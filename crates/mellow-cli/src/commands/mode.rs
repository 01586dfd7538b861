use clap::Subcommand;
use mellow_core::{Database, Preferences, VisualMode};

use super::CmdResult;

#[derive(Subcommand)]
pub enum ModeAction {
    /// Print the active visual mode
    Get,
    /// Switch visual mode: flow, focus, freeze or float
    Set { mode: VisualMode },
}

pub fn run(action: ModeAction) -> CmdResult {
    let db = Database::open()?;
    let prefs = Preferences::new(&db);
    match action {
        ModeAction::Get => println!("{}", prefs.mode()),
        ModeAction::Set { mode } => {
            prefs.set_mode(mode)?;
            println!("mode set to {mode}");
        }
    }
    Ok(())
}
