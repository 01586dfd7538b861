use clap::Subcommand;
use mellow_core::timer::now_ms;
use mellow_core::{
    Config, Database, DurationMinutes, EmotionTag, Event, FocusMode, SessionPlan, SessionStore, SessionTimer,
};

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Start a focus session
    Start {
        /// What this session is for
        #[arg(long)]
        goal: String,
        /// micro (5 min), deep (20 min) or flow (custom)
        #[arg(long, default_value = "deep")]
        mode: FocusMode,
        /// Length of a flow session; defaults to focus.custom_minutes
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Print the current session state as JSON
    Status,
    /// Stop the countdown and move on to reflection
    End,
    /// Save the finished session to the journal
    Save {
        /// What you remember from the session
        #[arg(long, default_value = "")]
        recall: String,
        /// How the session felt
        #[arg(long)]
        emotion: Option<EmotionTag>,
    },
    /// Abandon the session without saving
    Cancel,
}

pub fn run(action: FocusAction) -> CmdResult {
    let db = Database::open()?;
    let mut timer = SessionTimer::restore(&db);
    let now = now_ms();

    match action {
        FocusAction::Start { goal, mode, minutes } => {
            let custom = match minutes {
                Some(m) => DurationMinutes::new(m)?,
                None => Config::load_or_default().focus_custom_minutes()?,
            };
            let event = timer.start(SessionPlan::focus(goal, mode, custom)?, now)?;
            print_json(&event)?;
        }
        FocusAction::Status => {
            if let Some(event) = timer.tick(now) {
                print_json(&event)?;
            }
            print_json(&timer.snapshot(now))?;
        }
        FocusAction::End => {
            print_json(&timer.end_early(now)?)?;
        }
        FocusAction::Save { recall, emotion } => {
            timer.tick(now);
            let mut store = SessionStore::load(&db);
            let entry = timer.save_focus(&recall, emotion, now, &mut store)?;
            print_json(&Event::entry_saved(&entry))?;
        }
        FocusAction::Cancel => match timer.cancel(now) {
            Some(event) => print_json(&event)?,
            None => println!("no session running"),
        },
    }

    timer.persist(&db)?;
    Ok(())
}
