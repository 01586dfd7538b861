use clap::Subcommand;
use mellow_core::timer::now_ms;
use mellow_core::{Accuracy, Config, Database, Event, SessionPlan, SessionStore, SessionTimer};

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum RecallAction {
    /// Start a recall session
    Start {
        /// What you are trying to remember
        #[arg(long)]
        topic: String,
        /// 5 to 30 minutes; defaults to recall.default_minutes
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Print the current session state as JSON
    Status,
    /// Stop the countdown and move on to writing
    End,
    /// Save what you recalled
    Save {
        #[arg(long)]
        text: String,
        /// Self-check score, 0-100. Estimated from the text when omitted.
        #[arg(long, allow_negative_numbers = true)]
        accuracy: Option<i64>,
    },
    /// Abandon the session without saving
    Cancel,
}

pub fn run(action: RecallAction) -> CmdResult {
    let db = Database::open()?;
    let mut timer = SessionTimer::restore(&db);
    let now = now_ms();

    match action {
        RecallAction::Start { topic, minutes } => {
            let minutes = match minutes {
                Some(m) => m,
                None => Config::load_or_default().recall_default_minutes()?.get(),
            };
            let event = timer.start(SessionPlan::recall(topic, minutes)?, now)?;
            print_json(&event)?;
        }
        RecallAction::Status => {
            if let Some(event) = timer.tick(now) {
                print_json(&event)?;
            }
            print_json(&timer.snapshot(now))?;
        }
        RecallAction::End => {
            print_json(&timer.end_early(now)?)?;
        }
        RecallAction::Save { text, accuracy } => {
            timer.tick(now);
            let mut store = SessionStore::load(&db);
            let entry = timer.save_recall(&text, accuracy.map(Accuracy::clamped), now, &mut store)?;
            print_json(&Event::entry_saved(&entry))?;
        }
        RecallAction::Cancel => match timer.cancel(now) {
            Some(event) => print_json(&event)?,
            None => println!("no session running"),
        },
    }

    timer.persist(&db)?;
    Ok(())
}
