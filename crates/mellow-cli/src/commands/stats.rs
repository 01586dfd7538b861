use chrono::Local;
use clap::Args;
use mellow_core::{Config, Database, JournalStats, SessionStore};

use super::{print_json, CmdResult};

#[derive(Args)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: StatsArgs) -> CmdResult {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let store = SessionStore::load(&db);
    let stats = JournalStats::compute(store.all(), &Local::now(), config.stats.streak_anchor);

    if args.json {
        return print_json(&stats);
    }

    println!("Sessions:     {} ({} focus, {} recall, {} journal)", stats.total, stats.focus, stats.recall, stats.journal);
    println!("Today:        {} focus", stats.today_focus);
    println!("Streak:       {} days", stats.streak);
    println!("Focus time:   {}", stats.focus_time());
    println!("Accuracy:     {}%", stats.rounded_accuracy());
    if let Some(emotion) = stats.dominant_emotion {
        println!("Dominant:     {emotion}");
    }
    println!();
    for insight in &stats.insights {
        println!("{insight}");
    }
    Ok(())
}
