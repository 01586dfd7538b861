use std::time::Duration;

use chrono::{Local, Utc};
use clap::Subcommand;
use mellow_core::export::relative_time;
use mellow_core::timer::now_ms;
use mellow_core::{
    AutosaveController, Config, Database, DebounceTimer, Entry, EntryKind, JournalTag, SessionStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{print_json, CmdResult};

/// Typed alone on a line in `journal write`, saves immediately.
const SAVE_COMMAND: &str = ":save";

#[derive(Subcommand)]
pub enum JournalAction {
    /// Add an entry in one go
    Add {
        text: String,
        /// idea, memory, breakthrough or note
        #[arg(long, default_value = "note")]
        tag: JournalTag,
        /// Topic of a focus session this note belongs to
        #[arg(long)]
        link: Option<String>,
    },
    /// Write from stdin; pauses save automatically
    Write {
        #[arg(long, default_value = "note")]
        tag: JournalTag,
        #[arg(long)]
        link: Option<String>,
    },
    /// List entries, newest first
    List {
        #[arg(long)]
        kind: Option<EntryKind>,
        /// Case-insensitive text filter
        #[arg(long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Recent focus topics that notes can link to
    Links,
}

pub async fn run(action: JournalAction) -> CmdResult {
    match action {
        JournalAction::Add { text, tag, link } => add(text, tag, link),
        JournalAction::Write { tag, link } => write(tag, link).await,
        JournalAction::List { kind, search, json } => list(kind, search.as_deref(), json),
        JournalAction::Links => {
            let db = Database::open()?;
            let store = SessionStore::load(&db);
            for topic in store.recent_focus_topics(5) {
                println!("{topic}");
            }
            Ok(())
        }
    }
}

fn controller(config: &Config, tag: JournalTag, link: Option<String>) -> AutosaveController {
    let mut autosave = AutosaveController::new(config.debounce_ms())
        .with_commit_on_blur(config.autosave.commit_on_blur);
    autosave.set_tag(tag);
    if let Some(topic) = link {
        autosave.link_to(topic);
    }
    autosave
}

fn add(text: String, tag: JournalTag, link: Option<String>) -> CmdResult {
    let db = Database::open()?;
    let mut store = SessionStore::load(&db);
    let mut autosave = controller(&Config::load_or_default(), tag, link);

    let now = now_ms();
    autosave.input(text, now);
    match autosave.save_now(now, &mut store) {
        Some(entry) => {
            println!("saved {} entry ({} total)", entry.title(), store.len());
            Ok(())
        }
        None => Err("nothing to save: entry is empty".into()),
    }
}

async fn write(tag: JournalTag, link: Option<String>) -> CmdResult {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut store = SessionStore::load(&db);
    let mut autosave = controller(&config, tag, link);
    let mut debounce = DebounceTimer::new(Duration::from_millis(autosave.debounce_ms()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!(
        "writing a {tag} entry: pauses of {}s save automatically, `{SAVE_COMMAND}` saves now, Ctrl-D finishes",
        config.autosave.debounce_secs
    );

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim() == SAVE_COMMAND => {
                    debounce.cancel();
                    report(autosave.save_now(now_ms(), &mut store));
                }
                Some(line) => {
                    let chunk = if autosave.draft().is_empty() { line } else { format!("\n{line}") };
                    autosave.push_str(&chunk, now_ms());
                    if autosave.deadline_ms().is_some() {
                        debounce.schedule();
                    } else {
                        debounce.cancel();
                    }
                }
                None => {
                    debounce.cancel();
                    report(autosave.blur(now_ms(), &mut store));
                    autosave.close();
                    break;
                }
            },
            _ = debounce.fired() => {
                // The tokio clock and the wall clock can disagree by a millisecond.
                let now = autosave.deadline_ms().map_or_else(now_ms, |d| d.max(now_ms()));
                report(autosave.poll(now, &mut store));
            }
        }
    }

    if !autosave.draft().trim().is_empty() {
        eprintln!("unsaved draft discarded ({} words)", autosave.word_count());
    }
    Ok(())
}

fn report(saved: Option<Entry>) {
    if let Some(entry) = saved {
        let at = entry.created_at().with_timezone(&Local);
        eprintln!(
            "saved {} words at {}",
            entry.body().split_whitespace().count(),
            at.format("%H:%M:%S")
        );
    }
}

fn list(kind: Option<EntryKind>, search: Option<&str>, json: bool) -> CmdResult {
    let db = Database::open()?;
    let store = SessionStore::load(&db);

    let mut entries: Vec<&Entry> = match search {
        Some(query) => store.search(query),
        None => store.all().iter().collect(),
    };
    if let Some(kind) = kind {
        entries.retain(|e| e.kind() == kind);
    }
    entries.sort_by_key(|e| e.created_at());
    entries.reverse();

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("no entries");
        return Ok(());
    }
    let now = Utc::now();
    for entry in entries {
        println!(
            "[{}] {} · {}",
            entry.kind(),
            entry.title(),
            relative_time(entry.created_at(), now)
        );
        if let Some(topic) = entry.linked_topic() {
            match store.resolve_link(entry) {
                Some(_) => println!("  -> {topic}"),
                None => println!("  -> {topic} (unresolved)"),
            }
        }
        if let Some(first) = entry.body().lines().next() {
            println!("  {}", preview(first, 72));
        }
    }
    Ok(())
}

fn preview(line: &str, max: usize) -> String {
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max).collect();
        format!("{cut}...")
    }
}
