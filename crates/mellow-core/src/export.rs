//! Markdown export of journal entries.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::entry::Entry;
use crate::error::Result;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render entries in the order given, one section each.
///
/// Timestamps are shown in `tz`.
pub fn to_markdown<'a, Tz>(entries: impl IntoIterator<Item = &'a Entry>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let sections: Vec<String> = entries.into_iter().map(|e| section(e, tz)).collect();
    sections.join("\n")
}

fn section<Tz>(entry: &Entry, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let local = entry.created_at().with_timezone(tz);
    let mut out = format!(
        "## [{}] {} - {}\n\n",
        entry.kind(),
        entry.title(),
        local.format(TIMESTAMP_FORMAT)
    );

    let mut has_meta = false;
    if let Some(minutes) = entry.duration_minutes() {
        let _ = writeln!(out, "**Duration:** {minutes} min");
        has_meta = true;
    }
    if let Some(accuracy) = entry.accuracy() {
        let _ = writeln!(out, "**Accuracy:** {accuracy}%");
        has_meta = true;
    }
    if let Some(emotion) = entry.emotion() {
        let _ = writeln!(out, "**Felt:** {emotion}");
        has_meta = true;
    }
    if let Some(topic) = entry.linked_topic() {
        let _ = writeln!(out, "**Linked:** {topic}");
        has_meta = true;
    }
    if has_meta {
        out.push('\n');
    }

    if !entry.body().is_empty() {
        out.push_str(entry.body());
        out.push_str("\n\n");
    }
    out.push_str("---\n");
    out
}

/// `mellow-journal-<epoch millis>.md`
pub fn file_name(now: DateTime<Utc>) -> String {
    format!("mellow-journal-{}.md", now.timestamp_millis())
}

/// Write an export to `out`. A directory gets a timestamped file inside it.
/// Returns the path written.
pub fn write_file(out: &Path, markdown: &str, now: DateTime<Utc>) -> Result<PathBuf> {
    let path = if out.is_dir() { out.join(file_name(now)) } else { out.to_path_buf() };
    std::fs::write(&path, markdown)?;
    tracing::info!(path = %path.display(), bytes = markdown.len(), "journal exported");
    Ok(path)
}

/// Short human label for how long ago `then` was.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        then.format("%b %-d, %Y").to_string()
    }
}
