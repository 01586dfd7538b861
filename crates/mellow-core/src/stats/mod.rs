//! Statistics module for Mellow
//!
//! Read-only metrics derived from the journal on demand: counts, focus
//! streaks, dominant emotion, focused time, recall accuracy, and the insight
//! sentences built from them. Nothing here is persisted.

mod accuracy;
mod insights;
mod streak;
mod summary;

pub use accuracy::{average_accuracy, estimate_accuracy};
pub use insights::{insights, Insight, InsightKind};
pub use streak::{focus_streak, StreakAnchor};
pub use summary::{dominant_emotion, format_minutes, JournalStats};
