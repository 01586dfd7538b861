//! # Mellow Core Library
//!
//! Core logic for the Mellow focus journal. The `mellow` CLI is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Session Store**: an append-only journal of entries, persisted as one
//!   JSON array in a SQLite-backed key/value slot
//! - **Autosave**: a debounce state machine that turns draft text into
//!   journal entries after a quiet period
//! - **Timers**: wall-clock focus/recall session timers driven by `tick()`,
//!   and guided breathing patterns
//! - **Stats**: counts, streaks, dominant emotion, and insight sentences
//!   computed on demand
//!
//! ## Key Components
//!
//! - [`SessionStore`]: the journal
//! - [`AutosaveController`]: draft to entry commits
//! - [`SessionTimer`]: focus and recall session state machine
//! - [`JournalStats`]: derived statistics
//! - [`Config`]: application configuration management

pub mod autosave;
pub mod entry;
pub mod error;
pub mod events;
pub mod export;
pub mod stats;
pub mod storage;
pub mod timer;

pub use autosave::{AutosaveController, AutosaveState, CommitTrigger, DebounceTimer};
pub use entry::{
    Accuracy, DurationMinutes, EmotionTag, Entry, EntryDraft, EntryKind, EntryMeta, FocusMode, JournalTag,
};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use stats::{estimate_accuracy, Insight, InsightKind, JournalStats, StreakAnchor};
pub use storage::{Config, Database, KvStore, MemoryKv, Preferences, SessionFlags, SessionStore, VisualMode};
pub use timer::{BreathingPattern, BreathingPreset, SessionPhase, SessionPlan, SessionTimer};
