//! Draft autosave.
//!
//! [`AutosaveController`] is the deterministic state machine: callers pass
//! the current time in and it decides when a draft becomes an entry.
//! [`DebounceTimer`] is the runtime side, a cancellable tokio task that tells
//! an interactive loop when the quiet period has elapsed.

mod controller;
mod debounce;

pub use controller::{AutosaveController, AutosaveState, CommitTrigger};
pub use debounce::DebounceTimer;
