//! Autosave state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Idle ----- non-blank -----> PendingCommit --- deadline or save ---> Committed
//!  |                           ^    |    ^                               |
//!  | whitespace only           |    |    +- keystroke moves deadline     | poll
//!  v                           |    | close()                            v
//! Drafting --- non-blank ------+    +----------> Drafting               Idle
//! ```
//!
//! Non-blank input schedules a deadline in the same call, so it passes
//! through `Drafting` without stopping there. `Drafting` is only observed
//! when the draft has text but nothing is scheduled: whitespace-only input,
//! or a draft left behind by `close()`. Clearing the draft returns to `Idle`.
//!
//! Time is passed in as epoch milliseconds, mirroring how the session timer
//! works, so the controller never reads the clock itself.
//!
//! ## Usage
//!
//! ```ignore
//! let mut autosave = AutosaveController::new(3000);
//! autosave.input("first thought", now_ms);
//! // later, from a timer or tick loop:
//! if let Some(entry) = autosave.poll(now_ms, &mut store) { /* saved */ }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{Entry, EntryDraft, JournalTag};
use crate::events::at_ms;
use crate::storage::{KvStore, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutosaveState {
    Idle,
    /// Draft has text but no commit is scheduled (whitespace only, or
    /// after `close()`).
    Drafting,
    /// A commit deadline is pending.
    PendingCommit,
    /// The last trigger produced an entry. Accepts input like `Idle`.
    Committed,
}

/// What caused a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitTrigger {
    Debounce,
    Manual,
    Blur,
}

/// Turns draft text into journal entries after a quiet period.
#[derive(Debug, Clone)]
pub struct AutosaveController {
    state: AutosaveState,
    draft: String,
    tag: JournalTag,
    link: Option<String>,
    debounce_ms: u64,
    commit_on_blur: bool,
    /// Epoch millis at which the pending commit fires.
    deadline_ms: Option<u64>,
    last_saved_at: Option<DateTime<Utc>>,
}

impl AutosaveController {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            state: AutosaveState::Idle,
            draft: String::new(),
            tag: JournalTag::default(),
            link: None,
            debounce_ms,
            commit_on_blur: true,
            deadline_ms: None,
            last_saved_at: None,
        }
    }

    pub fn with_commit_on_blur(mut self, enabled: bool) -> Self {
        self.commit_on_blur = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> AutosaveState {
        self.state
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn tag(&self) -> JournalTag {
        self.tag
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    pub fn word_count(&self) -> usize {
        self.draft.split_whitespace().count()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_tag(&mut self, tag: JournalTag) {
        self.tag = tag;
    }

    pub fn link_to(&mut self, topic: impl Into<String>) {
        self.link = Some(topic.into());
    }

    pub fn unlink(&mut self) {
        self.link = None;
    }

    /// Replace the draft buffer, as a text field does on every keystroke.
    ///
    /// Non-blank content cancels any pending deadline and schedules a new
    /// one `debounce_ms` after `now_ms`. Blank content only cancels.
    pub fn input(&mut self, text: impl Into<String>, now_ms: u64) {
        self.draft = text.into();
        self.reschedule(now_ms);
    }

    /// Append to the draft buffer. Same timing rules as [`input`](Self::input).
    pub fn push_str(&mut self, chunk: &str, now_ms: u64) {
        self.draft.push_str(chunk);
        self.reschedule(now_ms);
    }

    fn reschedule(&mut self, now_ms: u64) {
        self.deadline_ms = None;
        if self.draft.is_empty() {
            self.state = AutosaveState::Idle;
            return;
        }
        if self.draft.trim().is_empty() {
            self.state = AutosaveState::Drafting;
            return;
        }
        self.deadline_ms = Some(now_ms.saturating_add(self.debounce_ms));
        self.state = AutosaveState::PendingCommit;
    }

    /// Commit if the pending deadline has passed. A poll after a commit
    /// settles `Committed` back to `Idle`.
    pub fn poll<K: KvStore>(&mut self, now_ms: u64, store: &mut SessionStore<K>) -> Option<Entry> {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.commit(CommitTrigger::Debounce, now_ms, store)
            }
            _ => {
                if self.state == AutosaveState::Committed {
                    self.state = AutosaveState::Idle;
                }
                None
            }
        }
    }

    /// Manual save. Cancels the pending deadline first.
    pub fn save_now<K: KvStore>(&mut self, now_ms: u64, store: &mut SessionStore<K>) -> Option<Entry> {
        self.commit(CommitTrigger::Manual, now_ms, store)
    }

    /// The editing surface lost focus.
    pub fn blur<K: KvStore>(&mut self, now_ms: u64, store: &mut SessionStore<K>) -> Option<Entry> {
        if !self.commit_on_blur {
            return None;
        }
        self.commit(CommitTrigger::Blur, now_ms, store)
    }

    /// The editing surface is going away. Drops the pending deadline so
    /// nothing commits afterwards.
    pub fn close(&mut self) {
        self.deadline_ms = None;
        if self.state == AutosaveState::PendingCommit {
            self.state = AutosaveState::Drafting;
        }
    }

    fn commit<K: KvStore>(
        &mut self,
        trigger: CommitTrigger,
        now_ms: u64,
        store: &mut SessionStore<K>,
    ) -> Option<Entry> {
        self.deadline_ms = None;
        let content = self.draft.trim();
        if content.is_empty() {
            self.state = AutosaveState::Idle;
            return None;
        }

        let draft = EntryDraft::journal(content, self.tag).linked_to(self.link.take());
        let entry = store.commit(draft, at_ms(now_ms)).clone();

        self.draft.clear();
        self.last_saved_at = Some(entry.created_at());
        self.state = AutosaveState::Committed;
        tracing::debug!(?trigger, words = entry.body().split_whitespace().count(), "draft committed");
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use crate::storage::MemoryKv;

    const T0: u64 = 1_700_000_000_000;

    fn store() -> SessionStore<MemoryKv> {
        SessionStore::load(MemoryKv::new())
    }

    #[test]
    fn commits_after_quiet_period() {
        let mut store = store();
        let mut autosave = AutosaveController::new(3000);
        autosave.input("hello", T0);
        assert_eq!(autosave.state(), AutosaveState::PendingCommit);

        assert!(autosave.poll(T0 + 2999, &mut store).is_none());
        let entry = autosave.poll(T0 + 3000, &mut store).unwrap();

        assert_eq!(entry.body(), "hello");
        assert_eq!(entry.kind(), EntryKind::Journal);
        assert_eq!(entry.created_at().timestamp_millis() as u64, T0 + 3000);
        assert_eq!(store.len(), 1);
        assert_eq!(autosave.draft(), "");
        assert!(autosave.last_saved_at().is_some());
    }

    #[test]
    fn keystroke_resets_deadline() {
        let mut store = store();
        let mut autosave = AutosaveController::new(3000);
        autosave.input("h", T0);
        autosave.input("he", T0 + 2000);

        assert!(autosave.poll(T0 + 3000, &mut store).is_none());
        assert!(autosave.poll(T0 + 4999, &mut store).is_none());
        assert!(autosave.poll(T0 + 5000, &mut store).is_some());
        assert_eq!(store.all()[0].body(), "he");
    }

    #[test]
    fn whitespace_never_schedules() {
        let mut store = store();
        let mut autosave = AutosaveController::new(3000);
        autosave.input("   \n\t", T0);
        assert_eq!(autosave.state(), AutosaveState::Drafting);
        assert!(autosave.deadline_ms().is_none());
        assert!(autosave.save_now(T0 + 10_000, &mut store).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn clearing_the_draft_cancels_pending_commit() {
        let mut store = store();
        let mut autosave = AutosaveController::new(3000);
        autosave.input("draft", T0);
        autosave.input("", T0 + 100);
        assert_eq!(autosave.state(), AutosaveState::Idle);
        assert!(autosave.poll(T0 + 10_000, &mut store).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn manual_save_then_timer_does_not_duplicate() {
        let mut store = store();
        let mut autosave = AutosaveController::new(3000);
        autosave.input("  once  ", T0);

        let saved = autosave.save_now(T0 + 500, &mut store).unwrap();
        assert_eq!(saved.body(), "once");
        assert!(autosave.poll(T0 + 3000, &mut store).is_none());
        assert!(autosave.save_now(T0 + 3001, &mut store).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn blur_commits_when_enabled() {
        let mut store = store();
        let mut autosave = AutosaveController::new(3000);
        autosave.input("on blur", T0);
        assert!(autosave.blur(T0 + 10, &mut store).is_some());

        let mut off = AutosaveController::new(3000).with_commit_on_blur(false);
        off.input("kept", T0);
        assert!(off.blur(T0 + 10, &mut store).is_none());
        assert_eq!(off.draft(), "kept");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn close_cancels_pending_commit() {
        let mut store = store();
        let mut autosave = AutosaveController::new(3000);
        autosave.input("unsaved", T0);
        autosave.close();
        assert_eq!(autosave.state(), AutosaveState::Drafting);
        assert!(autosave.poll(T0 + 60_000, &mut store).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn drafting_holds_only_without_a_deadline() {
        let mut store = store();
        let mut autosave = AutosaveController::new(3000);
        autosave.input("  ", T0);
        assert_eq!(autosave.state(), AutosaveState::Drafting);

        autosave.input("  idea", T0 + 10);
        assert_eq!(autosave.state(), AutosaveState::PendingCommit);
        assert_eq!(autosave.deadline_ms(), Some(T0 + 3010));

        autosave.close();
        assert_eq!(autosave.state(), AutosaveState::Drafting);
        autosave.push_str(" more", T0 + 20);
        assert_eq!(autosave.state(), AutosaveState::PendingCommit);
        assert!(autosave.poll(T0 + 3020, &mut store).is_some());
        assert_eq!(autosave.state(), AutosaveState::Committed);

        autosave.input("", T0 + 30);
        assert_eq!(autosave.state(), AutosaveState::Idle);
    }

    #[test]
    fn commit_carries_tag_and_clears_link() {
        let mut store = store();
        let mut autosave = AutosaveController::new(3000);
        autosave.set_tag(JournalTag::Breakthrough);
        autosave.link_to("Study React hooks");
        autosave.input("it works", T0);
        let entry = autosave.poll(T0 + 3000, &mut store).unwrap();

        assert_eq!(entry.tag(), Some(JournalTag::Breakthrough));
        assert_eq!(entry.linked_topic(), Some("Study React hooks"));
        assert!(autosave.link().is_none());
        assert_eq!(autosave.tag(), JournalTag::Breakthrough);
    }

    #[test]
    fn push_str_accumulates_and_counts_words() {
        let mut autosave = AutosaveController::new(3000);
        autosave.push_str("one two", T0);
        autosave.push_str(" three\n", T0 + 100);
        assert_eq!(autosave.word_count(), 3);
        assert_eq!(autosave.deadline_ms(), Some(T0 + 3100));
    }

    #[test]
    fn committed_state_accepts_new_input() {
        let mut store = store();
        let mut autosave = AutosaveController::new(1000);
        autosave.input("first", T0);
        autosave.poll(T0 + 1000, &mut store);
        assert_eq!(autosave.state(), AutosaveState::Committed);
        autosave.poll(T0 + 1100, &mut store);
        assert_eq!(autosave.state(), AutosaveState::Idle);

        autosave.input("second", T0 + 2000);
        assert_eq!(autosave.state(), AutosaveState::PendingCommit);
        autosave.poll(T0 + 3000, &mut store);
        assert_eq!(store.len(), 2);
    }
}
