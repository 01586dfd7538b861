//! The session journal store.
//!
//! Holds every committed [`Entry`] in insertion order and mirrors the whole
//! collection into one kv slot after each append. Loading never fails:
//! a missing, unreadable, or malformed slot starts an empty journal.
//!
//! Each append rewrites the full collection, so write cost grows with the
//! number of entries. That is fine at personal-journal scale.

use chrono::{DateTime, Utc};

use super::KvStore;
use crate::entry::{Entry, EntryDraft, EntryKind};

/// Slot holding the serialized entry collection.
pub const SESSIONS_KEY: &str = "mellow_neural_core_sessions";

/// Ordered entry collection bound to a kv slot.
pub struct SessionStore<K: KvStore> {
    kv: K,
    entries: Vec<Entry>,
}

impl<K: KvStore> SessionStore<K> {
    /// Hydrate from the persisted slot.
    pub fn load(kv: K) -> Self {
        let entries = match kv.get(SESSIONS_KEY) {
            Ok(Some(json)) => Self::from_json(&json),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read journal slot, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(count = entries.len(), "journal loaded");
        Self { kv, entries }
    }

    /// Parse a serialized collection. Malformed input yields an empty one.
    pub fn from_json(json: &str) -> Vec<Entry> {
        match serde_json::from_str::<Vec<Entry>>(json) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed journal data");
                Vec::new()
            }
        }
    }

    /// Serialize the current collection.
    pub fn to_json(&self) -> String {
        // Entry fields are plain strings, enums and integers.
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }

    /// Append an entry and flush the collection.
    ///
    /// The slot is re-read first, so entries saved by another process
    /// since [`load`](Self::load) are kept.
    ///
    /// A failed write is logged and ignored; the in-memory journal stays
    /// correct for the rest of the process.
    pub fn append(&mut self, entry: Entry) -> &Entry {
        self.sync();
        self.push(entry)
    }

    /// Stamp a draft and append it.
    ///
    /// Timestamps never go backwards within one store: a `now` earlier than
    /// the last entry is raised to that entry's time.
    pub fn commit(&mut self, draft: EntryDraft, now: DateTime<Utc>) -> &Entry {
        self.sync();
        let created_at = match self.entries.last() {
            Some(last) if last.created_at() > now => last.created_at(),
            _ => now,
        };
        tracing::debug!(kind = %draft.kind, %created_at, "committing entry");
        self.push(Entry::new(draft, created_at))
    }

    /// Pick up entries other processes wrote since this store was loaded.
    ///
    /// The slot is the source of truth when it holds a readable collection;
    /// otherwise the in-memory entries are kept.
    pub fn sync(&mut self) {
        match self.kv.get(SESSIONS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Entry>>(&json) {
                Ok(entries) => self.entries = entries,
                Err(e) => tracing::debug!(error = %e, "slot unreadable, keeping in-memory journal"),
            },
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "could not re-read journal slot"),
        }
    }

    fn push(&mut self, entry: Entry) -> &Entry {
        self.entries.push(entry);
        self.flush();
        &self.entries[self.entries.len() - 1]
    }

    fn flush(&self) {
        let json = self.to_json();
        if let Err(e) = self.kv.set(SESSIONS_KEY, &json) {
            tracing::warn!(error = %e, "journal write failed, keeping in-memory state");
        }
    }

    /// All entries in insertion order.
    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Entries sorted for display, most recent first.
    pub fn newest_first(&self) -> Vec<&Entry> {
        let mut sorted: Vec<&Entry> = self.entries.iter().collect();
        // Stable sort keeps insertion order among equal timestamps; reverse
        // afterwards so the later insert comes first.
        sorted.sort_by_key(|e| e.created_at());
        sorted.reverse();
        sorted
    }

    pub fn by_kind(&self, kind: EntryKind) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |e| e.kind() == kind)
    }

    /// Case-insensitive search over body, topic, tag and linked topic.
    pub fn search(&self, query: &str) -> Vec<&Entry> {
        let query = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| query.is_empty() || matches_query(e, &query))
            .collect()
    }

    /// Topics of the newest `n` focus sessions, offered as link targets.
    pub fn recent_focus_topics(&self, n: usize) -> Vec<&str> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.kind() == EntryKind::Focus)
            .filter_map(|e| e.topic())
            .take(n)
            .collect()
    }

    /// Newest focus entry whose topic matches the entry's link.
    ///
    /// `None` for unlinked entries and for links whose target is gone.
    pub fn resolve_link(&self, entry: &Entry) -> Option<&Entry> {
        let target = entry.linked_topic()?;
        self.entries
            .iter()
            .rev()
            .find(|e| e.kind() == EntryKind::Focus && e.topic() == Some(target))
    }
}

fn matches_query(entry: &Entry, query: &str) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(query);
    hit(entry.body())
        || entry.topic().is_some_and(hit)
        || entry.linked_topic().is_some_and(hit)
        || entry.tag().is_some_and(|t| hit(t.label()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{DurationMinutes, FocusMode, JournalTag};
    use crate::error::StorageError;
    use crate::storage::MemoryKv;
    use chrono::Duration;

    struct FailingKv;

    impl KvStore for FailingKv {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Locked)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::QueryFailed("quota exceeded".into()))
        }
    }

    fn note(text: &str) -> EntryDraft {
        EntryDraft::journal(text, JournalTag::Note)
    }

    fn focus(goal: &str) -> EntryDraft {
        EntryDraft::focus(goal, FocusMode::Micro, DurationMinutes::new(5).unwrap())
    }

    #[test]
    fn load_missing_slot_is_empty() {
        let store = SessionStore::load(MemoryKv::new());
        assert!(store.is_empty());
    }

    #[test]
    fn load_malformed_slot_is_empty() {
        let kv = MemoryKv::new();
        kv.set(SESSIONS_KEY, "{not json").unwrap();
        let store = SessionStore::load(kv);
        assert!(store.is_empty());
    }

    #[test]
    fn load_unreadable_slot_is_empty() {
        let store = SessionStore::load(FailingKv);
        assert!(store.is_empty());
    }

    #[test]
    fn append_persists_full_collection() {
        let kv = MemoryKv::new();
        let mut store = SessionStore::load(&kv);
        store.commit(note("one"), Utc::now());
        store.commit(note("two"), Utc::now());

        let reloaded = SessionStore::load(&kv);
        assert_eq!(reloaded.all(), store.all());
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn appends_from_two_stores_are_both_kept() {
        let kv = MemoryKv::new();
        let mut editor = SessionStore::load(&kv);
        let mut other = SessionStore::load(&kv);

        other.commit(focus("Deep work"), Utc::now());
        editor.commit(note("written meanwhile"), Utc::now());

        let reloaded = SessionStore::load(&kv);
        let bodies: Vec<&str> = reloaded.all().iter().map(|e| e.body()).collect();
        assert_eq!(bodies, vec!["", "written meanwhile"]);
        assert_eq!(editor.len(), 2);
    }

    #[test]
    fn write_failure_keeps_memory_state() {
        let mut store = SessionStore::load(FailingKv);
        store.commit(note("kept"), Utc::now());
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].body(), "kept");
    }

    #[test]
    fn commit_never_moves_time_backwards() {
        let mut store = SessionStore::load(MemoryKv::new());
        let now = Utc::now();
        store.commit(note("later"), now);
        let second = store.commit(note("clock skew"), now - Duration::minutes(5));
        assert_eq!(second.created_at(), now);
    }

    #[test]
    fn newest_first_reverses_insertion() {
        let mut store = SessionStore::load(MemoryKv::new());
        let now = Utc::now();
        store.commit(note("a"), now);
        store.commit(note("b"), now);
        store.commit(note("c"), now + Duration::seconds(1));
        let bodies: Vec<&str> = store.newest_first().iter().map(|e| e.body()).collect();
        assert_eq!(bodies, vec!["c", "b", "a"]);
    }

    #[test]
    fn search_matches_body_topic_and_tag() {
        let mut store = SessionStore::load(MemoryKv::new());
        let now = Utc::now();
        store.commit(note("Rust lifetimes click"), now);
        store.commit(focus("Study React hooks"), now);
        store.commit(EntryDraft::journal("unrelated", JournalTag::Breakthrough), now);

        assert_eq!(store.search("RUST").len(), 1);
        assert_eq!(store.search("hooks").len(), 1);
        assert_eq!(store.search("breakthrough").len(), 1);
        assert_eq!(store.search("").len(), 3);
        assert!(store.search("nothing here").is_empty());
    }

    #[test]
    fn links_resolve_to_newest_focus_and_tolerate_breaks() {
        let mut store = SessionStore::load(MemoryKv::new());
        let now = Utc::now();
        store.commit(focus("Deep work"), now);
        store.commit(focus("Reading"), now);
        let linked = store
            .commit(note("follow-up").linked_to(Some("Deep work".into())), now)
            .clone();
        let broken = store
            .commit(note("dangling").linked_to(Some("Gone".into())), now)
            .clone();

        assert_eq!(store.resolve_link(&linked).and_then(|e| e.topic()), Some("Deep work"));
        assert!(store.resolve_link(&broken).is_none());
        assert_eq!(store.recent_focus_topics(5), vec!["Reading", "Deep work"]);
        assert_eq!(store.recent_focus_topics(1), vec!["Reading"]);
    }

    #[test]
    fn by_kind_filters() {
        let mut store = SessionStore::load(MemoryKv::new());
        let now = Utc::now();
        store.commit(note("n"), now);
        store.commit(focus("f"), now);
        assert_eq!(store.by_kind(EntryKind::Focus).count(), 1);
        assert_eq!(store.by_kind(EntryKind::Recall).count(), 0);
    }
}
