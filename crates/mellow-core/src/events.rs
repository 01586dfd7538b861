use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{Entry, EntryKind};
use crate::timer::SessionPhase;

/// Every session timer state change produces an Event.
/// The CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        kind: EntryKind,
        subject: String,
        duration_min: u32,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero; the session is waiting for reflection.
    SessionCompleted {
        kind: EntryKind,
        at: DateTime<Utc>,
    },
    SessionEndedEarly {
        kind: EntryKind,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SessionCancelled {
        at: DateTime<Utc>,
    },
    EntrySaved {
        kind: EntryKind,
        accuracy: Option<u8>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: SessionPhase,
        kind: Option<EntryKind>,
        subject: Option<String>,
        remaining_ms: u64,
        total_ms: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn entry_saved(entry: &Entry) -> Self {
        Event::EntrySaved {
            kind: entry.kind(),
            accuracy: entry.accuracy(),
            at: entry.created_at(),
        }
    }
}

/// Convert epoch millis to a timestamp, falling back to the current time
/// for values chrono cannot represent.
pub fn at_ms(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::SessionCancelled { at: at_ms(0) };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "SessionCancelled");
        assert_eq!(json["at"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn unrepresentable_millis_fall_back_to_now() {
        let before = Utc::now();
        assert!(at_ms(u64::MAX) >= before);
    }
}
