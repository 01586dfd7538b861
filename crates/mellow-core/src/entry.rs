//! Journal entry types.
//!
//! An [`Entry`] is one committed user action: a finished focus session, a
//! recall session, or a tagged journal note. Entries are built from an
//! [`EntryDraft`] and stamped with their commit time; after that they are
//! read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Closed set of entry kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Focus,
    Recall,
    Journal,
}

impl EntryKind {
    pub const ALL: [EntryKind; 3] = [EntryKind::Focus, EntryKind::Recall, EntryKind::Journal];

    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Focus => "Focus",
            EntryKind::Recall => "Recall",
            EntryKind::Journal => "Journal",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntryKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name("entry kind", s, &EntryKind::ALL, |k, w| normalize(k.label()) == w)
    }
}

/// Tag attached to journal notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalTag {
    Idea,
    Memory,
    Breakthrough,
    #[default]
    Note,
}

impl JournalTag {
    pub const ALL: [JournalTag; 4] = [
        JournalTag::Idea,
        JournalTag::Memory,
        JournalTag::Breakthrough,
        JournalTag::Note,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            JournalTag::Idea => "Idea",
            JournalTag::Memory => "Memory",
            JournalTag::Breakthrough => "Breakthrough",
            JournalTag::Note => "Note",
        }
    }
}

impl fmt::Display for JournalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JournalTag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name("journal tag", s, &JournalTag::ALL, |t, w| normalize(t.label()) == w)
    }
}

/// How a focus session felt, picked from a fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionTag {
    Focused,
    Inspired,
    Flowing,
    Energized,
    Calm,
    Insightful,
}

impl EmotionTag {
    pub const ALL: [EmotionTag; 6] = [
        EmotionTag::Focused,
        EmotionTag::Inspired,
        EmotionTag::Flowing,
        EmotionTag::Energized,
        EmotionTag::Calm,
        EmotionTag::Insightful,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EmotionTag::Focused => "Focused",
            EmotionTag::Inspired => "Inspired",
            EmotionTag::Flowing => "Flowing",
            EmotionTag::Energized => "Energized",
            EmotionTag::Calm => "Calm",
            EmotionTag::Insightful => "Insightful",
        }
    }
}

impl fmt::Display for EmotionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EmotionTag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name("emotion", s, &EmotionTag::ALL, |e, w| normalize(e.label()) == w)
    }
}

/// Focus session length menu. `Flow` uses the custom duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusMode {
    Micro,
    Deep,
    Flow,
}

impl FocusMode {
    pub const ALL: [FocusMode; 3] = [FocusMode::Micro, FocusMode::Deep, FocusMode::Flow];

    pub fn name(&self) -> &'static str {
        match self {
            FocusMode::Micro => "Micro-Focus",
            FocusMode::Deep => "Deep Dive",
            FocusMode::Flow => "Flow Mode",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            FocusMode::Micro => "micro",
            FocusMode::Deep => "deep",
            FocusMode::Flow => "flow",
        }
    }

    /// Session length for this mode. Fixed modes ignore `custom`.
    pub fn minutes(&self, custom: DurationMinutes) -> DurationMinutes {
        match self {
            FocusMode::Micro => DurationMinutes(5),
            FocusMode::Deep => DurationMinutes(20),
            FocusMode::Flow => custom,
        }
    }
}

impl fmt::Display for FocusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FocusMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name("focus mode", s, &FocusMode::ALL, |m, w| {
            normalize(m.key()) == w || normalize(m.name()) == w
        })
    }
}

/// Session duration in whole minutes, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DurationMinutes(u32);

impl DurationMinutes {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 60;

    pub fn new(minutes: u32) -> Result<Self, ValidationError> {
        Self::within(minutes, Self::MIN, Self::MAX)
    }

    /// Validate against a narrower sub-range (recall sessions stop at 30).
    pub fn within(minutes: u32, min: u32, max: u32) -> Result<Self, ValidationError> {
        let min = min.max(Self::MIN);
        let max = max.min(Self::MAX);
        if (min..=max).contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(ValidationError::DurationOutOfRange { minutes, min, max })
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn as_ms(&self) -> u64 {
        u64::from(self.0) * 60 * 1000
    }
}

impl TryFrom<u32> for DurationMinutes {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DurationMinutes> for u32 {
    fn from(value: DurationMinutes) -> Self {
        value.0
    }
}

/// Accuracy percentage, clamped into 0..=100 on every construction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Accuracy(u8);

impl Accuracy {
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl From<i64> for Accuracy {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Accuracy> for u8 {
    fn from(value: Accuracy) -> Self {
        value.0
    }
}

/// Kind-specific optional fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Focus goal or recall topic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_mode: Option<FocusMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<DurationMinutes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_percent: Option<Accuracy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<JournalTag>,
    /// Topic of a focus session this note refers to. Lookup only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_topic: Option<String>,
}

/// Uncommitted entry content. Becomes an [`Entry`] once stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub body: String,
    pub meta: EntryMeta,
}

impl EntryDraft {
    pub fn journal(body: impl Into<String>, tag: JournalTag) -> Self {
        Self {
            kind: EntryKind::Journal,
            body: body.into(),
            meta: EntryMeta {
                tag: Some(tag),
                ..EntryMeta::default()
            },
        }
    }

    pub fn focus(goal: impl Into<String>, mode: FocusMode, duration: DurationMinutes) -> Self {
        Self {
            kind: EntryKind::Focus,
            body: String::new(),
            meta: EntryMeta {
                topic: Some(goal.into()),
                focus_mode: Some(mode),
                duration_minutes: Some(duration),
                ..EntryMeta::default()
            },
        }
    }

    pub fn recall(topic: impl Into<String>, duration: DurationMinutes) -> Self {
        Self {
            kind: EntryKind::Recall,
            body: String::new(),
            meta: EntryMeta {
                topic: Some(topic.into()),
                duration_minutes: Some(duration),
                ..EntryMeta::default()
            },
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn accuracy(mut self, accuracy: Accuracy) -> Self {
        self.meta.accuracy_percent = Some(accuracy);
        self
    }

    pub fn emotion(mut self, emotion: Option<EmotionTag>) -> Self {
        self.meta.emotion = emotion;
        self
    }

    pub fn linked_to(mut self, topic: Option<String>) -> Self {
        self.meta.linked_topic = topic;
        self
    }
}

/// A committed journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    kind: EntryKind,
    created_at: DateTime<Utc>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    meta: EntryMeta,
}

impl Entry {
    pub fn new(draft: EntryDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            kind: draft.kind,
            created_at,
            body: draft.body,
            meta: draft.meta,
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    pub fn topic(&self) -> Option<&str> {
        self.meta.topic.as_deref()
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        self.meta.duration_minutes.map(|d| d.get())
    }

    pub fn accuracy(&self) -> Option<u8> {
        self.meta.accuracy_percent.map(|a| a.get())
    }

    pub fn emotion(&self) -> Option<EmotionTag> {
        self.meta.emotion
    }

    pub fn tag(&self) -> Option<JournalTag> {
        self.meta.tag
    }

    pub fn linked_topic(&self) -> Option<&str> {
        self.meta.linked_topic.as_deref()
    }

    /// Heading used in listings: topic for timed sessions, tag for notes.
    pub fn title(&self) -> String {
        match (self.topic(), self.tag()) {
            (Some(topic), _) => topic.to_string(),
            (None, Some(tag)) => tag.label().to_string(),
            (None, None) => "Entry".to_string(),
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace(['-', ' ', '_'], "")
}

fn parse_name<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    matches: impl Fn(&T, &str) -> bool,
) -> Result<T, ValidationError> {
    let wanted = normalize(value);
    all.iter()
        .copied()
        .find(|candidate| matches(candidate, &wanted))
        .ok_or_else(|| ValidationError::UnknownName {
            kind,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_is_clamped() {
        assert_eq!(Accuracy::clamped(-5).get(), 0);
        assert_eq!(Accuracy::clamped(250).get(), 100);
        assert_eq!(Accuracy::clamped(70).get(), 70);
    }

    #[test]
    fn accuracy_clamps_when_deserialized() {
        let meta: EntryMeta = serde_json::from_str(r#"{"accuracy_percent": 140}"#).unwrap();
        assert_eq!(meta.accuracy_percent.map(|a| a.get()), Some(100));
    }

    #[test]
    fn duration_bounds() {
        assert!(DurationMinutes::new(4).is_err());
        assert!(DurationMinutes::new(61).is_err());
        assert_eq!(DurationMinutes::new(25).unwrap().get(), 25);
        assert!(DurationMinutes::within(45, 5, 30).is_err());
        assert_eq!(DurationMinutes::new(10).unwrap().as_ms(), 600_000);
    }

    #[test]
    fn out_of_range_duration_fails_to_deserialize() {
        let result: Result<EntryMeta, _> = serde_json::from_str(r#"{"duration_minutes": 0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn focus_mode_menu() {
        let custom = DurationMinutes::new(40).unwrap();
        assert_eq!(FocusMode::Micro.minutes(custom).get(), 5);
        assert_eq!(FocusMode::Deep.minutes(custom).get(), 20);
        assert_eq!(FocusMode::Flow.minutes(custom).get(), 40);
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("Calm".parse::<EmotionTag>().unwrap(), EmotionTag::Calm);
        assert_eq!("idea".parse::<JournalTag>().unwrap(), JournalTag::Idea);
        assert_eq!("deep".parse::<FocusMode>().unwrap(), FocusMode::Deep);
        assert_eq!("Deep Dive".parse::<FocusMode>().unwrap(), FocusMode::Deep);
        assert_eq!("JOURNAL".parse::<EntryKind>().unwrap(), EntryKind::Journal);
        assert!("angry".parse::<EmotionTag>().is_err());
    }

    #[test]
    fn title_prefers_topic_then_tag() {
        let now = Utc::now();
        let note = Entry::new(EntryDraft::journal("x", JournalTag::Idea), now);
        assert_eq!(note.title(), "Idea");

        let focus = Entry::new(
            EntryDraft::focus("Read chapter 3", FocusMode::Micro, DurationMinutes::new(5).unwrap()),
            now,
        );
        assert_eq!(focus.title(), "Read chapter 3");
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let entry = Entry::new(EntryDraft::journal("hello", JournalTag::Note), Utc::now());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("accuracy_percent"));
        assert!(json.contains("\"tag\":\"note\""));
    }
}
