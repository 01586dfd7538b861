use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::{average_accuracy, focus_streak, insights, Insight, StreakAnchor};
use crate::entry::{EmotionTag, Entry, EntryKind};

/// Everything the stats panel shows, computed in one pass over the journal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalStats {
    pub total: usize,
    pub focus: usize,
    pub recall: usize,
    pub journal: usize,
    pub today_focus: usize,
    pub streak: u32,
    pub dominant_emotion: Option<EmotionTag>,
    pub focus_minutes: u32,
    pub average_accuracy: f64,
    pub insights: Vec<Insight>,
}

impl JournalStats {
    /// `now` fixes both "today" and the zone local days are counted in.
    pub fn compute<Tz: TimeZone>(entries: &[Entry], now: &DateTime<Tz>, anchor: StreakAnchor) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let count = |kind: EntryKind| entries.iter().filter(|e| e.kind() == kind).count();
        let focus_entries = || entries.iter().filter(|e| e.kind() == EntryKind::Focus);

        let mut stats = Self {
            total: entries.len(),
            focus: count(EntryKind::Focus),
            recall: count(EntryKind::Recall),
            journal: count(EntryKind::Journal),
            today_focus: focus_entries()
                .filter(|e| e.created_at().with_timezone(&tz).date_naive() == today)
                .count(),
            streak: focus_streak(entries, now, anchor),
            dominant_emotion: dominant_emotion(focus_entries()),
            focus_minutes: focus_entries().filter_map(|e| e.duration_minutes()).sum(),
            average_accuracy: average_accuracy(entries),
            insights: Vec::new(),
        };
        stats.insights = insights(&stats);
        stats
    }

    pub fn focus_time(&self) -> String {
        format_minutes(self.focus_minutes)
    }

    /// Average accuracy rounded half up, as displayed.
    pub fn rounded_accuracy(&self) -> u32 {
        self.average_accuracy.round() as u32
    }
}

/// Most frequent emotion. On a tie the one seen first wins.
pub fn dominant_emotion<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Option<EmotionTag> {
    let mut counts: Vec<(EmotionTag, usize)> = Vec::new();
    for emotion in entries.into_iter().filter_map(|e| e.emotion()) {
        match counts.iter_mut().find(|(seen, _)| *seen == emotion) {
            Some((_, n)) => *n += 1,
            None => counts.push((emotion, 1)),
        }
    }
    // max_by_key keeps the last maximum, so walk in reverse.
    counts
        .into_iter()
        .rev()
        .max_by_key(|&(_, n)| n)
        .map(|(emotion, _)| emotion)
}

/// `95` -> `"1h 35m"`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Accuracy, DurationMinutes, EntryDraft, FocusMode, JournalTag};
    use chrono::{Duration, Utc};

    fn focus(minutes: u32, emotion: Option<EmotionTag>, at: DateTime<Utc>) -> Entry {
        let draft = EntryDraft::focus("goal", FocusMode::Flow, DurationMinutes::new(minutes).unwrap())
            .emotion(emotion);
        Entry::new(draft, at)
    }

    #[test]
    fn empty_journal() {
        let stats = JournalStats::compute(&[], &Utc::now(), StreakAnchor::default());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.dominant_emotion, None);
        assert_eq!(stats.average_accuracy, 0.0);
        assert_eq!(stats.focus_time(), "0h 0m");
        assert_eq!(stats.insights.len(), 1);
    }

    #[test]
    fn counts_and_minutes() {
        let now = Utc::now();
        let five = DurationMinutes::new(5).unwrap();
        let entries = vec![
            focus(45, None, now - Duration::days(1)),
            focus(50, None, now),
            Entry::new(EntryDraft::recall("rust", five).accuracy(Accuracy::clamped(90)), now),
            Entry::new(EntryDraft::journal("hi", JournalTag::Idea), now),
        ];
        let stats = JournalStats::compute(&entries, &now, StreakAnchor::Today);
        assert_eq!((stats.total, stats.focus, stats.recall, stats.journal), (4, 2, 1, 1));
        assert_eq!(stats.today_focus, 1);
        assert_eq!(stats.focus_minutes, 95);
        assert_eq!(stats.focus_time(), "1h 35m");
        assert_eq!(stats.average_accuracy, 90.0);
        assert_eq!(stats.streak, 2);
    }

    #[test]
    fn dominant_emotion_majority() {
        let now = Utc::now();
        let entries = vec![
            focus(20, Some(EmotionTag::Calm), now),
            focus(20, Some(EmotionTag::Focused), now),
            focus(20, Some(EmotionTag::Focused), now),
        ];
        assert_eq!(dominant_emotion(&entries), Some(EmotionTag::Focused));
    }

    #[test]
    fn dominant_emotion_tie_goes_to_first_seen() {
        let now = Utc::now();
        let entries = vec![
            focus(20, Some(EmotionTag::Inspired), now),
            focus(20, None, now),
            focus(20, Some(EmotionTag::Calm), now),
            focus(20, Some(EmotionTag::Calm), now),
            focus(20, Some(EmotionTag::Inspired), now),
        ];
        assert_eq!(dominant_emotion(&entries), Some(EmotionTag::Inspired));
    }

    #[test]
    fn emotions_outside_focus_entries_are_ignored() {
        let now = Utc::now();
        let recall = EntryDraft::recall("cells", DurationMinutes::new(10).unwrap())
            .emotion(Some(EmotionTag::Calm))
            .accuracy(Accuracy::clamped(80));
        let note = EntryDraft::journal("calm evening", JournalTag::Note).emotion(Some(EmotionTag::Energized));
        let entries = vec![focus(20, None, now), Entry::new(recall, now), Entry::new(note, now)];
        let stats = JournalStats::compute(&entries, &now, StreakAnchor::default());
        assert_eq!(stats.dominant_emotion, None);

        let with_focus_emotion = [entries.clone(), vec![focus(20, Some(EmotionTag::Flowing), now)]].concat();
        let stats = JournalStats::compute(&with_focus_emotion, &now, StreakAnchor::default());
        assert_eq!(stats.dominant_emotion, Some(EmotionTag::Flowing));
    }

    #[test]
    fn minutes_format() {
        assert_eq!(format_minutes(0), "0h 0m");
        assert_eq!(format_minutes(60), "1h 0m");
        assert_eq!(format_minutes(125), "2h 5m");
    }
}
