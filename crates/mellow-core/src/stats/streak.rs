use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::entry::{Entry, EntryKind};

/// Which day a streak has to reach to count as unbroken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakAnchor {
    /// No focus session today means no streak.
    Today,
    /// A streak that ended yesterday is still alive until today is over.
    #[default]
    TodayOrYesterday,
}

/// Consecutive local days, ending at the anchor, with at least one Focus
/// entry. Days are taken in the time zone of `now`.
pub fn focus_streak<'a, Tz: TimeZone>(
    entries: impl IntoIterator<Item = &'a Entry>,
    now: &DateTime<Tz>,
    anchor: StreakAnchor,
) -> u32 {
    let tz = now.timezone();
    let days: BTreeSet<NaiveDate> = entries
        .into_iter()
        .filter(|e| e.kind() == EntryKind::Focus)
        .map(|e| e.created_at().with_timezone(&tz).date_naive())
        .collect();

    let today = now.date_naive();
    let start = if days.contains(&today) {
        today
    } else {
        match (anchor, today.checked_sub_days(Days::new(1))) {
            (StreakAnchor::TodayOrYesterday, Some(yesterday)) if days.contains(&yesterday) => {
                yesterday
            }
            _ => return 0,
        }
    };

    let mut streak = 0;
    let mut day = Some(start);
    while let Some(d) = day.filter(|d| days.contains(d)) {
        streak += 1;
        day = d.checked_sub_days(Days::new(1));
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{DurationMinutes, EntryDraft, FocusMode, JournalTag};
    use chrono::{Duration, FixedOffset, Utc};

    fn focus_at(at: DateTime<Utc>) -> Entry {
        let draft = EntryDraft::focus("goal", FocusMode::Deep, DurationMinutes::new(20).unwrap());
        Entry::new(draft, at)
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_journal_has_no_streak() {
        assert_eq!(focus_streak(&Vec::<Entry>::new(), &noon(), StreakAnchor::default()), 0);
    }

    #[test]
    fn consecutive_days_ending_today() {
        let now = noon();
        let entries: Vec<_> = (0..3).map(|d| focus_at(now - Duration::days(d))).collect();
        assert_eq!(focus_streak(&entries, &now, StreakAnchor::Today), 3);
        assert_eq!(focus_streak(&entries, &now, StreakAnchor::TodayOrYesterday), 3);
    }

    #[test]
    fn several_sessions_on_one_day_count_once() {
        let now = noon();
        let entries = vec![
            focus_at(now),
            focus_at(now - Duration::hours(2)),
            focus_at(now - Duration::days(1)),
        ];
        assert_eq!(focus_streak(&entries, &now, StreakAnchor::Today), 2);
    }

    #[test]
    fn anchor_decides_a_streak_ending_yesterday() {
        let now = noon();
        let entries: Vec<_> = (1..=2).map(|d| focus_at(now - Duration::days(d))).collect();
        assert_eq!(focus_streak(&entries, &now, StreakAnchor::Today), 0);
        assert_eq!(focus_streak(&entries, &now, StreakAnchor::TodayOrYesterday), 2);
    }

    #[test]
    fn gap_breaks_the_walk() {
        let now = noon();
        let entries = vec![
            focus_at(now),
            focus_at(now - Duration::days(2)),
            focus_at(now - Duration::days(3)),
        ];
        assert_eq!(focus_streak(&entries, &now, StreakAnchor::TodayOrYesterday), 1);
    }

    #[test]
    fn only_focus_entries_count() {
        let now = noon();
        let entries = vec![
            Entry::new(EntryDraft::journal("note", JournalTag::Note), now),
            focus_at(now - Duration::days(1)),
        ];
        assert_eq!(focus_streak(&entries, &now, StreakAnchor::Today), 0);
    }

    #[test]
    fn days_follow_the_local_zone() {
        // 23:30 UTC on the 14th is already the 15th in UTC+2.
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap().with_timezone(&tz);
        let late = Utc.with_ymd_and_hms(2024, 3, 14, 23, 30, 0).unwrap();
        let entries = vec![focus_at(late)];
        assert_eq!(focus_streak(&entries, &now, StreakAnchor::Today), 1);
        assert_eq!(focus_streak(&entries, &noon(), StreakAnchor::Today), 0);
    }
}
