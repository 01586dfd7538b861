use serde::Serialize;
use std::fmt;

use super::JournalStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Info,
    Metric,
}

impl InsightKind {
    /// Bullet used when printing to a terminal.
    pub fn marker(&self) -> char {
        match self {
            InsightKind::Success => '✓',
            InsightKind::Info => '•',
            InsightKind::Metric => '→',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.marker(), self.message)
    }
}

/// Insight sentences in display order. Never empty.
pub fn insights(stats: &JournalStats) -> Vec<Insight> {
    let mut out = Vec::new();

    if stats.streak >= 3 {
        out.push(Insight::new(
            InsightKind::Success,
            format!("Focus streak: {} days. Your neural circuits are warming up.", stats.streak),
        ));
    }

    if stats.today_focus > 0 {
        let plural = if stats.today_focus > 1 { "s" } else { "" };
        out.push(Insight::new(
            InsightKind::Info,
            format!("{} session{plural} today. You're building momentum.", stats.today_focus),
        ));
    }

    if stats.rounded_accuracy() >= 70 {
        out.push(Insight::new(
            InsightKind::Success,
            "System memory stable. You're retaining patterns faster.",
        ));
    }

    if let Some(emotion) = stats.dominant_emotion {
        out.push(Insight::new(
            InsightKind::Info,
            format!("Dominant state: {emotion}. Your cognitive baseline is adapting."),
        ));
    }

    if stats.focus_minutes >= 60 {
        out.push(Insight::new(
            InsightKind::Metric,
            format!("Total focus time: {}. Deep work accumulating.", stats.focus_time()),
        ));
    }

    if out.is_empty() {
        out.push(Insight::new(
            InsightKind::Info,
            "Neural Core initialized. Begin your first focus session to calibrate.",
        ));
    }
    out
}
