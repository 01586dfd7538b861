use crate::entry::{Accuracy, Entry};

/// Coarse self-report score from the length of a recall write-up.
///
/// Word bands: <10 -> 30, <30 -> 50, <60 -> 70, <100 -> 85, otherwise 95.
/// Length is only a proxy for how much was retained.
pub fn estimate_accuracy(text: &str) -> Accuracy {
    let words = text.split_whitespace().count();
    let score = match words {
        0..=9 => 30,
        10..=29 => 50,
        30..=59 => 70,
        60..=99 => 85,
        _ => 95,
    };
    Accuracy::clamped(score)
}

/// Mean accuracy over entries that carry one. 0.0 when none do.
pub fn average_accuracy<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> f64 {
    let (sum, count) = entries
        .into_iter()
        .filter_map(|e| e.accuracy())
        .fold((0u64, 0u64), |(sum, count), a| (sum + u64::from(a), count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
