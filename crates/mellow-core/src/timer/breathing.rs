//! Guided breathing patterns.
//!
//! A pattern is a repeating list of timed phases. [`BreathingPattern::at`]
//! maps elapsed time to the current phase, so the caller can drive it from
//! any interval timer. Breathing sessions are not journaled.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Longest allowed custom phase, in seconds.
const MAX_PHASE_SECS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
    Rest,
}

impl fmt::Display for BreathPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BreathPhase::Inhale => "Inhale",
            BreathPhase::Hold => "Hold",
            BreathPhase::Exhale => "Exhale",
            BreathPhase::Rest => "Rest",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathStep {
    pub phase: BreathPhase,
    pub secs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathingPreset {
    Box,
    FourSevenEight,
    FocusPulse,
    Custom,
}

impl FromStr for BreathingPreset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "box" => Ok(BreathingPreset::Box),
            "478" | "fourseveneight" => Ok(BreathingPreset::FourSevenEight),
            "focuspulse" | "pulse" => Ok(BreathingPreset::FocusPulse),
            "custom" => Ok(BreathingPreset::Custom),
            _ => Err(ValidationError::UnknownName {
                kind: "breathing pattern",
                value: s.to_string(),
            }),
        }
    }
}

/// Where a breathing session is at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathPosition {
    pub cycle: u64,
    pub step_index: usize,
    pub phase: BreathPhase,
    /// Whole seconds left in this phase, counting down to 1.
    pub remaining_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPattern {
    pub name: String,
    pub steps: Vec<BreathStep>,
}

impl BreathingPattern {
    pub fn preset(preset: BreathingPreset) -> Self {
        use BreathPhase::*;
        match preset {
            BreathingPreset::Box => Self::from_steps("Box Breathing", &[(Inhale, 4), (Hold, 4), (Exhale, 4), (Hold, 4)]),
            BreathingPreset::FourSevenEight => {
                Self::from_steps("4-7-8 Breathing", &[(Inhale, 4), (Hold, 7), (Exhale, 8), (Rest, 0)])
            }
            BreathingPreset::FocusPulse => {
                Self::from_steps("Focus Pulse", &[(Inhale, 6), (Hold, 2), (Exhale, 6), (Hold, 2)])
            }
            BreathingPreset::Custom => Self::custom([4, 4, 4, 4]),
        }
    }

    /// Inhale, hold, exhale, hold. Each phase is clamped to 0..=20 seconds.
    pub fn custom(secs: [u32; 4]) -> Self {
        use BreathPhase::*;
        let [inhale, hold, exhale, rest] = secs.map(|s| s.min(MAX_PHASE_SECS));
        Self::from_steps("Custom Mode", &[(Inhale, inhale), (Hold, hold), (Exhale, exhale), (Hold, rest)])
    }

    fn from_steps(name: &str, steps: &[(BreathPhase, u32)]) -> Self {
        Self {
            name: name.to_string(),
            steps: steps
                .iter()
                .map(|&(phase, secs)| BreathStep { phase, secs })
                .collect(),
        }
    }

    pub fn cycle_secs(&self) -> u32 {
        self.steps.iter().map(|s| s.secs).sum()
    }

    /// Phase at `elapsed_ms` into the session. Zero-length phases are
    /// skipped. `None` when the whole cycle is zero seconds long.
    pub fn at(&self, elapsed_ms: u64) -> Option<BreathPosition> {
        let cycle_ms = u64::from(self.cycle_secs()) * 1000;
        if cycle_ms == 0 {
            return None;
        }
        let cycle = elapsed_ms / cycle_ms;
        let mut offset = elapsed_ms % cycle_ms;
        for (step_index, step) in self.steps.iter().enumerate() {
            let step_ms = u64::from(step.secs) * 1000;
            if offset < step_ms {
                let remaining_ms = step_ms - offset;
                return Some(BreathPosition {
                    cycle,
                    step_index,
                    phase: step.phase,
                    remaining_secs: remaining_ms.div_ceil(1000) as u32,
                });
            }
            offset -= step_ms;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_pattern_walks_phases() {
        let pattern = BreathingPattern::preset(BreathingPreset::Box);
        assert_eq!(pattern.cycle_secs(), 16);

        let start = pattern.at(0).unwrap();
        assert_eq!(start.phase, BreathPhase::Inhale);
        assert_eq!(start.remaining_secs, 4);

        let hold = pattern.at(4_000).unwrap();
        assert_eq!((hold.step_index, hold.phase), (1, BreathPhase::Hold));

        let exhale = pattern.at(9_500).unwrap();
        assert_eq!(exhale.phase, BreathPhase::Exhale);
        assert_eq!(exhale.remaining_secs, 3);

        let next_cycle = pattern.at(16_000).unwrap();
        assert_eq!((next_cycle.cycle, next_cycle.step_index), (1, 0));
    }

    #[test]
    fn zero_length_rest_is_skipped() {
        let pattern = BreathingPattern::preset(BreathingPreset::FourSevenEight);
        assert_eq!(pattern.cycle_secs(), 19);
        let last = pattern.at(18_999).unwrap();
        assert_eq!(last.phase, BreathPhase::Exhale);
        let wrapped = pattern.at(19_000).unwrap();
        assert_eq!((wrapped.cycle, wrapped.phase), (1, BreathPhase::Inhale));
    }

    #[test]
    fn custom_phases_are_clamped() {
        let pattern = BreathingPattern::custom([30, 0, 5, 0]);
        assert_eq!(pattern.steps[0].secs, 20);
        assert_eq!(pattern.cycle_secs(), 25);
        assert_eq!(pattern.at(21_000).unwrap().phase, BreathPhase::Exhale);
    }

    #[test]
    fn empty_cycle_has_no_position() {
        assert!(BreathingPattern::custom([0, 0, 0, 0]).at(0).is_none());
    }

    #[test]
    fn preset_names_parse() {
        assert_eq!("4-7-8".parse::<BreathingPreset>().unwrap(), BreathingPreset::FourSevenEight);
        assert_eq!("focus_pulse".parse::<BreathingPreset>().unwrap(), BreathingPreset::FocusPulse);
        assert!("ocean".parse::<BreathingPreset>().is_err());
    }
}
