//! Focus and recall session timer.
//!
//! The session timer is a wall-clock-based state machine. It does not use
//! internal threads - the caller passes the current time to `tick()` and the
//! other commands, so a CLI can persist it between invocations.
//!
//! ## State Transitions
//!
//! ```text
//! Setup -> Active -> Reflect -> Setup
//!            |                   ^
//!            +----- cancel ------+
//! ```
//!
//! `Active` moves to `Reflect` when the countdown reaches zero or the user
//! ends early. Saving from `Reflect` writes one entry and returns to `Setup`.

use serde::{Deserialize, Serialize};

use crate::entry::{Accuracy, DurationMinutes, EmotionTag, Entry, EntryDraft, EntryKind, FocusMode};
use crate::error::{Result as CoreResult, ValidationError};
use crate::events::{at_ms, Event};
use crate::stats::estimate_accuracy;
use crate::storage::{KvStore, SessionStore};

/// Slot holding the serialized timer between CLI invocations.
pub const SESSION_TIMER_KEY: &str = "mellow_session_timer";

/// Longest recall session, in minutes.
pub const RECALL_MAX_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Setup,
    Active,
    Reflect,
}

impl SessionPhase {
    fn name(&self) -> &'static str {
        match self {
            SessionPhase::Setup => "in setup",
            SessionPhase::Active => "a session is running",
            SessionPhase::Reflect => "reflecting",
        }
    }
}

/// What a timed session is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SessionPlan {
    Focus {
        goal: String,
        mode: FocusMode,
        duration: DurationMinutes,
    },
    Recall {
        topic: String,
        duration: DurationMinutes,
    },
}

impl SessionPlan {
    /// Focus plan. `custom` is only used by [`FocusMode::Flow`].
    pub fn focus(
        goal: impl Into<String>,
        mode: FocusMode,
        custom: DurationMinutes,
    ) -> Result<Self, ValidationError> {
        let goal = goal.into().trim().to_string();
        if goal.is_empty() {
            return Err(ValidationError::EmptyField("goal"));
        }
        Ok(SessionPlan::Focus {
            goal,
            mode,
            duration: mode.minutes(custom),
        })
    }

    pub fn recall(topic: impl Into<String>, minutes: u32) -> Result<Self, ValidationError> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(ValidationError::EmptyField("topic"));
        }
        let duration = DurationMinutes::within(minutes, DurationMinutes::MIN, RECALL_MAX_MINUTES)?;
        Ok(SessionPlan::Recall { topic, duration })
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            SessionPlan::Focus { .. } => EntryKind::Focus,
            SessionPlan::Recall { .. } => EntryKind::Recall,
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            SessionPlan::Focus { goal, .. } => goal,
            SessionPlan::Recall { topic, .. } => topic,
        }
    }

    pub fn duration(&self) -> DurationMinutes {
        match self {
            SessionPlan::Focus { duration, .. } | SessionPlan::Recall { duration, .. } => *duration,
        }
    }
}

/// Countdown for one focus or recall session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTimer {
    phase: SessionPhase,
    #[serde(default)]
    plan: Option<SessionPlan>,
    /// Epoch millis when the countdown reaches zero.
    #[serde(default)]
    ends_at_ms: Option<u64>,
    /// Remaining time when the session left `Active`.
    #[serde(default)]
    remaining_at_end_ms: u64,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Setup,
            plan: None,
            ends_at_ms: None,
            remaining_at_end_ms: 0,
        }
    }

    /// Load the timer a previous process left in `kv`. A missing or
    /// unreadable slot yields a fresh timer.
    pub fn restore<K: KvStore>(kv: &K) -> Self {
        match kv.get(SESSION_TIMER_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable session timer");
                Self::new()
            }),
            Ok(None) => Self::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read session timer");
                Self::new()
            }
        }
    }

    pub fn persist<K: KvStore>(&self, kv: &K) -> CoreResult<()> {
        let json = serde_json::to_string(self)?;
        kv.set(SESSION_TIMER_KEY, &json)?;
        tracing::debug!(phase = ?self.phase, "session timer saved");
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn plan(&self) -> Option<&SessionPlan> {
        self.plan.as_ref()
    }

    pub fn total_ms(&self) -> u64 {
        self.plan.as_ref().map(|p| p.duration().as_ms()).unwrap_or(0)
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        match (self.phase, self.ends_at_ms) {
            (SessionPhase::Active, Some(ends_at)) => ends_at.saturating_sub(now_ms),
            (SessionPhase::Reflect, _) => self.remaining_at_end_ms,
            _ => self.total_ms(),
        }
    }

    /// 0.0 .. 1.0 progress through the countdown.
    pub fn progress(&self, now_ms: u64) -> f64 {
        let total = self.total_ms();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_ms(now_ms) as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now_ms: u64) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            kind: self.plan.as_ref().map(|p| p.kind()),
            subject: self.plan.as_ref().map(|p| p.subject().to_string()),
            remaining_ms: self.remaining_ms(now_ms),
            total_ms: self.total_ms(),
            progress_pct: (self.progress(now_ms) * 100.0).clamp(0.0, 100.0),
            at: at_ms(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, plan: SessionPlan, now_ms: u64) -> Result<Event, ValidationError> {
        self.require(SessionPhase::Setup, "start a session")?;
        let duration = plan.duration();
        let event = Event::SessionStarted {
            kind: plan.kind(),
            subject: plan.subject().to_string(),
            duration_min: duration.get(),
            at: at_ms(now_ms),
        };
        self.ends_at_ms = Some(now_ms.saturating_add(duration.as_ms()));
        self.plan = Some(plan);
        self.remaining_at_end_ms = 0;
        self.phase = SessionPhase::Active;
        Ok(event)
    }

    /// Call periodically. Returns `Some(Event::SessionCompleted)` when the
    /// countdown reaches zero.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        if self.phase != SessionPhase::Active || self.remaining_ms(now_ms) > 0 {
            return None;
        }
        self.phase = SessionPhase::Reflect;
        self.remaining_at_end_ms = 0;
        self.ends_at_ms = None;
        Some(Event::SessionCompleted {
            kind: self.plan.as_ref()?.kind(),
            at: at_ms(now_ms),
        })
    }

    pub fn end_early(&mut self, now_ms: u64) -> Result<Event, ValidationError> {
        self.require(SessionPhase::Active, "end a session")?;
        let remaining_ms = self.remaining_ms(now_ms);
        self.phase = SessionPhase::Reflect;
        self.remaining_at_end_ms = remaining_ms;
        self.ends_at_ms = None;
        let kind = self
            .plan
            .as_ref()
            .map(|p| p.kind())
            .unwrap_or(EntryKind::Focus);
        Ok(Event::SessionEndedEarly {
            kind,
            remaining_ms,
            at: at_ms(now_ms),
        })
    }

    /// Abandon the session without saving.
    pub fn cancel(&mut self, now_ms: u64) -> Option<Event> {
        if self.phase == SessionPhase::Setup {
            return None;
        }
        *self = Self::new();
        Some(Event::SessionCancelled { at: at_ms(now_ms) })
    }

    /// Save a finished focus session. Accuracy is estimated from the
    /// recall text.
    pub fn save_focus<K: KvStore>(
        &mut self,
        recall_text: &str,
        emotion: Option<EmotionTag>,
        now_ms: u64,
        store: &mut SessionStore<K>,
    ) -> Result<Entry, ValidationError> {
        self.require(SessionPhase::Reflect, "save")?;
        let Some(SessionPlan::Focus { goal, mode, duration }) = &self.plan else {
            return Err(ValidationError::WrongPhase {
                action: "save a focus session",
                phase: "a recall session is open",
            });
        };
        let recall_text = recall_text.trim();
        let draft = EntryDraft::focus(goal.clone(), *mode, *duration)
            .body(recall_text)
            .emotion(emotion)
            .accuracy(estimate_accuracy(recall_text));
        let entry = store.commit(draft, at_ms(now_ms)).clone();
        *self = Self::new();
        Ok(entry)
    }

    /// Save a finished recall session. Without a self-check score the
    /// accuracy is estimated from the text.
    pub fn save_recall<K: KvStore>(
        &mut self,
        recall_text: &str,
        self_check: Option<Accuracy>,
        now_ms: u64,
        store: &mut SessionStore<K>,
    ) -> Result<Entry, ValidationError> {
        self.require(SessionPhase::Reflect, "save")?;
        let Some(SessionPlan::Recall { topic, duration }) = &self.plan else {
            return Err(ValidationError::WrongPhase {
                action: "save a recall session",
                phase: "a focus session is open",
            });
        };
        let recall_text = recall_text.trim();
        if recall_text.is_empty() {
            return Err(ValidationError::EmptyField("recall text"));
        }
        let accuracy = self_check.unwrap_or_else(|| estimate_accuracy(recall_text));
        let draft = EntryDraft::recall(topic.clone(), *duration)
            .body(recall_text)
            .accuracy(accuracy);
        let entry = store.commit(draft, at_ms(now_ms)).clone();
        *self = Self::new();
        Ok(entry)
    }

    fn require(&self, phase: SessionPhase, action: &'static str) -> Result<(), ValidationError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(ValidationError::WrongPhase {
                action,
                phase: self.phase.name(),
            })
        }
    }
}
