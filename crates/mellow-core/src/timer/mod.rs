mod breathing;
mod session;

pub use breathing::{BreathPhase, BreathPosition, BreathStep, BreathingPattern, BreathingPreset};
pub use session::{SessionPhase, SessionPlan, SessionTimer, RECALL_MAX_MINUTES, SESSION_TIMER_KEY};

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
