//! Guided breathing exercise.
//!
//! A session cycles Inhale (4s) → Hold (2s) → Exhale (4s) → Rest (2s) while
//! an overall countdown runs, counting completed cycles until time is up.

mod scheduler;
mod session;
mod timer;

pub use scheduler::{Firing, Scheduler, TimerId, TimerKind, TimerQueue};
pub use session::{
    format_clock, BreathSession, Phase, SessionEvent, SessionStatus, BREATHING_TIPS,
    CYCLE_SECONDS, DEFAULT_SESSION_MINUTES, DURATION_PRESETS,
};
pub use timer::{BreathTimer, HapticCue, NoHaptics, COMPLETION_PATTERN_MS, CYCLE_PULSE_MS};
