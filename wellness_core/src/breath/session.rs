//! Breathing session state machine.
//!
//! The session knows nothing about time sources. Its owner calls
//! [`BreathSession::countdown_tick`] once per elapsed second and
//! [`BreathSession::advance_phase`] whenever the current phase's duration
//! has elapsed; see [`super::BreathTimer`] for the driver that does this.

use serde::{Deserialize, Serialize};

/// Session length used when nothing else is configured
pub const DEFAULT_SESSION_MINUTES: u32 = 5;

/// Session lengths offered by the duration picker
pub const DURATION_PRESETS: [u32; 5] = [3, 5, 10, 15, 20];

/// Length of one full Inhale → Hold → Exhale → Rest cycle
pub const CYCLE_SECONDS: u32 = 12;

/// One phase of the breathing cycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
    Rest,
}

impl Phase {
    /// How long this phase lasts
    pub fn duration_secs(self) -> u32 {
        match self {
            Phase::Inhale => 4,
            Phase::Hold => 2,
            Phase::Exhale => 4,
            Phase::Rest => 2,
        }
    }

    /// The phase that follows this one
    pub fn next(self) -> Phase {
        match self {
            Phase::Inhale => Phase::Hold,
            Phase::Hold => Phase::Exhale,
            Phase::Exhale => Phase::Rest,
            Phase::Rest => Phase::Inhale,
        }
    }

    /// Guidance shown while the phase is active
    pub fn instruction(self) -> &'static str {
        match self {
            Phase::Inhale => "Inhale deeply\nThrough your nose",
            Phase::Hold => "Hold your breath\nFeel the stillness",
            Phase::Exhale => "Exhale slowly\nRelease tension",
            Phase::Rest => "Rest\nPrepare for next cycle",
        }
    }
}

/// Lifecycle of a session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Something observable that happened to a session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Started { duration_seconds: u32 },
    PhaseChanged { phase: Phase },
    /// The cycle wrapped back to Inhale
    CycleCompleted { completed_cycles: u32 },
    Paused,
    Resumed,
    Completed { completed_cycles: u32 },
    Reset,
}

/// State of one guided breathing session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreathSession {
    duration_minutes: u32,
    status: SessionStatus,
    phase: Phase,
    remaining_seconds: u32,
    completed_cycles: u32,
}

impl Default for BreathSession {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_MINUTES)
    }
}

impl BreathSession {
    /// Create an idle session configured for `duration_minutes`
    pub fn new(duration_minutes: u32) -> Self {
        Self {
            duration_minutes,
            status: SessionStatus::Idle,
            phase: Phase::Inhale,
            remaining_seconds: duration_minutes.saturating_mul(60),
            completed_cycles: 0,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn total_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    /// True while a session is in progress, paused or not
    pub fn is_running(&self) -> bool {
        matches!(self.status, SessionStatus::Running | SessionStatus::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.status == SessionStatus::Paused
    }

    /// Change the configured length; ignored unless the session is idle
    ///
    /// Returns whether the change was applied.
    pub fn set_duration(&mut self, minutes: u32) -> bool {
        if self.is_running() || minutes == 0 {
            tracing::debug!(
                "Ignoring duration change to {} min while {:?}",
                minutes,
                self.status
            );
            return false;
        }
        self.duration_minutes = minutes;
        self.remaining_seconds = self.total_seconds();
        true
    }

    /// Begin a session of `minutes` minutes
    ///
    /// Only an idle (or finished) session can start, and a zero length
    /// keeps it idle.
    pub fn start(&mut self, minutes: u32) -> Option<SessionEvent> {
        if self.is_running() {
            tracing::debug!("Ignoring start while {:?}", self.status);
            return None;
        }
        if minutes == 0 {
            tracing::debug!("Refusing to start a zero-length session");
            return None;
        }

        self.duration_minutes = minutes;
        self.status = SessionStatus::Running;
        self.phase = Phase::Inhale;
        self.remaining_seconds = self.total_seconds();
        self.completed_cycles = 0;

        Some(SessionEvent::Started {
            duration_seconds: self.remaining_seconds,
        })
    }

    pub fn pause(&mut self) -> Option<SessionEvent> {
        if self.status != SessionStatus::Running {
            return None;
        }
        self.status = SessionStatus::Paused;
        Some(SessionEvent::Paused)
    }

    pub fn resume(&mut self) -> Option<SessionEvent> {
        if self.status != SessionStatus::Paused {
            return None;
        }
        self.status = SessionStatus::Running;
        Some(SessionEvent::Resumed)
    }

    /// Return to idle from any state, restoring the full configured length
    pub fn reset(&mut self) -> SessionEvent {
        self.status = SessionStatus::Idle;
        self.phase = Phase::Inhale;
        self.remaining_seconds = self.total_seconds();
        self.completed_cycles = 0;
        SessionEvent::Reset
    }

    /// One second of session time has elapsed
    pub fn countdown_tick(&mut self) -> Option<SessionEvent> {
        if self.status != SessionStatus::Running {
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }

        self.status = SessionStatus::Completed;
        Some(SessionEvent::Completed {
            completed_cycles: self.completed_cycles,
        })
    }

    /// The current phase's duration has elapsed
    pub fn advance_phase(&mut self) -> Option<SessionEvent> {
        if self.status != SessionStatus::Running {
            return None;
        }

        self.phase = self.phase.next();
        if self.phase == Phase::Inhale {
            self.completed_cycles += 1;
            return Some(SessionEvent::CycleCompleted {
                completed_cycles: self.completed_cycles,
            });
        }
        Some(SessionEvent::PhaseChanged { phase: self.phase })
    }

    /// Share of the session already elapsed, as a whole percentage
    pub fn progress_percent(&self) -> u32 {
        let total = self.total_seconds();
        if total == 0 {
            return 0;
        }
        let elapsed = total.saturating_sub(self.remaining_seconds);
        ((f64::from(elapsed) / f64::from(total)) * 100.0).round() as u32
    }
}

/// Render seconds as `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Advice shown in the tips panel
pub const BREATHING_TIPS: [&str; 5] = [
    "Focus on the sensation of air entering your nostrils",
    "Let your abdomen expand as you breathe in",
    "Breathe out through your mouth gently",
    "Try to make each exhalation longer than inhalation",
    "If your mind wanders, gently bring it back to your breath",
];
