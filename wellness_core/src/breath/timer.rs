//! Driver that binds a [`BreathSession`] to a [`Scheduler`].
//!
//! The driver owns both timer handles. Every transition out of Running
//! (pause, reset, completion, drop) cancels them, and firings from a handle
//! it no longer owns are ignored.

use std::time::Duration;

use super::scheduler::{Firing, Scheduler, TimerId, TimerKind};
use super::session::{BreathSession, Phase, SessionEvent, SessionStatus};

/// Vibration length for the end of each cycle
pub const CYCLE_PULSE_MS: u64 = 100;

/// Vibration pattern (pause/vibrate alternating, in ms) for session completion
pub const COMPLETION_PATTERN_MS: [u64; 6] = [0, 500, 200, 500, 200, 500];

/// Side-effect sink for haptic feedback
pub trait HapticCue {
    /// A breath cycle just wrapped back to Inhale
    fn cycle_completed(&mut self);

    /// The whole session just finished
    fn session_completed(&mut self);
}

/// Haptic sink for environments without a vibration motor
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHaptics;

impl HapticCue for NoHaptics {
    fn cycle_completed(&mut self) {}

    fn session_completed(&mut self) {}
}

/// A breathing session wired to its two timers
pub struct BreathTimer<S: Scheduler, H: HapticCue = NoHaptics> {
    session: BreathSession,
    scheduler: S,
    haptics: H,
    countdown: Option<TimerId>,
    phase_timer: Option<TimerId>,
}

impl<S: Scheduler, H: HapticCue> BreathTimer<S, H> {
    pub fn new(session: BreathSession, scheduler: S, haptics: H) -> Self {
        Self {
            session,
            scheduler,
            haptics,
            countdown: None,
            phase_timer: None,
        }
    }

    pub fn session(&self) -> &BreathSession {
        &self.session
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    /// Whether any timer is currently armed
    pub fn has_armed_timers(&self) -> bool {
        self.countdown.is_some() || self.phase_timer.is_some()
    }

    /// Instant at which the next timer fires, on the scheduler's clock
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    pub fn set_duration(&mut self, minutes: u32) -> bool {
        self.session.set_duration(minutes)
    }

    pub fn start(&mut self, minutes: u32) -> Option<SessionEvent> {
        let event = self.session.start(minutes)?;
        self.arm_countdown();
        self.arm_phase(self.session.phase());
        tracing::info!("Breathing session started for {} min", minutes);
        Some(event)
    }

    pub fn pause(&mut self) -> Option<SessionEvent> {
        let event = self.session.pause()?;
        self.cancel_all();
        tracing::debug!(
            "Session paused with {}s remaining",
            self.session.remaining_seconds()
        );
        Some(event)
    }

    /// Resume a paused session
    ///
    /// The current phase restarts with its full duration rather than the
    /// part that was left when the session paused.
    pub fn resume(&mut self) -> Option<SessionEvent> {
        let event = self.session.resume()?;
        self.arm_countdown();
        self.arm_phase(self.session.phase());
        Some(event)
    }

    /// Toggle between running and paused, or start an idle session
    pub fn toggle(&mut self) -> Option<SessionEvent> {
        match self.session.status() {
            SessionStatus::Running => self.pause(),
            SessionStatus::Paused => self.resume(),
            SessionStatus::Idle | SessionStatus::Completed => {
                self.start(self.session.duration_minutes())
            }
        }
    }

    pub fn reset(&mut self) -> SessionEvent {
        self.cancel_all();
        self.session.reset()
    }

    /// Run every firing due up to `deadline` on the scheduler's clock
    pub fn advance_to(&mut self, deadline: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(firing) = self.scheduler.poll(deadline) {
            events.extend(self.handle(firing));
        }
        events
    }

    /// Run every firing due within the next `elapsed` of scheduler time
    pub fn advance_by(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let deadline = self.scheduler.now() + elapsed;
        self.advance_to(deadline)
    }

    fn handle(&mut self, firing: Firing) -> Option<SessionEvent> {
        match firing.kind {
            TimerKind::Countdown => {
                if self.countdown != Some(firing.id) {
                    return None;
                }
                let event = self.session.countdown_tick()?;
                if let SessionEvent::Completed { completed_cycles } = event {
                    self.cancel_all();
                    self.haptics.session_completed();
                    tracing::info!(
                        "Breathing session complete after {} cycles",
                        completed_cycles
                    );
                }
                Some(event)
            }
            TimerKind::PhaseAdvance => {
                if self.phase_timer != Some(firing.id) {
                    return None;
                }
                self.phase_timer = None;
                let event = self.session.advance_phase()?;
                if let SessionEvent::CycleCompleted { .. } = event {
                    self.haptics.cycle_completed();
                }
                self.arm_phase(self.session.phase());
                Some(event)
            }
        }
    }

    fn arm_countdown(&mut self) {
        if let Some(id) = self.countdown.take() {
            self.scheduler.cancel(id);
        }
        let id = self
            .scheduler
            .schedule_repeating(Duration::from_secs(1), TimerKind::Countdown);
        self.countdown = Some(id);
    }

    fn arm_phase(&mut self, phase: Phase) {
        if let Some(id) = self.phase_timer.take() {
            self.scheduler.cancel(id);
        }
        let delay = Duration::from_secs(u64::from(phase.duration_secs()));
        let id = self.scheduler.schedule_once(delay, TimerKind::PhaseAdvance);
        self.phase_timer = Some(id);
    }

    fn cancel_all(&mut self) {
        if let Some(id) = self.countdown.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.phase_timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl<S: Scheduler, H: HapticCue> Drop for BreathTimer<S, H> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breath::TimerQueue;

    #[derive(Default)]
    struct CountingHaptics {
        cycles: u32,
        completions: u32,
    }

    impl HapticCue for CountingHaptics {
        fn cycle_completed(&mut self) {
            self.cycles += 1;
        }

        fn session_completed(&mut self) {
            self.completions += 1;
        }
    }

    fn timer() -> BreathTimer<TimerQueue, CountingHaptics> {
        BreathTimer::new(
            BreathSession::default(),
            TimerQueue::new(),
            CountingHaptics::default(),
        )
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_one_minute_session_completes_once_with_five_cycles() {
        crate::logging::init_test();
        let mut t = timer();
        t.start(1).unwrap();

        let events = t.advance_by(secs(120));
        let completions: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Completed { completed_cycles } => Some(*completed_cycles),
                _ => None,
            })
            .collect();

        assert_eq!(completions, vec![5]);
        assert_eq!(t.session().status(), SessionStatus::Completed);
        assert_eq!(t.session().remaining_seconds(), 0);
        assert!(!t.has_armed_timers());
        assert_eq!(t.scheduler().armed(), 0);
        assert_eq!(t.haptics().cycles, 5);
        assert_eq!(t.haptics().completions, 1);
    }

    #[test]
    fn test_phases_follow_their_durations() {
        let mut t = timer();
        t.start(5);

        assert!(t.advance_by(secs(3)).is_empty());
        assert_eq!(t.session().phase(), Phase::Inhale);
        t.advance_to(secs(4));
        assert_eq!(t.session().phase(), Phase::Hold);
        t.advance_to(secs(6));
        assert_eq!(t.session().phase(), Phase::Exhale);
        t.advance_to(secs(9));
        assert_eq!(t.session().phase(), Phase::Exhale);
        t.advance_to(secs(10));
        assert_eq!(t.session().phase(), Phase::Rest);
        t.advance_to(secs(12));
        assert_eq!(t.session().phase(), Phase::Inhale);
        assert_eq!(t.session().completed_cycles(), 1);
        assert_eq!(t.session().remaining_seconds(), 288);
    }

    #[test]
    fn test_pause_freezes_time_and_cancels_timers() {
        let mut t = timer();
        t.start(1);
        t.advance_by(secs(5));
        assert_eq!(t.session().phase(), Phase::Hold);

        t.pause().unwrap();
        assert!(!t.has_armed_timers());
        assert!(t.advance_by(secs(30)).is_empty());
        assert_eq!(t.session().remaining_seconds(), 55);
        assert_eq!(t.session().phase(), Phase::Hold);

        // Hold restarts with its full two seconds
        t.resume().unwrap();
        t.advance_by(secs(1));
        assert_eq!(t.session().phase(), Phase::Hold);
        t.advance_by(secs(1));
        assert_eq!(t.session().phase(), Phase::Exhale);
        assert_eq!(t.session().remaining_seconds(), 53);
    }

    #[test]
    fn test_reset_from_paused() {
        let mut t = timer();
        t.start(2);
        t.advance_by(secs(17));
        t.pause();

        assert_eq!(t.reset(), SessionEvent::Reset);
        assert_eq!(t.session().status(), SessionStatus::Idle);
        assert_eq!(t.session().remaining_seconds(), 120);
        assert_eq!(t.session().phase(), Phase::Inhale);
        assert_eq!(t.session().completed_cycles(), 0);
        assert!(!t.has_armed_timers());
        assert!(t.advance_by(secs(60)).is_empty());
    }

    #[test]
    fn test_duration_change_ignored_mid_session() {
        let mut t = timer();
        t.start(3);
        assert!(!t.set_duration(10));
        t.pause();
        assert!(!t.set_duration(10));
        assert_eq!(t.session().duration_minutes(), 3);
    }

    #[test]
    fn test_invalid_duration_arms_nothing() {
        let mut t = timer();
        assert!(t.start(0).is_none());
        assert!(!t.has_armed_timers());
        assert_eq!(t.scheduler().armed(), 0);
    }

    #[test]
    fn test_toggle_cycles_through_states() {
        let mut t = timer();
        assert!(t.set_duration(3));
        assert!(matches!(t.toggle(), Some(SessionEvent::Started { duration_seconds: 180 })));
        assert_eq!(t.toggle(), Some(SessionEvent::Paused));
        assert_eq!(t.toggle(), Some(SessionEvent::Resumed));
        assert_eq!(t.session().status(), SessionStatus::Running);
    }

    #[test]
    fn test_drop_releases_timers() {
        use std::cell::RefCell;
        use std::rc::Rc;

        // scheduler shared with the test so it can be inspected after drop
        struct Shared(Rc<RefCell<TimerQueue>>);

        impl Scheduler for Shared {
            fn now(&self) -> Duration {
                self.0.borrow().now()
            }
            fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
                self.0.borrow_mut().schedule_once(delay, kind)
            }
            fn schedule_repeating(&mut self, period: Duration, kind: TimerKind) -> TimerId {
                self.0.borrow_mut().schedule_repeating(period, kind)
            }
            fn cancel(&mut self, id: TimerId) {
                self.0.borrow_mut().cancel(id)
            }
            fn next_due(&self) -> Option<Duration> {
                self.0.borrow().next_due()
            }
            fn poll(&mut self, until: Duration) -> Option<Firing> {
                self.0.borrow_mut().poll(until)
            }
        }

        let queue = Rc::new(RefCell::new(TimerQueue::new()));
        {
            let mut t = BreathTimer::new(
                BreathSession::default(),
                Shared(Rc::clone(&queue)),
                NoHaptics,
            );
            t.start(5);
            assert_eq!(queue.borrow().armed(), 2);
        }
        assert_eq!(queue.borrow().armed(), 0);
    }
}
