//! Timer scheduling for the breathing session.
//!
//! The session needs two independently cancellable timers: a repeating
//! one-second countdown and a one-shot phase timer re-armed after every
//! phase. [`Scheduler`] is the seam where an environment provides them;
//! [`TimerQueue`] is a deterministic virtual-clock implementation that can
//! be driven by simulated time or mapped onto a wall clock.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle to a scheduled timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer drives
///
/// Declaration order is firing order for timers due at the same instant:
/// the phase that ends exactly as the session runs out still counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    PhaseAdvance,
    Countdown,
}

/// A timer that has come due
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Firing {
    pub id: TimerId,
    pub kind: TimerKind,
    pub due: Duration,
}

/// Source of scheduled timer firings
pub trait Scheduler {
    /// Current time on this scheduler's clock
    fn now(&self) -> Duration;

    /// Fire once after `delay`
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId;

    /// Fire every `period`, first after one period
    fn schedule_repeating(&mut self, period: Duration, kind: TimerKind) -> TimerId;

    /// Cancel a timer; unknown or already-fired handles are ignored
    fn cancel(&mut self, id: TimerId);

    /// Instant of the earliest pending firing
    fn next_due(&self) -> Option<Duration>;

    /// Pop the earliest firing due at or before `until`
    ///
    /// The clock moves to the firing's due instant. Once nothing else is due
    /// the clock moves to `until` and `None` is returned.
    fn poll(&mut self, until: Duration) -> Option<Firing>;
}

type QueueKey = (Duration, TimerKind, u64);

#[derive(Clone, Copy, Debug)]
struct Pending {
    kind: TimerKind,
    period: Option<Duration>,
    key: QueueKey,
}

/// Virtual-clock timer queue
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<QueueKey, TimerId>,
    pending: HashMap<TimerId, Pending>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of armed timers
    pub fn armed(&self) -> usize {
        self.pending.len()
    }

    fn insert(&mut self, due: Duration, kind: TimerKind, period: Option<Duration>) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = TimerId(seq);
        let key = (due, kind, seq);
        self.queue.insert(key, id);
        self.pending.insert(id, Pending { kind, period, key });
        id
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        self.insert(self.now + delay, kind, None)
    }

    fn schedule_repeating(&mut self, period: Duration, kind: TimerKind) -> TimerId {
        self.insert(self.now + period, kind, Some(period))
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(pending) = self.pending.remove(&id) {
            self.queue.remove(&pending.key);
        }
    }

    fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _, _)| *due)
    }

    fn poll(&mut self, until: Duration) -> Option<Firing> {
        let due = match self.next_due() {
            Some(due) if due <= until => due,
            _ => {
                self.now = self.now.max(until);
                return None;
            }
        };

        let (key, id) = self.queue.pop_first()?;
        self.now = self.now.max(due);

        let kind = key.1;
        match self.pending.get(&id).and_then(|p| p.period) {
            Some(period) if !period.is_zero() => {
                // re-arm in place so the handle stays valid
                let seq = self.next_seq;
                self.next_seq += 1;
                let next_key = (due + period, kind, seq);
                self.queue.insert(next_key, id);
                if let Some(pending) = self.pending.get_mut(&id) {
                    pending.key = next_key;
                }
            }
            _ => {
                self.pending.remove(&id);
            }
        }

        Some(Firing { id, kind, due })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_once_fires_a_single_time() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_once(secs(4), TimerKind::PhaseAdvance);

        assert!(queue.poll(secs(3)).is_none());
        assert_eq!(queue.now(), secs(3));

        let firing = queue.poll(secs(10)).unwrap();
        assert_eq!(firing.id, id);
        assert_eq!(firing.due, secs(4));
        assert_eq!(queue.now(), secs(4));
        assert!(queue.poll(secs(10)).is_none());
        assert_eq!(queue.armed(), 0);
    }

    #[test]
    fn test_repeating_keeps_its_handle() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_repeating(secs(1), TimerKind::Countdown);

        let mut fired = Vec::new();
        while let Some(f) = queue.poll(secs(3)) {
            assert_eq!(f.id, id);
            fired.push(f.due);
        }
        assert_eq!(fired, vec![secs(1), secs(2), secs(3)]);
        assert_eq!(queue.armed(), 1);
    }

    #[test]
    fn test_cancel_removes_pending_firings() {
        let mut queue = TimerQueue::new();
        let a = queue.schedule_repeating(secs(1), TimerKind::Countdown);
        let b = queue.schedule_once(secs(2), TimerKind::PhaseAdvance);
        queue.cancel(a);
        queue.cancel(b);
        queue.cancel(b);

        assert!(queue.poll(secs(100)).is_none());
        assert_eq!(queue.armed(), 0);
        assert_eq!(queue.next_due(), None);
    }

    #[test]
    fn test_phase_fires_before_countdown_at_same_instant() {
        let mut queue = TimerQueue::new();
        queue.schedule_repeating(secs(2), TimerKind::Countdown);
        queue.schedule_once(secs(2), TimerKind::PhaseAdvance);

        assert_eq!(queue.poll(secs(2)).unwrap().kind, TimerKind::PhaseAdvance);
        assert_eq!(queue.poll(secs(2)).unwrap().kind, TimerKind::Countdown);
    }

    #[test]
    fn test_schedule_is_relative_to_last_firing() {
        let mut queue = TimerQueue::new();
        queue.schedule_once(secs(4), TimerKind::PhaseAdvance);
        queue.poll(secs(10)).unwrap();

        // re-armed from inside the firing, at t=4 rather than t=10
        queue.schedule_once(secs(2), TimerKind::PhaseAdvance);
        assert_eq!(queue.next_due(), Some(secs(6)));
    }
}
