//! Scheduled callbacks on the monotonic game clock
//!
//! Deferred gameplay effects (landing grace, damage flicker, enemy flash,
//! restart) are queued here instead of blocking the frame. Each entry carries
//! the epoch it was scheduled in; bumping the epoch on restart drops every
//! cancellable entry at once, so nothing fires against a torn-down episode.

/// A deferred gameplay effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Bunny-hop grace window after touching down has elapsed
    LandingGrace,
    /// One step of the post-damage flicker (1-based)
    FlickerStep { generation: u32, step: u8 },
    /// Enemy stomp flash should revert to the normal color
    EnemyFlashEnd { enemy_id: u32 },
    /// Death delay has elapsed, start a fresh episode
    Restart,
}

#[derive(Debug, Clone)]
struct Pending {
    due_ms: f64,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    /// `None` for entries that survive invalidation
    epoch: Option<u32>,
    event: TimerEvent,
}

/// Timer queue keyed by game time in milliseconds
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: f64,
    epoch: u32,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current game time
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Current epoch (bumped by `invalidate`)
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Number of entries still waiting
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Schedule a cancellable event `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: f64, event: TimerEvent) {
        self.push(delay_ms, Some(self.epoch), event);
    }

    /// Schedule an event that `invalidate` does not drop
    pub fn schedule_uncancellable(&mut self, delay_ms: f64, event: TimerEvent) {
        self.push(delay_ms, None, event);
    }

    fn push(&mut self, delay_ms: f64, epoch: Option<u32>, event: TimerEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due_ms: self.now_ms + delay_ms.max(0.0),
            seq,
            epoch,
            event,
        });
    }

    /// Move the clock forward (negative deltas are ignored)
    pub fn advance(&mut self, dt_ms: f64) {
        if dt_ms > 0.0 {
            self.now_ms += dt_ms;
        }
    }

    /// Pop the earliest due event, if any
    ///
    /// Call in a loop after `advance`; an event handler may `invalidate` and
    /// later entries from the old epoch will then never surface.
    pub fn pop_due(&mut self) -> Option<TimerEvent> {
        let now = self.now_ms;
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= now)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        let entry = self.pending.swap_remove(idx);
        log::trace!("timer fired at {:.1}ms: {:?}", now, entry.event);
        Some(entry.event)
    }

    /// Drop every cancellable entry and start a new epoch
    pub fn invalidate(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        let before = self.pending.len();
        self.pending.retain(|p| p.epoch.is_none());
        log::debug!(
            "scheduler epoch {} dropped {} pending timers",
            self.epoch,
            before - self.pending.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut timers = Scheduler::new();
        timers.schedule(300.0, TimerEvent::LandingGrace);
        timers.schedule(100.0, TimerEvent::EnemyFlashEnd { enemy_id: 7 });

        timers.advance(99.0);
        assert_eq!(timers.pop_due(), None);

        timers.advance(250.0);
        assert_eq!(timers.pop_due(), Some(TimerEvent::EnemyFlashEnd { enemy_id: 7 }));
        assert_eq!(timers.pop_due(), None);

        timers.advance(1.0);
        assert_eq!(timers.pop_due(), Some(TimerEvent::LandingGrace));
        assert_eq!(timers.pending_len(), 0);
    }

    #[test]
    fn test_equal_due_times_keep_insertion_order() {
        let mut timers = Scheduler::new();
        for step in 1..=3 {
            timers.schedule(100.0, TimerEvent::FlickerStep { generation: 1, step });
        }
        timers.advance(100.0);
        for step in 1..=3 {
            assert_eq!(
                timers.pop_due(),
                Some(TimerEvent::FlickerStep { generation: 1, step })
            );
        }
    }

    #[test]
    fn test_invalidate_keeps_uncancellable() {
        let mut timers = Scheduler::new();
        timers.schedule(50.0, TimerEvent::LandingGrace);
        timers.schedule_uncancellable(1000.0, TimerEvent::Restart);

        timers.invalidate();
        assert_eq!(timers.epoch(), 1);
        assert_eq!(timers.pending_len(), 1);

        timers.advance(1000.0);
        assert_eq!(timers.pop_due(), Some(TimerEvent::Restart));
        assert_eq!(timers.pop_due(), None);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut timers = Scheduler::new();
        timers.advance(10.0);
        timers.advance(-5.0);
        assert!((timers.now_ms() - 10.0).abs() < 1e-9);
    }
}
