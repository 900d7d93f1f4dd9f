//! Deterministic timer scheduling on a simulated millisecond clock.
//!
//! Timers fire in `(deadline, arm order)` order. Periodic timers re-arm at
//! `deadline + period` after firing, so a handler always runs at the exact
//! instant it was due even when the clock is advanced in large steps.
//! Cancelling a stale or already-cancelled handle is a no-op.

use slotmap::{SlotMap, new_key_type};

use crate::types::HouseId;

new_key_type! {
    pub struct TimerKey;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    MonsterStep,
    HouseStay,
    HouseCooldown(HouseId),
    LevelAdvance,
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    kind: TimerKind,
    deadline: u64,
    period: Option<u64>,
    order: u64,
}

#[derive(Default)]
pub struct Scheduler {
    now_ms: u64,
    timers: SlotMap<TimerKey, Timer>,
    next_order: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn arm_periodic(&mut self, kind: TimerKind, period_ms: u64) -> TimerKey {
        debug_assert!(period_ms > 0);
        self.arm(kind, period_ms, Some(period_ms))
    }

    pub fn arm_once(&mut self, kind: TimerKind, delay_ms: u64) -> TimerKey {
        self.arm(kind, delay_ms, None)
    }

    /// Cancels the timer behind `key`, if it is still armed.
    pub fn cancel(&mut self, key: TimerKey) {
        self.timers.remove(key);
    }

    pub fn is_armed(&self, key: TimerKey) -> bool {
        self.timers.contains_key(key)
    }

    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    /// Pops the earliest timer due at or before `until_ms`, moving the clock to its deadline.
    /// Periodic timers stay armed under the same key with their next deadline.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerKey, TimerKind)> {
        let (key, timer) = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= until_ms)
            .min_by_key(|(_, timer)| (timer.deadline, timer.order))
            .map(|(key, timer)| (key, *timer))?;

        self.now_ms = self.now_ms.max(timer.deadline);
        match timer.period {
            Some(period) => {
                let order = self.take_order();
                if let Some(armed) = self.timers.get_mut(key) {
                    armed.deadline = timer.deadline + period;
                    armed.order = order;
                }
            }
            None => {
                self.timers.remove(key);
            }
        }
        Some((key, timer.kind))
    }

    /// Moves the clock forward once every due timer has been popped.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    fn arm(&mut self, kind: TimerKind, delay_ms: u64, period: Option<u64>) -> TimerKey {
        let order = self.take_order();
        self.timers.insert(Timer { kind, deadline: self.now_ms + delay_ms, period, order })
    }

    fn take_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }
}
