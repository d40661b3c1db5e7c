//! Discrete-event timer scheduler
//!
//! Every periodic or delayed activity in the game (the 1 s game loop, order
//! generation, vehicle position updates, weather, popup dismissal) is a
//! timer on a virtual clock. The engine pops due timers one at a time and
//! runs each callback to completion before the next one fires.

use ordered_float::OrderedFloat;
use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::rc::Rc;

use super::achievements::AchievementType;
use super::types::{FeedbackId, VehicleId};

/// Shared handle to the session scheduler
pub type SharedScheduler = Rc<RefCell<Scheduler>>;

/// Shortest allowed repeat period, keeps a zero period from spinning forever
const MIN_PERIOD: f64 = 1e-3;

/// Identifies a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Which activity a timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    GameTick,
    OrderGeneration,
    VehicleUpdate(VehicleId),
    WeatherChange,
    WeatherCountdown,
    TutorialAdvance,
    TutorialFinish,
    DismissAchievement(AchievementType),
    DismissLevelUp(u32),
    DismissDeliveryFeedback(FeedbackId),
    DismissScoreFeedback(FeedbackId),
}

/// Group of timers invalidated together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerScope {
    /// Game loop and entity timers; cancelled whenever the game pauses or ends
    Simulation,
    /// Popup dismissal; survives pauses
    Interface,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    kind: TimerKind,
    scope: TimerScope,
    period: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    at: OrderedFloat<f64>,
    seq: u64,
    id: TimerId,
}

/// Timer queue on a virtual clock measured in seconds
///
/// Timers due at the same instant fire in the order they were scheduled.
/// Cancelled timers stay in the heap and are skipped when popped.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: f64,
    queue: BinaryHeap<Reverse<Entry>>,
    live: HashMap<TimerId, Timer>,
    next_id: u64,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    pub fn schedule_once(&mut self, delay: f64, kind: TimerKind, scope: TimerScope) -> TimerId {
        self.insert(delay, kind, scope, None)
    }

    /// Fire every `period` seconds until cancelled
    pub fn schedule_repeating(&mut self, period: f64, kind: TimerKind, scope: TimerScope) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.insert(period, kind, scope, Some(period))
    }

    fn insert(
        &mut self,
        delay: f64,
        kind: TimerKind,
        scope: TimerScope,
        period: Option<f64>,
    ) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, Timer { kind, scope, period });
        self.push_entry(id, self.now + delay.max(0.0));
        id
    }

    fn push_entry(&mut self, id: TimerId, at: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry {
            at: OrderedFloat(at),
            seq,
            id,
        }));
    }

    /// Returns true if the timer was still active
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }

    /// Cancel every timer in `scope`, returning how many were active
    pub fn cancel_scope(&mut self, scope: TimerScope) -> usize {
        let before = self.live.len();
        self.live.retain(|_, timer| timer.scope != scope);
        before - self.live.len()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.live.len()
    }

    /// Time of the next live timer, if any
    pub fn next_due(&mut self) -> Option<f64> {
        self.discard_cancelled();
        self.queue.peek().map(|Reverse(entry)| entry.at.into_inner())
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse(entry)) = self.queue.peek() {
            if self.live.contains_key(&entry.id) {
                break;
            }
            self.queue.pop();
        }
    }

    /// Pop the next timer due at or before `until`
    ///
    /// The clock moves to the timer's fire time. Repeating timers are
    /// re-armed before being returned, so a callback may cancel its own timer.
    pub fn pop_due(&mut self, until: f64) -> Option<(TimerId, TimerKind)> {
        self.discard_cancelled();

        let Reverse(entry) = *self.queue.peek()?;
        if entry.at.into_inner() > until {
            return None;
        }
        self.queue.pop();

        let timer = *self.live.get(&entry.id)?;
        self.set_now(entry.at.into_inner());

        match timer.period {
            Some(period) => self.push_entry(entry.id, entry.at.into_inner() + period),
            None => {
                self.live.remove(&entry.id);
            }
        }

        Some((entry.id, timer.kind))
    }
}
