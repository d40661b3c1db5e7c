//! Event topics exchanged over the bus
//!
//! Each topic is its own sum type. A subscriber to one topic never sees
//! events of another. Some variants are user commands (`*Requested`,
//! `GameStarted`, ...) published by the interface layer; the rest are
//! notifications published by the managers.

use super::achievements::AchievementType;
use super::metrics::PerformanceMetrics;
use super::order::Order;
use super::route::Route;
use super::tutorial::TutorialStep;
use super::types::{Location, OrderId, Product, VehicleId, WarehouseId};
use super::weather::WeatherCondition;

/// Core logistics topic
#[derive(Debug, Clone, PartialEq)]
pub enum LogisticsEvent {
    GameStarted,
    GamePaused,
    GameResumed,
    GameEnded,

    OrderPlaced(Order),
    /// The player asked for a specific vehicle to serve a specific order
    AssignRequested {
        order: OrderId,
        vehicle: VehicleId,
    },
    OrderFulfilled(Order),
    OrderDelayed(Order),

    VehicleDispatched {
        vehicle: VehicleId,
        route: Route,
    },
    VehicleArrived {
        vehicle: VehicleId,
        at: Location,
    },

    InventoryLow {
        product: Product,
        warehouse: WarehouseId,
    },
    InventoryReplenished {
        product: Product,
        warehouse: WarehouseId,
        quantity: u32,
    },

    BudgetChanged(f64),
    PerformanceUpdated(PerformanceMetrics),
    DeliverySuccessful {
        order: Order,
        at: Location,
    },
    ScoreIncreased {
        increase: i64,
        total: i64,
    },
}

/// Tutorial progression topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialEvent {
    Started,
    StepChanged(TutorialStep),
    Completed,
    AdvanceRequested,
    SkipRequested,
    ResetRequested,
}

/// Player level topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    ExperienceGained(u32),
    LevelUp(u32),
    ResetRequested,
}

/// Weather topic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeatherEvent {
    Changed {
        from: WeatherCondition,
        to: WeatherCondition,
        intensity: f64,
    },
}

/// Achievement topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementEvent {
    Unlocked(AchievementType),
}

/// An event of any topic, used to queue publications in an [`Outbox`]
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Logistics(LogisticsEvent),
    Tutorial(TutorialEvent),
    Level(LevelEvent),
    Weather(WeatherEvent),
    Achievement(AchievementEvent),
}

impl From<LogisticsEvent> for Envelope {
    fn from(event: LogisticsEvent) -> Self {
        Envelope::Logistics(event)
    }
}

impl From<TutorialEvent> for Envelope {
    fn from(event: TutorialEvent) -> Self {
        Envelope::Tutorial(event)
    }
}

impl From<LevelEvent> for Envelope {
    fn from(event: LevelEvent) -> Self {
        Envelope::Level(event)
    }
}

impl From<WeatherEvent> for Envelope {
    fn from(event: WeatherEvent) -> Self {
        Envelope::Weather(event)
    }
}

impl From<AchievementEvent> for Envelope {
    fn from(event: AchievementEvent) -> Self {
        Envelope::Achievement(event)
    }
}

/// Events a manager wants published once it has released its own state
///
/// Managers never publish while mutably borrowed; they collect here and the
/// subscription closure flushes the outbox onto the bus afterwards, which
/// lets the bus deliver nested events back to the same manager.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outbox {
    events: Vec<Envelope>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_event(event: impl Into<Envelope>) -> Self {
        Self {
            events: vec![event.into()],
        }
    }

    pub fn push(&mut self, event: impl Into<Envelope>) {
        self.events.push(event.into());
    }

    pub fn extend(&mut self, other: Outbox) {
        self.events.extend(other.events);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Envelope> {
        self.events.iter()
    }
}

impl IntoIterator for Outbox {
    type Item = Envelope;
    type IntoIter = std::vec::IntoIter<Envelope>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}
