//! One-off achievements unlocked by play milestones

use log::info;
use std::collections::{HashSet, VecDeque};

use super::config::POPUP_DISMISS_DELAY;
use super::events::{AchievementEvent, LogisticsEvent, Outbox};
use super::game_state::SharedState;
use super::order::Order;
use super::scheduler::{SharedScheduler, TimerKind, TimerScope};
use super::vehicle::Vehicle;

/// Window for counting rapid deliveries and measuring score growth
pub const SPEED_WINDOW: f64 = 300.0;
pub const SPEED_DEMON_DELIVERIES: usize = 10;
/// How long the whole fleet must stay on the road
pub const EFFICIENCY_WINDOW: f64 = 600.0;
pub const HIGH_VALUE_ORDER: f64 = 10_000.0;
pub const FLEET_COMMANDER_SIZE: usize = 5;
pub const PROFITABLE_BUDGET: f64 = 100_000.0;
pub const CONSISTENT_ORDERS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementType {
    FirstDelivery,
    SpeedDemon,
    EfficiencyExpert,
    HighValueHandler,
    FleetCommander,
    MultiTasker,
    CapacityMaster,
    Profitable,
    RapidGrowth,
    ConsistentPerformer,
}

impl AchievementType {
    pub const ALL: [AchievementType; 10] = [
        AchievementType::FirstDelivery,
        AchievementType::SpeedDemon,
        AchievementType::EfficiencyExpert,
        AchievementType::HighValueHandler,
        AchievementType::FleetCommander,
        AchievementType::MultiTasker,
        AchievementType::CapacityMaster,
        AchievementType::Profitable,
        AchievementType::RapidGrowth,
        AchievementType::ConsistentPerformer,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AchievementType::FirstDelivery => "First Delivery",
            AchievementType::SpeedDemon => "Speed Demon",
            AchievementType::EfficiencyExpert => "Efficiency Expert",
            AchievementType::HighValueHandler => "High Value Handler",
            AchievementType::FleetCommander => "Fleet Commander",
            AchievementType::MultiTasker => "Multi-tasker",
            AchievementType::CapacityMaster => "Capacity Master",
            AchievementType::Profitable => "Profitable",
            AchievementType::RapidGrowth => "Rapid Growth",
            AchievementType::ConsistentPerformer => "Consistent Performer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AchievementType::FirstDelivery => "Complete your first order",
            AchievementType::SpeedDemon => "Complete 10 deliveries in 5 minutes",
            AchievementType::EfficiencyExpert => "100% vehicle utilization for 10 minutes",
            AchievementType::HighValueHandler => "Complete $10,000+ order",
            AchievementType::FleetCommander => "Own 5 vehicles simultaneously",
            AchievementType::MultiTasker => "Have all vehicles active at once",
            AchievementType::CapacityMaster => "Fill a vehicle to 100% capacity",
            AchievementType::Profitable => "Reach $100,000 budget",
            AchievementType::RapidGrowth => "Double your score in 5 minutes",
            AchievementType::ConsistentPerformer => "Complete 50 orders without failure",
        }
    }
}

/// An unlocked achievement and when it happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Achievement {
    pub kind: AchievementType,
    pub unlocked_at: f64,
}

/// Tracks progress counters and unlocks achievements
pub struct AchievementManager {
    state: SharedState,
    scheduler: SharedScheduler,

    unlocked: HashSet<AchievementType>,
    popup: Option<Achievement>,

    delivery_count: u32,
    recent_deliveries: VecDeque<f64>,
    completed_orders: u32,
    game_started_at: Option<f64>,
    initial_score: i64,
    /// When every vehicle was last seen on the road together
    fleet_busy_since: Option<f64>,
}

impl AchievementManager {
    pub fn new(state: SharedState, scheduler: SharedScheduler) -> Self {
        Self {
            state,
            scheduler,
            unlocked: HashSet::new(),
            popup: None,
            delivery_count: 0,
            recent_deliveries: VecDeque::new(),
            completed_orders: 0,
            game_started_at: None,
            initial_score: 0,
            fleet_busy_since: None,
        }
    }

    pub fn is_unlocked(&self, kind: AchievementType) -> bool {
        self.unlocked.contains(&kind)
    }

    pub fn unlocked(&self) -> &HashSet<AchievementType> {
        &self.unlocked
    }

    pub fn popup(&self) -> Option<Achievement> {
        self.popup
    }

    pub fn handle(&mut self, event: &LogisticsEvent) -> Outbox {
        let mut outbox = Outbox::new();
        let now = self.scheduler.borrow().now();

        match event {
            LogisticsEvent::GameStarted => {
                self.game_started_at = Some(now);
                self.initial_score = self.state.borrow().score;
            }
            LogisticsEvent::DeliverySuccessful { order, .. } => {
                self.record_delivery(order, now, &mut outbox);
            }
            LogisticsEvent::OrderFulfilled(_) => {
                self.completed_orders += 1;
                if self.completed_orders >= CONSISTENT_ORDERS {
                    self.unlock(AchievementType::ConsistentPerformer, now, &mut outbox);
                }
            }
            LogisticsEvent::VehicleDispatched { .. } => {
                self.check_fleet(now, &mut outbox);
            }
            LogisticsEvent::BudgetChanged(budget) => {
                if *budget >= PROFITABLE_BUDGET {
                    self.unlock(AchievementType::Profitable, now, &mut outbox);
                }
                self.check_fleet(now, &mut outbox);
            }
            LogisticsEvent::ScoreIncreased { total, .. } => {
                self.check_rapid_growth(*total, now, &mut outbox);
            }
            _ => {}
        }

        outbox
    }

    fn record_delivery(&mut self, order: &Order, now: f64, outbox: &mut Outbox) {
        self.delivery_count += 1;
        self.recent_deliveries.push_back(now);
        while self
            .recent_deliveries
            .front()
            .is_some_and(|at| *at < now - SPEED_WINDOW)
        {
            self.recent_deliveries.pop_front();
        }

        if self.delivery_count == 1 {
            self.unlock(AchievementType::FirstDelivery, now, outbox);
        }
        if self.recent_deliveries.len() >= SPEED_DEMON_DELIVERIES {
            self.unlock(AchievementType::SpeedDemon, now, outbox);
        }
        if order.value() >= HIGH_VALUE_ORDER {
            self.unlock(AchievementType::HighValueHandler, now, outbox);
        }

        let full_vehicle = self
            .state
            .borrow()
            .vehicles
            .iter()
            .any(|v| v.capacity > 0.0 && v.current_load >= v.capacity);
        if full_vehicle {
            self.unlock(AchievementType::CapacityMaster, now, outbox);
        }
    }

    fn check_fleet(&mut self, now: f64, outbox: &mut Outbox) {
        let (size, all_en_route) = {
            let state = self.state.borrow();
            let all = !state.vehicles.is_empty() && state.vehicles.iter().all(Vehicle::is_en_route);
            (state.vehicles.len(), all)
        };

        if size >= FLEET_COMMANDER_SIZE {
            self.unlock(AchievementType::FleetCommander, now, outbox);
        }
        if size > 1 && all_en_route {
            self.unlock(AchievementType::MultiTasker, now, outbox);
        }

        if all_en_route {
            let since = *self.fleet_busy_since.get_or_insert(now);
            if now - since >= EFFICIENCY_WINDOW {
                self.unlock(AchievementType::EfficiencyExpert, now, outbox);
            }
        } else {
            self.fleet_busy_since = None;
        }
    }

    fn check_rapid_growth(&mut self, total: i64, now: f64, outbox: &mut Outbox) {
        let Some(started) = self.game_started_at else {
            return;
        };
        if now - started < SPEED_WINDOW || self.initial_score <= 0 {
            return;
        }
        if total - self.initial_score >= self.initial_score {
            self.unlock(AchievementType::RapidGrowth, now, outbox);
        }
    }

    fn unlock(&mut self, kind: AchievementType, now: f64, outbox: &mut Outbox) {
        if !self.unlocked.insert(kind) {
            return;
        }
        info!("Achievement unlocked: {}", kind.title());
        self.popup = Some(Achievement {
            kind,
            unlocked_at: now,
        });
        self.scheduler.borrow_mut().schedule_once(
            POPUP_DISMISS_DELAY,
            TimerKind::DismissAchievement(kind),
            TimerScope::Interface,
        );
        outbox.push(AchievementEvent::Unlocked(kind));
    }

    /// Hide the popup if it still shows `kind`
    pub fn dismiss_popup(&mut self, kind: AchievementType) {
        if self.popup.is_some_and(|shown| shown.kind == kind) {
            self.popup = None;
        }
    }
}
