//! Game state tracking for the logistics management game
//!
//! `GameState` is the authoritative store for budget, score, orders,
//! vehicles and warehouses. It changes in response to events through
//! [`GameState::apply`]; the warehouse, vehicle and engine components hold
//! the same shared handle and mutate only the parts they own.

use std::cell::RefCell;
use std::rc::Rc;

use super::events::{LevelEvent, LogisticsEvent, Outbox, TutorialEvent};
use super::metrics::PerformanceMetrics;
use super::order::Order;
use super::types::{Location, OrderId, VehicleId, VehicleType, WarehouseId};
use super::vehicle::Vehicle;
use super::warehouse::Warehouse;

/// Shared handle to the game state
pub type SharedState = Rc<RefCell<GameState>>;

/// Capacity of the starting warehouse
pub const MAIN_WAREHOUSE_CAPACITY: u32 = 1000;

/// Delivered order value per point of score
pub const VALUE_PER_SCORE_POINT: f64 = 10.0;

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    Tutorial,
    Playing,
    Paused,
    GameOver,
}

/// Game state that tracks player progress and resources
#[derive(Debug, Clone)]
pub struct GameState {
    pub status: GameStatus,

    /// Player's current money
    pub budget: f64,

    pub score: i64,

    pub level: u32,

    /// Game time in seconds, advanced by the game loop
    pub game_time: f64,

    pub warehouses: Vec<Warehouse>,
    pub vehicles: Vec<Vehicle>,

    /// Orders waiting for a vehicle
    pub orders: Vec<Order>,

    /// Orders loaded on a vehicle and not yet delivered
    pub assigned_orders: Vec<Order>,

    pub completed_orders: Vec<Order>,

    pub performance: PerformanceMetrics,

    /// Status to return to when a pause ends
    resume_status: GameStatus,

    next_order_id: u64,
    next_vehicle_id: u32,
    next_warehouse_id: u32,
}

impl GameState {
    /// An empty world with the given budget
    pub fn with_budget(budget: f64) -> Self {
        Self {
            status: GameStatus::Menu,
            budget,
            score: 0,
            level: 1,
            game_time: 0.0,
            warehouses: Vec::new(),
            vehicles: Vec::new(),
            orders: Vec::new(),
            assigned_orders: Vec::new(),
            completed_orders: Vec::new(),
            performance: PerformanceMetrics::default(),
            resume_status: GameStatus::Playing,
            next_order_id: 0,
            next_vehicle_id: 0,
            next_warehouse_id: 0,
        }
    }

    /// The starting world: one main warehouse with a truck parked at it
    pub fn new(budget: f64) -> Self {
        let mut state = Self::with_budget(budget);
        let location = Location::new(0.5, 0.5);
        state.add_warehouse("Main Warehouse", location, MAIN_WAREHOUSE_CAPACITY);
        state.add_vehicle(VehicleType::Truck, location);
        state
    }

    pub fn into_shared(self) -> SharedState {
        Rc::new(RefCell::new(self))
    }

    pub fn allocate_order_id(&mut self) -> OrderId {
        let id = OrderId(self.next_order_id);
        self.next_order_id += 1;
        id
    }

    pub fn add_warehouse(
        &mut self,
        name: impl Into<String>,
        location: Location,
        capacity: u32,
    ) -> WarehouseId {
        let id = WarehouseId(self.next_warehouse_id);
        self.next_warehouse_id += 1;
        self.warehouses
            .push(Warehouse::new(id, name, location, capacity));
        id
    }

    pub fn add_vehicle(&mut self, kind: VehicleType, location: Location) -> VehicleId {
        let id = VehicleId(self.next_vehicle_id);
        self.next_vehicle_id += 1;
        self.vehicles.push(Vehicle::new(id, kind, location));
        id
    }

    pub fn warehouse(&self, id: WarehouseId) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.id == id)
    }

    pub fn warehouse_mut(&mut self, id: WarehouseId) -> Option<&mut Warehouse> {
        self.warehouses.iter_mut().find(|w| w.id == id)
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn vehicle_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id == id)
    }

    pub fn active_order(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn is_known_order(&self, id: OrderId) -> bool {
        self.orders.iter().any(|o| o.id == id)
            || self.assigned_orders.iter().any(|o| o.id == id)
            || self.completed_orders.iter().any(|o| o.id == id)
    }

    /// Active, in-transit and completed orders together
    pub fn total_known_orders(&self) -> usize {
        self.orders.len() + self.assigned_orders.len() + self.completed_orders.len()
    }

    /// Whether the game loop should be running
    pub fn is_running(&self) -> bool {
        matches!(self.status, GameStatus::Playing | GameStatus::Tutorial)
    }

    /// Check if player can afford a purchase
    pub fn can_afford(&self, cost: f64) -> bool {
        self.budget >= cost
    }

    /// Deduct a cost regardless of whether the budget covers it
    pub fn charge(&mut self, cost: f64) {
        self.budget -= cost;
    }

    /// Add money from revenue
    pub fn earn(&mut self, amount: f64) {
        self.budget += amount;
    }

    /// Move an order from the pool to the in-transit list.
    /// Returns false if it was not waiting in the pool
    pub fn assign_order(&mut self, id: OrderId) -> bool {
        match self.orders.iter().position(|o| o.id == id) {
            Some(index) => {
                let order = self.orders.remove(index);
                self.assigned_orders.push(order);
                true
            }
            None => false,
        }
    }

    /// Put an in-transit order back in the pool.
    /// Returns false if it was not in transit
    pub fn unassign_order(&mut self, id: OrderId) -> bool {
        match self.assigned_orders.iter().position(|o| o.id == id) {
            Some(index) => {
                let order = self.assigned_orders.remove(index);
                self.orders.push(order);
                true
            }
            None => false,
        }
    }

    /// Move an order to the completed list.
    /// Returns the order, or `None` if it was already completed or unknown
    pub fn complete_order(&mut self, id: OrderId) -> Option<Order> {
        let order = if let Some(index) = self.assigned_orders.iter().position(|o| o.id == id) {
            self.assigned_orders.remove(index)
        } else if let Some(index) = self.orders.iter().position(|o| o.id == id) {
            self.orders.remove(index)
        } else {
            return None;
        };
        self.completed_orders.push(order.clone());
        Some(order)
    }

    /// Apply a logistics event to the store
    pub fn apply(&mut self, event: &LogisticsEvent) -> Outbox {
        let mut outbox = Outbox::new();

        match event {
            LogisticsEvent::GameStarted => {
                self.status = GameStatus::Playing;
            }
            LogisticsEvent::GamePaused => {
                if self.is_running() {
                    self.resume_status = self.status;
                    self.status = GameStatus::Paused;
                }
            }
            LogisticsEvent::GameResumed => {
                if self.status == GameStatus::Paused {
                    self.status = self.resume_status;
                }
            }
            LogisticsEvent::GameEnded => {
                self.status = GameStatus::GameOver;
            }
            LogisticsEvent::OrderPlaced(order) => {
                if !self.is_known_order(order.id) {
                    self.orders.push(order.clone());
                }
            }
            LogisticsEvent::VehicleDispatched { route, .. } => {
                for order in &route.orders {
                    self.assign_order(order.id);
                }
            }
            LogisticsEvent::OrderFulfilled(order) => {
                if let Some(order) = self.complete_order(order.id) {
                    let value = order.value();
                    let increase = (value / VALUE_PER_SCORE_POINT) as i64;
                    self.earn(value);
                    self.score += increase;
                    outbox.push(LogisticsEvent::ScoreIncreased {
                        increase,
                        total: self.score,
                    });
                }
            }
            LogisticsEvent::OrderDelayed(order) => {
                if let Some(active) = self.orders.iter_mut().find(|o| o.id == order.id) {
                    active.delayed = true;
                }
            }
            LogisticsEvent::BudgetChanged(budget) => {
                self.budget = *budget;
            }
            LogisticsEvent::PerformanceUpdated(metrics) => {
                self.performance = metrics.clone();
            }
            _ => {}
        }

        outbox
    }

    pub fn apply_tutorial(&mut self, event: &TutorialEvent) {
        match event {
            TutorialEvent::Started => match self.status {
                GameStatus::Playing | GameStatus::Menu => self.status = GameStatus::Tutorial,
                GameStatus::Paused => self.resume_status = GameStatus::Tutorial,
                _ => {}
            },
            TutorialEvent::Completed => match self.status {
                GameStatus::Tutorial => self.status = GameStatus::Playing,
                GameStatus::Paused => self.resume_status = GameStatus::Playing,
                _ => {}
            },
            _ => {}
        }
    }

    pub fn apply_level(&mut self, event: &LevelEvent) {
        match event {
            LevelEvent::LevelUp(level) => self.level = *level,
            LevelEvent::ResetRequested => self.level = 1,
            LevelEvent::ExperienceGained(_) => {}
        }
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Budget: ${:.2} | Score: {} | Level: {} | Orders: {} waiting, {} in transit, {} delivered | Time: {:.0}s",
            self.budget,
            self.score,
            self.level,
            self.orders.len(),
            self.assigned_orders.len(),
            self.completed_orders.len(),
            self.game_time
        )
    }
}
