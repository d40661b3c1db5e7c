//! Tunable parameters for a game session
//!
//! Defaults reproduce the classic balance. The headless runner overrides a
//! handful of them from the command line.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::ops::RangeInclusive;
use std::rc::Rc;

/// Random source shared by every manager of a session
pub type SharedRng = Rc<RefCell<StdRng>>;

/// Starting budget for the player
pub const STARTING_BUDGET: f64 = 50_000.0;

/// Seconds between game loop ticks
pub const TICK_PERIOD: f64 = 1.0;

/// Seconds between vehicle position updates while en route
pub const VEHICLE_UPDATE_PERIOD: f64 = 0.5;

/// Fraction of an order's value charged every tick it is overdue
pub const OVERDUE_PENALTY_RATE: f64 = 0.1;

/// Remaining stock below which a warehouse reorders
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Smallest replenishment batch
pub const MIN_REORDER_QUANTITY: u32 = 50;

/// Travel seconds per unit of map distance
pub const SECONDS_PER_DISTANCE_UNIT: f64 = 60.0;

/// Budget charged per unit of map distance when a vehicle is dispatched
pub const DISPATCH_COST_PER_DISTANCE_UNIT: f64 = 0.1;

/// Hourly operating costs are charged per second of game time
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Popup lifetimes
pub const DELIVERY_FEEDBACK_DELAY: f64 = 2.0;
pub const SCORE_FEEDBACK_DELAY: f64 = 3.0;
pub const POPUP_DISMISS_DELAY: f64 = 4.0;

/// Configuration for a game session
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub starting_budget: f64,
    pub tick_period: f64,
    /// Bounds for the re-randomized delay between generated orders
    pub order_interval: RangeInclusive<f64>,
    /// Bounds for how long after placement an order falls due
    pub deadline_window: RangeInclusive<f64>,
    pub max_order_quantity: u32,
    pub overdue_penalty_rate: f64,
    pub low_stock_threshold: u32,
    pub min_reorder_quantity: u32,
    pub initial_stock: RangeInclusive<u32>,
    pub vehicle_update_period: f64,
    pub seconds_per_distance_unit: f64,
    pub dispatch_cost_per_distance_unit: f64,
    pub weather_change_interval: RangeInclusive<f64>,
    /// Divide route durations by the current weather's speed multiplier
    pub weather_affects_travel: bool,
    /// Scale customer satisfaction by the current weather on each delivery
    pub weather_affects_satisfaction: bool,
    /// Seed for reproducible sessions; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_budget: STARTING_BUDGET,
            tick_period: TICK_PERIOD,
            order_interval: 5.0..=15.0,
            deadline_window: 300.0..=3600.0,
            max_order_quantity: 10,
            overdue_penalty_rate: OVERDUE_PENALTY_RATE,
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            min_reorder_quantity: MIN_REORDER_QUANTITY,
            initial_stock: 20..=50,
            vehicle_update_period: VEHICLE_UPDATE_PERIOD,
            seconds_per_distance_unit: SECONDS_PER_DISTANCE_UNIT,
            dispatch_cost_per_distance_unit: DISPATCH_COST_PER_DISTANCE_UNIT,
            weather_change_interval: 120.0..=300.0,
            weather_affects_travel: false,
            weather_affects_satisfaction: false,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Seeded RNG when a seed is configured, otherwise seeded from the OS
    pub fn make_rng(&self) -> SharedRng {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Rc::new(RefCell::new(rng))
    }
}
