//! Standalone supply chain simulation module
//!
//! This module contains the whole logistics game: the world model, the
//! event bus and scheduler that drive it, and the managers that react to
//! events. It runs on a virtual clock with no interface attached, so it can
//! be exercised from tests or the console.

mod achievements;
mod bus;
mod config;
mod engine;
mod events;
mod feedback;
mod game_state;
mod levels;
mod metrics;
mod order;
mod order_manager;
mod route;
mod scheduler;
mod settings;
mod tutorial;
mod types;
mod vehicle;
mod vehicle_manager;
mod warehouse;
mod warehouse_manager;
mod weather;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use achievements::{
    Achievement, AchievementManager, AchievementType, CONSISTENT_ORDERS, EFFICIENCY_WINDOW,
    FLEET_COMMANDER_SIZE, HIGH_VALUE_ORDER, PROFITABLE_BUDGET, SPEED_DEMON_DELIVERIES,
    SPEED_WINDOW,
};
#[allow(unused_imports)]
pub use bus::{BusEvent, EventBus, Subscription, Topic};
#[allow(unused_imports)]
pub use config::{
    GameConfig, SharedRng, DELIVERY_FEEDBACK_DELAY, DISPATCH_COST_PER_DISTANCE_UNIT,
    LOW_STOCK_THRESHOLD, MIN_REORDER_QUANTITY, OVERDUE_PENALTY_RATE, POPUP_DISMISS_DELAY,
    SCORE_FEEDBACK_DELAY, SECONDS_PER_DISTANCE_UNIT, SECONDS_PER_HOUR, STARTING_BUDGET,
    TICK_PERIOD, VEHICLE_UPDATE_PERIOD,
};
pub use engine::GameEngine;
#[allow(unused_imports)]
pub use events::{
    AchievementEvent, Envelope, LevelEvent, LogisticsEvent, Outbox, TutorialEvent, WeatherEvent,
};
#[allow(unused_imports)]
pub use feedback::{DeliveryFeedback, FeedbackManager, ScoreFeedback};
#[allow(unused_imports)]
pub use game_state::{
    GameState, GameStatus, SharedState, MAIN_WAREHOUSE_CAPACITY, VALUE_PER_SCORE_POINT,
};
#[allow(unused_imports)]
pub use levels::{
    requirements_for, LevelRequirements, LevelSystem, LevelUnlock, PlayerLevel, LEVELS,
    ON_TIME_BONUS_EXPERIENCE, ON_TIME_BONUS_THRESHOLD,
};
#[allow(unused_imports)]
pub use metrics::PerformanceMetrics;
#[allow(unused_imports)]
pub use order::Order;
#[allow(unused_imports)]
pub use order_manager::OrderManager;
#[allow(unused_imports)]
pub use route::Route;
#[allow(unused_imports)]
pub use scheduler::{Scheduler, SharedScheduler, TimerId, TimerKind, TimerScope};
#[allow(unused_imports)]
pub use settings::{
    FileSettings, MemorySettings, SettingsStore, SharedSettings, PLAYER_EXPERIENCE_KEY,
    PLAYER_LEVEL_KEY, TUTORIAL_COMPLETED_KEY,
};
#[allow(unused_imports)]
pub use tutorial::{TutorialHighlight, TutorialStep, TutorialSystem, COMPLETION_DELAY, PERFORMANCE_REVIEW_DELAY};
#[allow(unused_imports)]
pub use types::{FeedbackId, Location, OrderId, OrderPriority, Product, VehicleId, VehicleType, WarehouseId};
#[allow(unused_imports)]
pub use vehicle::{Vehicle, VehicleStatus};
#[allow(unused_imports)]
pub use vehicle_manager::{Trip, VehicleManager};
#[allow(unused_imports)]
pub use warehouse::{Warehouse, WAREHOUSE_OPERATING_COST};
#[allow(unused_imports)]
pub use warehouse_manager::WarehouseManager;
#[allow(unused_imports)]
pub use weather::{WeatherCondition, WeatherManager};
