//! Player levels and experience
//!
//! Experience is earned from deliveries, score and sustained on-time
//! performance. Level and experience are written to the settings store
//! after every change, so progress carries over between sessions.

use anyhow::Result;
use log::{info, warn};
use std::collections::HashSet;

use super::config::POPUP_DISMISS_DELAY;
use super::events::{LevelEvent, LogisticsEvent, Outbox};
use super::scheduler::{SharedScheduler, TimerKind, TimerScope};
use super::settings::{SettingsStore, SharedSettings, PLAYER_EXPERIENCE_KEY, PLAYER_LEVEL_KEY};
use super::types::VehicleType;

/// On-time rate at which each performance update grants bonus experience
pub const ON_TIME_BONUS_THRESHOLD: f64 = 0.95;
pub const ON_TIME_BONUS_EXPERIENCE: u32 = 5;

/// Something a level makes available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelUnlock {
    Vehicle(VehicleType),
    BasicFeatures,
    MultiStopRoutes,
    AdvancedAnalytics,
    WarehouseUpgrades,
    ContractSystem,
    EmergencyOrders,
    WeatherPrediction,
    AutomatedDispatching,
    CrossDocking,
    AiOptimization,
    DynamicPricing,
    MultiRegionalOperations,
    AdvancedContracts,
    QuantumOptimization,
    PredictiveAnalytics,
    AllFeatures,
    MasterMode,
}

impl LevelUnlock {
    pub fn display_name(&self) -> String {
        match self {
            LevelUnlock::Vehicle(kind) => format!("{} Vehicles", kind.display_name()),
            LevelUnlock::BasicFeatures => "Basic Features".to_string(),
            LevelUnlock::MultiStopRoutes => "Multi-Stop Routes".to_string(),
            LevelUnlock::AdvancedAnalytics => "Advanced Analytics".to_string(),
            LevelUnlock::WarehouseUpgrades => "Warehouse Upgrades".to_string(),
            LevelUnlock::ContractSystem => "Contract System".to_string(),
            LevelUnlock::EmergencyOrders => "Emergency Orders".to_string(),
            LevelUnlock::WeatherPrediction => "Weather Prediction".to_string(),
            LevelUnlock::AutomatedDispatching => "Auto-Dispatching".to_string(),
            LevelUnlock::CrossDocking => "Cross-Docking".to_string(),
            LevelUnlock::AiOptimization => "AI Route Optimization".to_string(),
            LevelUnlock::DynamicPricing => "Dynamic Pricing".to_string(),
            LevelUnlock::MultiRegionalOperations => "Multi-Regional Ops".to_string(),
            LevelUnlock::AdvancedContracts => "Advanced Contracts".to_string(),
            LevelUnlock::QuantumOptimization => "Quantum Optimization".to_string(),
            LevelUnlock::PredictiveAnalytics => "Predictive Analytics".to_string(),
            LevelUnlock::AllFeatures => "All Features".to_string(),
            LevelUnlock::MasterMode => "Master Mode".to_string(),
        }
    }
}

/// One row of the level table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelRequirements {
    pub level: u32,
    pub experience_required: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocks: &'static [LevelUnlock],
}

pub static LEVELS: [LevelRequirements; 10] = [
    LevelRequirements {
        level: 1,
        experience_required: 0,
        title: "Logistics Apprentice",
        description: "Starting your logistics journey",
        unlocks: &[LevelUnlock::Vehicle(VehicleType::Van), LevelUnlock::BasicFeatures],
    },
    LevelRequirements {
        level: 2,
        experience_required: 500,
        title: "Route Manager",
        description: "Learning efficient delivery routes",
        unlocks: &[LevelUnlock::Vehicle(VehicleType::Truck), LevelUnlock::MultiStopRoutes],
    },
    LevelRequirements {
        level: 3,
        experience_required: 1200,
        title: "Fleet Coordinator",
        description: "Managing multiple vehicles",
        unlocks: &[LevelUnlock::Vehicle(VehicleType::Drone), LevelUnlock::AdvancedAnalytics],
    },
    LevelRequirements {
        level: 4,
        experience_required: 2000,
        title: "Operations Specialist",
        description: "Optimizing warehouse operations",
        unlocks: &[LevelUnlock::WarehouseUpgrades, LevelUnlock::ContractSystem],
    },
    LevelRequirements {
        level: 5,
        experience_required: 3000,
        title: "Supply Chain Expert",
        description: "Mastering complex logistics networks",
        unlocks: &[LevelUnlock::EmergencyOrders, LevelUnlock::WeatherPrediction],
    },
    LevelRequirements {
        level: 6,
        experience_required: 4500,
        title: "Logistics Director",
        description: "Leading large-scale operations",
        unlocks: &[LevelUnlock::AutomatedDispatching, LevelUnlock::CrossDocking],
    },
    LevelRequirements {
        level: 7,
        experience_required: 6500,
        title: "Industry Pioneer",
        description: "Innovation in logistics technology",
        unlocks: &[LevelUnlock::AiOptimization, LevelUnlock::DynamicPricing],
    },
    LevelRequirements {
        level: 8,
        experience_required: 9000,
        title: "Global Operations Chief",
        description: "Managing worldwide supply chains",
        unlocks: &[LevelUnlock::MultiRegionalOperations, LevelUnlock::AdvancedContracts],
    },
    LevelRequirements {
        level: 9,
        experience_required: 12500,
        title: "Logistics Visionary",
        description: "Shaping the future of logistics",
        unlocks: &[LevelUnlock::QuantumOptimization, LevelUnlock::PredictiveAnalytics],
    },
    LevelRequirements {
        level: 10,
        experience_required: 17000,
        title: "Supply Chain Master",
        description: "Ultimate logistics mastery achieved",
        unlocks: &[LevelUnlock::AllFeatures, LevelUnlock::MasterMode],
    },
];

/// Table row for `level`, clamped into the table
pub fn requirements_for(level: u32) -> &'static LevelRequirements {
    let index = (level.max(1) as usize - 1).min(LEVELS.len() - 1);
    &LEVELS[index]
}

/// A player's standing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerLevel {
    pub level: u32,
    pub experience: u32,
}

impl Default for PlayerLevel {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
        }
    }
}

impl PlayerLevel {
    pub fn requirements(&self) -> &'static LevelRequirements {
        requirements_for(self.level)
    }

    fn next_requirements(&self) -> Option<&'static LevelRequirements> {
        LEVELS.iter().find(|req| req.level == self.level + 1)
    }

    /// Everything unlocked at this level or below
    pub fn unlocked_features(&self) -> HashSet<LevelUnlock> {
        LEVELS
            .iter()
            .filter(|req| req.level <= self.level)
            .flat_map(|req| req.unlocks.iter().copied())
            .collect()
    }

    /// Fraction of the way from this level's threshold to the next, in [0, 1]
    pub fn progress_to_next(&self) -> f64 {
        let Some(next) = self.next_requirements() else {
            return 1.0;
        };
        let current = self.requirements().experience_required as f64;
        let span = next.experience_required as f64 - current;
        if span <= 0.0 {
            return 1.0;
        }
        ((self.experience as f64 - current) / span).clamp(0.0, 1.0)
    }

    pub fn experience_to_next(&self) -> u32 {
        self.next_requirements()
            .map(|next| next.experience_required.saturating_sub(self.experience))
            .unwrap_or(0)
    }

    pub fn is_max_level(&self) -> bool {
        self.level as usize >= LEVELS.len()
    }
}

pub struct LevelSystem {
    scheduler: SharedScheduler,
    settings: SharedSettings,
    current: PlayerLevel,
    notification: Option<&'static LevelRequirements>,
}

impl LevelSystem {
    /// Restore the saved level and experience
    pub fn new(scheduler: SharedScheduler, settings: SharedSettings) -> Self {
        let current = {
            let store = settings.borrow();
            let level = store.get(PLAYER_LEVEL_KEY).unwrap_or(1);
            let experience = store.get(PLAYER_EXPERIENCE_KEY).unwrap_or(0);
            PlayerLevel {
                level: u32::try_from(level).unwrap_or(1).clamp(1, LEVELS.len() as u32),
                experience: u32::try_from(experience).unwrap_or(0),
            }
        };

        Self {
            scheduler,
            settings,
            current,
            notification: None,
        }
    }

    pub fn current(&self) -> PlayerLevel {
        self.current
    }

    /// Level-up banner currently showing, if any
    pub fn notification(&self) -> Option<&'static LevelRequirements> {
        self.notification
    }

    pub fn is_feature_unlocked(&self, unlock: LevelUnlock) -> bool {
        self.current.unlocked_features().contains(&unlock)
    }

    pub fn handle(&mut self, event: &LogisticsEvent) -> Outbox {
        match event {
            LogisticsEvent::OrderFulfilled(order) => self.add_experience((order.value() / 10.0) as u32),
            LogisticsEvent::ScoreIncreased { increase, .. } => {
                self.add_experience(u32::try_from(increase / 10).unwrap_or(0))
            }
            LogisticsEvent::PerformanceUpdated(metrics)
                if metrics.on_time_rate >= ON_TIME_BONUS_THRESHOLD =>
            {
                self.add_experience(ON_TIME_BONUS_EXPERIENCE)
            }
            _ => Outbox::new(),
        }
    }

    pub fn handle_command(&mut self, event: &LevelEvent) {
        if let LevelEvent::ResetRequested = event {
            self.reset_progress();
        }
    }

    /// Add experience, levelling up as many times as the new total allows
    pub fn add_experience(&mut self, amount: u32) -> Outbox {
        let mut outbox = Outbox::new();
        if amount == 0 {
            return outbox;
        }

        self.current.experience = self.current.experience.saturating_add(amount);
        outbox.push(LevelEvent::ExperienceGained(amount));

        while let Some(next) = self.current.next_requirements() {
            if self.current.experience < next.experience_required {
                break;
            }
            self.current.level = next.level;
            self.notification = Some(next);
            self.scheduler.borrow_mut().schedule_once(
                POPUP_DISMISS_DELAY,
                TimerKind::DismissLevelUp(next.level),
                TimerScope::Interface,
            );
            info!("Level up! Now level {} ({})", next.level, next.title);
            outbox.push(LevelEvent::LevelUp(next.level));
        }

        self.save();
        outbox
    }

    /// Hide the banner if it is still showing `level`
    pub fn dismiss_notification(&mut self, level: u32) {
        if self.notification.is_some_and(|shown| shown.level == level) {
            self.notification = None;
        }
    }

    pub fn reset_progress(&mut self) {
        self.current = PlayerLevel::default();
        self.notification = None;
        self.save();
        info!("Player progress reset");
    }

    fn save(&self) {
        if let Err(err) = write_progress(&mut *self.settings.borrow_mut(), self.current) {
            warn!("Failed to save player progress: {:#}", err);
        }
    }
}

fn write_progress(store: &mut dyn SettingsStore, progress: PlayerLevel) -> Result<()> {
    store.set(PLAYER_LEVEL_KEY, i64::from(progress.level))?;
    store.set(PLAYER_EXPERIENCE_KEY, i64::from(progress.experience))?;
    Ok(())
}
