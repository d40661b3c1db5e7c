//! Weather conditions and their periodic changes

use log::info;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::rc::Rc;

use super::config::{GameConfig, SharedRng};
use super::events::{Outbox, WeatherEvent};
use super::scheduler::{SharedScheduler, TimerId, TimerKind, TimerScope};

/// Seconds between countdown updates
const COUNTDOWN_PERIOD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeatherCondition {
    #[default]
    Clear,
    Rain,
    Snow,
    Fog,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Clear,
        WeatherCondition::Rain,
        WeatherCondition::Snow,
        WeatherCondition::Fog,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Fog => "Fog",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Perfect delivery conditions",
            WeatherCondition::Rain => "Slower speeds, reduced satisfaction",
            WeatherCondition::Snow => "Significantly reduced performance",
            WeatherCondition::Fog => "Limited visibility affects deliveries",
        }
    }

    pub fn speed_multiplier(&self) -> f64 {
        match self {
            WeatherCondition::Clear => 1.0,
            WeatherCondition::Rain => 0.8,
            WeatherCondition::Snow => 0.7,
            WeatherCondition::Fog => 0.9,
        }
    }

    pub fn satisfaction_multiplier(&self) -> f64 {
        match self {
            WeatherCondition::Clear => 1.1,
            WeatherCondition::Rain => 0.95,
            WeatherCondition::Snow => 0.85,
            WeatherCondition::Fog => 0.9,
        }
    }

    /// Chance of this condition being drawn at a change
    pub fn probability(&self) -> f64 {
        match self {
            WeatherCondition::Clear => 0.4,
            _ => 0.2,
        }
    }
}

/// Drives random weather changes on a timer
pub struct WeatherManager {
    scheduler: SharedScheduler,
    rng: SharedRng,
    config: Rc<GameConfig>,
    current: WeatherCondition,
    intensity: f64,
    time_until_change: f64,
    change_timer: Option<TimerId>,
    countdown_timer: Option<TimerId>,
}

impl WeatherManager {
    pub fn new(scheduler: SharedScheduler, rng: SharedRng, config: Rc<GameConfig>) -> Self {
        Self {
            scheduler,
            rng,
            config,
            current: WeatherCondition::Clear,
            intensity: 0.0,
            time_until_change: 0.0,
            change_timer: None,
            countdown_timer: None,
        }
    }

    pub fn current(&self) -> WeatherCondition {
        self.current
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Whole seconds left before the next change, as shown on the countdown
    pub fn time_until_change(&self) -> f64 {
        self.time_until_change
    }

    pub fn is_running(&self) -> bool {
        self.change_timer
            .is_some_and(|timer| self.scheduler.borrow().is_active(timer))
    }

    /// Schedule the next change with a fresh interval
    pub fn start(&mut self) {
        self.stop();
        let interval = self
            .rng
            .borrow_mut()
            .random_range(self.config.weather_change_interval.clone());
        self.time_until_change = interval;

        let mut scheduler = self.scheduler.borrow_mut();
        self.change_timer = Some(scheduler.schedule_once(
            interval,
            TimerKind::WeatherChange,
            TimerScope::Simulation,
        ));
        self.countdown_timer = Some(scheduler.schedule_repeating(
            COUNTDOWN_PERIOD,
            TimerKind::WeatherCountdown,
            TimerScope::Simulation,
        ));
    }

    pub fn stop(&mut self) {
        let mut scheduler = self.scheduler.borrow_mut();
        for timer in [self.change_timer.take(), self.countdown_timer.take()]
            .into_iter()
            .flatten()
        {
            scheduler.cancel(timer);
        }
    }

    pub fn on_countdown(&mut self) {
        if self.time_until_change > 0.0 {
            self.time_until_change = (self.time_until_change - COUNTDOWN_PERIOD).max(0.0);
        } else if let Some(timer) = self.countdown_timer.take() {
            self.scheduler.borrow_mut().cancel(timer);
        }
    }

    /// The change timer fired: draw a new condition and schedule the next one
    pub fn on_change_timer(&mut self) -> Outbox {
        self.change_timer = None;
        let next = self.draw_condition();
        let outbox = self.change_to(next);
        self.start();
        outbox
    }

    /// Weighted draw that never repeats the current condition
    fn draw_condition(&self) -> WeatherCondition {
        let mut rng = self.rng.borrow_mut();
        let roll: f64 = rng.random_range(0.0..=1.0);

        let mut cumulative = 0.0;
        for condition in WeatherCondition::ALL {
            cumulative += condition.probability();
            if roll <= cumulative && condition != self.current {
                return condition;
            }
        }

        let others: Vec<WeatherCondition> = WeatherCondition::ALL
            .into_iter()
            .filter(|c| *c != self.current)
            .collect();
        others.choose(&mut *rng).copied().unwrap_or_default()
    }

    /// Switch to `condition` and queue the change notification
    pub fn change_to(&mut self, condition: WeatherCondition) -> Outbox {
        let from = self.current;
        self.current = condition;
        self.intensity = match condition {
            WeatherCondition::Clear => 0.0,
            _ => self.rng.borrow_mut().random_range(0.3..=0.8),
        };
        info!(
            "Weather changed from {} to {} (intensity {:.2})",
            from.title(),
            condition.title(),
            self.intensity
        );
        Outbox::from_event(WeatherEvent::Changed {
            from,
            to: condition,
            intensity: self.intensity,
        })
    }
}
