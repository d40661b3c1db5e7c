//! Guided first session
//!
//! The tutorial walks through seven steps. Early steps advance on request;
//! the delivery steps wait for the matching game events before they allow
//! moving on.

use log::{info, warn};

use super::events::{LogisticsEvent, Outbox, TutorialEvent};
use super::game_state::SharedState;
use super::order::Order;
use super::scheduler::{SharedScheduler, TimerId, TimerKind, TimerScope};
use super::settings::{SharedSettings, TUTORIAL_COMPLETED_KEY};
use super::types::{Location, OrderId, OrderPriority, Product};

/// Delay between seeing the updated performance and the final step
pub const PERFORMANCE_REVIEW_DELAY: f64 = 2.0;

/// How long the final step stays up before the tutorial closes
pub const COMPLETION_DELAY: f64 = 3.0;

/// Where the order seeded for the tutorial is delivered
const SEED_ORDER_DESTINATION: Location = Location { x: 0.8, y: 0.3 };

/// How long the seeded order has before it falls due
const SEED_ORDER_WINDOW: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TutorialStep {
    Welcome,
    UnderstandDashboard,
    ViewFirstOrder,
    AssignVehicle,
    WatchDelivery,
    CheckPerformance,
    Completed,
}

/// Part of the interface a step points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialHighlight {
    Dashboard,
    Map,
    OrdersPanel,
    FleetPanel,
    Controls,
}

impl TutorialStep {
    pub const ALL: [TutorialStep; 7] = [
        TutorialStep::Welcome,
        TutorialStep::UnderstandDashboard,
        TutorialStep::ViewFirstOrder,
        TutorialStep::AssignVehicle,
        TutorialStep::WatchDelivery,
        TutorialStep::CheckPerformance,
        TutorialStep::Completed,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<TutorialStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            TutorialStep::Welcome => "Welcome to Supply Chain Manager!",
            TutorialStep::UnderstandDashboard => "Understanding Your Dashboard",
            TutorialStep::ViewFirstOrder => "Your First Order",
            TutorialStep::AssignVehicle => "Assign a Vehicle",
            TutorialStep::WatchDelivery => "Watch the Delivery",
            TutorialStep::CheckPerformance => "Check Your Performance",
            TutorialStep::Completed => "Tutorial Complete!",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TutorialStep::Welcome => {
                "Let's learn the basics of managing your logistics network."
            }
            TutorialStep::UnderstandDashboard => {
                "The dashboard shows your budget, score, and key metrics. Don't let the budget run out!"
            }
            TutorialStep::ViewFirstOrder => {
                "Your first customer order is waiting in the orders panel."
            }
            TutorialStep::AssignVehicle => {
                "Select the order, then an available vehicle to carry it. The route is planned for you."
            }
            TutorialStep::WatchDelivery => {
                "Watch the vehicle collect the goods from the warehouse and deliver them to the customer."
            }
            TutorialStep::CheckPerformance => {
                "Check your updated score and performance metrics. Faster deliveries mean better performance!"
            }
            TutorialStep::Completed => {
                "You can now manage multiple vehicles, handle complex orders and grow your logistics network."
            }
        }
    }

    pub fn highlight(&self) -> Option<TutorialHighlight> {
        match self {
            TutorialStep::Welcome | TutorialStep::Completed => None,
            TutorialStep::UnderstandDashboard | TutorialStep::CheckPerformance => {
                Some(TutorialHighlight::Dashboard)
            }
            TutorialStep::ViewFirstOrder | TutorialStep::AssignVehicle => {
                Some(TutorialHighlight::OrdersPanel)
            }
            TutorialStep::WatchDelivery => Some(TutorialHighlight::Map),
        }
    }

    /// Steps that move on with a plain tap instead of waiting for the game
    pub fn can_auto_advance(&self) -> bool {
        matches!(
            self,
            TutorialStep::Welcome
                | TutorialStep::UnderstandDashboard
                | TutorialStep::ViewFirstOrder
                | TutorialStep::Completed
        )
    }
}

pub struct TutorialSystem {
    state: SharedState,
    scheduler: SharedScheduler,
    settings: SharedSettings,

    active: bool,
    step: TutorialStep,
    show_overlay: bool,

    has_assigned_vehicle: bool,
    has_completed_delivery: bool,
    has_checked_performance: bool,
    /// Order placed for the player to assign by hand
    reserved_order: Option<OrderId>,

    review_timer: Option<TimerId>,
    finish_timer: Option<TimerId>,
}

impl TutorialSystem {
    pub fn new(state: SharedState, scheduler: SharedScheduler, settings: SharedSettings) -> Self {
        Self {
            state,
            scheduler,
            settings,
            active: false,
            step: TutorialStep::Welcome,
            show_overlay: false,
            has_assigned_vehicle: false,
            has_completed_delivery: false,
            has_checked_performance: false,
            reserved_order: None,
            review_timer: None,
            finish_timer: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_step(&self) -> TutorialStep {
        self.step
    }

    pub fn show_overlay(&self) -> bool {
        self.show_overlay
    }

    /// The tutorial's own order while it waits for the player
    pub fn seed_order_id(&self) -> Option<OrderId> {
        self.reserved_order.filter(|_| self.active)
    }

    /// Whether `order` is left for the player to assign by hand
    pub fn reserves_order(&self, order: OrderId) -> bool {
        self.seed_order_id() == Some(order)
    }

    pub fn has_completed_tutorial(&self) -> bool {
        self.settings.borrow().get_bool(TUTORIAL_COMPLETED_KEY)
    }

    pub fn handle(&mut self, event: &LogisticsEvent) -> Outbox {
        match event {
            LogisticsEvent::GameStarted if !self.active && !self.has_completed_tutorial() => {
                self.start()
            }
            LogisticsEvent::VehicleDispatched { .. }
                if self.active && self.step == TutorialStep::AssignVehicle =>
            {
                self.has_assigned_vehicle = true;
                self.advance_to(TutorialStep::WatchDelivery)
            }
            LogisticsEvent::OrderFulfilled(_)
                if self.active && self.step == TutorialStep::WatchDelivery =>
            {
                self.has_completed_delivery = true;
                self.advance_to(TutorialStep::CheckPerformance)
            }
            LogisticsEvent::PerformanceUpdated(_)
                if self.active
                    && self.step == TutorialStep::CheckPerformance
                    && self.has_completed_delivery
                    && !self.timer_pending(self.review_timer) =>
            {
                self.has_checked_performance = true;
                self.review_timer = Some(self.scheduler.borrow_mut().schedule_once(
                    PERFORMANCE_REVIEW_DELAY,
                    TimerKind::TutorialAdvance,
                    TimerScope::Simulation,
                ));
                Outbox::new()
            }
            _ => Outbox::new(),
        }
    }

    /// Player commands from the tutorial topic
    pub fn handle_command(&mut self, event: &TutorialEvent) -> Outbox {
        match event {
            TutorialEvent::AdvanceRequested => self.next_step(),
            TutorialEvent::SkipRequested => self.skip(),
            TutorialEvent::ResetRequested => self.reset(),
            _ => Outbox::new(),
        }
    }

    pub fn start(&mut self) -> Outbox {
        self.cancel_timers();
        self.active = true;
        self.step = TutorialStep::Welcome;
        self.show_overlay = true;
        self.has_assigned_vehicle = false;
        self.has_completed_delivery = false;
        self.has_checked_performance = false;
        self.reserved_order = None;
        info!("Tutorial started");
        Outbox::from_event(TutorialEvent::Started)
    }

    /// Whether the current step's gate has been satisfied
    pub fn can_advance(&self) -> bool {
        match self.step {
            TutorialStep::AssignVehicle => self.has_assigned_vehicle,
            TutorialStep::WatchDelivery => self.has_completed_delivery,
            TutorialStep::CheckPerformance => self.has_checked_performance,
            _ => true,
        }
    }

    pub fn next_step(&mut self) -> Outbox {
        if !self.active || !self.can_advance() {
            return Outbox::new();
        }
        match self.step.next() {
            Some(step) => self.advance_to(step),
            None => self.complete(),
        }
    }

    fn advance_to(&mut self, step: TutorialStep) -> Outbox {
        self.step = step;
        info!("Tutorial step: {}", step.title());
        let mut outbox = Outbox::from_event(TutorialEvent::StepChanged(step));

        match step {
            TutorialStep::ViewFirstOrder => {
                let order = self.seed_order();
                self.reserved_order = Some(order.id);
                outbox.push(LogisticsEvent::OrderPlaced(order));
            }
            TutorialStep::Completed => self.schedule_finish(),
            _ => {}
        }

        outbox
    }

    /// A single unit of electronics for the player to assign by hand
    fn seed_order(&self) -> Order {
        let now = self.scheduler.borrow().now();
        let id = self.state.borrow_mut().allocate_order_id();
        Order::new(
            id,
            Product::Electronics,
            1,
            SEED_ORDER_DESTINATION,
            OrderPriority::Standard,
            now,
            now + SEED_ORDER_WINDOW,
        )
    }

    fn schedule_finish(&mut self) {
        self.finish_timer = Some(self.scheduler.borrow_mut().schedule_once(
            COMPLETION_DELAY,
            TimerKind::TutorialFinish,
            TimerScope::Simulation,
        ));
    }

    fn timer_pending(&self, timer: Option<TimerId>) -> bool {
        timer.is_some_and(|timer| self.scheduler.borrow().is_active(timer))
    }

    /// Re-arm delays lost to a pause
    pub fn resume(&mut self) {
        if self.active && self.step == TutorialStep::Completed && !self.timer_pending(self.finish_timer) {
            self.schedule_finish();
        }
    }

    pub fn on_review_timer(&mut self) -> Outbox {
        self.review_timer = None;
        if !self.active || self.step != TutorialStep::CheckPerformance {
            return Outbox::new();
        }
        self.advance_to(TutorialStep::Completed)
    }

    pub fn on_finish_timer(&mut self) -> Outbox {
        self.finish_timer = None;
        if !self.active {
            return Outbox::new();
        }
        self.complete()
    }

    pub fn skip(&mut self) -> Outbox {
        if !self.active {
            return Outbox::new();
        }
        self.complete()
    }

    fn complete(&mut self) -> Outbox {
        self.cancel_timers();
        self.active = false;
        self.show_overlay = false;
        if let Err(err) = self.settings.borrow_mut().set_bool(TUTORIAL_COMPLETED_KEY, true) {
            warn!("Failed to save tutorial completion: {:#}", err);
        }
        info!("Tutorial completed");
        Outbox::from_event(TutorialEvent::Completed)
    }

    /// Forget completion so the tutorial runs again on the next start
    ///
    /// A tutorial in progress is closed, which hands the game back to
    /// normal play.
    pub fn reset(&mut self) -> Outbox {
        let was_active = self.active;
        self.cancel_timers();
        if let Err(err) = self.settings.borrow_mut().set_bool(TUTORIAL_COMPLETED_KEY, false) {
            warn!("Failed to reset tutorial completion: {:#}", err);
        }
        self.active = false;
        self.show_overlay = false;
        self.step = TutorialStep::Welcome;

        if was_active {
            Outbox::from_event(TutorialEvent::Completed)
        } else {
            Outbox::new()
        }
    }

    fn cancel_timers(&mut self) {
        let mut scheduler = self.scheduler.borrow_mut();
        for timer in [self.review_timer.take(), self.finish_timer.take()]
            .into_iter()
            .flatten()
        {
            scheduler.cancel(timer);
        }
    }
}
