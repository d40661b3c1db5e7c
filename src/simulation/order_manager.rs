//! Order generation and order queries
//!
//! Random orders arrive on a one-shot timer whose delay is drawn afresh
//! after every firing, so inter-arrival times are independent uniform draws
//! rather than a fixed rate. The order collections themselves live in
//! [`GameState`](super::GameState); this manager reads them through the
//! shared handle.

use log::debug;
use rand::Rng;
use std::cmp::Ordering;
use std::rc::Rc;

use super::config::{GameConfig, SharedRng};
use super::events::{LogisticsEvent, Outbox};
use super::game_state::SharedState;
use super::order::Order;
use super::scheduler::{SharedScheduler, TimerId, TimerKind, TimerScope};
use super::types::{Location, OrderPriority, Product};

pub struct OrderManager {
    state: SharedState,
    scheduler: SharedScheduler,
    rng: SharedRng,
    config: Rc<GameConfig>,
    generation_timer: Option<TimerId>,
}

impl OrderManager {
    pub fn new(
        state: SharedState,
        scheduler: SharedScheduler,
        rng: SharedRng,
        config: Rc<GameConfig>,
    ) -> Self {
        Self {
            state,
            scheduler,
            rng,
            config,
            generation_timer: None,
        }
    }

    /// (Re)arm the generation timer with a freshly drawn interval
    pub fn start_generation(&mut self) {
        self.stop_generation();
        let interval = self
            .rng
            .borrow_mut()
            .random_range(self.config.order_interval.clone());
        let timer = self.scheduler.borrow_mut().schedule_once(
            interval,
            TimerKind::OrderGeneration,
            TimerScope::Simulation,
        );
        debug!("Next order in {:.1}s", interval);
        self.generation_timer = Some(timer);
    }

    pub fn stop_generation(&mut self) {
        if let Some(timer) = self.generation_timer.take() {
            self.scheduler.borrow_mut().cancel(timer);
        }
    }

    pub fn is_generating(&self) -> bool {
        self.generation_timer
            .is_some_and(|timer| self.scheduler.borrow().is_active(timer))
    }

    /// The generation timer fired: place an order and draw the next delay
    pub fn on_generation_timer(&mut self) -> Outbox {
        self.generation_timer = None;
        let outbox = self.generate_order();
        self.start_generation();
        outbox
    }

    /// Produce a random order and queue its "order placed" event
    pub fn generate_order(&mut self) -> Outbox {
        let now = self.scheduler.borrow().now();
        let id = self.state.borrow_mut().allocate_order_id();
        let order = Order::random(id, now, &mut *self.rng.borrow_mut(), &self.config);
        debug!(
            "Generated order {:?}: {} x{} ({:?}) due at {:.0}s",
            order.id,
            order.product.name(),
            order.quantity,
            order.priority,
            order.deadline
        );
        Outbox::from_event(LogisticsEvent::OrderPlaced(order))
    }

    /// Build an order with the given contents, due after a random window
    pub fn create_order(
        &self,
        product: Product,
        quantity: u32,
        destination: Location,
        priority: OrderPriority,
    ) -> Order {
        let now = self.scheduler.borrow().now();
        let id = self.state.borrow_mut().allocate_order_id();
        let window = self
            .rng
            .borrow_mut()
            .random_range(self.config.deadline_window.clone());
        Order::new(id, product, quantity, destination, priority, now, now + window)
    }

    pub fn active_orders(&self) -> Vec<Order> {
        self.state.borrow().orders.clone()
    }

    pub fn completed_orders(&self) -> Vec<Order> {
        self.state.borrow().completed_orders.clone()
    }

    /// Active orders past their deadline. Pure query; reporting is the
    /// caller's job.
    pub fn overdue_orders(&self, now: f64) -> Vec<Order> {
        self.state
            .borrow()
            .orders
            .iter()
            .filter(|order| order.is_overdue(now))
            .cloned()
            .collect()
    }

    pub fn high_priority_orders(&self) -> Vec<Order> {
        self.state
            .borrow()
            .orders
            .iter()
            .filter(|order| order.priority != OrderPriority::Standard)
            .cloned()
            .collect()
    }

    /// Active orders by descending priority, earliest deadline first within
    /// a priority
    pub fn orders_by_priority(&self) -> Vec<Order> {
        let mut orders = self.active_orders();
        orders.sort_by(|a, b| {
            b.priority
                .multiplier()
                .total_cmp(&a.priority.multiplier())
                .then_with(|| a.deadline.partial_cmp(&b.deadline).unwrap_or(Ordering::Equal))
        });
        orders
    }

    pub fn total_active_value(&self) -> f64 {
        self.state.borrow().orders.iter().map(Order::value).sum()
    }
}
