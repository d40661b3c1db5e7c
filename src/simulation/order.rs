//! Customer orders

use rand::seq::IndexedRandom;
use rand::Rng;

use super::config::GameConfig;
use super::types::{Location, OrderId, OrderPriority, Product};

/// A customer order
///
/// Times are simulation seconds since the session clock started.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub product: Product,
    pub quantity: u32,
    pub destination: Location,
    pub priority: OrderPriority,
    pub placed_at: f64,
    pub deadline: f64,
    /// Set once the order has been reported late. Not terminal.
    pub delayed: bool,
}

impl Order {
    pub fn new(
        id: OrderId,
        product: Product,
        quantity: u32,
        destination: Location,
        priority: OrderPriority,
        placed_at: f64,
        deadline: f64,
    ) -> Self {
        Self {
            id,
            product,
            quantity,
            destination,
            priority,
            placed_at,
            deadline,
            delayed: false,
        }
    }

    /// Draw an order uniformly from the product, priority, quantity and
    /// destination domains
    pub fn random<R: Rng + ?Sized>(id: OrderId, now: f64, rng: &mut R, config: &GameConfig) -> Self {
        let product = *Product::ALL.choose(rng).unwrap_or(&Product::Electronics);
        let priority = *OrderPriority::ALL
            .choose(rng)
            .unwrap_or(&OrderPriority::Standard);
        let quantity = rng.random_range(1..=config.max_order_quantity.max(1));
        let destination = Location::random(rng);
        let deadline = now + rng.random_range(config.deadline_window.clone());

        Self::new(id, product, quantity, destination, priority, now, deadline)
    }

    pub fn value(&self) -> f64 {
        self.quantity as f64 * self.product.value() * self.priority.multiplier()
    }

    pub fn total_weight(&self) -> f64 {
        self.quantity as f64 * self.product.weight()
    }

    /// Strictly past the deadline; an order due exactly now is still on time
    pub fn is_overdue(&self, now: f64) -> bool {
        now > self.deadline
    }
}
