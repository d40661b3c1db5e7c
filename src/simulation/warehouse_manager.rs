//! Warehouse inventory management
//!
//! Allocation is first-match in warehouse order, not nearest-match. Stock
//! leaves a warehouse only through allocation and enters it only through
//! replenishment or a released allocation.

use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use rand::Rng;
use std::rc::Rc;

use super::config::{GameConfig, SharedRng};
use super::events::{LogisticsEvent, Outbox};
use super::game_state::SharedState;
use super::order::Order;
use super::types::{Location, Product, WarehouseId};
use super::warehouse::Warehouse;

pub struct WarehouseManager {
    state: SharedState,
    rng: SharedRng,
    config: Rc<GameConfig>,
}

impl WarehouseManager {
    pub fn new(state: SharedState, rng: SharedRng, config: Rc<GameConfig>) -> Self {
        Self { state, rng, config }
    }

    /// React to inventory events
    ///
    /// A low-stock report queues a reorder; the reorder itself is applied
    /// when its "replenished" event comes back round.
    pub fn handle(&mut self, event: &LogisticsEvent) -> Outbox {
        let mut outbox = Outbox::new();

        match event {
            LogisticsEvent::InventoryLow { product, warehouse } => {
                let state = self.state.borrow();
                let Some(found) = state.warehouse(*warehouse) else {
                    warn!("Low stock reported for unknown warehouse {:?}", warehouse);
                    return outbox;
                };
                let quantity = self.reorder_quantity(found);
                debug!(
                    "Reordering {} x{} for {}",
                    product.name(),
                    quantity,
                    found.name
                );
                outbox.push(LogisticsEvent::InventoryReplenished {
                    product: *product,
                    warehouse: *warehouse,
                    quantity,
                });
            }
            LogisticsEvent::InventoryReplenished {
                product,
                warehouse,
                quantity,
            } => {
                let mut state = self.state.borrow_mut();
                match state.warehouse_mut(*warehouse) {
                    Some(found) => {
                        if !found.add_stock(*product, *quantity) {
                            debug!(
                                "{} has no room for {} x{}",
                                found.name,
                                product.name(),
                                quantity
                            );
                        }
                    }
                    None => warn!("Replenishment for unknown warehouse {:?}", warehouse),
                }
            }
            _ => {}
        }

        outbox
    }

    /// Batch size for a reorder: a tenth of capacity, at least the minimum
    pub fn reorder_quantity(&self, warehouse: &Warehouse) -> u32 {
        self.config
            .min_reorder_quantity
            .max(warehouse.capacity / 10)
    }

    pub fn add_warehouse(
        &mut self,
        name: impl Into<String>,
        location: Location,
        capacity: u32,
    ) -> WarehouseId {
        let id = self
            .state
            .borrow_mut()
            .add_warehouse(name, location, capacity);
        info!("Opened warehouse {:?} at ({:.2}, {:.2})", id, location.x, location.y);
        id
    }

    pub fn remove_warehouse(&mut self, id: WarehouseId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.warehouses.len();
        state.warehouses.retain(|w| w.id != id);
        state.warehouses.len() != before
    }

    pub fn warehouses(&self) -> Vec<Warehouse> {
        self.state.borrow().warehouses.clone()
    }

    pub fn find_nearest_warehouse(&self, location: Location) -> Option<Warehouse> {
        self.state
            .borrow()
            .warehouses
            .iter()
            .min_by_key(|w| OrderedFloat(w.location.distance(&location)))
            .cloned()
    }

    /// First warehouse, in enumeration order, holding enough of `product`
    pub fn find_warehouse_with_stock(&self, product: Product, quantity: u32) -> Option<Warehouse> {
        self.state
            .borrow()
            .warehouses
            .iter()
            .find(|w| w.has_stock(product, quantity))
            .cloned()
    }

    /// Reserve stock for `order`
    ///
    /// Returns a snapshot of the warehouse after the removal, or `None` if no
    /// warehouse holds enough. A "low inventory" event is queued on `outbox`
    /// when the remaining stock drops under the threshold.
    pub fn allocate_inventory(&mut self, order: &Order, outbox: &mut Outbox) -> Option<Warehouse> {
        let mut state = self.state.borrow_mut();
        let Some(warehouse) = state
            .warehouses
            .iter_mut()
            .find(|w| w.has_stock(order.product, order.quantity))
        else {
            debug!(
                "No warehouse can supply {} x{} for order {:?}",
                order.product.name(),
                order.quantity,
                order.id
            );
            return None;
        };

        if !warehouse.remove_stock(order.product, order.quantity) {
            return None;
        }

        if warehouse.stock_of(order.product) < self.config.low_stock_threshold {
            outbox.push(LogisticsEvent::InventoryLow {
                product: order.product,
                warehouse: warehouse.id,
            });
        }

        Some(warehouse.clone())
    }

    /// Return stock reserved for a dispatch that never happened
    pub fn release_allocation(&mut self, warehouse: WarehouseId, order: &Order) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(found) = state.warehouse_mut(warehouse) else {
            warn!("Cannot release stock to unknown warehouse {:?}", warehouse);
            return false;
        };
        let released = found.add_stock(order.product, order.quantity);
        if !released {
            warn!(
                "{} no longer has room for released {} x{}",
                found.name,
                order.product.name(),
                order.quantity
            );
        }
        released
    }

    /// Give every warehouse a random starting stock of each product
    pub fn stock_initial_inventory(&mut self) {
        let mut state = self.state.borrow_mut();
        let mut rng = self.rng.borrow_mut();
        for warehouse in &mut state.warehouses {
            for product in Product::ALL {
                let quantity = rng.random_range(self.config.initial_stock.clone());
                if !warehouse.add_stock(product, quantity) {
                    warn!(
                        "{} is too full for starting stock of {}",
                        warehouse.name,
                        product.name()
                    );
                }
            }
            debug!(
                "Stocked {} with {} units",
                warehouse.name,
                warehouse.total_stored()
            );
        }
    }

    /// Mean utilization across warehouses, 0 with none
    pub fn utilization(&self) -> f64 {
        let state = self.state.borrow();
        if state.warehouses.is_empty() {
            return 0.0;
        }
        let total: f64 = state.warehouses.iter().map(Warehouse::utilization_rate).sum();
        total / state.warehouses.len() as f64
    }
}
