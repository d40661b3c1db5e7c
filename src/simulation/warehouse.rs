//! Warehouses and their stock

use std::collections::HashMap;

use super::types::{Location, Product, WarehouseId};

/// Default hourly running cost of a warehouse
pub const WAREHOUSE_OPERATING_COST: f64 = 1000.0;

/// A warehouse holding stock of catalogue products
///
/// The sum of all stock never exceeds `capacity`, and no entry is ever
/// negative; `add_stock` and `remove_stock` either apply fully or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub location: Location,
    pub capacity: u32,
    inventory: HashMap<Product, u32>,
    pub operating_cost: f64,
}

impl Warehouse {
    pub fn new(id: WarehouseId, name: impl Into<String>, location: Location, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            capacity,
            inventory: HashMap::new(),
            operating_cost: WAREHOUSE_OPERATING_COST,
        }
    }

    pub fn inventory(&self) -> &HashMap<Product, u32> {
        &self.inventory
    }

    pub fn stock_of(&self, product: Product) -> u32 {
        self.inventory.get(&product).copied().unwrap_or(0)
    }

    pub fn total_stored(&self) -> u32 {
        self.inventory.values().sum()
    }

    pub fn available_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.total_stored())
    }

    pub fn utilization_rate(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.total_stored() as f64 / self.capacity as f64
    }

    pub fn has_stock(&self, product: Product, quantity: u32) -> bool {
        self.stock_of(product) >= quantity
    }

    /// Add stock if it fits.
    /// Returns true if successful, false if the warehouse lacks room
    pub fn add_stock(&mut self, product: Product, quantity: u32) -> bool {
        if self.available_capacity() < quantity {
            return false;
        }
        *self.inventory.entry(product).or_insert(0) += quantity;
        true
    }

    /// Remove stock if enough is held.
    /// Returns false and leaves the inventory untouched otherwise
    pub fn remove_stock(&mut self, product: Product, quantity: u32) -> bool {
        let Some(held) = self.inventory.get_mut(&product) else {
            return quantity == 0;
        };
        if *held < quantity {
            return false;
        }
        *held -= quantity;
        if *held == 0 {
            self.inventory.remove(&product);
        }
        true
    }
}
