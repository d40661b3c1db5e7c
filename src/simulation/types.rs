//! Core value types for the supply chain simulation
//!
//! Identifiers, map coordinates and the fixed catalogues (products,
//! priorities, vehicle types). None of these carry behaviour beyond
//! derived calculations.

use rand::Rng;

/// A wrapper type for order IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub u64);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u32);

/// A wrapper type for warehouse IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WarehouseId(pub u32);

/// A wrapper type for on-screen feedback entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedbackId(pub u64);

/// A point on the normalized map, both axes in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Location) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn lerp(&self, other: &Location, t: f64) -> Location {
        Location {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Location {
        Location {
            x: rng.random_range(0.0..=1.0),
            y: rng.random_range(0.0..=1.0),
        }
    }
}

/// Catalogue of goods customers can order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Product {
    Electronics,
    Furniture,
    Clothing,
    Books,
}

impl Product {
    pub const ALL: [Product; 4] = [
        Product::Electronics,
        Product::Furniture,
        Product::Clothing,
        Product::Books,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Product::Electronics => "Electronics",
            Product::Furniture => "Furniture",
            Product::Clothing => "Clothing",
            Product::Books => "Books",
        }
    }

    /// Weight of a single unit in kilograms
    pub fn weight(&self) -> f64 {
        match self {
            Product::Electronics => 2.0,
            Product::Furniture => 50.0,
            Product::Clothing => 1.0,
            Product::Books => 0.5,
        }
    }

    /// Sale value of a single unit
    pub fn value(&self) -> f64 {
        match self {
            Product::Electronics => 100.0,
            Product::Furniture => 500.0,
            Product::Clothing => 50.0,
            Product::Books => 20.0,
        }
    }
}

/// How urgently a customer wants their order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderPriority {
    Standard,
    Express,
    Urgent,
}

impl OrderPriority {
    pub const ALL: [OrderPriority; 3] = [
        OrderPriority::Standard,
        OrderPriority::Express,
        OrderPriority::Urgent,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            OrderPriority::Standard => 1.0,
            OrderPriority::Express => 1.5,
            OrderPriority::Urgent => 2.0,
        }
    }
}

/// Type of vehicle in the fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleType {
    Van,
    Truck,
    Drone,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [VehicleType::Van, VehicleType::Truck, VehicleType::Drone];

    pub fn display_name(&self) -> &'static str {
        match self {
            VehicleType::Van => "Van",
            VehicleType::Truck => "Truck",
            VehicleType::Drone => "Drone",
        }
    }

    /// Default payload in kilograms
    pub fn default_capacity(&self) -> f64 {
        match self {
            VehicleType::Van => 200.0,
            VehicleType::Truck => 500.0,
            VehicleType::Drone => 10.0,
        }
    }

    pub fn default_speed(&self) -> f64 {
        match self {
            VehicleType::Van => 50.0,
            VehicleType::Truck => 60.0,
            VehicleType::Drone => 100.0,
        }
    }

    /// Hourly running cost
    pub fn operating_cost(&self) -> f64 {
        match self {
            VehicleType::Van => 0.5,
            VehicleType::Truck => 1.0,
            VehicleType::Drone => 2.0,
        }
    }

    /// Single-character marker used by the terminal map
    pub fn map_symbol(&self) -> char {
        match self {
            VehicleType::Van => 'V',
            VehicleType::Truck => 'T',
            VehicleType::Drone => 'D',
        }
    }
}
