//! Fleet vehicles

use super::route::Route;
use super::types::{Location, VehicleId, VehicleType};

/// What a vehicle is currently doing
///
/// The active route is only reachable through `EnRoute`; leaving that status
/// discards it.
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleStatus {
    Idle,
    EnRoute(Route),
    Loading,
    Maintenance,
}

/// A vehicle in the fleet
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub kind: VehicleType,
    /// Payload limit in kilograms
    pub capacity: f64,
    pub speed: f64,
    pub location: Location,
    pub status: VehicleStatus,
    /// Weight currently carried in kilograms
    pub current_load: f64,
}

impl Vehicle {
    /// Create an idle, empty vehicle with the type's default capacity and speed
    pub fn new(id: VehicleId, kind: VehicleType, location: Location) -> Self {
        Self::with_specs(id, kind, kind.default_capacity(), kind.default_speed(), location)
    }

    pub fn with_specs(
        id: VehicleId,
        kind: VehicleType,
        capacity: f64,
        speed: f64,
        location: Location,
    ) -> Self {
        Self {
            id,
            kind,
            capacity,
            speed,
            location,
            status: VehicleStatus::Idle,
            current_load: 0.0,
        }
    }

    pub fn available_capacity(&self) -> f64 {
        self.capacity - self.current_load
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, VehicleStatus::Idle)
    }

    pub fn is_en_route(&self) -> bool {
        matches!(self.status, VehicleStatus::EnRoute(_))
    }

    pub fn route(&self) -> Option<&Route> {
        match &self.status {
            VehicleStatus::EnRoute(route) => Some(route),
            _ => None,
        }
    }

    /// Whether this vehicle could take on `route` right now
    pub fn can_carry(&self, route: &Route) -> bool {
        self.is_available() && route.total_weight() <= self.available_capacity()
    }
}
