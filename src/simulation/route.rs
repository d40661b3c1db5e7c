//! Straight-line delivery routes

use super::order::Order;
use super::types::Location;

/// An ordered list of stops and the orders carried along them
///
/// The first waypoint is the origin; every later waypoint is a stop.
/// Legs are straight lines between consecutive waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub waypoints: Vec<Location>,
    pub orders: Vec<Order>,
}

impl Route {
    pub fn new(start: Location, destinations: &[Location], orders: Vec<Order>) -> Self {
        let mut waypoints = Vec::with_capacity(destinations.len() + 1);
        waypoints.push(start);
        waypoints.extend_from_slice(destinations);
        Self { waypoints, orders }
    }

    /// A route straight from `start` to one destination
    pub fn direct(start: Location, destination: Location, orders: Vec<Order>) -> Self {
        Self::new(start, &[destination], orders)
    }

    pub fn origin(&self) -> Location {
        self.waypoints.first().copied().unwrap_or_default()
    }

    pub fn destination(&self) -> Location {
        self.waypoints.last().copied().unwrap_or_default()
    }

    pub fn total_distance(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|leg| leg[0].distance(&leg[1]))
            .sum()
    }

    /// Travel time in seconds at `seconds_per_unit` seconds per unit of distance
    pub fn estimated_duration(&self, seconds_per_unit: f64) -> f64 {
        self.total_distance() * seconds_per_unit
    }

    pub fn total_weight(&self) -> f64 {
        self.orders.iter().map(Order::total_weight).sum()
    }

    pub fn total_value(&self) -> f64 {
        self.orders.iter().map(Order::value).sum()
    }

    /// Position after covering `progress` (0..=1) of the total distance
    pub fn point_at(&self, progress: f64) -> Location {
        let progress = progress.clamp(0.0, 1.0);
        let total = self.total_distance();
        if total <= 0.0 {
            return self.destination();
        }

        let mut remaining = total * progress;
        for leg in self.waypoints.windows(2) {
            let length = leg[0].distance(&leg[1]);
            if remaining <= length {
                if length <= 0.0 {
                    return leg[1];
                }
                return leg[0].lerp(&leg[1], remaining / length);
            }
            remaining -= length;
        }

        self.destination()
    }
}
