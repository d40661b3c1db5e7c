//! Fleet management and travel simulation
//!
//! A dispatched vehicle gets a repeating position ticker. Each firing adds
//! one update period to the trip's elapsed time and moves the vehicle to the
//! matching point on its route. Elapsed time lives on the trip, not on the
//! clock, so a paused trip resumes where it stopped.

use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use std::collections::HashMap;
use std::rc::Rc;

use super::config::GameConfig;
use super::events::{LogisticsEvent, Outbox};
use super::game_state::SharedState;
use super::route::Route;
use super::scheduler::{SharedScheduler, TimerId, TimerKind, TimerScope};
use super::types::{Location, VehicleId, VehicleType};
use super::vehicle::{Vehicle, VehicleStatus};

/// Progress of one vehicle along its route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trip {
    pub elapsed: f64,
    pub duration: f64,
    ticker: Option<TimerId>,
}

impl Trip {
    /// Fraction of the route covered, in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}

pub struct VehicleManager {
    state: SharedState,
    scheduler: SharedScheduler,
    config: Rc<GameConfig>,
    trips: HashMap<VehicleId, Trip>,
    speed_multiplier: f64,
}

impl VehicleManager {
    pub fn new(state: SharedState, scheduler: SharedScheduler, config: Rc<GameConfig>) -> Self {
        Self {
            state,
            scheduler,
            config,
            trips: HashMap::new(),
            speed_multiplier: 1.0,
        }
    }

    pub fn add_vehicle(&mut self, kind: VehicleType, location: Location) -> VehicleId {
        let id = self.state.borrow_mut().add_vehicle(kind, location);
        info!("Added {} {:?}", kind.display_name(), id);
        id
    }

    /// Remove a vehicle, cancelling its ticker if it was travelling
    ///
    /// Orders on its route go back to the pool and their goods to the
    /// nearest warehouse with room.
    pub fn remove_vehicle(&mut self, id: VehicleId) -> bool {
        if let Some(trip) = self.trips.remove(&id) {
            if let Some(ticker) = trip.ticker {
                self.scheduler.borrow_mut().cancel(ticker);
            }
        }

        let mut state = self.state.borrow_mut();
        let Some(index) = state.vehicles.iter().position(|v| v.id == id) else {
            return false;
        };
        let vehicle = state.vehicles.remove(index);
        let Some(route) = vehicle.route() else {
            return true;
        };

        for order in &route.orders {
            if state.unassign_order(order.id) {
                info!("Order {:?} returned to the pool", order.id);
            }
            let restocked = state
                .warehouses
                .iter_mut()
                .filter(|w| w.available_capacity() >= order.quantity)
                .min_by_key(|w| OrderedFloat(w.location.distance(&vehicle.location)))
                .is_some_and(|w| w.add_stock(order.product, order.quantity));
            if !restocked {
                warn!(
                    "No warehouse has room for {} x{} from {:?}",
                    order.product.name(),
                    order.quantity,
                    id
                );
            }
        }
        true
    }

    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.state.borrow().vehicles.clone()
    }

    pub fn available_vehicles(&self) -> Vec<Vehicle> {
        self.state
            .borrow()
            .vehicles
            .iter()
            .filter(|v| v.is_available())
            .cloned()
            .collect()
    }

    /// Closest idle vehicle to `origin`, by straight-line distance
    pub fn find_nearest_available_vehicle(&self, origin: Location) -> Option<Vehicle> {
        self.state
            .borrow()
            .vehicles
            .iter()
            .filter(|v| v.is_available())
            .min_by_key(|v| OrderedFloat(v.location.distance(&origin)))
            .cloned()
    }

    pub fn trip(&self, id: VehicleId) -> Option<&Trip> {
        self.trips.get(&id)
    }

    /// Divisor applied to travel times of future dispatches
    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        if multiplier > 0.0 {
            self.speed_multiplier = multiplier;
        }
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Send `vehicle` along `route`
    ///
    /// Returns `None` without touching anything if the vehicle is unknown,
    /// not idle, or cannot carry the route's weight.
    pub fn dispatch(&mut self, vehicle: VehicleId, route: Route) -> Option<Outbox> {
        let duration =
            route.estimated_duration(self.config.seconds_per_distance_unit) / self.speed_multiplier;

        {
            let mut state = self.state.borrow_mut();
            let Some(found) = state.vehicle_mut(vehicle) else {
                warn!("Cannot dispatch unknown vehicle {:?}", vehicle);
                return None;
            };
            if !found.can_carry(&route) {
                debug!(
                    "{:?} cannot take {:.1}kg (status {:?}, {:.1}kg free)",
                    vehicle,
                    route.total_weight(),
                    found.status,
                    found.available_capacity()
                );
                return None;
            }

            found.current_load = route.total_weight();
            found.location = route.origin();
            found.status = VehicleStatus::EnRoute(route.clone());
        }

        let ticker = self.start_ticker(vehicle);
        self.trips.insert(
            vehicle,
            Trip {
                elapsed: 0.0,
                duration,
                ticker: Some(ticker),
            },
        );

        debug!(
            "Dispatched {:?} over {:.3} units, arriving in {:.1}s",
            vehicle,
            route.total_distance(),
            duration
        );

        Some(Outbox::from_event(LogisticsEvent::VehicleDispatched {
            vehicle,
            route,
        }))
    }

    fn start_ticker(&self, vehicle: VehicleId) -> TimerId {
        self.scheduler.borrow_mut().schedule_repeating(
            self.config.vehicle_update_period,
            TimerKind::VehicleUpdate(vehicle),
            TimerScope::Simulation,
        )
    }

    /// Advance one vehicle's trip by one update period
    pub fn on_ticker(&mut self, vehicle: VehicleId) -> Outbox {
        let mut outbox = Outbox::new();

        let Some(trip) = self.trips.get_mut(&vehicle) else {
            return outbox;
        };
        trip.elapsed += self.config.vehicle_update_period;
        let progress = trip.progress();

        let mut state = self.state.borrow_mut();
        let Some(found) = state.vehicle_mut(vehicle) else {
            return outbox;
        };
        let Some(route) = found.route() else {
            return outbox;
        };
        let location = route.point_at(progress);
        let destination = route.destination();
        found.location = location;

        if progress >= 1.0 {
            if let Some(ticker) = trip.ticker.take() {
                self.scheduler.borrow_mut().cancel(ticker);
            }
            self.trips.remove(&vehicle);
            outbox.push(LogisticsEvent::VehicleArrived {
                vehicle,
                at: destination,
            });
        }

        outbox
    }

    /// Deliveries for a vehicle that just arrived, read off its route before
    /// the vehicle is reset
    pub fn arrival_events(&self, vehicle: VehicleId, at: Location) -> Outbox {
        let mut outbox = Outbox::new();
        let state = self.state.borrow();
        let Some(route) = state.vehicle(vehicle).and_then(Vehicle::route) else {
            return outbox;
        };
        for order in &route.orders {
            outbox.push(LogisticsEvent::DeliverySuccessful {
                order: order.clone(),
                at,
            });
            outbox.push(LogisticsEvent::OrderFulfilled(order.clone()));
        }
        outbox
    }

    /// Park an arrived vehicle: idle, empty, at the arrival point
    pub fn finish_arrival(&mut self, vehicle: VehicleId, at: Location) {
        if let Some(trip) = self.trips.remove(&vehicle) {
            if let Some(ticker) = trip.ticker {
                self.scheduler.borrow_mut().cancel(ticker);
            }
        }
        let mut state = self.state.borrow_mut();
        if let Some(found) = state.vehicle_mut(vehicle) {
            found.status = VehicleStatus::Idle;
            found.current_load = 0.0;
            found.location = at;
        }
    }

    /// Stop every position ticker, keeping trip progress
    pub fn suspend(&mut self) {
        let mut scheduler = self.scheduler.borrow_mut();
        for trip in self.trips.values_mut() {
            if let Some(ticker) = trip.ticker.take() {
                scheduler.cancel(ticker);
            }
        }
    }

    /// Restart tickers for vehicles still en route
    pub fn resume(&mut self) {
        let suspended: Vec<VehicleId> = self
            .trips
            .iter()
            .filter(|(_, trip)| trip.ticker.is_none())
            .map(|(id, _)| *id)
            .collect();
        for vehicle in suspended {
            let ticker = self.start_ticker(vehicle);
            if let Some(trip) = self.trips.get_mut(&vehicle) {
                trip.ticker = Some(ticker);
            }
        }
    }

    pub fn active_trips(&self) -> usize {
        self.trips.len()
    }

    /// Share of total fleet capacity currently loaded
    pub fn utilization(&self) -> f64 {
        let state = self.state.borrow();
        let capacity: f64 = state.vehicles.iter().map(|v| v.capacity).sum();
        if capacity <= 0.0 {
            return 0.0;
        }
        let load: f64 = state.vehicles.iter().map(|v| v.current_load).sum();
        load / capacity
    }
}
