//! Game orchestration
//!
//! The engine owns the bus, the scheduler and every manager, wires their
//! subscriptions, and drives the virtual clock. Each due timer runs to
//! completion, together with every event chain it causes, before the next
//! timer fires.
//!
//! Logistics subscribers run in this order: game state, engine, vehicle
//! arrivals, warehouses, tutorial, levels, achievements, feedback. The game
//! state goes first so later handlers see the event already applied.

use log::{debug, info, warn};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use super::achievements::AchievementManager;
use super::bus::{EventBus, Subscription};
use super::config::{GameConfig, SECONDS_PER_HOUR};
use super::events::{LevelEvent, LogisticsEvent, Outbox, TutorialEvent, WeatherEvent};
use super::feedback::FeedbackManager;
use super::game_state::{GameState, GameStatus, SharedState};
use super::levels::LevelSystem;
use super::order::Order;
use super::order_manager::OrderManager;
use super::route::Route;
use super::scheduler::{Scheduler, SharedScheduler, TimerId, TimerKind, TimerScope};
use super::settings::SharedSettings;
use super::tutorial::TutorialSystem;
use super::types::{Location, OrderId, OrderPriority, Product, VehicleId, WarehouseId};
use super::vehicle::Vehicle;
use super::vehicle_manager::VehicleManager;
use super::warehouse_manager::WarehouseManager;
use super::weather::WeatherManager;

/// Map size in characters
const MAP_WIDTH: usize = 60;
const MAP_HEIGHT: usize = 20;

/// Everything the bus handlers need, shared between them
struct Systems {
    state: SharedState,
    scheduler: SharedScheduler,
    config: Rc<GameConfig>,

    orders: RefCell<OrderManager>,
    warehouses: RefCell<WarehouseManager>,
    vehicles: RefCell<VehicleManager>,
    weather: RefCell<WeatherManager>,
    tutorial: RefCell<TutorialSystem>,
    levels: RefCell<LevelSystem>,
    achievements: RefCell<AchievementManager>,
    feedback: RefCell<FeedbackManager>,

    game_timer: Cell<Option<TimerId>>,
    /// Simulation timers are armed
    running: Cell<bool>,
    /// Warehouses received their starting stock
    stocked: Cell<bool>,
}

impl Systems {
    fn on_logistics(&self, bus: &EventBus, event: &LogisticsEvent) {
        match event {
            LogisticsEvent::GameStarted => self.start(),
            LogisticsEvent::GamePaused => {
                let paused = self.state.borrow().status == GameStatus::Paused;
                if self.running.get() && paused {
                    self.running.set(false);
                    self.stop_simulation();
                    info!("Game paused");
                }
            }
            LogisticsEvent::GameResumed => {
                let resumable = self.state.borrow().is_running();
                if !self.running.get() && resumable {
                    self.running.set(true);
                    self.start_simulation();
                    info!("Game resumed");
                }
            }
            LogisticsEvent::GameEnded => {
                self.running.set(false);
                self.stop_simulation();
                info!("Game over");
            }
            LogisticsEvent::OrderPlaced(order) => self.auto_assign(bus, order),
            LogisticsEvent::AssignRequested { order, vehicle } => {
                self.manual_assign(bus, *order, *vehicle)
            }
            LogisticsEvent::VehicleDispatched { route, .. } => self.charge_dispatch(route),
            LogisticsEvent::OrderFulfilled(order) => self.record_fulfilment(bus, order),
            _ => {}
        }
    }

    fn start(&self) {
        if !self.stocked.get() {
            self.warehouses.borrow_mut().stock_initial_inventory();
            self.stocked.set(true);
        }
        self.running.set(true);
        self.start_simulation();
        info!("Game started");
    }

    fn start_simulation(&self) {
        {
            let mut scheduler = self.scheduler.borrow_mut();
            if let Some(timer) = self.game_timer.take() {
                scheduler.cancel(timer);
            }
            self.game_timer.set(Some(scheduler.schedule_repeating(
                self.config.tick_period,
                TimerKind::GameTick,
                TimerScope::Simulation,
            )));
        }
        self.orders.borrow_mut().start_generation();
        self.vehicles.borrow_mut().resume();
        self.weather.borrow_mut().start();
        self.tutorial.borrow_mut().resume();
    }

    fn stop_simulation(&self) {
        self.game_timer.set(None);
        self.orders.borrow_mut().stop_generation();
        self.vehicles.borrow_mut().suspend();
        self.weather.borrow_mut().stop();
        let cancelled = self
            .scheduler
            .borrow_mut()
            .cancel_scope(TimerScope::Simulation);
        debug!("Cancelled {} simulation timers", cancelled);
    }

    /// Try to serve a new order from stock with the nearest idle vehicle
    fn auto_assign(&self, bus: &EventBus, order: &Order) {
        if self.tutorial.borrow().reserves_order(order.id) {
            debug!("Order {:?} waits for the player", order.id);
            return;
        }
        if self.state.borrow().active_order(order.id).is_none() {
            return;
        }

        let mut outbox = Outbox::new();
        let source = self.warehouses.borrow_mut().allocate_inventory(order, &mut outbox);
        bus.flush(outbox);
        let Some(source) = source else {
            return;
        };

        let vehicle = self
            .vehicles
            .borrow()
            .find_nearest_available_vehicle(source.location);
        let Some(vehicle) = vehicle else {
            debug!("No idle vehicle for order {:?}", order.id);
            self.warehouses
                .borrow_mut()
                .release_allocation(source.id, order);
            return;
        };

        let route = Route::direct(source.location, order.destination, vec![order.clone()]);
        self.try_dispatch(bus, vehicle.id, route, source.id, order);
    }

    /// Serve an order with the vehicle the player picked
    fn manual_assign(&self, bus: &EventBus, order_id: OrderId, vehicle_id: VehicleId) {
        let order = self.state.borrow().active_order(order_id).cloned();
        let Some(order) = order else {
            warn!("Order {:?} is not waiting for a vehicle", order_id);
            return;
        };
        let vehicle = self.state.borrow().vehicle(vehicle_id).cloned();
        let Some(vehicle) = vehicle.filter(Vehicle::is_available) else {
            warn!("Vehicle {:?} is unknown or busy", vehicle_id);
            return;
        };

        let mut outbox = Outbox::new();
        let source = self
            .warehouses
            .borrow_mut()
            .allocate_inventory(&order, &mut outbox);
        bus.flush(outbox);
        let Some(source) = source else {
            return;
        };

        // Collect from the warehouse first unless already parked there
        let route = if vehicle.location.distance(&source.location) <= f64::EPSILON {
            Route::direct(source.location, order.destination, vec![order.clone()])
        } else {
            Route::new(
                vehicle.location,
                &[source.location, order.destination],
                vec![order.clone()],
            )
        };
        self.try_dispatch(bus, vehicle.id, route, source.id, &order);
    }

    fn try_dispatch(
        &self,
        bus: &EventBus,
        vehicle: VehicleId,
        route: Route,
        source: WarehouseId,
        order: &Order,
    ) {
        let dispatched = self.vehicles.borrow_mut().dispatch(vehicle, route);
        match dispatched {
            Some(outbox) => bus.flush(outbox),
            None => {
                debug!("Dispatch of order {:?} dropped, releasing stock", order.id);
                self.warehouses.borrow_mut().release_allocation(source, order);
            }
        }
    }

    fn charge_dispatch(&self, route: &Route) {
        let cost = route.total_distance() * self.config.dispatch_cost_per_distance_unit;
        let mut state = self.state.borrow_mut();
        state.charge(cost);
        state.performance.add_cost(cost);
    }

    fn record_fulfilment(&self, bus: &EventBus, order: &Order) {
        let now = self.scheduler.borrow().now();
        let vehicle_utilization = self.vehicles.borrow().utilization();
        let warehouse_utilization = self.warehouses.borrow().utilization();
        let satisfaction = self
            .config
            .weather_affects_satisfaction
            .then(|| self.weather.borrow().current().satisfaction_multiplier());

        let metrics = {
            let mut state = self.state.borrow_mut();
            let performance = &mut state.performance;
            performance.record_delivery(now - order.placed_at, !order.is_overdue(now));
            if let Some(multiplier) = satisfaction {
                performance.apply_satisfaction_multiplier(multiplier);
            }
            performance.add_revenue(order.value());
            performance.update_efficiency(vehicle_utilization, warehouse_utilization);
            performance.clone()
        };
        bus.publish(LogisticsEvent::PerformanceUpdated(metrics));
    }

    /// Publish deliveries off the route before the vehicle is reset
    fn on_vehicle_arrived(&self, bus: &EventBus, vehicle: VehicleId, at: Location) {
        let deliveries = self.vehicles.borrow().arrival_events(vehicle, at);
        bus.flush(deliveries);
        self.vehicles.borrow_mut().finish_arrival(vehicle, at);
    }

    /// Hourly running cost of every warehouse and vehicle, per second
    fn operating_cost(&self) -> f64 {
        let state = self.state.borrow();
        let warehouses: f64 = state.warehouses.iter().map(|w| w.operating_cost).sum();
        let vehicles: f64 = state.vehicles.iter().map(|v| v.kind.operating_cost()).sum();
        (warehouses + vehicles) / SECONDS_PER_HOUR
    }

    /// One iteration of the game loop
    fn tick(&self, bus: &EventBus) {
        let now = self.scheduler.borrow().now();
        self.state.borrow_mut().game_time = now;

        // Penalise every order still waiting past its deadline
        let overdue = self.orders.borrow().overdue_orders(now);
        for order in &overdue {
            bus.publish(LogisticsEvent::OrderDelayed(order.clone()));
            let penalty = order.value() * self.config.overdue_penalty_rate;
            self.state.borrow_mut().charge(penalty);
        }

        let operating_cost = self.operating_cost();
        let budget = {
            let mut state = self.state.borrow_mut();
            state.charge(operating_cost);
            state.budget
        };
        if budget <= 0.0 {
            warn!("Budget exhausted at {:.0}s", now);
            bus.publish(LogisticsEvent::GameEnded);
        }
        bus.publish(LogisticsEvent::BudgetChanged(budget));

        let metrics = {
            let mut state = self.state.borrow_mut();
            let total = state.total_known_orders();
            if total > 0 {
                state.performance.on_time_rate =
                    total.saturating_sub(overdue.len()) as f64 / total as f64;
            }
            state.performance.clone()
        };
        bus.publish(LogisticsEvent::PerformanceUpdated(metrics));
    }

    fn fire(&self, bus: &EventBus, kind: TimerKind) {
        match kind {
            TimerKind::GameTick => self.tick(bus),
            TimerKind::OrderGeneration => {
                let outbox = self.orders.borrow_mut().on_generation_timer();
                bus.flush(outbox);
            }
            TimerKind::VehicleUpdate(vehicle) => {
                let outbox = self.vehicles.borrow_mut().on_ticker(vehicle);
                bus.flush(outbox);
            }
            TimerKind::WeatherChange => {
                let outbox = self.weather.borrow_mut().on_change_timer();
                bus.flush(outbox);
            }
            TimerKind::WeatherCountdown => self.weather.borrow_mut().on_countdown(),
            TimerKind::TutorialAdvance => {
                let outbox = self.tutorial.borrow_mut().on_review_timer();
                bus.flush(outbox);
            }
            TimerKind::TutorialFinish => {
                let outbox = self.tutorial.borrow_mut().on_finish_timer();
                bus.flush(outbox);
            }
            TimerKind::DismissAchievement(kind) => {
                self.achievements.borrow_mut().dismiss_popup(kind)
            }
            TimerKind::DismissLevelUp(level) => {
                self.levels.borrow_mut().dismiss_notification(level)
            }
            TimerKind::DismissDeliveryFeedback(id) => {
                self.feedback.borrow_mut().dismiss_delivery(id)
            }
            TimerKind::DismissScoreFeedback(id) => self.feedback.borrow_mut().dismiss_score(id),
        }
    }
}

/// Register every component on the bus, in delivery order
fn wire(bus: &EventBus, systems: &Rc<Systems>) -> Vec<Subscription> {
    let mut subscriptions = Vec::new();

    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |bus: &EventBus, event: &LogisticsEvent| {
        let outbox = sys.state.borrow_mut().apply(event);
        bus.flush(outbox);
    }));

    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |bus: &EventBus, event: &LogisticsEvent| {
        sys.on_logistics(bus, event)
    }));

    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |bus: &EventBus, event: &LogisticsEvent| {
        if let LogisticsEvent::VehicleArrived { vehicle, at } = event {
            sys.on_vehicle_arrived(bus, *vehicle, *at);
        }
    }));

    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |bus: &EventBus, event: &LogisticsEvent| {
        let outbox = sys.warehouses.borrow_mut().handle(event);
        bus.flush(outbox);
    }));

    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |bus: &EventBus, event: &LogisticsEvent| {
        let outbox = sys.tutorial.borrow_mut().handle(event);
        bus.flush(outbox);
    }));

    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |bus: &EventBus, event: &LogisticsEvent| {
        let outbox = sys.levels.borrow_mut().handle(event);
        bus.flush(outbox);
    }));

    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |bus: &EventBus, event: &LogisticsEvent| {
        let outbox = sys.achievements.borrow_mut().handle(event);
        bus.flush(outbox);
    }));

    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |_: &EventBus, event: &LogisticsEvent| {
        sys.feedback.borrow_mut().handle(event)
    }));

    // Tutorial topic: player commands first, then the status change
    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |bus: &EventBus, event: &TutorialEvent| {
        let outbox = sys.tutorial.borrow_mut().handle_command(event);
        bus.flush(outbox);
    }));

    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |_: &EventBus, event: &TutorialEvent| {
        sys.state.borrow_mut().apply_tutorial(event)
    }));

    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |_: &EventBus, event: &LevelEvent| {
        sys.levels.borrow_mut().handle_command(event);
        sys.state.borrow_mut().apply_level(event);
    }));

    let sys = Rc::clone(systems);
    subscriptions.push(bus.subscribe(move |_: &EventBus, event: &WeatherEvent| {
        let WeatherEvent::Changed { to, .. } = event;
        if sys.config.weather_affects_travel {
            sys.vehicles
                .borrow_mut()
                .set_speed_multiplier(to.speed_multiplier());
        }
    }));

    subscriptions
}

/// Top-level orchestrator for a game session
pub struct GameEngine {
    bus: EventBus,
    systems: Rc<Systems>,
    _subscriptions: Vec<Subscription>,
}

impl GameEngine {
    /// A fresh session in the starting world
    pub fn new(config: GameConfig, settings: SharedSettings) -> Self {
        let state = GameState::new(config.starting_budget);
        Self::with_state(config, state, settings)
    }

    /// A session over a prepared world
    pub fn with_state(config: GameConfig, state: GameState, settings: SharedSettings) -> Self {
        let rng = config.make_rng();
        let config = Rc::new(config);
        let state = state.into_shared();
        let scheduler: SharedScheduler = Rc::new(RefCell::new(Scheduler::new()));

        let levels = LevelSystem::new(Rc::clone(&scheduler), Rc::clone(&settings));
        state.borrow_mut().level = levels.current().level;

        let systems = Rc::new(Systems {
            orders: RefCell::new(OrderManager::new(
                Rc::clone(&state),
                Rc::clone(&scheduler),
                Rc::clone(&rng),
                Rc::clone(&config),
            )),
            warehouses: RefCell::new(WarehouseManager::new(
                Rc::clone(&state),
                Rc::clone(&rng),
                Rc::clone(&config),
            )),
            vehicles: RefCell::new(VehicleManager::new(
                Rc::clone(&state),
                Rc::clone(&scheduler),
                Rc::clone(&config),
            )),
            weather: RefCell::new(WeatherManager::new(
                Rc::clone(&scheduler),
                Rc::clone(&rng),
                Rc::clone(&config),
            )),
            tutorial: RefCell::new(TutorialSystem::new(
                Rc::clone(&state),
                Rc::clone(&scheduler),
                settings,
            )),
            levels: RefCell::new(levels),
            achievements: RefCell::new(AchievementManager::new(
                Rc::clone(&state),
                Rc::clone(&scheduler),
            )),
            feedback: RefCell::new(FeedbackManager::new(Rc::clone(&scheduler))),
            state,
            scheduler,
            config,
            game_timer: Cell::new(None),
            running: Cell::new(false),
            stocked: Cell::new(false),
        });

        let bus = EventBus::new();
        let subscriptions = wire(&bus, &systems);

        Self {
            bus,
            systems,
            _subscriptions: subscriptions,
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn config(&self) -> &GameConfig {
        &self.systems.config
    }

    pub fn state(&self) -> Ref<'_, GameState> {
        self.systems.state.borrow()
    }

    /// Mutable access to the store. Release it before publishing.
    pub fn state_mut(&self) -> RefMut<'_, GameState> {
        self.systems.state.borrow_mut()
    }

    pub fn now(&self) -> f64 {
        self.systems.scheduler.borrow().now()
    }

    /// Whether the simulation timers are armed
    pub fn is_running(&self) -> bool {
        self.systems.running.get()
    }

    pub fn orders(&self) -> Ref<'_, OrderManager> {
        self.systems.orders.borrow()
    }

    pub fn warehouses(&self) -> Ref<'_, WarehouseManager> {
        self.systems.warehouses.borrow()
    }

    pub fn warehouses_mut(&self) -> RefMut<'_, WarehouseManager> {
        self.systems.warehouses.borrow_mut()
    }

    pub fn vehicles(&self) -> Ref<'_, VehicleManager> {
        self.systems.vehicles.borrow()
    }

    pub fn vehicles_mut(&self) -> RefMut<'_, VehicleManager> {
        self.systems.vehicles.borrow_mut()
    }

    pub fn weather(&self) -> Ref<'_, WeatherManager> {
        self.systems.weather.borrow()
    }

    pub fn tutorial(&self) -> Ref<'_, TutorialSystem> {
        self.systems.tutorial.borrow()
    }

    pub fn levels(&self) -> Ref<'_, LevelSystem> {
        self.systems.levels.borrow()
    }

    pub fn achievements(&self) -> Ref<'_, AchievementManager> {
        self.systems.achievements.borrow()
    }

    pub fn feedback(&self) -> Ref<'_, FeedbackManager> {
        self.systems.feedback.borrow()
    }

    /// Per-tick running cost of the current world
    pub fn operating_cost(&self) -> f64 {
        self.systems.operating_cost()
    }

    /// Advance the clock by `dt` seconds, firing every timer that falls due
    pub fn advance(&self, dt: f64) {
        let until = self.now() + dt.max(0.0);
        loop {
            let due = self.systems.scheduler.borrow_mut().pop_due(until);
            let Some((_, kind)) = due else {
                break;
            };
            self.systems.fire(&self.bus, kind);
        }
        self.systems.scheduler.borrow_mut().set_now(until);
    }

    pub fn start_game(&self) {
        self.bus.publish(LogisticsEvent::GameStarted);
    }

    pub fn pause_game(&self) {
        self.bus.publish(LogisticsEvent::GamePaused);
    }

    pub fn resume_game(&self) {
        self.bus.publish(LogisticsEvent::GameResumed);
    }

    pub fn end_game(&self) {
        self.bus.publish(LogisticsEvent::GameEnded);
    }

    /// Place a random order as if the generation timer had fired
    pub fn place_random_order(&self) {
        let outbox = self.systems.orders.borrow_mut().generate_order();
        self.bus.flush(outbox);
    }

    /// Place an order with the given contents
    pub fn place_order(
        &self,
        product: Product,
        quantity: u32,
        destination: Location,
        priority: OrderPriority,
    ) -> OrderId {
        let order = self
            .systems
            .orders
            .borrow()
            .create_order(product, quantity, destination, priority);
        let id = order.id;
        self.bus.publish(LogisticsEvent::OrderPlaced(order));
        id
    }

    pub fn assign_order(&self, order: OrderId, vehicle: VehicleId) {
        self.bus
            .publish(LogisticsEvent::AssignRequested { order, vehicle });
    }

    pub fn advance_tutorial(&self) {
        self.bus.publish(TutorialEvent::AdvanceRequested);
    }

    pub fn skip_tutorial(&self) {
        self.bus.publish(TutorialEvent::SkipRequested);
    }

    pub fn reset_tutorial(&self) {
        self.bus.publish(TutorialEvent::ResetRequested);
    }

    pub fn reset_progress(&self) {
        self.bus.publish(LevelEvent::ResetRequested);
    }

    /// Get a summary of the session for display
    pub fn summary(&self) -> String {
        let state = self.state();
        let levels = self.levels();
        let weather = self.weather();
        let player = levels.current();

        let mut lines = vec![
            "=== Supply Chain Summary ===".to_string(),
            format!("Status: {:?}", state.status),
            state.summary(),
            format!(
                "Level: {} ({}), {} xp, {} to next",
                player.level,
                player.requirements().title,
                player.experience,
                player.experience_to_next()
            ),
            format!(
                "Weather: {} (intensity {:.2}, next change in {:.0}s)",
                weather.current().title(),
                weather.intensity(),
                weather.time_until_change()
            ),
            format!(
                "Performance: on-time {:.0}%, satisfaction {:.0}%, efficiency {:.0}%, profit ${:.2}",
                state.performance.on_time_rate * 100.0,
                state.performance.customer_satisfaction * 100.0,
                state.performance.efficiency * 100.0,
                state.performance.profit()
            ),
            "--- Warehouses ---".to_string(),
        ];

        for warehouse in &state.warehouses {
            lines.push(format!(
                "  {}: {}/{} stored ({:.0}% full)",
                warehouse.name,
                warehouse.total_stored(),
                warehouse.capacity,
                warehouse.utilization_rate() * 100.0
            ));
        }

        lines.push("--- Fleet ---".to_string());
        for vehicle in &state.vehicles {
            let status = match vehicle.route() {
                Some(route) => format!(
                    "en route with {} order(s), {:.0}kg",
                    route.orders.len(),
                    vehicle.current_load
                ),
                None => format!("{:?}", vehicle.status).to_lowercase(),
            };
            lines.push(format!(
                "  {} {:?} at ({:.2}, {:.2}): {}",
                vehicle.kind.display_name(),
                vehicle.id.0,
                vehicle.location.x,
                vehicle.location.y,
                status
            ));
        }

        lines.join("\n")
    }

    /// Draw a visual map of the world for the terminal
    pub fn draw_map(&self) -> String {
        let state = self.state();
        let mut grid = vec![vec![' '; MAP_WIDTH]; MAP_HEIGHT];

        // Routes underneath everything else
        for vehicle in &state.vehicles {
            if let Some(route) = vehicle.route() {
                for leg in route.waypoints.windows(2) {
                    draw_line(&mut grid, to_grid(&leg[0]), to_grid(&leg[1]));
                }
            }
        }

        for order in state.orders.iter().chain(&state.assigned_orders) {
            let (row, col) = to_grid(&order.destination);
            grid[row][col] = 'o';
        }

        for warehouse in &state.warehouses {
            let (row, col) = to_grid(&warehouse.location);
            grid[row][col] = 'W';
        }

        for vehicle in &state.vehicles {
            let (row, col) = to_grid(&vehicle.location);
            grid[row][col] = vehicle.kind.map_symbol();
        }

        let border = format!("+{}+", "-".repeat(MAP_WIDTH));
        let mut lines = vec![
            "=== Logistics Map ===".to_string(),
            "Legend: W=Warehouse, V=Van, T=Truck, D=Drone, o=Order, .=Route".to_string(),
            border.clone(),
        ];
        for row in &grid {
            lines.push(format!("|{}|", row.iter().collect::<String>()));
        }
        lines.push(border);
        lines.join("\n")
    }
}

fn to_grid(location: &Location) -> (usize, usize) {
    let col = (location.x.clamp(0.0, 1.0) * (MAP_WIDTH - 1) as f64).round() as usize;
    let row = (location.y.clamp(0.0, 1.0) * (MAP_HEIGHT - 1) as f64).round() as usize;
    (row.min(MAP_HEIGHT - 1), col.min(MAP_WIDTH - 1))
}

/// Bresenham line between two grid cells, only over empty cells
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize)) {
    let (start_row, start_col) = (from.0 as i32, from.1 as i32);
    let (end_row, end_col) = (to.0 as i32, to.1 as i32);

    let dx = (end_col - start_col).abs();
    let dy = (end_row - start_row).abs();
    let sx = if start_col < end_col { 1 } else { -1 };
    let sy = if start_row < end_row { 1 } else { -1 };

    let mut err = dx - dy;
    let mut x = start_col;
    let mut y = start_row;

    loop {
        if let Some(cell) = grid
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            if *cell == ' ' {
                *cell = '.';
            }
        }

        if x == end_col && y == end_row {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}
