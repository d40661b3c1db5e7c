//! Order, warehouse, vehicle and weather manager tests

use std::cell::RefCell;
use std::rc::Rc;

use supply_chain_sim::simulation::{
    Envelope, GameConfig, GameState, Location, LogisticsEvent, Order, OrderId, OrderManager,
    OrderPriority, Outbox, Product, Route, Scheduler, SharedScheduler, SharedState, TimerKind,
    VehicleManager, VehicleType, WarehouseManager, WeatherCondition, WeatherEvent,
    WeatherManager,
};

struct Fixture {
    state: SharedState,
    scheduler: SharedScheduler,
    config: Rc<GameConfig>,
}

impl Fixture {
    fn new(state: GameState) -> Self {
        Self {
            state: state.into_shared(),
            scheduler: Rc::new(RefCell::new(Scheduler::new())),
            config: Rc::new(GameConfig::with_seed(42)),
        }
    }

    fn orders(&self) -> OrderManager {
        OrderManager::new(
            Rc::clone(&self.state),
            Rc::clone(&self.scheduler),
            self.config.make_rng(),
            Rc::clone(&self.config),
        )
    }

    fn warehouses(&self) -> WarehouseManager {
        WarehouseManager::new(
            Rc::clone(&self.state),
            self.config.make_rng(),
            Rc::clone(&self.config),
        )
    }

    fn vehicles(&self) -> VehicleManager {
        VehicleManager::new(
            Rc::clone(&self.state),
            Rc::clone(&self.scheduler),
            Rc::clone(&self.config),
        )
    }

    /// Fire every due timer up to `until`, passing each to `on_fire`
    fn run_until(&self, until: f64, mut on_fire: impl FnMut(TimerKind)) {
        loop {
            let due = self.scheduler.borrow_mut().pop_due(until);
            let Some((_, kind)) = due else {
                break;
            };
            on_fire(kind);
        }
        self.scheduler.borrow_mut().set_now(until);
    }
}

fn order_at(id: u64, product: Product, quantity: u32, destination: Location) -> Order {
    Order::new(
        OrderId(id),
        product,
        quantity,
        destination,
        OrderPriority::Standard,
        0.0,
        600.0,
    )
}

fn placed_order(outbox: &Outbox) -> Order {
    outbox
        .iter()
        .find_map(|envelope| match envelope {
            Envelope::Logistics(LogisticsEvent::OrderPlaced(order)) => {
                Some(order.clone())
            }
            _ => None,
        })
        .expect("no order placed")
}

#[test]
fn test_generated_orders_stay_within_domains() {
    let fixture = Fixture::new(GameState::with_budget(0.0));
    let mut orders = fixture.orders();

    for _ in 0..50 {
        let order = placed_order(&orders.generate_order());
        assert!((1..=fixture.config.max_order_quantity).contains(&order.quantity));
        assert!((0.0..=1.0).contains(&order.destination.x));
        assert!((0.0..=1.0).contains(&order.destination.y));
        let window = order.deadline - order.placed_at;
        assert!(fixture.config.deadline_window.contains(&window));
    }
}

#[test]
fn test_generation_timer_rearms_after_firing() {
    let fixture = Fixture::new(GameState::with_budget(0.0));
    let mut orders = fixture.orders();
    orders.start_generation();
    assert!(orders.is_generating());

    let mut placed = 0;
    fixture.run_until(100.0, |kind| {
        assert_eq!(kind, TimerKind::OrderGeneration);
        placed += orders.on_generation_timer().len();
    });

    // Intervals are drawn from 5..=15 seconds
    assert!((6..=20).contains(&placed), "placed {} orders", placed);
    assert!(orders.is_generating());

    orders.stop_generation();
    assert!(!orders.is_generating());
}

#[test]
fn test_order_queries() {
    let fixture = Fixture::new(GameState::with_budget(0.0));
    let orders = fixture.orders();
    {
        let mut state = fixture.state.borrow_mut();
        let mut urgent = order_at(0, Product::Books, 1, Location::default());
        urgent.priority = OrderPriority::Urgent;
        urgent.deadline = 50.0;
        let mut express = order_at(1, Product::Books, 1, Location::default());
        express.priority = OrderPriority::Express;
        let standard = order_at(2, Product::Furniture, 2, Location::default());
        state.orders.extend([standard, express, urgent]);
    }

    let by_priority: Vec<OrderId> = orders.orders_by_priority().iter().map(|o| o.id).collect();
    assert_eq!(by_priority, vec![OrderId(0), OrderId(1), OrderId(2)]);

    assert_eq!(orders.high_priority_orders().len(), 2);
    assert_eq!(orders.overdue_orders(60.0).len(), 1);
    assert!(orders.overdue_orders(50.0).is_empty());

    // 20*2 + 20*1.5 + 500*2
    assert!((orders.total_active_value() - 1070.0).abs() < 1e-9);
}

#[test]
fn test_allocation_is_first_match_and_reports_low_stock() {
    let mut state = GameState::with_budget(0.0);
    let first = state.add_warehouse("North", Location::new(0.0, 0.0), 500);
    let second = state.add_warehouse("South", Location::new(1.0, 1.0), 500);
    let fixture = Fixture::new(state);
    {
        let mut state = fixture.state.borrow_mut();
        state.warehouse_mut(first).unwrap().add_stock(Product::Clothing, 12);
        state.warehouse_mut(second).unwrap().add_stock(Product::Clothing, 100);
    }
    let mut warehouses = fixture.warehouses();

    // Nearer to the second warehouse, still served by the first
    let order = order_at(0, Product::Clothing, 5, Location::new(0.9, 0.9));
    let mut outbox = Outbox::new();
    let source = warehouses.allocate_inventory(&order, &mut outbox).unwrap();

    assert_eq!(source.id, first);
    assert_eq!(source.stock_of(Product::Clothing), 7);
    assert_eq!(
        outbox.iter().next(),
        Some(&Envelope::from(LogisticsEvent::InventoryLow {
            product: Product::Clothing,
            warehouse: first,
        }))
    );

    // First warehouse cannot cover 10 more, so the second one does
    let order = order_at(1, Product::Clothing, 10, Location::default());
    let mut outbox = Outbox::new();
    let source = warehouses.allocate_inventory(&order, &mut outbox).unwrap();
    assert_eq!(source.id, second);
    assert!(outbox.is_empty());
}

#[test]
fn test_allocation_without_stock_fails_cleanly() {
    let mut state = GameState::with_budget(0.0);
    state.add_warehouse("Empty", Location::default(), 100);
    let fixture = Fixture::new(state);
    let mut warehouses = fixture.warehouses();

    let mut outbox = Outbox::new();
    let order = order_at(0, Product::Electronics, 1, Location::default());
    assert!(warehouses.allocate_inventory(&order, &mut outbox).is_none());
    assert!(outbox.is_empty());
}

#[test]
fn test_low_stock_replenishes_once() {
    let mut state = GameState::with_budget(0.0);
    let id = state.add_warehouse("Main", Location::default(), 1000);
    let fixture = Fixture::new(state);
    let mut warehouses = fixture.warehouses();

    let reorder = warehouses.handle(&LogisticsEvent::InventoryLow {
        product: Product::Books,
        warehouse: id,
    });
    assert_eq!(reorder.len(), 1);
    // The low-stock report alone moves no stock
    assert_eq!(fixture.state.borrow().warehouse(id).unwrap().stock_of(Product::Books), 0);

    for envelope in reorder {
        if let Envelope::Logistics(event) = envelope {
            assert!(warehouses.handle(&event).is_empty());
        }
    }
    assert_eq!(
        fixture.state.borrow().warehouse(id).unwrap().stock_of(Product::Books),
        100
    );
}

#[test]
fn test_reorder_quantity_has_a_floor() {
    let mut state = GameState::with_budget(0.0);
    let small = state.add_warehouse("Small", Location::default(), 200);
    let large = state.add_warehouse("Large", Location::default(), 2000);
    let fixture = Fixture::new(state);
    let warehouses = fixture.warehouses();

    let state = fixture.state.borrow();
    assert_eq!(warehouses.reorder_quantity(state.warehouse(small).unwrap()), 50);
    assert_eq!(warehouses.reorder_quantity(state.warehouse(large).unwrap()), 200);
}

#[test]
fn test_released_allocation_restores_stock() {
    let mut state = GameState::with_budget(0.0);
    let id = state.add_warehouse("Main", Location::default(), 100);
    let fixture = Fixture::new(state);
    fixture
        .state
        .borrow_mut()
        .warehouse_mut(id)
        .unwrap()
        .add_stock(Product::Furniture, 30);
    let mut warehouses = fixture.warehouses();

    let order = order_at(0, Product::Furniture, 4, Location::default());
    let mut outbox = Outbox::new();
    warehouses.allocate_inventory(&order, &mut outbox).unwrap();
    assert!(warehouses.release_allocation(id, &order));

    assert_eq!(
        fixture.state.borrow().warehouse(id).unwrap().stock_of(Product::Furniture),
        30
    );
}

#[test]
fn test_initial_inventory_is_stocked_in_place() {
    let fixture = Fixture::new(GameState::new(0.0));
    let mut warehouses = fixture.warehouses();
    warehouses.stock_initial_inventory();

    let state = fixture.state.borrow();
    for product in Product::ALL {
        let stock = state.warehouses[0].stock_of(product);
        assert!((20..=50).contains(&stock), "{} stock {}", product.name(), stock);
    }
    assert!(warehouses.utilization() > 0.0);
}

#[test]
fn test_nearest_available_vehicle() {
    let mut state = GameState::with_budget(0.0);
    state.add_vehicle(VehicleType::Van, Location::new(0.9, 0.9));
    let near = state.add_vehicle(VehicleType::Truck, Location::new(0.2, 0.2));
    let fixture = Fixture::new(state);
    let vehicles = fixture.vehicles();

    let found = vehicles
        .find_nearest_available_vehicle(Location::new(0.0, 0.0))
        .unwrap();
    assert_eq!(found.id, near);
}

#[test]
fn test_vehicle_travels_and_arrives() {
    let mut state = GameState::with_budget(0.0);
    let truck = state.add_vehicle(VehicleType::Truck, Location::new(0.0, 0.0));
    let fixture = Fixture::new(state);
    let mut vehicles = fixture.vehicles();

    let order = order_at(0, Product::Electronics, 1, Location::new(1.0, 0.0));
    let route = Route::direct(Location::new(0.0, 0.0), order.destination, vec![order.clone()]);
    let dispatched = vehicles.dispatch(truck, route).unwrap();
    assert_eq!(dispatched.len(), 1);
    assert_eq!(fixture.state.borrow().vehicle(truck).unwrap().current_load, 2.0);

    let mut arrivals = Vec::new();
    fixture.run_until(30.0, |kind| {
        assert_eq!(kind, TimerKind::VehicleUpdate(truck));
        arrivals.extend(vehicles.on_ticker(truck));
    });
    assert!(arrivals.is_empty());
    let halfway = fixture.state.borrow().vehicle(truck).unwrap().location;
    assert!((halfway.x - 0.5).abs() < 1e-9 && halfway.y.abs() < 1e-9);

    fixture.run_until(60.0, |_| arrivals.extend(vehicles.on_ticker(truck)));
    assert_eq!(arrivals.len(), 1);
    assert_eq!(vehicles.active_trips(), 0);

    let deliveries = vehicles.arrival_events(truck, order.destination);
    assert_eq!(deliveries.len(), 2);

    vehicles.finish_arrival(truck, order.destination);
    let state = fixture.state.borrow();
    let parked = state.vehicle(truck).unwrap();
    assert!(parked.is_available());
    assert_eq!(parked.current_load, 0.0);
    assert_eq!(parked.location, order.destination);
}

#[test]
fn test_dispatch_rejects_busy_or_overloaded_vehicles() {
    let mut state = GameState::with_budget(0.0);
    let drone = state.add_vehicle(VehicleType::Drone, Location::default());
    let fixture = Fixture::new(state);
    let mut vehicles = fixture.vehicles();

    let heavy = order_at(0, Product::Furniture, 1, Location::new(1.0, 1.0));
    let route = Route::direct(Location::default(), heavy.destination, vec![heavy]);
    assert!(vehicles.dispatch(drone, route).is_none());
    assert!(fixture.state.borrow().vehicle(drone).unwrap().is_available());

    let light = order_at(1, Product::Books, 2, Location::new(1.0, 1.0));
    let route = Route::direct(Location::default(), light.destination, vec![light]);
    assert!(vehicles.dispatch(drone, route.clone()).is_some());
    assert!(vehicles.dispatch(drone, route).is_none());
}

#[test]
fn test_truck_rejects_route_over_capacity() {
    let mut state = GameState::with_budget(0.0);
    let truck = state.add_vehicle(VehicleType::Truck, Location::default());
    let fixture = Fixture::new(state);
    let mut vehicles = fixture.vehicles();

    // 12 x 50 kg of furniture is 600 kg against 500 kg of capacity
    let bulky = order_at(0, Product::Furniture, 12, Location::new(1.0, 0.0));
    let route = Route::direct(Location::default(), bulky.destination, vec![bulky]);
    assert_eq!(route.total_weight(), 600.0);
    assert!(vehicles.dispatch(truck, route).is_none());

    let state = fixture.state.borrow();
    let idle = state.vehicle(truck).unwrap();
    assert!(idle.is_available());
    assert_eq!(idle.current_load, 0.0);
    assert_eq!(vehicles.active_trips(), 0);
}

#[test]
fn test_suspended_trip_keeps_progress() {
    let mut state = GameState::with_budget(0.0);
    let van = state.add_vehicle(VehicleType::Van, Location::default());
    let fixture = Fixture::new(state);
    let mut vehicles = fixture.vehicles();

    let order = order_at(0, Product::Books, 1, Location::new(1.0, 0.0));
    let route = Route::direct(Location::default(), order.destination, vec![order]);
    vehicles.dispatch(van, route).unwrap();

    fixture.run_until(10.0, |_| {
        vehicles.on_ticker(van);
    });
    vehicles.suspend();
    let elapsed = vehicles.trip(van).unwrap().elapsed;
    assert!((elapsed - 10.0).abs() < 1e-9);

    fixture.run_until(50.0, |_| panic!("no timers while suspended"));
    assert!((vehicles.trip(van).unwrap().elapsed - 10.0).abs() < 1e-9);

    vehicles.resume();
    fixture.run_until(55.0, |_| {
        vehicles.on_ticker(van);
    });
    assert!((vehicles.trip(van).unwrap().elapsed - 15.0).abs() < 1e-9);
}

#[test]
fn test_weather_never_repeats_condition() {
    let fixture = Fixture::new(GameState::with_budget(0.0));
    let mut weather = WeatherManager::new(
        Rc::clone(&fixture.scheduler),
        fixture.config.make_rng(),
        Rc::clone(&fixture.config),
    );

    for _ in 0..30 {
        let before = weather.current();
        let changed = weather.on_change_timer();
        let after = weather.current();
        assert_ne!(before, after);
        assert_eq!(changed.len(), 1);

        if after == WeatherCondition::Clear {
            assert_eq!(weather.intensity(), 0.0);
        } else {
            assert!((0.3..=0.8).contains(&weather.intensity()));
        }
    }
    assert!(weather.is_running());
}

#[test]
fn test_weather_change_event() {
    let fixture = Fixture::new(GameState::with_budget(0.0));
    let mut weather = WeatherManager::new(
        Rc::clone(&fixture.scheduler),
        fixture.config.make_rng(),
        Rc::clone(&fixture.config),
    );

    let outbox = weather.change_to(WeatherCondition::Snow);
    let event = outbox.into_iter().next().unwrap();
    match event {
        Envelope::Weather(WeatherEvent::Changed { from, to, .. }) => {
            assert_eq!(from, WeatherCondition::Clear);
            assert_eq!(to, WeatherCondition::Snow);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(WeatherCondition::Snow.speed_multiplier() < 1.0);
}

#[test]
fn test_weather_countdown() {
    let fixture = Fixture::new(GameState::with_budget(0.0));
    let mut weather = WeatherManager::new(
        Rc::clone(&fixture.scheduler),
        fixture.config.make_rng(),
        Rc::clone(&fixture.config),
    );
    weather.start();
    let initial = weather.time_until_change();

    fixture.run_until(10.0, |kind| {
        if kind == TimerKind::WeatherCountdown {
            weather.on_countdown();
        }
    });
    assert!((initial - weather.time_until_change() - 10.0).abs() < 1e-9);

    weather.stop();
    assert!(!weather.is_running());
}
