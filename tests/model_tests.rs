//! World model validation tests
//!
//! Orders, routes, vehicles, warehouses, metrics and the game state store.

use supply_chain_sim::simulation::{
    GameState, GameStatus, Location, LogisticsEvent, Order, OrderId, OrderPriority,
    PerformanceMetrics, Product, Route, Vehicle, VehicleId, VehicleStatus, VehicleType,
    Warehouse, WarehouseId, STARTING_BUDGET,
};

fn order(id: u64, product: Product, quantity: u32, priority: OrderPriority) -> Order {
    Order::new(
        OrderId(id),
        product,
        quantity,
        Location::new(1.0, 0.0),
        priority,
        0.0,
        100.0,
    )
}

#[test]
fn test_order_value_uses_priority_multiplier() {
    assert_eq!(order(0, Product::Electronics, 2, OrderPriority::Standard).value(), 200.0);
    assert_eq!(order(0, Product::Furniture, 1, OrderPriority::Express).value(), 750.0);
    assert_eq!(order(0, Product::Books, 10, OrderPriority::Urgent).value(), 400.0);
}

#[test]
fn test_order_weight() {
    assert_eq!(order(0, Product::Furniture, 3, OrderPriority::Standard).total_weight(), 150.0);
    assert_eq!(order(0, Product::Books, 4, OrderPriority::Urgent).total_weight(), 2.0);
}

#[test]
fn test_order_is_not_overdue_at_its_deadline() {
    let order = order(0, Product::Clothing, 1, OrderPriority::Standard);
    assert!(!order.is_overdue(99.0));
    assert!(!order.is_overdue(100.0));
    assert!(order.is_overdue(100.5));
}

#[test]
fn test_route_distance_and_duration() {
    let route = Route::new(
        Location::new(0.0, 0.0),
        &[Location::new(0.3, 0.4), Location::new(0.3, 1.4)],
        Vec::new(),
    );
    assert!((route.total_distance() - 1.5).abs() < 1e-9);
    assert!((route.estimated_duration(60.0) - 90.0).abs() < 1e-9);
    assert_eq!(route.origin(), Location::new(0.0, 0.0));
    assert_eq!(route.destination(), Location::new(0.3, 1.4));
}

#[test]
fn test_route_point_at_follows_legs() {
    let route = Route::new(
        Location::new(0.0, 0.0),
        &[Location::new(1.0, 0.0), Location::new(1.0, 1.0)],
        Vec::new(),
    );

    let start = route.point_at(0.0);
    assert_eq!(start, Location::new(0.0, 0.0));

    let quarter = route.point_at(0.25);
    assert!((quarter.x - 0.5).abs() < 1e-9 && quarter.y.abs() < 1e-9);

    let three_quarters = route.point_at(0.75);
    assert!((three_quarters.x - 1.0).abs() < 1e-9 && (three_quarters.y - 0.5).abs() < 1e-9);

    assert_eq!(route.point_at(2.0), Location::new(1.0, 1.0));
}

#[test]
fn test_zero_length_route_sits_at_destination() {
    let here = Location::new(0.4, 0.4);
    let route = Route::direct(here, here, Vec::new());
    assert_eq!(route.total_distance(), 0.0);
    assert_eq!(route.point_at(0.5), here);
}

#[test]
fn test_vehicle_defaults_by_type() {
    let van = Vehicle::new(VehicleId(0), VehicleType::Van, Location::default());
    assert_eq!(van.capacity, 200.0);
    assert_eq!(van.speed, 50.0);
    assert!(van.is_available());
    assert_eq!(van.available_capacity(), 200.0);

    let drone = Vehicle::new(VehicleId(1), VehicleType::Drone, Location::default());
    assert_eq!(drone.capacity, 10.0);
    assert_eq!(drone.kind.map_symbol(), 'D');
}

#[test]
fn test_vehicle_can_carry_checks_weight_and_status() {
    let mut drone = Vehicle::new(VehicleId(0), VehicleType::Drone, Location::default());
    let light = Route::direct(
        Location::default(),
        Location::new(1.0, 0.0),
        vec![order(0, Product::Electronics, 5, OrderPriority::Standard)],
    );
    let heavy = Route::direct(
        Location::default(),
        Location::new(1.0, 0.0),
        vec![order(1, Product::Furniture, 1, OrderPriority::Standard)],
    );

    assert!(drone.can_carry(&light));
    assert!(!drone.can_carry(&heavy));

    drone.status = VehicleStatus::Maintenance;
    assert!(!drone.can_carry(&light));
}

#[test]
fn test_warehouse_remove_stock_is_all_or_nothing() {
    let mut warehouse = Warehouse::new(WarehouseId(0), "Test", Location::default(), 100);
    assert!(warehouse.add_stock(Product::Electronics, 10));

    assert!(!warehouse.remove_stock(Product::Electronics, 11));
    assert_eq!(warehouse.stock_of(Product::Electronics), 10);

    assert!(warehouse.remove_stock(Product::Electronics, 5));
    assert_eq!(warehouse.stock_of(Product::Electronics), 5);

    assert!(!warehouse.remove_stock(Product::Books, 1));
}

#[test]
fn test_warehouse_add_stock_respects_capacity() {
    let mut warehouse = Warehouse::new(WarehouseId(0), "Test", Location::default(), 1000);
    assert!(warehouse.add_stock(Product::Furniture, 500));

    assert!(!warehouse.add_stock(Product::Clothing, 600));
    assert_eq!(warehouse.total_stored(), 500);
    assert_eq!(warehouse.available_capacity(), 500);
    assert!((warehouse.utilization_rate() - 0.5).abs() < 1e-9);

    assert!(warehouse.add_stock(Product::Clothing, 500));
    assert_eq!(warehouse.available_capacity(), 0);
}

#[test]
fn test_metrics_smoothing() {
    let mut metrics = PerformanceMetrics::default();
    metrics.record_delivery(100.0, false);

    assert_eq!(metrics.average_delivery_time, 50.0);
    assert_eq!(metrics.on_time_rate, 0.5);
    assert!((metrics.customer_satisfaction - 0.4).abs() < 1e-9);

    metrics.add_revenue(300.0);
    metrics.add_cost(100.0);
    assert_eq!(metrics.profit(), 200.0);
    assert!((metrics.profit_margin() - 2.0 / 3.0).abs() < 1e-9);

    metrics.apply_satisfaction_multiplier(0.5);
    assert!((metrics.customer_satisfaction - 0.2).abs() < 1e-9);

    metrics.update_efficiency(0.2, 0.6);
    assert!((metrics.efficiency - 0.4).abs() < 1e-9);
}

#[test]
fn test_starting_world() {
    let state = GameState::new(STARTING_BUDGET);
    assert_eq!(state.status, GameStatus::Menu);
    assert_eq!(state.budget, STARTING_BUDGET);
    assert_eq!(state.warehouses.len(), 1);
    assert_eq!(state.warehouses[0].name, "Main Warehouse");
    assert_eq!(state.vehicles.len(), 1);
    assert_eq!(state.vehicles[0].kind, VehicleType::Truck);
    assert_eq!(state.vehicles[0].location, state.warehouses[0].location);
}

#[test]
fn test_order_lifecycle_in_store() {
    let mut state = GameState::with_budget(1000.0);
    let placed = order(7, Product::Electronics, 1, OrderPriority::Standard);

    state.apply(&LogisticsEvent::OrderPlaced(placed.clone()));
    state.apply(&LogisticsEvent::OrderPlaced(placed.clone()));
    assert_eq!(state.orders.len(), 1);

    let route = Route::direct(Location::default(), placed.destination, vec![placed.clone()]);
    state.apply(&LogisticsEvent::VehicleDispatched {
        vehicle: VehicleId(0),
        route,
    });
    assert!(state.orders.is_empty());
    assert_eq!(state.assigned_orders.len(), 1);

    let follow_up = state.apply(&LogisticsEvent::OrderFulfilled(placed.clone()));
    assert_eq!(state.budget, 1100.0);
    assert_eq!(state.score, 10);
    assert_eq!(state.completed_orders.len(), 1);
    assert_eq!(follow_up.len(), 1);

    // A repeated fulfilment is ignored
    let repeat = state.apply(&LogisticsEvent::OrderFulfilled(placed));
    assert!(repeat.is_empty());
    assert_eq!(state.budget, 1100.0);
    assert_eq!(state.total_known_orders(), 1);
}

#[test]
fn test_pause_returns_to_previous_status() {
    let mut state = GameState::with_budget(1000.0);
    state.apply(&LogisticsEvent::GameStarted);
    state.status = GameStatus::Tutorial;

    state.apply(&LogisticsEvent::GamePaused);
    assert_eq!(state.status, GameStatus::Paused);
    assert!(!state.is_running());

    state.apply(&LogisticsEvent::GameResumed);
    assert_eq!(state.status, GameStatus::Tutorial);

    state.apply(&LogisticsEvent::GameEnded);
    state.apply(&LogisticsEvent::GamePaused);
    assert_eq!(state.status, GameStatus::GameOver);
}
