//! Tutorial, level and achievement tests

use std::cell::RefCell;
use std::rc::Rc;

use supply_chain_sim::simulation::{
    AchievementEvent, AchievementManager, AchievementType, Envelope, GameConfig, GameEngine,
    GameState, GameStatus, LevelEvent, LevelSystem, LevelUnlock, Location, LogisticsEvent,
    MemorySettings, Order, OrderId, OrderPriority, PlayerLevel, Product, Scheduler,
    SettingsStore, SharedScheduler, TimerKind, TutorialStep, VehicleType, LEVELS,
    PLAYER_EXPERIENCE_KEY, PLAYER_LEVEL_KEY, STARTING_BUDGET, TUTORIAL_COMPLETED_KEY,
};

fn quiet_config() -> GameConfig {
    GameConfig {
        order_interval: 100_000.0..=100_000.0,
        weather_change_interval: 100_000.0..=100_000.0,
        ..GameConfig::with_seed(11)
    }
}

fn scheduler() -> SharedScheduler {
    Rc::new(RefCell::new(Scheduler::new()))
}

fn sample_order(product: Product, quantity: u32, priority: OrderPriority) -> Order {
    Order::new(
        OrderId(0),
        product,
        quantity,
        Location::new(1.0, 1.0),
        priority,
        0.0,
        600.0,
    )
}

fn unlocked_kinds(outbox: &supply_chain_sim::simulation::Outbox) -> Vec<AchievementType> {
    outbox
        .iter()
        .filter_map(|envelope| match envelope {
            Envelope::Achievement(AchievementEvent::Unlocked(kind)) => Some(*kind),
            _ => None,
        })
        .collect()
}

// Tutorial

#[test]
fn test_tutorial_starts_for_new_player() {
    let engine = GameEngine::new(quiet_config(), MemorySettings::shared());
    engine.start_game();

    assert!(engine.tutorial().is_active());
    assert!(engine.tutorial().show_overlay());
    assert_eq!(engine.tutorial().current_step(), TutorialStep::Welcome);
    assert_eq!(engine.state().status, GameStatus::Tutorial);
}

#[test]
fn test_tutorial_does_not_start_for_returning_player() {
    let settings = MemorySettings::shared();
    settings
        .borrow_mut()
        .set_bool(TUTORIAL_COMPLETED_KEY, true)
        .unwrap();
    let engine = GameEngine::new(quiet_config(), settings);
    engine.start_game();

    assert!(!engine.tutorial().is_active());
    assert_eq!(engine.state().status, GameStatus::Playing);
}

#[test]
fn test_tutorial_full_walkthrough() {
    let settings = MemorySettings::shared();
    let engine = GameEngine::new(quiet_config(), Rc::clone(&settings));
    engine.start_game();

    engine.advance_tutorial();
    engine.advance_tutorial();
    assert_eq!(engine.tutorial().current_step(), TutorialStep::ViewFirstOrder);

    // A seed order is placed and left for the player
    let seed = engine.state().orders[0].clone();
    assert_eq!(seed.product, Product::Electronics);
    assert_eq!(seed.quantity, 1);
    assert!(engine.state().vehicles[0].is_available());

    engine.advance_tutorial();
    assert_eq!(engine.tutorial().current_step(), TutorialStep::AssignVehicle);

    // Gated until a vehicle is dispatched
    engine.advance_tutorial();
    assert_eq!(engine.tutorial().current_step(), TutorialStep::AssignVehicle);

    let truck = engine.state().vehicles[0].id;
    engine.assign_order(seed.id, truck);
    assert_eq!(engine.tutorial().current_step(), TutorialStep::WatchDelivery);

    // Main warehouse to (0.8, 0.3) takes about 22 seconds
    engine.advance(22.5);
    assert_eq!(engine.state().completed_orders.len(), 1);
    assert_eq!(engine.tutorial().current_step(), TutorialStep::CheckPerformance);

    engine.advance(5.0);
    assert_eq!(engine.tutorial().current_step(), TutorialStep::Completed);

    engine.advance(5.0);
    assert!(!engine.tutorial().is_active());
    assert_eq!(engine.state().status, GameStatus::Playing);
    assert!(settings.borrow().get_bool(TUTORIAL_COMPLETED_KEY));
}

#[test]
fn test_seed_order_waits_for_player() {
    let engine = GameEngine::new(quiet_config(), MemorySettings::shared());
    engine.start_game();
    engine.advance_tutorial();
    engine.advance_tutorial();

    let seed = engine.tutorial().seed_order_id().unwrap();
    assert_eq!(engine.state().orders.len(), 1);
    assert_eq!(engine.state().orders[0].id, seed);
    assert!(engine.state().vehicles[0].is_available());
}

#[test]
fn test_other_orders_are_dispatched_during_tutorial() {
    let engine = GameEngine::new(quiet_config(), MemorySettings::shared());
    engine.start_game();
    assert_eq!(engine.state().status, GameStatus::Tutorial);

    let id = engine.place_order(
        Product::Electronics,
        1,
        Location::new(0.9, 0.5),
        OrderPriority::Standard,
    );

    let state = engine.state();
    assert!(state.orders.is_empty());
    assert!(state.assigned_orders.iter().any(|order| order.id == id));
    assert!(state.vehicles[0].is_en_route());
}

#[test]
fn test_skip_tutorial_hands_over_to_normal_play() {
    let settings = MemorySettings::shared();
    let engine = GameEngine::new(quiet_config(), Rc::clone(&settings));
    engine.start_game();
    engine.skip_tutorial();

    assert!(!engine.tutorial().is_active());
    assert_eq!(engine.state().status, GameStatus::Playing);
    assert!(settings.borrow().get_bool(TUTORIAL_COMPLETED_KEY));

    engine.place_order(
        Product::Books,
        1,
        Location::new(0.1, 0.1),
        OrderPriority::Standard,
    );
    assert!(engine.state().orders.is_empty());
    assert!(engine.state().vehicles[0].is_en_route());
}

#[test]
fn test_reset_tutorial_runs_it_again_next_session() {
    let settings = MemorySettings::shared();
    {
        let engine = GameEngine::new(quiet_config(), Rc::clone(&settings));
        engine.start_game();
        engine.skip_tutorial();
        engine.reset_tutorial();
        assert!(!settings.borrow().get_bool(TUTORIAL_COMPLETED_KEY));
    }

    let engine = GameEngine::new(quiet_config(), settings);
    engine.start_game();
    assert!(engine.tutorial().is_active());
}

#[test]
fn test_reset_during_tutorial_returns_to_play() {
    let engine = GameEngine::new(quiet_config(), MemorySettings::shared());
    engine.start_game();
    engine.reset_tutorial();

    assert!(!engine.tutorial().is_active());
    assert_eq!(engine.state().status, GameStatus::Playing);
}

#[test]
fn test_tutorial_steps_describe_themselves() {
    assert_eq!(TutorialStep::Welcome.next(), Some(TutorialStep::UnderstandDashboard));
    assert_eq!(TutorialStep::Completed.next(), None);
    assert!(TutorialStep::ViewFirstOrder.can_auto_advance());
    assert!(!TutorialStep::WatchDelivery.can_auto_advance());
    for step in TutorialStep::ALL {
        assert!(!step.title().is_empty());
        assert!(!step.description().is_empty());
    }
}

// Levels

#[test]
fn test_level_table() {
    assert_eq!(LEVELS.len(), 10);
    assert!(LEVELS
        .windows(2)
        .all(|pair| pair[0].experience_required < pair[1].experience_required));
    assert_eq!(LEVELS[9].experience_required, 17000);
}

#[test]
fn test_player_level_progress() {
    let player = PlayerLevel {
        level: 1,
        experience: 250,
    };
    assert!((player.progress_to_next() - 0.5).abs() < 1e-9);
    assert_eq!(player.experience_to_next(), 250);
    assert!(!player.is_max_level());

    let veteran = PlayerLevel {
        level: 3,
        experience: 1500,
    };
    let features = veteran.unlocked_features();
    assert!(features.contains(&LevelUnlock::Vehicle(VehicleType::Drone)));
    assert!(features.contains(&LevelUnlock::MultiStopRoutes));
    assert!(!features.contains(&LevelUnlock::ContractSystem));

    let master = PlayerLevel {
        level: 10,
        experience: 20000,
    };
    assert!(master.is_max_level());
    assert_eq!(master.progress_to_next(), 1.0);
    assert_eq!(master.experience_to_next(), 0);
}

#[test]
fn test_experience_levels_up_and_saves() {
    let settings = MemorySettings::shared();
    let scheduler = scheduler();
    let mut levels = LevelSystem::new(Rc::clone(&scheduler), Rc::clone(&settings));
    assert_eq!(levels.current(), PlayerLevel::default());

    let events: Vec<Envelope> = levels.add_experience(500).into_iter().collect();
    assert_eq!(
        events,
        vec![
            Envelope::from(LevelEvent::ExperienceGained(500)),
            Envelope::from(LevelEvent::LevelUp(2)),
        ]
    );
    assert_eq!(levels.current().level, 2);
    assert_eq!(levels.notification().map(|req| req.level), Some(2));
    assert_eq!(settings.borrow().get(PLAYER_LEVEL_KEY), Some(2));
    assert_eq!(settings.borrow().get(PLAYER_EXPERIENCE_KEY), Some(500));

    // The banner is dismissed by an interface timer
    let (_, kind) = scheduler.borrow_mut().pop_due(10.0).unwrap();
    assert_eq!(kind, TimerKind::DismissLevelUp(2));
    levels.dismiss_notification(2);
    assert!(levels.notification().is_none());
}

#[test]
fn test_large_gain_crosses_several_levels() {
    let mut levels = LevelSystem::new(scheduler(), MemorySettings::shared());
    let level_ups = levels
        .add_experience(3000)
        .into_iter()
        .filter(|event| matches!(event, Envelope::Level(LevelEvent::LevelUp(_))))
        .count();

    assert_eq!(level_ups, 4);
    assert_eq!(levels.current().level, 5);
    assert!(levels.is_feature_unlocked(LevelUnlock::WeatherPrediction));
}

#[test]
fn test_zero_experience_is_ignored() {
    let mut levels = LevelSystem::new(scheduler(), MemorySettings::shared());
    assert!(levels.add_experience(0).is_empty());
}

#[test]
fn test_progress_is_restored_and_reset() {
    let settings = MemorySettings::shared();
    {
        let mut store = settings.borrow_mut();
        store.set(PLAYER_LEVEL_KEY, 4).unwrap();
        store.set(PLAYER_EXPERIENCE_KEY, 2100).unwrap();
    }

    let mut levels = LevelSystem::new(scheduler(), Rc::clone(&settings));
    assert_eq!(
        levels.current(),
        PlayerLevel {
            level: 4,
            experience: 2100
        }
    );

    levels.reset_progress();
    assert_eq!(levels.current(), PlayerLevel::default());
    assert_eq!(settings.borrow().get(PLAYER_LEVEL_KEY), Some(1));
}

#[test]
fn test_delivery_earns_experience() {
    let mut levels = LevelSystem::new(scheduler(), MemorySettings::shared());
    let order = sample_order(Product::Furniture, 2, OrderPriority::Standard);

    levels.handle(&LogisticsEvent::OrderFulfilled(order));
    assert_eq!(levels.current().experience, 100);

    levels.handle(&LogisticsEvent::ScoreIncreased {
        increase: 100,
        total: 100,
    });
    assert_eq!(levels.current().experience, 110);
}

#[test]
fn test_engine_syncs_level_into_state() {
    let settings = MemorySettings::shared();
    settings.borrow_mut().set(PLAYER_LEVEL_KEY, 3).unwrap();
    settings
        .borrow_mut()
        .set_bool(TUTORIAL_COMPLETED_KEY, true)
        .unwrap();

    let engine = GameEngine::new(quiet_config(), settings);
    assert_eq!(engine.state().level, 3);

    engine.reset_progress();
    assert_eq!(engine.state().level, 1);
    assert_eq!(engine.levels().current().level, 1);
}

// Achievements

fn achievements(state: GameState) -> (AchievementManager, SharedScheduler) {
    let scheduler = scheduler();
    let manager = AchievementManager::new(state.into_shared(), Rc::clone(&scheduler));
    (manager, scheduler)
}

fn delivery(order: Order) -> LogisticsEvent {
    LogisticsEvent::DeliverySuccessful {
        at: order.destination,
        order,
    }
}

#[test]
fn test_first_delivery_unlocks_once() {
    let (mut manager, scheduler) = achievements(GameState::new(STARTING_BUDGET));
    let order = sample_order(Product::Books, 1, OrderPriority::Standard);

    let first = manager.handle(&delivery(order.clone()));
    assert_eq!(unlocked_kinds(&first), vec![AchievementType::FirstDelivery]);
    assert_eq!(
        manager.popup().map(|shown| shown.kind),
        Some(AchievementType::FirstDelivery)
    );

    let second = manager.handle(&delivery(order));
    assert!(unlocked_kinds(&second).is_empty());

    let (_, kind) = scheduler.borrow_mut().pop_due(10.0).unwrap();
    assert_eq!(kind, TimerKind::DismissAchievement(AchievementType::FirstDelivery));
    manager.dismiss_popup(AchievementType::FirstDelivery);
    assert!(manager.popup().is_none());
}

#[test]
fn test_high_value_and_speed_achievements() {
    let (mut manager, _) = achievements(GameState::new(STARTING_BUDGET));

    let big = sample_order(Product::Furniture, 10, OrderPriority::Urgent);
    let unlocked = unlocked_kinds(&manager.handle(&delivery(big)));
    assert!(unlocked.contains(&AchievementType::HighValueHandler));

    let small = sample_order(Product::Books, 1, OrderPriority::Standard);
    for _ in 0..9 {
        manager.handle(&delivery(small.clone()));
    }
    assert!(manager.is_unlocked(AchievementType::SpeedDemon));
}

#[test]
fn test_budget_and_fleet_achievements() {
    let mut state = GameState::new(STARTING_BUDGET);
    for _ in 0..4 {
        state.add_vehicle(VehicleType::Van, Location::default());
    }
    let (mut manager, _) = achievements(state);

    let unlocked = unlocked_kinds(&manager.handle(&LogisticsEvent::BudgetChanged(100_000.0)));
    assert!(unlocked.contains(&AchievementType::Profitable));
    assert!(unlocked.contains(&AchievementType::FleetCommander));
    assert!(!unlocked.contains(&AchievementType::MultiTasker));
}

#[test]
fn test_rapid_growth_needs_time_and_doubling() {
    let mut state = GameState::new(STARTING_BUDGET);
    state.score = 100;
    let (mut manager, scheduler) = achievements(state);
    manager.handle(&LogisticsEvent::GameStarted);

    manager.handle(&LogisticsEvent::ScoreIncreased {
        increase: 100,
        total: 200,
    });
    assert!(!manager.is_unlocked(AchievementType::RapidGrowth));

    scheduler.borrow_mut().set_now(300.0);
    manager.handle(&LogisticsEvent::ScoreIncreased {
        increase: 10,
        total: 210,
    });
    assert!(manager.is_unlocked(AchievementType::RapidGrowth));
}

#[test]
fn test_achievement_catalogue() {
    assert_eq!(AchievementType::ALL.len(), 10);
    for kind in AchievementType::ALL {
        assert!(!kind.title().is_empty());
        assert!(!kind.description().is_empty());
    }
}
