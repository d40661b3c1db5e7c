use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use supply_chain_sim::simulation::{
    FileSettings, GameConfig, GameEngine, MemorySettings, SharedSettings, TutorialStep,
};

#[derive(Parser)]
#[command(name = "supply_chain_sim")]
#[command(about = "Headless supply chain logistics simulation")]
struct Cli {
    /// Simulated seconds to run
    #[arg(long, default_value = "600")]
    seconds: f64,

    /// Simulated seconds per step
    #[arg(long, default_value = "1.0")]
    delta: f64,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// RON file for persistent player settings
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Skip the guided tutorial
    #[arg(long)]
    skip_tutorial: bool,

    /// Let weather slow vehicles down
    #[arg(long)]
    weather_travel: bool,

    /// Let weather scale customer satisfaction
    #[arg(long)]
    weather_satisfaction: bool,

    /// Print a map every this many simulated seconds (0 disables)
    #[arg(long, default_value = "0")]
    report_every: f64,

    /// Do not print maps
    #[arg(long)]
    no_map: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let settings: SharedSettings = match &cli.settings {
        Some(path) => FileSettings::open(path)?.into_shared(),
        None => MemorySettings::shared(),
    };

    let config = GameConfig {
        seed: cli.seed,
        weather_affects_travel: cli.weather_travel,
        weather_affects_satisfaction: cli.weather_satisfaction,
        ..GameConfig::default()
    };

    run_headless(GameEngine::new(config, settings), &cli);
    Ok(())
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(engine: GameEngine, cli: &Cli) {
    info!("Running supply chain simulation in headless mode...");
    info!("Seconds: {}, Delta: {}s", cli.seconds, cli.delta);

    let delta = cli.delta.max(0.01);
    engine.start_game();
    if cli.skip_tutorial {
        engine.skip_tutorial();
    }

    println!("Initial state:");
    report(&engine, cli.no_map);

    let mut next_report = cli.report_every;
    while engine.now() < cli.seconds {
        play_tutorial(&engine);
        engine.advance(delta.min(cli.seconds - engine.now()));

        if cli.report_every > 0.0 && engine.now() >= next_report {
            println!("--- After {:.1}s simulated time ---", engine.now());
            report(&engine, cli.no_map);
            next_report += cli.report_every;
        }

        if !engine.is_running() && engine.state().budget <= 0.0 {
            break;
        }
    }

    info!("=== SIMULATION COMPLETE ===");
    {
        let state = engine.state();
        info!("Simulated time: {:.0}s", engine.now());
        info!("Final budget: ${:.2}", state.budget);
        info!("Score: {}", state.score);
        info!("Orders delivered: {}", state.completed_orders.len());
        info!("Orders in transit: {}", state.assigned_orders.len());
        info!("Orders waiting: {}", state.orders.len());
        info!("On-time rate: {:.1}%", state.performance.on_time_rate * 100.0);
    }
    info!("Player level: {}", engine.levels().current().level);
    info!("Achievements unlocked: {}", engine.achievements().unlocked().len());

    println!("=== Final State ===");
    report(&engine, cli.no_map);
}

/// Stand in for the player while the tutorial is up
fn play_tutorial(engine: &GameEngine) {
    let (step, order) = {
        let tutorial = engine.tutorial();
        if !tutorial.is_active() {
            return;
        }
        (tutorial.current_step(), tutorial.seed_order_id())
    };

    if step.can_auto_advance() {
        engine.advance_tutorial();
    } else if step == TutorialStep::AssignVehicle {
        let vehicle = engine.vehicles().available_vehicles().first().map(|v| v.id);
        if let (Some(order), Some(vehicle)) = (order, vehicle) {
            engine.assign_order(order, vehicle);
        }
    }
}

fn report(engine: &GameEngine, no_map: bool) {
    println!("{}", engine.summary());
    if !no_map {
        println!("{}", engine.draw_map());
    }
    println!();
}
