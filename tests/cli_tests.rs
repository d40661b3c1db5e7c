use std::process::Command;

fn run_headless(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_supply_chain_sim"))
        .args(args)
        .env("RUST_LOG", "warn,supply_chain_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the simulation runs in headless mode without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = run_headless(&["--seconds", "120", "--seed", "3", "--skip-tutorial"]);

    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Logistics Map ==="));
    assert!(stdout.contains("=== Final State ==="));
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = run_headless(&["--seconds", "60", "--seed", "5", "--no-map"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    for statistic in [
        "Final budget:",
        "Score:",
        "Orders delivered:",
        "Orders in transit:",
        "Orders waiting:",
        "On-time rate:",
        "Player level:",
        "Achievements unlocked:",
    ] {
        assert!(stderr.contains(statistic), "Missing '{}' statistic", statistic);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("=== Logistics Map ==="));
}

/// Test that the headless player gets through the tutorial
#[test]
fn test_headless_run_completes_tutorial() {
    let output = run_headless(&["--seconds", "300", "--seed", "9", "--no-map"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Tutorial started"));
    assert!(
        stderr.contains("Tutorial completed"),
        "Tutorial did not finish. stderr: {}",
        stderr
    );
}

/// Test that settings persist between runs
#[test]
fn test_settings_file_persists_tutorial_completion() {
    let path = std::env::temp_dir().join(format!(
        "supply_chain_sim_settings_{}.ron",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    let path_arg = path.to_string_lossy().to_string();

    let first = run_headless(&["--seconds", "5", "--skip-tutorial", "--settings", &path_arg]);
    assert!(first.status.success());
    assert!(path.exists());

    let second = run_headless(&["--seconds", "5", "--settings", &path_arg]);
    assert!(second.status.success());
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(!stderr.contains("Tutorial started"));

    let _ = std::fs::remove_file(&path);
}
