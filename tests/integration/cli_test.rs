use std::path::PathBuf;
use std::process::{Command, Output};

fn scenario_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("scenario.json")
}

fn run_horizon(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_horizon"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute horizon")
}

#[test]
fn test_solve_finds_solutions() {
    let scenario = scenario_path();
    let output = run_horizon(&["solve", scenario.to_str().unwrap(), "-j", "2", "-v"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "solve failed\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Solving scenario:"));
    assert!(stdout.contains("Turns: 2 x 2 actions, 3 commands"));
    assert!(stdout.contains("solution(s), best first"));
    assert!(stdout.contains("#1 score"));
    assert!(stdout.contains("SCAN"));
    assert!(stdout.contains("Search Statistics:"));
}

#[test]
fn test_solve_with_depth_too_short() {
    let scenario = scenario_path();
    let output = run_horizon(&["solve", scenario.to_str().unwrap(), "--depth-limit", "1"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No solution found within 1 actions."));
}

#[test]
fn test_solve_clamps_depth_to_scenario_actions() {
    let scenario = scenario_path();
    let output = run_horizon(&[
        "solve",
        scenario.to_str().unwrap(),
        "--depth-limit",
        "2000000000",
        "-v",
    ]);

    assert!(
        output.status.success(),
        "solve failed\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    // The snapshot may be taken before the last depth finishes.
    let depths = stdout
        .lines()
        .find(|line| line.starts_with("Depths completed: "))
        .expect("statistics missing");
    assert!(depths.ends_with("/5"), "{}", depths);
}

#[test]
fn test_play_shows_resources_per_step() {
    let scenario = scenario_path();
    let output = run_horizon(&["play", scenario.to_str().unwrap(), "scan", "SCAN"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("START: power: 5"));
    assert!(stdout.contains("SCAN -> SCAN"));
    assert!(stdout.contains("[1] SCAN -> SCAN"));
    assert!(stdout.contains("data: 4 | power: 1"));
}

#[test]
fn test_play_unknown_command_fails() {
    let scenario = scenario_path();
    let output = run_horizon(&["play", scenario.to_str().unwrap(), "launch"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown command 'launch'"));
}

#[test]
fn test_missing_scenario_fails() {
    let output = run_horizon(&["solve", "/nonexistent/scenario.json"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error solving scenario"));
}
