//! End-to-end CLI tests using `assert_cmd`.
//!
//! Each test runs the compiled binary inside its own temporary working
//! directory, so the default relative data and output paths never touch the
//! repository.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

const DATA_DIR: &str = "data/processed";
const DATA_FILE: &str = "data/processed/problem_categories.json";
const OUTPUT_FILE: &str = "visualizations/intellectual_network_map.html";

const SCENARIO: &str = r#"{
    "problems": {
        "A": {"estimated_books": 10, "avg_rating": 4.5},
        "B": {"estimated_books": 5, "avg_rating": 3.0}
    },
    "connections": [
        {"from": "A", "to": "B", "strength": 2}
    ],
    "key_bridge_authors": {
        "X": {"significance": 1, "primary_problem": "A", "bridges": ["B"]}
    }
}"#;

fn cmd() -> Command {
    Command::cargo_bin("network-map").unwrap()
}

/// A temporary project directory holding the given dataset
fn project_with(data: &str) -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join(DATA_DIR)).unwrap();
    fs::write(dir.path().join(DATA_FILE), data).unwrap();
    dir
}

fn output_in(dir: &Path) -> PathBuf {
    dir.join(OUTPUT_FILE)
}

// ─── Help / version ─────────────────────────────────────────────────────

#[test]
fn test_help_shows_options() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--data-dir"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--seed"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_version_shows_name() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("network-map"));
}

#[test]
fn test_rejects_unknown_flag() {
    cmd()
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

// ─── Pipeline ───────────────────────────────────────────────────────────

#[test]
fn test_scenario_without_arguments() {
    let dir = project_with(SCENARIO);

    cmd()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Loading data..."))
        .stdout(predicate::str::contains("Building graph..."))
        .stdout(predicate::str::contains("Creating visualization..."))
        .stdout(predicate::str::contains("Nodes: 2 intellectual problems"))
        .stdout(predicate::str::contains("Bridge authors: 1"))
        .stdout(predicate::str::contains("Connections: 3"))
        .stdout(predicate::str::contains("intellectual_network_map.html"));

    let html = fs::read_to_string(output_in(dir.path())).unwrap();
    assert!(!html.is_empty());
    assert!(html.contains("<svg"));
    assert!(html.contains("<title>A\n10 books\nAvg rating: 4.5</title>"));
    assert!(html.contains("<title>B\n5 books\nAvg rating: 3.0</title>"));
    assert!(html.contains("Key Authors/Works"));
}

#[test]
fn test_output_needs_no_network() {
    let dir = project_with(SCENARIO);

    cmd().current_dir(dir.path()).assert().success();

    let html = fs::read_to_string(output_in(dir.path())).unwrap();
    assert!(!html.contains("src="));
    assert!(!html.contains("https://cdn"));
}

#[test]
fn test_empty_dataset_still_writes_map() {
    let dir = project_with(r#"{"problems": {}, "connections": [], "key_bridge_authors": {}}"#);

    cmd()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nodes: 0 intellectual problems"))
        .stdout(predicate::str::contains("Connections: 0"));

    let html = fs::read_to_string(output_in(dir.path())).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("Intellectual Problems"));
}

#[test]
fn test_same_input_produces_identical_output() {
    let dir = project_with(SCENARIO);
    let first = dir.path().join("first.html");
    let second = dir.path().join("second.html");

    for output in [&first, &second] {
        cmd()
            .current_dir(dir.path())
            .args(["--output", output.to_str().unwrap()])
            .assert()
            .success();
    }

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_seed_changes_layout() {
    let dir = project_with(SCENARIO);
    let default_seed = dir.path().join("default.html");
    let other_seed = dir.path().join("other.html");

    cmd()
        .current_dir(dir.path())
        .args(["--output", default_seed.to_str().unwrap()])
        .assert()
        .success();
    cmd()
        .current_dir(dir.path())
        .args(["--output", other_seed.to_str().unwrap(), "--seed", "7"])
        .assert()
        .success();

    assert_ne!(
        fs::read(&default_seed).unwrap(),
        fs::read(&other_seed).unwrap()
    );
}

#[test]
fn test_explicit_paths() {
    let data = project_with(SCENARIO);
    let out = tempdir().unwrap();
    let output = out.path().join("nested").join("map.html");

    cmd()
        .args([
            "--data-dir",
            data.path().join(DATA_DIR).to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("map.html"));

    assert!(output.exists());
}

#[test]
fn test_config_file_overrides_palette() {
    let dir = project_with(SCENARIO);
    let config = dir.path().join("map.toml");
    fs::write(
        &config,
        "[palette.problems]\nA = \"#123456\"\n\n[figure]\ntitle = \"My Reading Map\"\n",
    )
    .unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success();

    let html = fs::read_to_string(output_in(dir.path())).unwrap();
    assert!(html.contains("#123456"));
    assert!(html.contains("<title>My Reading Map</title>"));
}

#[test]
fn test_config_can_opt_into_plotly_cdn() {
    let dir = project_with(SCENARIO);
    let config = dir.path().join("map.toml");
    fs::write(
        &config,
        "[figure]\nplotly_cdn = \"https://cdn.plot.ly/plotly-2.35.2.min.js\"\n",
    )
    .unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success();

    let html = fs::read_to_string(output_in(dir.path())).unwrap();
    assert!(html.contains(r#"src="https://cdn.plot.ly/plotly-2.35.2.min.js""#));
    assert!(html.contains("Plotly.newPlot"));
}

// ─── Failures ───────────────────────────────────────────────────────────

#[test]
fn test_missing_data_file_fails() {
    let dir = tempdir().unwrap();

    cmd()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Data file not found"));

    assert!(!output_in(dir.path()).exists());
}

#[test]
fn test_malformed_json_fails() {
    let dir = project_with("{ \"problems\": ");

    cmd()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed data"));

    assert!(!output_in(dir.path()).exists());
}

#[test]
fn test_missing_required_key_fails() {
    let dir = project_with(r#"{"problems": {}, "connections": []}"#);

    cmd()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("key_bridge_authors"));
}

#[test]
fn test_undeclared_problem_fails() {
    let dir = project_with(
        r#"{
            "problems": {"A": {"estimated_books": 1, "avg_rating": 4.0}},
            "connections": [{"from": "A", "to": "Typo", "strength": 1}],
            "key_bridge_authors": {}
        }"#,
    );

    cmd()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Graph integrity error"))
        .stderr(predicate::str::contains("Typo"));

    assert!(!output_in(dir.path()).exists());
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = project_with(SCENARIO);
    let config = dir.path().join("broken.toml");
    fs::write(&config, "[layout\nseed = ").unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}
