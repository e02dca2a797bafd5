use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/elements.json")
}

/// Command with an isolated config file and the fixture catalog
fn elemental(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("elemental").unwrap();
    cmd.env("ELEMENTAL_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("ELEMENTAL_CATALOG")
        .env_remove("ELEMENTAL_TOKEN")
        .env_remove("RUST_LOG")
        .arg("--catalog")
        .arg(catalog());
    cmd
}

#[test]
fn test_search_single_path() {
    let dir = TempDir::new().unwrap();
    elemental(&dir)
        .args(["search", "Steam"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paths found: 1"))
        .stdout(predicate::str::contains("Path 1 (1 steps):"))
        .stdout(
            predicate::str::is_match(r"Step 1: (Water \+ Fire|Fire \+ Water) -> Steam").unwrap(),
        );
}

#[test]
fn test_search_json_output() {
    let dir = TempDir::new().unwrap();
    let output = elemental(&dir)
        .args(["--format", "json", "search", "Cloud", "--count", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["target"], "Cloud");
    let paths = report["paths"].as_array().unwrap();
    assert_eq!(paths.len(), 3);
    for path in paths {
        let steps = path.as_array().unwrap();
        assert_eq!(steps.last().unwrap()["result"], "Cloud");
    }
}

#[test]
fn test_search_depth_first() {
    let dir = TempDir::new().unwrap();
    elemental(&dir)
        .args(["search", "Tool", "--method", "dfs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-> Tool"));
}

#[test]
fn test_search_unknown_target_suggests() {
    let dir = TempDir::new().unwrap();
    elemental(&dir)
        .args(["search", "stm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean"))
        .stderr(predicate::str::contains("Steam"));
}

#[test]
fn test_search_starting_element() {
    let dir = TempDir::new().unwrap();
    elemental(&dir)
        .args(["search", "Fire"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fire is a starting element"));
}

#[test]
fn test_search_rejects_bad_method() {
    let dir = TempDir::new().unwrap();
    elemental(&dir)
        .args(["search", "Steam", "--method", "astar"])
        .assert()
        .failure();
}

#[test]
fn test_elements_listing() {
    let dir = TempDir::new().unwrap();
    elemental(&dir)
        .arg("elements")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloud"))
        .stdout(predicate::str::contains("Wizard"));

    elemental(&dir)
        .args(["elements", "--like", "clo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloud"))
        .stdout(predicate::str::contains("Wizard").not());

    elemental(&dir)
        .args(["elements", "--basic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Water"))
        .stdout(predicate::str::contains("Steam").not());
}

#[test]
fn test_missing_catalog() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("elemental")
        .unwrap()
        .env("ELEMENTAL_CONFIG", dir.path().join("config.toml"))
        .env_remove("ELEMENTAL_CATALOG")
        .args(["search", "Steam"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No catalog given"));
}

#[test]
fn test_config_set_get_and_init() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    elemental(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    elemental(&dir)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config_path.exists());

    elemental(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    elemental(&dir)
        .args(["config", "set", "search.strategy", "dfs"])
        .assert()
        .success();
    elemental(&dir)
        .args(["config", "get", "search.strategy"])
        .assert()
        .success()
        .stdout(predicate::str::diff("dfs\n"));

    elemental(&dir)
        .args(["config", "set", "search.workers", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("search.workers = 1"));

    elemental(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("search.strategy = dfs"))
        .stdout(predicate::str::contains("server.auth_token = (not set)"));

    elemental(&dir)
        .args(["config", "get", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_catalog_from_config() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog();

    Command::cargo_bin("elemental")
        .unwrap()
        .env("ELEMENTAL_CONFIG", dir.path().join("config.toml"))
        .args(["config", "set", "catalog"])
        .arg(&catalog)
        .assert()
        .success();

    Command::cargo_bin("elemental")
        .unwrap()
        .env("ELEMENTAL_CONFIG", dir.path().join("config.toml"))
        .env_remove("ELEMENTAL_CATALOG")
        .args(["search", "Mud"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-> Mud"));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    elemental(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("elemental"));
}
