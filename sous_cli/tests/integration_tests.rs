//! Integration tests for the sous binary.
//!
//! These tests verify end-to-end behavior including:
//! - Walking a recipe with and without prompts
//! - Timer extraction from the command line
//! - Journal history across runs
//! - Rejection of bad recipes

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Config home with no sous/config.toml, so the user's own settings never leak in
fn empty_config_home() -> PathBuf {
    Path::new(env!("CARGO_TARGET_TMPDIR")).join("sous-empty-config")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sous"));
    cmd.env("XDG_CONFIG_HOME", empty_config_home());
    cmd
}

fn write_recipe(dir: &Path, name: &str, json: serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, json.to_string()).expect("Failed to write recipe");
    path
}

fn oven_recipe(dir: &Path) -> PathBuf {
    write_recipe(
        dir,
        "cake.json",
        serde_json::json!({
            "name": "Sponge Cake",
            "steps": [
                "Preheat oven to 350F for 10 minutes",
                "Mix ingredients",
                "Bake for 25 minutes"
            ]
        }),
    )
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Step-by-step cooking assistant",
        ));
}

#[test]
fn test_extract_minutes_and_seconds() {
    cli()
        .arg("extract")
        .arg("cook for 1 minute 30 seconds")
        .assert()
        .success()
        .stdout(predicate::str::contains("90 seconds (01:30)"));
}

#[test]
fn test_extract_without_duration() {
    cli()
        .arg("extract")
        .arg("Mix ingredients")
        .assert()
        .success()
        .stdout(predicate::str::contains("no timer"));
}

#[test]
fn test_auto_cook_walks_all_steps() {
    let temp_dir = setup_test_dir();
    let recipe = oven_recipe(temp_dir.path());

    cli()
        .arg("cook")
        .arg(&recipe)
        .arg("--auto")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 1 of 3"))
        .stdout(predicate::str::contains("Timer armed: 10:00"))
        .stdout(predicate::str::contains("Step 2 of 3"))
        .stdout(predicate::str::contains("Timer armed: 25:00"))
        .stdout(predicate::str::contains("Recipe completed"));
}

#[test]
fn test_auto_cook_with_numbered_steps() {
    let temp_dir = setup_test_dir();
    let recipe = write_recipe(
        temp_dir.path(),
        "pasta.json",
        serde_json::json!({
            "name": "Baked Feta Pasta",
            "steps": {
                "2": "Toss cherry tomatoes with olive oil.",
                "1": "Preheat the oven to 400F.",
                "3": "Bake for 30 minutes."
            }
        }),
    );

    let output = cli()
        .arg("cook")
        .arg(&recipe)
        .arg("--auto")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to run sous");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let preheat = stdout.find("Preheat the oven").expect("step 1 missing");
    let toss = stdout.find("Toss cherry tomatoes").expect("step 2 missing");
    assert!(preheat < toss, "steps printed out of order:\n{}", stdout);
}

#[test]
fn test_timer_override() {
    let temp_dir = setup_test_dir();
    let recipe = oven_recipe(temp_dir.path());

    cli()
        .arg("cook")
        .arg(&recipe)
        .arg("--auto")
        .arg("--timer-seconds")
        .arg("45")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Timer armed: 00:45"));
}

#[test]
fn test_non_positive_timer_rejected() {
    let temp_dir = setup_test_dir();
    let recipe = oven_recipe(temp_dir.path());

    cli()
        .arg("cook")
        .arg(&recipe)
        .arg("--auto")
        .arg("--timer-seconds=0")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidDuration"));
}

#[test]
fn test_empty_recipe_rejected() {
    let temp_dir = setup_test_dir();
    let recipe = write_recipe(
        temp_dir.path(),
        "empty.json",
        serde_json::json!({"name": "Nothing", "steps": []}),
    );

    cli()
        .arg("cook")
        .arg(&recipe)
        .arg("--auto")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidRecipe"));
}

#[test]
fn test_missing_recipe_file() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("cook")
        .arg(temp_dir.path().join("nope.json"))
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_interactive_session() {
    let temp_dir = setup_test_dir();
    let recipe = oven_recipe(temp_dir.path());

    cli()
        .arg("cook")
        .arg(&recipe)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("t\ns\nt 2 min\n\n\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timer started: 10:00"))
        .stdout(predicate::str::contains("left"))
        .stdout(predicate::str::contains("Timer started: 02:00"))
        .stdout(predicate::str::contains("Step 3 of 3"))
        .stdout(predicate::str::contains("Ending session"));
}

#[test]
fn test_interactive_end_of_input_ends_session() {
    let temp_dir = setup_test_dir();
    let recipe = oven_recipe(temp_dir.path());

    cli()
        .arg("cook")
        .arg(&recipe)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 2 of 3"))
        .stdout(predicate::str::contains("Ending session"));
}

#[test]
fn test_history_lists_journaled_sessions() {
    let temp_dir = setup_test_dir();
    let recipe = oven_recipe(temp_dir.path());

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No cooking sessions"));

    // One completed, one abandoned after step 1
    cli()
        .arg("cook")
        .arg(&recipe)
        .arg("--auto")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();
    cli()
        .arg("cook")
        .arg(&recipe)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("q\n")
        .assert()
        .success();

    let journal = temp_dir.path().join("journal/cooking.jsonl");
    let content = fs::read_to_string(&journal).expect("Failed to read journal");
    assert_eq!(content.lines().count(), 2);

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Sponge Cake"))
        .stdout(predicate::str::contains("3 of 3 steps, completed"))
        .stdout(predicate::str::contains("stopped at step 1"));
}

#[test]
fn test_config_file_disables_journal() {
    let temp_dir = setup_test_dir();
    let recipe = oven_recipe(temp_dir.path());

    let config_home = temp_dir.path().join("config");
    fs::create_dir_all(config_home.join("sous")).unwrap();
    fs::write(
        config_home.join("sous/config.toml"),
        "[journal]\nenabled = false\n",
    )
    .unwrap();

    cli()
        .env("XDG_CONFIG_HOME", &config_home)
        .arg("cook")
        .arg(&recipe)
        .arg("--auto")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Recipe completed"));

    assert!(!temp_dir.path().join("journal/cooking.jsonl").exists());
}

#[test]
fn test_config_file_sets_default_timer() {
    let temp_dir = setup_test_dir();
    let recipe = write_recipe(
        temp_dir.path(),
        "salad.json",
        serde_json::json!({"name": "Salad", "steps": ["Toss greens", "Serve"]}),
    );

    let config_home = temp_dir.path().join("config");
    fs::create_dir_all(config_home.join("sous")).unwrap();
    fs::write(
        config_home.join("sous/config.toml"),
        "[timer]\ndefault_seconds = 75\n",
    )
    .unwrap();

    cli()
        .env("XDG_CONFIG_HOME", &config_home)
        .arg("cook")
        .arg(&recipe)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("t\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timer started: 01:15"));
}

#[test]
fn test_interactive_oversized_timer_rejected() {
    let temp_dir = setup_test_dir();
    let recipe = oven_recipe(temp_dir.path());

    cli()
        .arg("cook")
        .arg(&recipe)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("t 1000 hours\ns\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timer duration must be between"))
        .stdout(predicate::str::contains("No timer running"));
}
