//! End-to-end tests for the `tp` binary
//!
//! None of these reach a model: they stop at prompt rendering, argument
//! parsing, or credential resolution.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `tp` isolated from the caller's config, logs, and credentials
fn tp(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tp"));
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("XDG_DATA_HOME", home.path().join(".local/share"))
        .env_remove("GROQ_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

const GOA: [&str; 6] = ["--from", "Pune", "--to", "Goa", "--dates", "10-15 March 2025"];

#[test]
fn test_prompt_renders_every_field() {
    let home = TempDir::new().expect("Failed to create temp dir");
    tp(&home)
        .arg("prompt")
        .args(GOA)
        .args(["--budget", "5000", "--activity", "food", "--activity", "relaxation"])
        .args(["--accommodation", "airbnb", "--transport", "train"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Departure Location: Pune"))
        .stdout(predicate::str::contains("- Destination: Goa"))
        .stdout(predicate::str::contains("- Travel Dates: 10-15 March 2025"))
        .stdout(predicate::str::contains("- Budget: 5000 INR"))
        .stdout(predicate::str::contains("- Preferred Activities: Relaxation, Food"))
        .stdout(predicate::str::contains("- Accommodation: Airbnb"))
        .stdout(predicate::str::contains("- Transportation: Train"));
}

#[test]
fn test_prompt_honors_user_template_override() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let prompts = home.path().join(".tripplanner/prompts");
    std::fs::create_dir_all(&prompts).expect("Failed to create prompts dir");
    std::fs::write(prompts.join("itinerary.pmt"), "Trip from {{departure}} to {{destination}}").expect("write");

    tp(&home)
        .arg("prompt")
        .args(GOA)
        .assert()
        .success()
        .stdout(predicate::str::diff("Trip from Pune to Goa\n"));
}

#[test]
fn test_prompt_rejects_blank_required_field() {
    let home = TempDir::new().expect("Failed to create temp dir");
    tp(&home)
        .args(["prompt", "--from", "  ", "--to", "Goa", "--dates", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing: departure"));
}

#[test]
fn test_prompt_rejects_off_step_budget() {
    let home = TempDir::new().expect("Failed to create temp dir");
    tp(&home)
        .arg("prompt")
        .args(GOA)
        .args(["--budget", "120"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Budget must be at least 100 INR"));
}

#[test]
fn test_missing_flag_is_usage_error() {
    let home = TempDir::new().expect("Failed to create temp dir");
    tp(&home)
        .args(["plan", "--to", "Goa", "--dates", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from"));
}

#[test]
fn test_plan_without_credential_is_blocked() {
    let home = TempDir::new().expect("Failed to create temp dir");
    tp(&home)
        .arg("plan")
        .args(GOA)
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key not provided"))
        .stderr(predicate::str::contains("GROQ_API_KEY"));
}

#[test]
fn test_plan_reads_credential_env_from_config() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let config = home.path().join("tp.yml");
    std::fs::write(&config, "llm:\n  api-key-env: TP_TEST_UNSET_KEY\n").expect("write config");

    tp(&home)
        .env_remove("TP_TEST_UNSET_KEY")
        .arg("-c")
        .arg(&config)
        .arg("plan")
        .args(GOA)
        .assert()
        .failure()
        .stderr(predicate::str::contains("TP_TEST_UNSET_KEY"));
}

#[test]
fn test_zero_attempts_config_is_rejected() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let config = home.path().join("tp.yml");
    std::fs::write(&config, "planner:\n  max-attempts: 0\n").expect("write config");

    tp(&home)
        .arg("-c")
        .arg(&config)
        .arg("plan")
        .args(GOA)
        .args(["--api-key", "gsk_test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("planner.max-attempts"));
}

#[test]
fn test_invalid_project_config_is_not_skipped() {
    let home = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(home.path().join(".tripplanner.yml"), "chat:\n  max-round: 1\n").expect("write config");

    tp(&home)
        .arg("prompt")
        .args(GOA)
        .assert()
        .failure()
        .stderr(predicate::str::contains("chat.max-round"));
}

#[test]
fn test_help_lists_choices_and_log_path() {
    let home = TempDir::new().expect("Failed to create temp dir");
    tp(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rental Car"))
        .stdout(predicate::str::contains("tripplanner.log"));
}
