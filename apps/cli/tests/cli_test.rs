//! Integration tests for the `lexis` binary.
//!
//! The remote endpoint points at a closed local port so nothing leaves the
//! machine; commands that need the network see connection failures.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const UNREACHABLE: &str = "http://127.0.0.1:9";

fn lexis(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lexis").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("LEXIS_CONFIG")
        .env("OPENAI_API_KEY", "sk-test")
        .env("LEXIS_OPENAI__BASE_URL", UNREACHABLE)
        .env("LEXIS_OPENAI__REQUEST_TIMEOUT_SECS", "5");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    lexis(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("translate"))
        .stdout(predicate::str::contains("train"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("models"));
}

#[test]
fn test_translate_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    lexis(&dir)
        .args(["translate", "missing.csv", "--model", "m"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read missing.csv"));
}

#[test]
fn test_translate_blank_model_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("phrases.csv"), "Good morning\n").unwrap();

    lexis(&dir)
        .args(["translate", "phrases.csv", "--model", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("model id is required"));
    assert!(!dir.path().join("edited-phrases.csv").exists());
}

#[test]
fn test_translate_without_model_or_default_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("phrases.csv"), "Good morning\n").unwrap();

    lexis(&dir)
        .args(["translate", "phrases.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No model given"));
}

#[test]
fn test_unreachable_service_marks_rows_as_errors() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("phrases.csv"), "Good morning\nThank you\n").unwrap();

    lexis(&dir)
        .args([
            "translate",
            "phrases.csv",
            "--model",
            "ft:gpt-4o-mini:acme::abcde",
            "--edit",
            "2=Ευχαριστώ",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 row(s) failed to translate: 1"));

    let saved = fs::read_to_string(dir.path().join("edited-phrases.csv")).unwrap();
    assert_eq!(saved, "Good morning,[Error]\nThank you,Ευχαριστώ\n");
}

#[test]
fn test_translate_custom_output_path() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("in.csv"), "Hello\n").unwrap();

    lexis(&dir).args(["translate", "in.csv", "-m", "m", "-o", "out.csv"]).assert().success();
    assert!(dir.path().join("out.csv").exists());
}

#[test]
fn test_train_without_translations_fails_before_network() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("edited.csv"), "Good morning,\nThank you,[Error]\n").unwrap();

    lexis(&dir)
        .args(["train", "edited.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no translated rows to train on"));
}

#[test]
fn test_train_remote_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("edited.csv"), "Good morning,Καλημέρα\n").unwrap();

    lexis(&dir)
        .args(["train", "edited.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Training failed"));
}

#[test]
fn test_missing_api_key_is_config_error() {
    let dir = TempDir::new().unwrap();
    lexis(&dir)
        .env_remove("OPENAI_API_KEY")
        .args(["models"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_config_file_is_honored() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("custom.toml"), "[training]\nlist_limit = 0\n").unwrap();

    lexis(&dir)
        .args(["--config", "custom.toml", "models"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("list_limit"));
}
