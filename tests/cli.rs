use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ledger(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ledger").unwrap();
    cmd.env("LEDGER_CLI_DATA_DIR", data_dir.path());
    cmd.env_remove("LEDGER_LOG");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_init_seeds_storage() {
    let data_dir = TempDir::new().unwrap();

    ledger(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"))
        .stdout(predicate::str::contains("5 ledger(s) and 4 journal(s)"));

    assert!(data_dir.path().join("config.json").exists());
    assert!(data_dir.path().join("data").join("ledgers.json").exists());
}

#[test]
fn test_init_twice_keeps_existing_data() {
    let data_dir = TempDir::new().unwrap();

    ledger(&data_dir).arg("init").assert().success();
    ledger(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 ledger(s) and 4 journal(s)"));
}

#[test]
fn test_config_prints_paths_and_settings() {
    let data_dir = TempDir::new().unwrap();

    ledger(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(data_dir.path().to_string_lossy().as_ref()))
        .stdout(predicate::str::contains("Date format"));
}

#[test]
fn test_logs_go_to_file() {
    let data_dir = TempDir::new().unwrap();

    ledger(&data_dir)
        .args(["--verbose", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ledger-cli starting").not());

    assert!(data_dir.path().join("logs").join("ledger.log").exists());
}

#[test]
fn test_unknown_subcommand_fails() {
    let data_dir = TempDir::new().unwrap();

    ledger(&data_dir)
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
