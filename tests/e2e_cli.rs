//! CLI end-to-end tests
//!
//! Tests for the evenue command-line interface that need no database.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the evenue binary, isolated from config files and
/// connection settings in the environment.
#[allow(deprecated)]
fn evenue_cmd() -> Command {
    let mut cmd = Command::cargo_bin("evenue").unwrap();
    cmd.env_remove("EVENUE_DATABASE_URL").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = evenue_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = evenue_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("evenue"))
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("query"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = evenue_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("evenue"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = evenue_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "evenue {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_cli_query_help() {
    let mut cmd = evenue_cmd();
    cmd.args(["query", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--number"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_cli_run_help() {
    let mut cmd = evenue_cmd();
    cmd.args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_cli_query_number_out_of_range() {
    let mut cmd = evenue_cmd();
    cmd.args(["query", "--number", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("11"));
}

#[test]
fn test_cli_login_requires_password() {
    let mut cmd = evenue_cmd();
    cmd.args(["login", "adele@gmail.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PASSWORD"));
}

#[test]
fn test_cli_validate_defaults() {
    let temp = tempdir().unwrap();
    let mut cmd = evenue_cmd();
    cmd.current_dir(temp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("localhost:5432/DatabaseTestDatabase"));
}

#[test]
fn test_cli_validate_config_file() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("evenue.toml");

    fs::write(
        &config_file,
        r#"
[database]
host = "db.example.com"
dbname = "parties"

[seed]
party_start_date = "2031-12-24"

[showcase]
party_title = "Celebrity Media Informatics Party!!!"
"#,
    )
    .unwrap();

    let mut cmd = evenue_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("db.example.com:5432/parties"))
        .stdout(predicate::str::contains("2031-12-24"))
        .stdout(predicate::str::contains("2031-11-28 to 2031-12-25"))
        .stdout(predicate::str::contains("Celebrity Media Informatics Party!!!"));
}

#[test]
fn test_cli_validate_rejects_bad_values() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");

    fs::write(
        &config_file,
        r#"
[database]
pool_size = 0
"#,
    )
    .unwrap();

    let mut cmd = evenue_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pool size"));
}

#[test]
fn test_cli_validate_rejects_malformed_toml() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");
    fs::write(&config_file, "[database\nport = ").unwrap();

    let mut cmd = evenue_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_cli_missing_config_file() {
    let mut cmd = evenue_cmd();
    cmd.args(["--config", "/nonexistent/evenue.toml", "tables"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_cli_run_unreachable_database() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("evenue.toml");
    fs::write(
        &config_file,
        r#"
[database]
host = "127.0.0.1"
port = 1
connect_timeout_secs = 1
pool_size = 1
"#,
    )
    .unwrap();

    let mut cmd = evenue_cmd();
    cmd.args(["--config", config_file.to_str().unwrap(), "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect to the database"));
}

#[test]
fn test_cli_run_json_unreachable_database() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("evenue.toml");
    fs::write(
        &config_file,
        r#"
[database]
host = "127.0.0.1"
port = 1
connect_timeout_secs = 1
pool_size = 1
"#,
    )
    .unwrap();

    let mut cmd = evenue_cmd();
    cmd.args(["--config", config_file.to_str().unwrap(), "run", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to connect to the database"));
}
