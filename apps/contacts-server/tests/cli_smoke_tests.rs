#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the contacts-server binary
//!
//! These run the compiled binary and check help output, configuration
//! validation and the `check` command against real files on disk.

use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Helper to run the contacts-server binary with given arguments
fn run_contacts_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_contacts-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute contacts-server")
}

fn write_dataset(dir: &Path) -> String {
    let path = dir.join("contacts.json");
    std::fs::write(
        &path,
        r#"[
  {"id": {"$oid": "65a1"}, "full_name": "Alice Smith", "is_favourite": false},
  {"id": "65a2", "full_name": "Bob Jones", "is_favourite": true, "email": "bob@example.com"}
]"#,
    )
    .expect("Failed to write dataset");
    path.to_str().unwrap().to_owned()
}

#[test]
fn test_cli_help_command() {
    let output = run_contacts_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("contacts-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--dataset"), "Should mention dataset option");
}

#[test]
fn test_cli_version_command() {
    let output = run_contacts_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("contacts-server"), "Should contain binary name");
    assert!(
        stdout.chars().any(|c| c.is_ascii_digit()),
        "Should contain version numbers"
    );
}

#[test]
fn test_cli_invalid_command() {
    let output = run_contacts_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error"),
        "Should contain error message about invalid command: {stderr}"
    );
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_contacts_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(
        !output.status.success(),
        "Should fail when config file doesn't exist"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("config file does not exist"),
        "Should indicate config file not found: {stderr}"
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");

    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_contacts_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to parse config file"),
        "Should mention parsing issue: {stderr}"
    );
}

#[test]
fn test_cli_config_rejects_unknown_keys() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("unknown.yaml");

    std::fs::write(&config_path, "server:\n  home_dir: /tmp\n").expect("Failed to write file");

    let output = run_contacts_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Unknown keys should be rejected");
}

#[test]
fn test_cli_check_with_valid_dataset() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dataset = write_dataset(temp_dir.path());

    let output = run_contacts_server(&["--dataset", &dataset, "check"]);

    if !output.status.success() {
        eprintln!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
        eprintln!("STDOUT: {}", String::from_utf8_lossy(&output.stdout));
    }
    assert!(output.status.success(), "Should succeed with valid dataset");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"), "{stdout}");
    assert!(stdout.contains("Contacts loaded: 2"), "{stdout}");
}

#[test]
fn test_cli_check_with_config_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dataset = write_dataset(temp_dir.path());
    let config_path = temp_dir.path().join("valid.yaml");

    let config_content = format!(
        r#"
server:
  bind_addr: "127.0.0.1:0"
logging:
  level: error
contacts:
  dataset_path: "{}"
"#,
        dataset.replace('\\', "/")
    );
    std::fs::write(&config_path, config_content).expect("Failed to write config file");

    let output = run_contacts_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(output.status.success(), "Should succeed with valid config");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Contacts loaded: 2"), "{stdout}");
}

#[test]
fn test_cli_check_missing_dataset() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("nope.json");

    let output = run_contacts_server(&["--dataset", missing.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Missing dataset should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to load contacts dataset"),
        "Should mention the dataset: {stderr}"
    );
}

#[test]
fn test_cli_check_malformed_dataset() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken.json");
    std::fs::write(&path, r#"{"not": "an array"}"#).expect("Failed to write dataset");

    let output = run_contacts_server(&["--dataset", path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Malformed dataset should fail");
}

#[test]
fn test_cli_print_config_applies_overrides() {
    let output = run_contacts_server(&[
        "--port",
        "8085",
        "--dataset",
        "/srv/people.json",
        "--print-config",
    ]);

    assert!(output.status.success(), "Print config should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json_start = stdout.find('{').expect("Should contain JSON");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout[json_start..]).expect("Should be valid JSON");

    assert_eq!(parsed["server"]["bind_addr"], "0.0.0.0:8085");
    assert_eq!(parsed["contacts"]["dataset_path"], "/srv/people.json");
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_contacts_server(&["run", "--help"]);
    assert!(output.status.success(), "Run subcommand help should succeed");

    let output = run_contacts_server(&["check", "--help"]);
    assert!(
        output.status.success(),
        "Check subcommand help should succeed"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Validate"), "{stdout}");
}
