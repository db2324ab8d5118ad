use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::{fs, path::Path, process::Command};
use tempfile::TempDir;

/// Far enough in the future that a cached token never expires during a test.
const FAR_FUTURE_MILLIS: i64 = 32_503_680_000_000;

fn pim(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pim").unwrap();
    cmd.env("PIM_CLI_CONFIG_DIR", config_dir)
        .env_remove("PIM_CLI_HEADERS")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(config_dir: &Path, content: &str) {
    fs::write(config_dir.join("config.yml"), content).unwrap();
}

fn configured(config_dir: &Path, base_url: &str) {
    write_config(
        config_dir,
        &format!(
            "clientId: client\nclientSecret: secret\nusername: julia\npassword: julia-password\nbaseUrl: {}\naccessToken: cached-token\ntokenExpiry: '{}'\n",
            base_url, FAR_FUTURE_MILLIS
        ),
    );
}

#[test]
fn test_help_lists_command_groups() {
    let dir = TempDir::new().unwrap();
    let assert = pim(dir.path()).arg("--help").assert().success();
    let help = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    let groups = [
        "product",
        "category",
        "attribute",
        "auth",
        "configure",
        "config",
        "completions",
    ];
    for group in groups {
        assert!(help.contains(group), "help output is missing {}", group);
    }
    assert!(help.contains("-v, --verbose"));
}

#[test]
fn test_resource_subcommands() {
    let dir = TempDir::new().unwrap();
    for resource in ["product", "category", "attribute"] {
        pim(dir.path())
            .args([resource, "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("list"))
            .stdout(predicate::str::contains("get"))
            .stdout(predicate::str::contains("create"));
    }
}

#[test]
fn test_unconfigured_command_fails_with_auth_exit_code() {
    let dir = TempDir::new().unwrap();
    pim(dir.path())
        .args(["product", "list"])
        .assert()
        .code(100)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[AuthError]"))
        .stderr(predicate::str::contains("not configured"))
        .stderr(predicate::str::contains("pim configure"));
}

#[test]
fn test_usage_errors_exit_with_usage_code() {
    let dir = TempDir::new().unwrap();
    pim(dir.path())
        .args(["product", "list", "--limit", "0"])
        .assert()
        .code(64);
    pim(dir.path()).args(["category", "create"]).assert().code(64);
}

#[test]
fn test_unreachable_server_is_a_connectivity_error() {
    let dir = TempDir::new().unwrap();
    configured(dir.path(), "http://127.0.0.1:9/api/rest/v1");

    pim(dir.path())
        .args(["product", "get", "tee"])
        .assert()
        .code(101)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[ConnectivityError]"))
        .stderr(predicate::str::contains("127.0.0.1:9"));
}

#[test]
fn test_config_set_get_and_list() {
    let dir = TempDir::new().unwrap();

    pim(dir.path())
        .args(["config", "set", "clientId", "my-client"])
        .assert()
        .success();
    pim(dir.path())
        .args(["config", "set", "password", "correct-horse-battery"])
        .assert()
        .success();

    pim(dir.path())
        .args(["config", "get", "clientId"])
        .assert()
        .success()
        .stdout("my-client\n");

    pim(dir.path())
        .args(["config", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""clientId":"my-client""#))
        .stdout(predicate::str::contains("********tery"))
        .stdout(predicate::str::contains("correct-horse").not());

    assert!(dir.path().join("config.yml").exists());
}

#[test]
fn test_config_rejects_invalid_base_url() {
    let dir = TempDir::new().unwrap();
    pim(dir.path())
        .args(["config", "set", "baseUrl", "pim.example.com"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("invalid base URL"))
        .stderr(predicate::str::contains("[").not());
}

#[test]
fn test_config_set_drops_cached_token() {
    let dir = TempDir::new().unwrap();
    configured(dir.path(), "https://pim.example.com/api/rest/v1");

    pim(dir.path())
        .args(["config", "set", "username", "peter"])
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("config.yml")).unwrap();
    assert!(content.contains("peter"));
    assert!(!content.contains("accessToken"));
    assert!(!content.contains("tokenExpiry"));
}

#[test]
fn test_config_path() {
    let dir = TempDir::new().unwrap();
    pim(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yml"));
}

#[test]
fn test_configure_with_options_does_not_prompt() {
    let dir = TempDir::new().unwrap();
    pim(dir.path())
        .args([
            "configure",
            "--client-id",
            "client",
            "--client-secret",
            "secret",
            "--username",
            "julia",
            "--password",
            "julia-password",
            "--base-url",
            "https://pim.example.com/api/rest/v1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration saved"));

    pim(dir.path())
        .args(["config", "get", "baseUrl"])
        .assert()
        .success()
        .stdout("https://pim.example.com/api/rest/v1\n");
}

#[test]
fn test_auth_status_and_logout() {
    let dir = TempDir::new().unwrap();
    configured(dir.path(), "https://pim.example.com/api/rest/v1");

    pim(dir.path())
        .args(["auth", "status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""configured":true"#))
        .stdout(predicate::str::contains(r#""valid":true"#));

    pim(dir.path()).args(["auth", "logout"]).assert().success();

    pim(dir.path())
        .args(["auth", "status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""token_cached":false"#));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    pim(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pim"));
}
