//! CLI integration tests for pz-tools

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Write a config whose paths all live inside `dir`
fn write_config(dir: &Path, extra: &str) {
    let config = format!(
        r#"[tools]
source_dir = "{dir}/src"
env_file = "{dir}/.env"
upload_script = "{dir}/upload.sh"
attach_script = "{dir}/attach.sh"
interpreter = "sh"
{extra}
"#,
        dir = dir.display(),
        extra = extra
    );
    std::fs::create_dir_all(dir.join("src")).unwrap();
    std::fs::write(dir.join("config.toml"), config).unwrap();
}

fn pz_tools(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pz-tools").unwrap();
    cmd.env("POSTIZ_CONFIG", temp_dir.path().join("config.toml"));
    cmd
}

#[test]
fn test_list_text() {
    let temp_dir = TempDir::new().unwrap();

    pz_tools(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available Tools:"))
        .stdout(predicate::str::contains(
            "- create_post: Create a new social media post on Postiz platform with optional media attachments and scheduling",
        ))
        .stdout(predicate::str::contains("- login:"));
}

#[test]
fn test_list_json_is_catalog() {
    let temp_dir = TempDir::new().unwrap();

    let output = pz_tools(&temp_dir)
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["create_post", "get_integrations", "get_posts", "get_self", "login"]
    );
}

#[test]
fn test_list_text_matches_catalog() {
    let temp_dir = TempDir::new().unwrap();

    let output = pz_tools(&temp_dir).arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    for definition in libpostiz::catalog::definitions() {
        let line = format!("- {}: {}", definition.name, definition.description);
        assert!(stdout.contains(&line), "missing '{}'", line);
    }
}

#[test]
fn test_call_unknown_tool() {
    let temp_dir = TempDir::new().unwrap();

    pz_tools(&temp_dir)
        .args(["call", "nope"])
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("Unknown tool: nope"));
}

#[test]
fn test_call_rejects_non_object_params() {
    let temp_dir = TempDir::new().unwrap();

    pz_tools(&temp_dir)
        .args(["call", "get_posts", "--params-json", "[2025]"])
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("must be a JSON object"));
}

#[test]
fn test_call_short_content_is_invalid_input() {
    let temp_dir = TempDir::new().unwrap();

    pz_tools(&temp_dir)
        .env("POSTIZ_API_URL", "http://127.0.0.1:9/api")
        .env("POSTIZ_API_KEY", "test-key")
        .args([
            "call",
            "create_post_1A",
            "--params-json",
            r#"{"content": "Hi", "integration_id": "int-1"}"#,
        ])
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("at least 6 characters"));
}

#[test]
fn test_call_unreachable_service() {
    let temp_dir = TempDir::new().unwrap();

    pz_tools(&temp_dir)
        .env("POSTIZ_API_URL", "http://127.0.0.1:9/api")
        .env("POSTIZ_API_KEY", "test-key")
        .args(["call", "get_self"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("Failed to get user info"));
}

#[test]
fn test_upload_with_no_sources_reports_each_tool() {
    let temp_dir = TempDir::new().unwrap();
    write_config(temp_dir.path(), "");

    pz_tools(&temp_dir)
        .args(["upload", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total tools uploaded: 0"))
        .stdout(predicate::str::contains("Failed tools:"))
        .stdout(predicate::str::contains("Tool file not found"));
}

#[cfg(unix)]
#[test]
fn test_upload_and_attach_with_scripts() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_config(
        dir,
        r#"entries = [
    { file = "postiz_get_self.py", name = "get_self", description = "Get user information from Postiz" },
]"#,
    );

    std::fs::write(dir.join("src/postiz_get_self.py"), "def get_self():\n    pass\n").unwrap();
    std::fs::write(dir.join(".env"), "BOOKSTACK_AGENT_ID=agent-42\n").unwrap();
    std::fs::write(dir.join("upload.sh"), "echo \"Tool ID: id-$4\"\n").unwrap();
    std::fs::write(dir.join("attach.sh"), "echo attached\n").unwrap();

    pz_tools(&temp_dir)
        .args(["upload", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- get_self (ID: id-get_self)"))
        .stdout(predicate::str::contains(
            "All tools have been attached to agent: agent-42",
        ));
}

#[cfg(unix)]
#[test]
fn test_upload_no_attach_prints_commands() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_config(
        dir,
        r#"entries = [
    { file = "postiz_login.py", name = "login", description = "Login to Postiz API" },
]"#,
    );

    std::fs::write(dir.join("src/postiz_login.py"), "def login():\n    pass\n").unwrap();
    std::fs::write(dir.join(".env"), "BOOKSTACK_AGENT_ID=agent-42\n").unwrap();
    std::fs::write(dir.join("upload.sh"), "echo \"Tool ID: id-$4\"\n").unwrap();

    pz_tools(&temp_dir)
        .args(["upload", "--no-attach", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"agent_id\": null"))
        .stdout(predicate::str::contains("\"id\": \"id-login\""));
}
