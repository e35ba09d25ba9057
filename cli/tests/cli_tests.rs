//! CLI binary integration tests using assert_cmd + predicates.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("form-builder").expect("binary should exist")
}

fn simple_schema() -> String {
    serde_json::json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "title": "Name" },
            "age": { "type": "integer" }
        },
        "required": ["name"]
    })
    .to_string()
}

fn write_schema(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("form.json");
    fs::write(&path, simple_schema()).unwrap();
    path
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout should be valid JSON")
}

// ── Elements ────────────────────────────────────────────────────────────────

#[test]
fn test_elements_without_ui_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir);

    let out = cmd()
        .args(["elements", "--schema", schema.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let elements = stdout_json(&out);
    assert_eq!(elements[0]["key"], "name");
    assert_eq!(elements[0]["componentProps"]["required"], true);
    assert_eq!(elements[1]["key"], "age");
}

#[test]
fn test_elements_compact_format() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir);

    cmd()
        .args(["elements", "-s", schema.to_str().unwrap(), "--format", "compact"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[{"));
}

// ── Apply to Stdout ─────────────────────────────────────────────────────────

#[test]
fn test_add_card_to_stdout() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir);

    let out = cmd()
        .args(["add-card", "--schema", schema.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let pair = stdout_json(&out);
    assert_eq!(pair["schema"]["properties"]["newInput1"]["title"], "New Input 1");
    assert_eq!(
        pair["uischema"]["ui:order"],
        serde_json::json!(["name", "age", "newInput1"])
    );

    // Input untouched without --in-place
    assert_eq!(fs::read_to_string(&schema).unwrap(), simple_schema());
}

#[test]
fn test_apply_intent_json() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir);

    let out = cmd()
        .args(["apply", "--schema", schema.to_str().unwrap()])
        .args(["--intent", r#"{"type": "set_required", "path": "age", "required": true}"#])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(
        stdout_json(&out)["schema"]["required"],
        serde_json::json!(["name", "age"])
    );
}

// ── Apply to Files ──────────────────────────────────────────────────────────

#[test]
fn test_rename_to_output_files() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir);
    let out_schema = dir.path().join("out.json");
    let out_ui = dir.path().join("out.ui.yaml");

    cmd()
        .args(["rename", "--schema", schema.to_str().unwrap(), "name", "full_name"])
        .args(["--out-schema", out_schema.to_str().unwrap()])
        .args(["--out-ui-schema", out_ui.to_str().unwrap()])
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_schema).unwrap()).unwrap();
    assert_eq!(written["required"], serde_json::json!(["full_name"]));
    assert!(written["properties"].get("name").is_none());

    // YAML chosen from the extension
    let ui = fs::read_to_string(&out_ui).unwrap();
    assert!(ui.contains("ui:order"), "{ui}");
    assert!(ui.contains("full_name"), "{ui}");
}

#[test]
fn test_in_place_creates_ui_file() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir);

    cmd()
        .args(["add-section", "--schema", schema.to_str().unwrap(), "--in-place"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&schema).unwrap()).unwrap();
    assert_eq!(written["properties"]["newInput1"]["type"], "object");
    let ui: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("form.ui.json")).unwrap())
            .unwrap();
    assert_eq!(ui["ui:order"], serde_json::json!(["name", "age", "newInput1"]));
}

#[test]
fn test_in_place_conflicts_with_out_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir);

    cmd()
        .args(["delete", "--schema", schema.to_str().unwrap(), "age", "--in-place"])
        .args(["--out-schema", "x.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_input() {
    cmd()
        .args(["elements", "--schema", "/nonexistent/path/form.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open input file"));
}

#[test]
fn test_rename_collision_fails() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir);

    cmd()
        .args(["rename", "--schema", schema.to_str().unwrap(), "age", "name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_intent_json() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir);

    cmd()
        .args(["apply", "--schema", schema.to_str().unwrap(), "--intent", r#"{"type": "explode"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse --intent"));
}

#[test]
fn test_non_object_schema_fails() {
    let dir = TempDir::new().unwrap();
    let schema = dir.path().join("form.json");
    fs::write(&schema, "[1, 2]").unwrap();

    cmd()
        .args(["check", "--schema", schema.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected an object"));
}

// ── Help Output ─────────────────────────────────────────────────────────────

#[test]
fn test_help_output() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("elements"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("move-up"));
}

#[test]
fn test_apply_help() {
    cmd()
        .args(["apply", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--intent"))
        .stdout(predicate::str::contains("--in-place"))
        .stdout(predicate::str::contains("--mods"));
}
