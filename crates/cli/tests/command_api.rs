use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn testdata() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../testdata")
}

fn setup() -> (TempDir, PathBuf) {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.toml");
    fs::write(
        &config,
        format!(
            "data_dir = '{}'\nnames_dir = '{}'\nbase_dir = '{}'\nlanguage = 'en'\n",
            testdata().join("data").display(),
            testdata().join("names").display(),
            temp.path().display()
        ),
    )
    .unwrap();
    (temp, config)
}

fn run_cli_raw(config: &Path, request: &str) -> (bool, Value) {
    let output = cargo_bin_cmd!("bible")
        .env_remove("BIBLE_CONFIG")
        .env_remove("BIBLE_LANG")
        .arg("--config")
        .arg(config)
        .arg("command")
        .arg("--json")
        .arg(request)
        .output()
        .expect("command run");

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    (output.status.success(), body)
}

#[test]
fn lookup_action_renders_parallel_block() {
    let (_temp, config) = setup();
    let req = r#"{"action":"lookup","payload":{"versions":["KJV","WEB"],"reference":"John 3:17-18"}}"#;
    let (ok, resp) = run_cli_raw(&config, req);
    assert!(ok, "expected ok, got {resp}");
    assert_eq!(resp["status"], "ok");
    let text = resp["data"]["text"].as_str().expect("text");
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("17  For God sent not his Son"));
    assert!(lines[1].starts_with("17  For God didn't send his Son"));
    assert!(lines[4].starts_with("18  No verse"), "{text}");
    assert_eq!(
        lines.last().copied(),
        Some("(John 3, KJV, World English Bible)")
    );
    assert_eq!(resp["data"]["reference"]["verse_range"]["end"], 18);
}

#[test]
fn field_lookup_reports_clamp_as_warn_hint() {
    let (_temp, config) = setup();
    let req = r#"{"action":"lookup","payload":{"versions":["KJV"],"book":"요","chapter":3,"verses":"16-40"}}"#;
    let (ok, resp) = run_cli_raw(&config, req);
    assert!(ok, "expected ok, got {resp}");
    assert_eq!(resp["hints"][0]["type"], "warn");
    assert_eq!(resp["data"]["warning"]["max_verse"], 18);
    assert_eq!(resp["data"]["reference"]["verse_range"]["start"], 16);
}

#[test]
fn out_of_range_start_is_an_error_envelope() {
    let (_temp, config) = setup();
    let req = r#"{"action":"lookup","payload":{"versions":["KJV"],"reference":"John 3:99-100"}}"#;
    let (ok, resp) = run_cli_raw(&config, req);
    assert!(!ok, "expected non-zero exit due to error");
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["error"]["code"], "verse_out_of_range");
    assert_eq!(resp["meta"]["action"], "lookup");
}

#[test]
fn reversed_range_is_rejected_before_lookup() {
    let (_temp, config) = setup();
    let req = r#"{"action":"lookup","payload":{"versions":["KJV"],"book":"John","chapter":3,"verses":"18-16"}}"#;
    let (ok, resp) = run_cli_raw(&config, req);
    assert!(!ok);
    assert_eq!(resp["error"]["code"], "invalid_verse_range_order");
    assert_eq!(
        resp["message"],
        "The start verse (18) is greater than the end verse (16)."
    );
}

#[test]
fn clear_action_empties_output() {
    let (temp, config) = setup();
    let output = temp.path().join("verse_output.txt");
    fs::write(&output, "old").unwrap();
    let (ok, resp) = run_cli_raw(&config, r#"{"action":"clear"}"#);
    assert!(ok, "expected ok, got {resp}");
    assert_eq!(resp["data"]["saved"]["changed"], true);
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn request_from_file_is_accepted() {
    let (temp, config) = setup();
    let request = temp.path().join("request.json");
    fs::write(&request, r#"{"action":"versions"}"#).unwrap();
    let output = cargo_bin_cmd!("bible")
        .env_remove("BIBLE_CONFIG")
        .arg("--config")
        .arg(&config)
        .args(["command", "--pretty", "--file"])
        .arg(&request)
        .output()
        .expect("command run");
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let ids: Vec<&str> = body["data"]["versions"]
        .as_array()
        .expect("versions array")
        .iter()
        .filter_map(|v| v["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["개역개정", "KJV", "WEB"]);
}

#[test]
fn request_from_stdin_is_accepted() {
    let (_temp, config) = setup();
    let output = cargo_bin_cmd!("bible")
        .env_remove("BIBLE_CONFIG")
        .arg("--config")
        .arg(&config)
        .arg("command")
        .write_stdin(r#"{"action":"chapters","payload":{"version":"KJV","book":"Jn"}}"#)
        .output()
        .expect("command run");
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["data"]["chapters"], 1);
}

#[test]
fn empty_request_is_rejected() {
    let (_temp, config) = setup();
    cargo_bin_cmd!("bible")
        .env_remove("BIBLE_CONFIG")
        .arg("--config")
        .arg(&config)
        .arg("command")
        .write_stdin("  \n")
        .assert()
        .failure()
        .stderr(predicates::str::contains("Empty command request"));
}
