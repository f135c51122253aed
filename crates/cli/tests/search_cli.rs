use assert_cmd::cargo::cargo_bin_cmd;
use pretty_assertions::assert_eq;
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
            "data_dir = '{}'\nnames_dir = '{}'\nbase_dir = '{}'\nlanguage = 'en'\n\n[search]\nhighlight_open = '['\nhighlight_close = ']'\n",
            testdata().join("data").display(),
            testdata().join("names").display(),
            temp.path().display()
        ),
    )
    .unwrap();
    (temp, config)
}

fn run(config: &Path, args: &[&str]) -> std::process::Output {
    cargo_bin_cmd!("bible")
        .env_remove("BIBLE_CONFIG")
        .env_remove("BIBLE_DATA_DIR")
        .env_remove("BIBLE_NAMES_DIR")
        .env_remove("BIBLE_LANG")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("command run")
}

#[test]
fn and_search_lists_hits_counts_and_total() {
    let (_temp, config) = setup();
    let output = run(&config, &["search", "world", "loved", "-b", "KJV"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("[John 3:16] For God so loved the world"));
    assert_eq!(&lines[1..], &["", "world: 1", "loved: 1", "Total: 1"]);
}

#[test]
fn compact_search_tolerates_irregular_spacing() {
    let (_temp, config) = setup();
    let output = run(
        &config,
        &["search", "Godso", "loved", "-b", "WEB", "--mode", "compact"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("[John 3:16] For God so  loved the world"), "{stdout}");
    assert!(stdout.ends_with("Total: 1\n"), "{stdout}");
}

#[test]
fn json_search_reports_highlights_and_limit() {
    let (_temp, config) = setup();
    let output = run(
        &config,
        &["search", "God", "-b", "KJV", "--limit", "2", "--json"],
    );
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["data"]["total"], 8);
    assert_eq!(body["data"]["truncated"], true);
    let hits = body["data"]["hits"].as_array().expect("hits array");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["book"], "Genesis");
    assert_eq!(
        hits[0]["highlighted"],
        "In the beginning [God] created the heaven and the earth."
    );
    assert_eq!(body["hints"][0]["type"], "info");
}

#[test]
fn no_hits_still_prints_total() {
    let (_temp, config) = setup();
    let output = run(&config, &["search", "Nicodemus", "-b", "KJV"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Nicodemus: 0\nTotal: 0\n"
    );
}
