use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn testdata() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../testdata")
}

/// Temp base dir with a config pointing at the fixture corpus.
fn setup() -> (TempDir, PathBuf) {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.toml");
    fs::write(
        &config,
        format!(
            "data_dir = '{}'\nnames_dir = '{}'\nbase_dir = '{}'\nlanguage = 'en'\n\n[output]\nretry_attempts = 1\nretry_delay_ms = 1\n",
            testdata().join("data").display(),
            testdata().join("names").display(),
            temp.path().display()
        ),
    )
    .unwrap();
    (temp, config)
}

fn bible(config: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("bible");
    cmd.env_remove("BIBLE_CONFIG")
        .env_remove("BIBLE_DATA_DIR")
        .env_remove("BIBLE_NAMES_DIR")
        .env_remove("BIBLE_LANG")
        .env_remove("BIBLE_OUTPUT_PATH")
        .arg("--config")
        .arg(config);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn single_verse_prints_text_and_footer() {
    let (_temp, config) = setup();
    let stdout = stdout_of(bible(&config).args(["lookup", "John", "3:16", "-b", "KJV"]));
    assert_eq!(
        stdout,
        "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life.\n(John 3:16, KJV)\n"
    );
}

#[test]
fn korean_names_and_labels() {
    let (_temp, config) = setup();
    let stdout = stdout_of(bible(&config).args(["--lang", "ko", "lookup", "요", "3:16", "-b", "개역개정"]));
    assert!(stdout.ends_with("(요한복음 3:16, 개역개정)\n"), "{stdout}");
}

#[test]
fn clamped_range_prints_warning_first() {
    let (_temp, config) = setup();
    let stdout = stdout_of(bible(&config).args(["lookup", "Ps", "23:1-6", "-b", "KJV"]));
    assert_eq!(
        stdout,
        "[warning] Psalms 23 only has verses up to 1. The range was adjusted.\nThe LORD is my shepherd; I shall not want.\n(Psalms 23:1, KJV)\n"
    );
}

#[test]
fn save_then_clear_drives_the_output_file() {
    let (temp, config) = setup();
    let output = temp.path().join("verse_output.txt");

    let stdout = stdout_of(bible(&config).args(["lookup", "1 Jn", "4:8", "-b", "KJV", "--save"]));
    assert_eq!(fs::read_to_string(&output).unwrap(), stdout.trim_end());

    bible(&config).arg("clear").assert().success();
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn save_failure_still_prints_the_verse() {
    let (temp, config) = setup();
    // A directory in place of the output file cannot be replaced.
    let blocked = temp.path().join("verse_output.txt");
    fs::create_dir(&blocked).unwrap();
    fs::write(blocked.join("keep"), "x").unwrap();

    bible(&config)
        .args(["lookup", "John", "3:17", "-b", "KJV", "--save"])
        .assert()
        .failure()
        .stdout(predicates::str::contains("(John 3:17, KJV)"))
        .stderr(predicates::str::contains("verse_output.txt"));
}

#[test]
fn book_missing_from_a_version_fails() {
    let (_temp, config) = setup();
    bible(&config)
        .args(["lookup", "Psalms", "23:1", "-b", "KJV", "-b", "개역개정"])
        .assert()
        .failure()
        .stderr(predicates::str::contains(
            "Psalms is not available in every selected version.",
        ));
}

#[test]
fn unknown_version_points_at_versions_command() {
    let (_temp, config) = setup();
    bible(&config)
        .args(["lookup", "John", "3:16", "-b", "ESV"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Unknown version: ESV"))
        .stderr(predicates::str::contains("bible versions"));
}

#[test]
fn versions_are_sorted_with_labels_and_tokens() {
    let (_temp, config) = setup();
    let stdout = stdout_of(bible(&config).arg("versions"));
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "개역개정\tNKRV\tNKRV",
            "KJV\tKJV\tKJV",
            "WEB\tWorld English Bible\tWEB",
        ]
    );
}

#[test]
fn books_are_intersected_in_canonical_order() {
    let (_temp, config) = setup();
    let stdout = stdout_of(bible(&config).args(["books", "-b", "개역개정", "-b", "KJV"]));
    assert_eq!(stdout, "Genesis\tGenesis\nJohn\tJohn\n1John\t1 John\n");
}

#[test]
fn chapters_accept_aliases() {
    let (_temp, config) = setup();
    let stdout = stdout_of(bible(&config).args(["chapters", "-b", "KJV", "Jn"]));
    assert_eq!(stdout, "1\n");
}
