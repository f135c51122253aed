use pretty_assertions::assert_eq;
use std::path::PathBuf;
use verse_catalog::Catalog;
use verse_protocol::LookupError;
use verse_render::{Messages, VerseLookup};
use verse_store::{BibleStore, JsonDirSource};

fn testdata() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../testdata")
}

fn fixture() -> (Catalog, BibleStore) {
    let catalog = Catalog::load(&testdata().join("names")).expect("fixture names");
    let store = BibleStore::new(JsonDirSource::new(testdata().join("data")));
    (catalog, store)
}

#[test]
fn korean_lookup_uses_localized_labels() {
    let (catalog, store) = fixture();
    let messages = Messages::builtin("ko");
    let lookup = VerseLookup::new(&catalog, &store, &messages);
    let result = lookup
        .lookup_text(&["개역개정".to_string()], "요 3:16")
        .unwrap();
    let lines: Vec<&str> = result.text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("하나님이 세상을 이처럼 사랑하사"));
    assert_eq!(lines[1], "(요한복음 3:16, 개역개정)");
}

#[test]
fn parallel_versions_fill_gaps_with_placeholder() {
    let (catalog, store) = fixture();
    let messages = Messages::builtin("ko");
    let lookup = VerseLookup::new(&catalog, &store, &messages);
    let versions = vec!["개역개정".to_string(), "KJV".to_string()];
    let result = lookup.lookup_text(&versions, "John 3:17-18").unwrap();
    assert_eq!(result.warning, None);
    let lines: Vec<&str> = result.text.lines().collect();
    assert_eq!(lines[3], "18  해당 구절이 없습니다");
    assert!(lines[4].starts_with("18  He that believeth"));
    assert_eq!(lines.last().copied(), Some("(요한복음 3장, 개역개정, 킹제임스)"));
}

#[test]
fn clamp_warning_is_described_in_english() {
    let (catalog, store) = fixture();
    let messages = Messages::builtin("en");
    let lookup = VerseLookup::new(&catalog, &store, &messages);
    let result = lookup.lookup_text(&["KJV".to_string()], "Ps 23:1-6").unwrap();
    let warning = result.warning.expect("range was clamped");
    assert_eq!(
        messages.describe_warning(&warning, &catalog),
        "Psalms 23 only has verses up to 1. The range was adjusted."
    );
    assert_eq!(
        result.text,
        "The LORD is my shepherd; I shall not want.\n(Psalms 23:1, KJV)"
    );
}

#[test]
fn psalms_is_not_common_to_korean_and_kjv() {
    let (catalog, store) = fixture();
    let messages = Messages::builtin("en");
    let lookup = VerseLookup::new(&catalog, &store, &messages);
    let versions = vec!["KJV".to_string(), "개역개정".to_string()];
    let err = lookup.lookup_text(&versions, "Psalms 23:1").unwrap_err();
    assert_eq!(
        err,
        LookupError::BookNotCommon {
            book: "Psalms".into()
        }
    );
    assert_eq!(
        messages.describe_error(&err, &catalog),
        "Psalms is not available in every selected version."
    );
}
