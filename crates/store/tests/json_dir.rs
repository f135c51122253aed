use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::tempdir;
use verse_catalog::Catalog;
use verse_protocol::VerseRange;
use verse_store::{BibleStore, JsonDirSource, MultiVersionAligner, StoreError, VerseSource};

fn testdata() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../testdata")
}

fn fixture_store() -> BibleStore {
    BibleStore::new(JsonDirSource::new(testdata().join("data")))
}

#[test]
fn fixture_versions_are_sorted_by_rank() {
    let catalog = Catalog::load(&testdata().join("names")).unwrap();
    let store = fixture_store();
    assert_eq!(
        store.available_versions(&catalog),
        vec!["개역개정", "KJV", "WEB"]
    );
}

#[test]
fn fixture_books_keep_discovery_order() {
    let store = fixture_store();
    assert_eq!(store.books("KJV"), vec!["Genesis", "Psalms", "John", "1John"]);
    assert_eq!(store.chapter_count("KJV", "John"), 1);
    assert_eq!(store.get_max_verse("KJV", "John", 3), 18);
}

#[test]
fn fixture_drops_titles_and_null_verses() {
    let store = fixture_store();
    let tree = store.get_verses("WEB");
    let chapter = tree.chapter("John", 3).unwrap();
    assert_eq!(chapter.keys().copied().collect::<Vec<_>>(), vec![16, 17]);
}

#[test]
fn common_books_across_fixture_versions() {
    let catalog = Catalog::load(&testdata().join("names")).unwrap();
    let store = fixture_store();
    let aligner = MultiVersionAligner::new(&store, &catalog);
    assert_eq!(
        aligner.common_books(&["KJV".into(), "개역개정".into()]),
        vec!["Genesis", "John", "1John"]
    );
    assert_eq!(
        aligner.common_books(&["WEB".into(), "KJV".into(), "개역개정".into()]),
        vec!["Genesis", "John"]
    );
}

#[test]
fn extract_spans_every_selected_version() {
    let store = fixture_store();
    let versions = vec!["개역개정".to_string(), "KJV".to_string()];
    let range = VerseRange::new(16, 18).unwrap();
    let extracted = store.extract(&versions, "John", 3, range);
    assert!(extracted.chapter("개역개정").is_some());
    assert_eq!(extracted.get("개역개정", 18), None);
    assert!(extracted.get("KJV", 18).is_some());
}

#[test]
fn corrupt_version_degrades_to_empty_until_repaired() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("BROKEN.json"), "[1, 2").unwrap();
    let source = JsonDirSource::new(dir.path());
    assert!(matches!(source.load("BROKEN"), Err(StoreError::Parse { .. })));
    assert!(matches!(
        source.load("../etc/passwd"),
        Err(StoreError::InvalidVersionName(_))
    ));

    let store = BibleStore::new(source);
    assert!(store.get_verses("BROKEN").is_empty());
    assert!(!store.is_loaded("BROKEN"));

    // Repaired on disk, the version loads on the next use.
    std::fs::write(
        dir.path().join("BROKEN.json"),
        r#"{"John": {"3": {"16": "text"}}}"#,
    )
    .unwrap();
    assert_eq!(store.get_max_verse("BROKEN", "John", 3), 16);
    assert!(store.is_loaded("BROKEN"));
}
