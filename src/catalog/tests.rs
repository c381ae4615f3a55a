use super::*;
use crate::error::CatalogError;
use std::path::Path;

const SAMPLE: &str = r#"
[[track]]
id = 8
name = "Chase"
author = "Alexander Nakarada"
album = "Chase"
duration_in_seconds = 205
track_file = "music/chase.mp3"
release_date = "2005-06-11"
genre = ["Classical"]

[[track]]
_id = 9
name = "Open Sea epic"
author = "Frank Schroter"
album = "Open Sea epic"
duration_in_seconds = 165
track_file = "https://cdn.example.org/open-sea.mp3"
genre = ["Classical", "Soundtrack"]
"#;

#[test]
fn from_toml_str_preserves_order_and_fields() {
    let catalog = Catalog::from_toml_str(SAMPLE, None).unwrap();
    assert_eq!(catalog.len(), 2);

    let first = &catalog.tracks()[0];
    assert_eq!(first.id, TrackId(8));
    assert_eq!(first.name, "Chase");
    assert_eq!(first.duration_secs, 205);
    assert_eq!(first.release_year(), Some(2005));
    assert!(first.genres.contains("Classical"));

    let second = &catalog.tracks()[1];
    assert_eq!(second.id, TrackId(9));
    assert_eq!(second.release_date, None);
    assert_eq!(second.genres.len(), 2);
}

#[test]
fn relative_track_files_resolve_against_base_dir() {
    let catalog = Catalog::from_toml_str(SAMPLE, Some(Path::new("/srv/library"))).unwrap();
    assert_eq!(
        catalog.tracks()[0].file_ref,
        Path::new("/srv/library").join("music/chase.mp3").display().to_string()
    );
    // URLs are left alone.
    assert_eq!(
        catalog.tracks()[1].file_ref,
        "https://cdn.example.org/open-sea.mp3"
    );
}

#[test]
fn duplicate_ids_are_rejected() {
    let text = r#"
[[track]]
id = 1
name = "a"
track_file = "a.mp3"

[[track]]
id = 1
name = "b"
track_file = "b.mp3"
"#;
    let err = Catalog::from_toml_str(text, None).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateId(TrackId(1))));
}

#[test]
fn get_looks_up_by_id() {
    let catalog = Catalog::from_toml_str(SAMPLE, None).unwrap();
    assert_eq!(catalog.get(TrackId(9)).map(|t| t.name.as_str()), Some("Open Sea epic"));
    assert!(catalog.get(TrackId(1)).is_none());
}

#[test]
fn release_year_ignores_malformed_dates() {
    let mut track = Catalog::from_toml_str(SAMPLE, None).unwrap().tracks()[0].clone();
    track.release_date = Some("19-01-01".into());
    assert_eq!(track.release_year(), None);
    track.release_date = Some("1999".into());
    assert_eq!(track.release_year(), Some(1999));
}

#[test]
fn load_reports_missing_file_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    match Catalog::load(&missing) {
        Err(CatalogError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn load_reads_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.toml");
    std::fs::write(&path, SAMPLE).unwrap();

    let catalog = Catalog::load(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.tracks()[0].file_ref.ends_with("chase.mp3"));
}
