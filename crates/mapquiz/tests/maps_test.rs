//! Tests for loading maps from disk and the built-in map.

use std::io::Write;

use mapquiz::{BUILTIN_MAP_ID, GridCell, load_map};
use mapquiz_core::RegionId;
use tempfile::NamedTempFile;

const GHANA: &str = r#"
id = "ghana"
title = "Regions of Ghana"

[[regions]]
id = "ashanti"
name = "Ashanti"
description = "Kumasi"
row = 1
col = 0

[[regions]]
id = "volta"
name = "Volta"
row = 1
col = 2

[[regions]]
id = "northern"
name = "Northern"
row = 0
col = 1
"#;

fn write_map(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Write failed");
    file
}

#[test]
fn test_load_builtin_map_without_path() {
    let quiz_map = load_map(None).expect("Built-in map should load");
    assert_eq!(quiz_map.map().id(), BUILTIN_MAP_ID);
    assert_eq!(quiz_map.map().len(), 36);
    for region in quiz_map.map().regions() {
        assert!(
            quiz_map.layout().position(region.id()).is_some(),
            "{} has no tile",
            region.id()
        );
    }
}

#[test]
fn test_load_map_file_with_positions() {
    let file = write_map(GHANA);
    let quiz_map = load_map(Some(file.path())).expect("Map should load");

    assert_eq!(quiz_map.map().title(), "Regions of Ghana");
    assert_eq!(quiz_map.layout().rows(), 2);
    assert_eq!(quiz_map.layout().cols(), 3);
    assert_eq!(
        quiz_map.layout().position(&RegionId::new("volta")),
        Some(GridCell { row: 1, col: 2 })
    );
    assert_eq!(
        quiz_map.layout().region_at(0, 1),
        Some(&RegionId::new("northern"))
    );

    let ashanti = quiz_map
        .map()
        .find_by_name("  ASHANTI ")
        .expect("Forgiving lookup should find Ashanti");
    assert_eq!(ashanti.description().as_deref(), Some("Kumasi"));
}

#[test]
fn test_missing_map_file_is_an_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = load_map(Some(dir.path().join("nowhere.toml").as_path())).expect_err("Should fail");
    assert!(err.message.contains("Failed to read map file"));
}

#[test]
fn test_duplicate_region_ids_are_rejected() {
    let file = write_map(
        r#"
id = "dup"
title = "Duplicates"

[[regions]]
id = "a"
name = "Abia"

[[regions]]
id = "a"
name = "Adamawa"
"#,
    );
    assert!(load_map(Some(file.path())).is_err());
}
