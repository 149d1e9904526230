use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;
use vba_fs::{ConfigStore, Error, NormalizedPath};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Sample {
    name: String,
    count: i32,
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("doc.toml");
    fs::write(&file_path, "name = \"test\"\ncount = 42\n").unwrap();

    let loaded: Sample = ConfigStore::new().load(&NormalizedPath::new(&file_path)).unwrap();
    assert_eq!(loaded, Sample { name: "test".into(), count: 42 });
}

#[test]
fn test_load_yaml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("doc.yml");
    fs::write(&file_path, "name: test\ncount: 7\n").unwrap();

    let loaded: Sample = ConfigStore::new().load(&NormalizedPath::new(&file_path)).unwrap();
    assert_eq!(loaded.count, 7);
}

#[test]
fn test_save_then_load_json() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("doc.json"));
    let value = Sample { name: "drawing".into(), count: 3 };

    let store = ConfigStore::new();
    store.save(&path, &value).unwrap();
    let loaded: Sample = store.load(&path).unwrap();

    assert_eq!(loaded, value);
}

#[test]
fn test_invalid_content_reports_parse_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("doc.json");
    fs::write(&file_path, "{ not json").unwrap();

    let result: Result<Sample, _> = ConfigStore::new().load(&NormalizedPath::new(&file_path));
    assert!(matches!(result, Err(Error::Parse { ref format, .. }) if format == "JSON"));
}

#[test]
fn test_unsupported_extension() {
    let path = NormalizedPath::new("drawing.vsd");
    let result: Result<Sample, _> = ConfigStore::new().load(&path);
    assert!(matches!(result, Err(Error::UnsupportedFormat { ref extension }) if extension == "vsd"));
}
