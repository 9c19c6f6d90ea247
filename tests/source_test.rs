//! Integration tests for fragment sources and the end-to-end file path.

use std::fs;

use outliner::{outline_from_file, Error, FragmentSource, JsonSource, SourceRegistry};

fn dump_json() -> &'static str {
    r#"{
        "page_count": 2,
        "fragments": [
            {"text": "Field Survey Report", "page": 0, "x": 72.0, "y": 50.0,
             "font_size": 26.0, "font_family": "Helvetica-Bold", "index": 0},
            {"text": "1. Methodology", "page": 0, "x": 72.0, "y": 150.0,
             "font_size": 17.0, "font_family": "Helvetica-Bold", "index": 1},
            {"text": "Plain description text that runs long enough to define the body size baseline of this document.",
             "page": 0, "x": 72.0, "y": 180.0, "font_size": 11.0, "font_family": "Times", "index": 2},
            {"text": "2. Results", "page": 1, "x": 72.0, "y": 60.0,
             "font_size": 17.0, "font_family": "Helvetica-Bold", "index": 3},
            {"text": "More plain description text continuing across the second page of the survey.",
             "page": 1, "x": 72.0, "y": 90.0, "font_size": 11.0, "font_family": "Times", "index": 4}
        ]
    }"#
}

#[test]
fn registry_opens_and_classifies_a_dump() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.json");
    fs::write(&path, dump_json()).unwrap();

    let registry = SourceRegistry::with_defaults();
    let source = registry.open(&path, 100).unwrap();
    assert_eq!(source.name(), "survey");

    let stream = source.fragments().unwrap();
    assert_eq!(stream.page_count, 2);
    assert_eq!(stream.len(), 5);
}

#[test]
fn outline_from_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.json");
    fs::write(&path, dump_json()).unwrap();

    let outline = outline_from_file(&path).unwrap();
    assert_eq!(outline.title, "Field Survey Report");
    let texts: Vec<&str> = outline.outline.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["1. Methodology", "2. Results"]);
    assert_eq!(outline.outline[0].page, 1);
    assert_eq!(outline.outline[1].page, 2);
}

#[test]
fn corrupt_dump_reports_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{\"page_count\": ").unwrap();

    let source = JsonSource::open(&path, 100).unwrap();
    assert!(matches!(source.fragments(), Err(Error::Parse(_))));
}

#[test]
fn oversize_dump_rejected_at_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.json");
    // ~2MB of padding against a 1MB ceiling.
    let padding = "x".repeat(2 * 1024 * 1024);
    fs::write(&path, format!("{{\"pad\":\"{padding}\"}}")).unwrap();

    let result = JsonSource::open(&path, 1);
    assert!(matches!(result, Err(Error::OversizeInput { .. })));
}

#[test]
fn unsupported_extension_rejected() {
    let registry = SourceRegistry::with_defaults();
    let result = registry.open(std::path::Path::new("input.pdf"), 100);
    assert!(matches!(result, Err(Error::Parse(_))));
}
