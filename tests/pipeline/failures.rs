//! Failure-path tests: malformed input fails the run fast, while a broken
//! document stays local to that document.

use std::fs;
use tempfile::TempDir;

use weft::build::{run_build, BuildSummary};

use crate::common::write_suite;

#[test]
fn test_missing_manifest_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("output");

    let result = run_build(temp_dir.path().to_str().unwrap(), output.to_str().unwrap());

    let err = result.unwrap_err();
    assert!(err.contains("Failed to read manifest"), "{err}");
}

#[test]
fn test_invalid_manifest_json_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("output");
    fs::write(temp_dir.path().join("suite.json"), "{ not json").unwrap();

    let result = run_build(temp_dir.path().to_str().unwrap(), output.to_str().unwrap());

    let err = result.unwrap_err();
    assert!(err.contains("Invalid manifest JSON"), "{err}");
}

#[test]
fn test_missing_records_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    let output = temp_dir.path().join("output");
    fs::create_dir_all(&input).unwrap();
    write_suite(&input);
    fs::remove_file(input.join("tests.json")).unwrap();

    let result = run_build(input.to_str().unwrap(), output.to_str().unwrap());

    let err = result.unwrap_err();
    assert!(err.contains("Failed to read"), "{err}");
    assert!(err.contains("tests.json"), "{err}");
}

#[test]
fn test_malformed_record_fails_before_any_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    let output = temp_dir.path().join("output");
    fs::create_dir_all(&input).unwrap();
    write_suite(&input);
    fs::write(
        input.join("tests.json"),
        r#"[{ "xref": [], "file": "a.feature", "line": 1, "scenario": "no targets" }]"#,
    )
    .unwrap();

    let result = run_build(input.to_str().unwrap(), output.to_str().unwrap());

    let err = result.unwrap_err();
    assert!(err.contains("Invalid record"), "{err}");
    assert!(err.contains("a.feature"), "{err}");
    assert!(!output.exists(), "rejected input must not create output");
}

#[test]
fn test_unreadable_document_is_local_failure() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    let output = temp_dir.path().join("output");
    fs::create_dir_all(&input).unwrap();
    write_suite(&input);
    fs::remove_file(input.join("core/extra.html")).unwrap();

    let summary = run_build(input.to_str().unwrap(), output.to_str().unwrap()).unwrap();

    assert_eq!(summary.documents, 2);
    assert_eq!(summary.failed, 1);
    // Only the main document contributed to the totals
    assert_eq!(summary.matched_sections, 3);
    assert_eq!(summary.references, 4);

    assert!(output.join("fragments/main.html").exists());
    assert!(output.join("annotated/main.html").exists());
    assert!(!output.join("fragments/core/extra.html").exists());
    assert!(!output.join("annotated/core/extra.html").exists());
}

#[test]
fn test_truncated_document_writes_nothing_for_it() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    let output = temp_dir.path().join("output");
    fs::create_dir_all(&input).unwrap();
    write_suite(&input);
    fs::write(input.join("main.html"), "<section id=\"sec-load").unwrap();

    let summary = run_build(input.to_str().unwrap(), output.to_str().unwrap()).unwrap();

    assert_eq!(summary.failed, 1);
    // No partial output for the broken document
    assert!(!output.join("fragments/main.html").exists());
    assert!(!output.join("annotated/main.html").exists());
    // The sibling still completed
    assert!(output.join("annotated/core/extra.html").exists());
}

#[test]
fn test_empty_spec_list_is_a_no_op() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    let output = temp_dir.path().join("output");
    fs::create_dir_all(&input).unwrap();
    fs::write(
        input.join("suite.json"),
        r#"{
  "version": 1,
  "tests": "tests.json",
  "sourceBaseUrl": "https://github.com/example/conformance",
  "reportUrl": "https://example.org/reports/tests.html",
  "specs": []
}"#,
    )
    .unwrap();
    fs::write(input.join("tests.json"), "[]").unwrap();

    let summary = run_build(input.to_str().unwrap(), output.to_str().unwrap()).unwrap();

    assert_eq!(summary, BuildSummary::default());
    assert!(!output.exists());
}
