//! End-to-end tests for the build workflow.

use std::fs;
use tempfile::TempDir;

use weft::build::{run_build, BuildSummary};

use crate::common::{read_output, write_suite};

/// The exact fragment expected for the main document. Group order follows
/// the document (load, load-errors, render) even though the suite lists the
/// render test first, and the render group collects references in suite
/// order.
const MAIN_FRAGMENT: &str = concat!(
    "<section id=\"sec-test-tables\">\n",
    "<h2>Description of the Tests</h2>\n",
    "<section>\n",
    "<h3 id=\"sec-load\">Tests for <a href=\"https://example.org/spec/main.html#sec-load\">§Loading &amp; Parsing</a></h3>\n",
    "<table class=\"zebra\">\n",
    "<colgroup><col class=\"col_id\"/></colgroup>\n",
    "<tr><th>ID</th><th>Description</th></tr>\n",
    "<tr id=\"load/basic.feature_L12\"><td><a href=\"https://github.com/example/conformance/blob/main/features/load/basic.feature#L12\">load/basic.feature_L12</a></td><td>Loads a minimal package</td></tr>\n",
    "</table>\n",
    "</section>\n",
    "<section>\n",
    "<h3 id=\"sec-load-errors\">Tests for <a href=\"https://example.org/spec/main.html#sec-load-errors\">§Load Errors</a></h3>\n",
    "<table class=\"zebra\">\n",
    "<colgroup><col class=\"col_id\"/></colgroup>\n",
    "<tr><th>ID</th><th>Description</th></tr>\n",
    "<tr id=\"load/errors.feature_L45\"><td><a href=\"https://github.com/example/conformance/blob/main/features/load/errors.feature#L45\">load/errors.feature_L45</a></td><td>Rejects a corrupt container</td></tr>\n",
    "</table>\n",
    "</section>\n",
    "<section>\n",
    "<h3 id=\"sec-render\">Tests for <a href=\"https://example.org/spec/main.html#sec-render\">§Rendering <code>flow</code> Content</a></h3>\n",
    "<table class=\"zebra\">\n",
    "<colgroup><col class=\"col_id\"/></colgroup>\n",
    "<tr><th>ID</th><th>Description</th></tr>\n",
    "<tr id=\"render/flow.feature_L30\"><td><a href=\"https://github.com/example/conformance/blob/main/features/render/flow.feature#L30\">render/flow.feature_L30</a></td><td>Renders <code>flow</code> content</td></tr>\n",
    "<tr id=\"load/basic.feature_L12\"><td><a href=\"https://github.com/example/conformance/blob/main/features/load/basic.feature#L12\">load/basic.feature_L12</a></td><td>Loads a minimal package</td></tr>\n",
    "</table>\n",
    "</section>\n",
    "</section>\n",
);

#[test]
fn test_run_build_e2e_outputs_and_summary() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    let output = temp_dir.path().join("output");
    fs::create_dir_all(&input).unwrap();
    write_suite(&input);

    let summary = run_build(input.to_str().unwrap(), output.to_str().unwrap()).unwrap();

    assert_eq!(
        summary,
        BuildSummary {
            documents: 2,
            failed: 0,
            matched_sections: 4,
            references: 5,
            diagnostics: 5,
        }
    );

    // Both output trees mirror the manifest paths, nested directories included
    assert!(output.join("fragments/main.html").exists());
    assert!(output.join("fragments/core/extra.html").exists());
    assert!(output.join("annotated/main.html").exists());
    assert!(output.join("annotated/core/extra.html").exists());

    assert_eq!(read_output(&output, "fragments", "main.html"), MAIN_FRAGMENT);
}

#[test]
fn test_run_build_e2e_annotations() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    let output = temp_dir.path().join("output");
    fs::create_dir_all(&input).unwrap();
    write_suite(&input);

    run_build(input.to_str().unwrap(), output.to_str().unwrap()).unwrap();

    let annotated = read_output(&output, "annotated", "main.html");
    assert!(annotated.starts_with("<!DOCTYPE html>"));
    assert!(annotated.contains(
        "<section id=\"sec-load\" data-tested=\"true\" \
         data-tests=\"https://example.org/reports/tests.html#load/basic.feature_L12\">"
    ));
    assert!(annotated.contains(
        "<section id=\"sec-load-errors\" data-tested=\"true\" \
         data-tests=\"https://example.org/reports/tests.html#load/errors.feature_L45\">"
    ));
    assert!(annotated.contains(
        "<section id=\"sec-render\" data-tested=\"true\" \
         data-tests=\"https://example.org/reports/tests.html#render/flow.feature_L30,\
         https://example.org/reports/tests.html#load/basic.feature_L12\">"
    ));
    // The untested section keeps its original start tag
    assert!(annotated.contains("<section id=\"sec-idle\">"));
    assert!(!annotated.contains("sec-idle\" data-tested"));

    let extra = read_output(&output, "annotated", "core/extra.html");
    assert!(extra.contains(
        "<section id=\"sec-nav\" data-tested=\"true\" \
         data-tests=\"https://example.org/reports/tests.html#nav/toc.feature_L4\">"
    ));
}

#[test]
fn test_run_build_e2e_rerun_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    let out1 = temp_dir.path().join("out1");
    let out2 = temp_dir.path().join("out2");
    fs::create_dir_all(&input).unwrap();
    write_suite(&input);

    run_build(input.to_str().unwrap(), out1.to_str().unwrap()).unwrap();

    // Feed the annotated documents back in as the next run's input
    for file in ["main.html", "core/extra.html"] {
        fs::copy(out1.join("annotated").join(file), input.join(file)).unwrap();
    }
    run_build(input.to_str().unwrap(), out2.to_str().unwrap()).unwrap();

    for file in ["main.html", "core/extra.html"] {
        assert_eq!(
            read_output(&out1, "annotated", file),
            read_output(&out2, "annotated", file),
            "annotated {} must be stable across re-runs",
            file
        );
        assert_eq!(
            read_output(&out1, "fragments", file),
            read_output(&out2, "fragments", file),
            "fragment {} must be stable across re-runs",
            file
        );
    }
}

#[test]
fn test_run_build_e2e_unmatched_document_default_container() {
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
  "specs": [{ "file": "lonely.html", "url": "https://example.org/spec/lonely.html" }]
}"#,
    )
    .unwrap();
    fs::write(input.join("tests.json"), "[]").unwrap();
    let doc = "<section id=\"s1\"><h2>Alone</h2></section>\n";
    fs::write(input.join("lonely.html"), doc).unwrap();

    let summary = run_build(input.to_str().unwrap(), output.to_str().unwrap()).unwrap();
    assert_eq!(summary.matched_sections, 0);

    // Default policy still emits the bare container
    assert_eq!(
        read_output(&output, "fragments", "lonely.html"),
        "<section id=\"sec-test-tables\">\n<h2>Description of the Tests</h2>\n</section>\n"
    );
    // Nothing matched, so the document passes through untouched
    assert_eq!(read_output(&output, "annotated", "lonely.html"), doc);
}

#[test]
fn test_run_build_e2e_emit_empty_off_writes_empty_fragment() {
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
  "emitEmpty": false,
  "specs": [{ "file": "lonely.html", "url": "https://example.org/spec/lonely.html" }]
}"#,
    )
    .unwrap();
    fs::write(input.join("tests.json"), "[]").unwrap();
    fs::write(
        input.join("lonely.html"),
        "<section id=\"s1\"><h2>Alone</h2></section>\n",
    )
    .unwrap();

    run_build(input.to_str().unwrap(), output.to_str().unwrap()).unwrap();
    assert_eq!(read_output(&output, "fragments", "lonely.html"), "");
}
