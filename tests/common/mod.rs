//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

// ============================================================================
// SUITE FIXTURE
// ============================================================================
//
// A small but realistic suite: two documents (one at a nested path), four
// records, one nested section, one cross-reference that only resolves in the
// second document.

/// Main specification document: four sections, one nested, one untested.
pub const MAIN_DOC: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <title>Package Specification</title>
</head>
<body>
<section id="sec-load">
  <h2>Loading &amp; Parsing</h2>
  <p>How a package is read.</p>
  <section id="sec-load-errors">
    <h3>Load Errors</h3>
    <p>Fatal conditions.</p>
  </section>
</section>
<section id="sec-render">
  <h2>Rendering <code>flow</code> Content</h2>
  <p>Layout rules.</p>
</section>
<section id="sec-idle">
  <h2>Reserved</h2>
  <p>No tests yet.</p>
</section>
</body>
</html>
"#;

/// Secondary document at a nested manifest path.
pub const EXTRA_DOC: &str = r#"<html>
<body>
<section id="sec-nav">
  <h3>Navigation</h3>
  <p>Reading order.</p>
</section>
</body>
</html>
"#;

/// Test records. `sec-render` is referenced before `sec-load` on purpose:
/// suite order must not leak into the report.
pub const RECORDS_JSON: &str = r#"[
  { "xref": ["sec-render"], "file": "render/flow.feature", "line": 30, "scenario": "Renders <code>flow</code> content" },
  { "xref": ["sec-load", "sec-render"], "file": "load/basic.feature", "line": 12, "scenario": "Loads a minimal package" },
  { "xref": ["sec-load-errors"], "file": "load/errors.feature", "line": 45, "scenario": "Rejects a corrupt container" },
  { "xref": ["sec-nav"], "file": "nav/toc.feature", "line": 4, "scenario": "Navigates the table of contents" }
]"#;

pub const MANIFEST_JSON: &str = r#"{
  "version": 1,
  "tests": "tests.json",
  "sourceBaseUrl": "https://github.com/example/conformance/blob/main/features",
  "reportUrl": "https://example.org/reports/tests.html",
  "specs": [
    { "file": "main.html", "url": "https://example.org/spec/main.html" },
    { "file": "core/extra.html", "url": "https://example.org/spec/core/extra.html" }
  ]
}"#;

/// Write the standard two-document suite into `dir`.
pub fn write_suite(dir: &Path) {
    fs::write(dir.join("suite.json"), MANIFEST_JSON).unwrap();
    fs::write(dir.join("tests.json"), RECORDS_JSON).unwrap();
    fs::write(dir.join("main.html"), MAIN_DOC).unwrap();
    fs::create_dir_all(dir.join("core")).unwrap();
    fs::write(dir.join("core/extra.html"), EXTRA_DOC).unwrap();
}

/// Read one of the build outputs back in.
pub fn read_output(output: &Path, kind: &str, file: &str) -> String {
    fs::read_to_string(output.join(kind).join(file)).unwrap()
}
