// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Renders the per-section test tables as an HTML fragment.
//!
//! The fragment is meant to be spliced into a larger report build, so it is a
//! single self-contained container:
//!
//! ```text
//! <section id="sec-test-tables">
//!   <h2>Description of the Tests</h2>
//!   <section>                      ─┐
//!     <h3 id=…>Tests for <a>§…</a>  │ one per matched
//!     <table class="zebra">         │ section, in
//!       <colgroup>…    header row   │ document order
//!       <tr id=…>…     test rows    │
//!   </section>                     ─┘
//! </section>
//! ```
//!
//! Output is emitted line by line in a fixed layout: identical correlations
//! serialize to identical bytes, so generated reports diff cleanly between
//! runs.
//!
//! Section titles and scenario texts are trusted markup straight out of the
//! specification and the suite file; everything synthesized here (ids, urls)
//! is escaped.

use crate::types::Correlation;

/// Id of the fragment's container section.
pub const CONTAINER_ID: &str = "sec-test-tables";
/// CSS class of each per-section table.
pub const TABLE_CLASS: &str = "zebra";
/// CSS class marking the identifier column.
pub const ID_COLUMN_CLASS: &str = "col_id";

/// Rendering policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Emit the bare container even when no section matched. Off means an
    /// empty correlation renders to the empty string.
    pub emit_empty: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions { emit_empty: true }
    }
}

/// Serialize `correlation` as the report fragment.
pub fn render_report(correlation: &Correlation, options: ReportOptions) -> String {
    if correlation.sections.is_empty() && !options.emit_empty {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("<section id=\"{}\">\n", CONTAINER_ID));
    out.push_str("<h2>Description of the Tests</h2>\n");

    for group in &correlation.sections {
        out.push_str("<section>\n");
        out.push_str(&format!(
            "<h3 id=\"{}\">Tests for <a href=\"{}\">§{}</a></h3>\n",
            html_escape(&group.section.id),
            html_escape(&group.section.url),
            group.section.title,
        ));
        out.push_str(&format!("<table class=\"{}\">\n", TABLE_CLASS));
        out.push_str(&format!(
            "<colgroup><col class=\"{}\"/></colgroup>\n",
            ID_COLUMN_CLASS
        ));
        out.push_str("<tr><th>ID</th><th>Description</th></tr>\n");
        for test in &group.tests {
            out.push_str(&format!(
                "<tr id=\"{}\"><td><a href=\"{}\">{}</a></td><td>{}</td></tr>\n",
                html_escape(&test.id),
                html_escape(&test.url),
                html_escape(&test.id),
                test.scenario,
            ));
        }
        out.push_str("</table>\n");
        out.push_str("</section>\n");
    }

    out.push_str("</section>\n");
    out
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
