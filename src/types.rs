// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a suite correlation.
//!
//! These types trace the path from raw suite records to a rendered report:
//! `TestRecord` is what the suite ships, `TestReference` is the linkable
//! identity we mint for it, and `SectionTests` groups references under the
//! specification section they exercise.
//!
//! | Type             | Stage     | Purpose                               |
//! |------------------|-----------|---------------------------------------|
//! | `TestRecord`     | input     | One entry of the suite's tests file   |
//! | `TestReference`  | derived   | Stable id plus deep links             |
//! | `SectionInfo`    | derived   | Section id, title markup, deep link   |
//! | `SectionTests`   | output    | One section with its references       |
//! | `Correlation`    | output    | Document-ordered groups + diagnostics |
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **TestReference**: `id = "{file}_L{line}"`. The id doubles as the report
//!   row anchor, so changing the format silently breaks `data-tests` links
//!   written by earlier runs.
//! - **Correlation**: `sections` is ordered by document position and no group
//!   contains the same reference id twice. `correlate` enforces both.
//! - **TestRecord**: `xref` is non-empty and `line >= 1`. Enforced by
//!   `validate_records` before any correlation happens.

use serde::Deserialize;
use std::fmt;

// =============================================================================
// INPUT RECORDS
// =============================================================================

/// A single entry from the suite's tests file.
///
/// The tests file is a flat JSON array of these. `xref` holds the section ids
/// this test exercises; one record may fan out into several sections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    /// Section ids this test exercises (non-empty)
    pub xref: Vec<String>,
    /// Path of the test definition, relative to the suite root
    pub file: String,
    /// 1-based line of the test inside `file`
    pub line: u32,
    /// Human-readable description; may be a simple HTML fragment
    pub scenario: String,
}

/// Malformed suite input. Any of these aborts the run before correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A record's `xref` list is empty.
    EmptyXref { index: usize, file: String, line: u32 },
    /// A record's `xref` list contains a blank entry.
    BlankXrefEntry { index: usize, file: String, line: u32 },
    /// A record's `file` is blank.
    BlankFile { index: usize },
    /// A record's `line` is 0 (lines are 1-based).
    ZeroLine { index: usize, file: String },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::EmptyXref { index, file, line } => {
                write!(f, "record {} ({}:{}) has an empty xref list", index, file, line)
            }
            RecordError::BlankXrefEntry { index, file, line } => {
                write!(f, "record {} ({}:{}) has a blank xref entry", index, file, line)
            }
            RecordError::BlankFile { index } => {
                write!(f, "record {} has a blank file path", index)
            }
            RecordError::ZeroLine { index, file } => {
                write!(f, "record {} ({}) has line 0, lines are 1-based", index, file)
            }
        }
    }
}

impl std::error::Error for RecordError {}

/// Validate suite records before correlation.
///
/// Returns the first defect found. A record that cannot mint a stable
/// reference id or that points nowhere indicates corrupt suite data, which is
/// worth stopping for; an id that merely fails to resolve in a document is
/// handled later as a diagnostic instead.
pub fn validate_records(records: &[TestRecord]) -> Result<(), RecordError> {
    for (index, record) in records.iter().enumerate() {
        if record.file.trim().is_empty() {
            return Err(RecordError::BlankFile { index });
        }
        if record.line == 0 {
            return Err(RecordError::ZeroLine {
                index,
                file: record.file.clone(),
            });
        }
        if record.xref.is_empty() {
            return Err(RecordError::EmptyXref {
                index,
                file: record.file.clone(),
                line: record.line,
            });
        }
        if record.xref.iter().any(|id| id.trim().is_empty()) {
            return Err(RecordError::BlankXrefEntry {
                index,
                file: record.file.clone(),
                line: record.line,
            });
        }
    }
    Ok(())
}

// =============================================================================
// LINK MINTING
// =============================================================================

/// URL bases used to mint the links carried by references and sections.
///
/// One context per specification document: `spec_url` is that document's
/// canonical URL, the other two are shared across the suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkContext {
    /// Canonical URL of the specification document
    pub spec_url: String,
    /// Base URL under which test definition files are browsable
    pub source_base_url: String,
    /// URL of the published report page that hosts the test tables
    pub report_url: String,
}

impl LinkContext {
    /// Deep link to a section of the specification document.
    pub fn section_url(&self, id: &str) -> String {
        format!("{}#{}", self.spec_url, id)
    }
}

/// The linkable identity of one suite record.
///
/// A record appearing under several sections yields one `TestReference`
/// cloned into each group; the id stays identical so all copies resolve to
/// the same report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReference {
    /// Stable id: `{file}_L{line}`
    pub id: String,
    /// Deep link to the test definition source
    pub url: String,
    /// Deep link to this test's row in the published report
    pub url_table_row: String,
    /// Description carried over from the record, markup intact
    pub scenario: String,
}

impl TestReference {
    pub fn new(record: &TestRecord, links: &LinkContext) -> Self {
        let id = format!("{}_L{}", record.file, record.line);
        TestReference {
            url: format!(
                "{}/{}#L{}",
                links.source_base_url.trim_end_matches('/'),
                record.file,
                record.line
            ),
            url_table_row: format!("{}#{}", links.report_url, id),
            scenario: record.scenario.clone(),
            id,
        }
    }
}

// =============================================================================
// CORRELATION OUTPUT
// =============================================================================

/// A specification section matched by at least one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    /// The section element's id
    pub id: String,
    /// Inner markup of the section's first heading, surrounding whitespace
    /// trimmed
    pub title: String,
    /// Deep link to the section in the live specification
    pub url: String,
}

/// One matched section with the references that exercise it, in the order
/// they were encountered in the suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTests {
    pub section: SectionInfo,
    pub tests: Vec<TestReference>,
}

/// Why an xref occurrence produced a diagnostic instead of a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// No section element with this id exists in the document.
    MissingSection,
    /// The section exists but contains no heading element to title it.
    MissingHeading,
    /// The same reference was already recorded for this section.
    DuplicateReference,
}

/// A non-fatal correlation finding, tied to the xref occurrence that caused
/// it. Stale suite data should surface as warnings, not abort the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefDiagnostic {
    /// The section id the record named
    pub xref: String,
    /// Reference id of the record that named it
    pub test_id: String,
    pub kind: DiagnosticKind,
}

impl fmt::Display for XrefDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::MissingSection => {
                write!(
                    f,
                    "test {} references unknown section \"{}\"",
                    self.test_id, self.xref
                )
            }
            DiagnosticKind::MissingHeading => {
                write!(
                    f,
                    "section \"{}\" has no heading element (referenced by test {})",
                    self.xref, self.test_id
                )
            }
            DiagnosticKind::DuplicateReference => {
                write!(
                    f,
                    "test {} listed twice for section \"{}\"",
                    self.test_id, self.xref
                )
            }
        }
    }
}

/// The complete result of correlating one document with the suite.
///
/// `sections` follows document order regardless of how the suite orders its
/// records. Unresolvable or duplicate xref occurrences land in
/// `diagnostics`; they never fail the correlation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Correlation {
    pub sections: Vec<SectionTests>,
    pub diagnostics: Vec<XrefDiagnostic>,
}

impl Correlation {
    /// Total references placed across all groups.
    pub fn reference_count(&self) -> usize {
        self.sections.iter().map(|group| group.tests.len()).sum()
    }
}
