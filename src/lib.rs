//! Correlates conformance test suites with the specification sections they exercise.
//!
//! Test records carry cross-references to section ids in HTML specification
//! documents. This crate groups those records by section in document order,
//! renders an HTML report fragment per document, and annotates the documents
//! themselves with machine-readable coverage attributes.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  types.rs  │────▶│ correlate.rs │──┬─▶│  report.rs  │
//! │ (TestRecord,     │ (correlate)  │  │  │ (render_    │
//! │  LinkContext)    │              │  │  │  report)    │
//! └────────────┘     └──────────────┘  │  └─────────────┘
//!        │                  ▲          │  ┌─────────────┐
//!        ▼                  │          └─▶│ annotate.rs │
//! ┌──────────────────────────────┐        │ (annotate)  │
//! │            dom/              │        └─────────────┘
//! │  (Document, span-preserving  │
//! │   parse and serialize)       │
//! └──────────────────────────────┘
//! ```
//!
//! One correlation feeds both consumers, so the report fragment and the
//! annotated document always describe the same grouping. The `build` module
//! ties the stages together over a suite manifest, one independent unit of
//! work per document.
//!
//! # Usage
//!
//! ```ignore
//! use weft::{annotate, correlate, render_report, Document, ReportOptions};
//!
//! let mut doc = Document::parse(&html)?;
//! let correlation = correlate(&doc, &records, &links);
//! let fragment = render_report(&correlation, ReportOptions::default());
//! let summary = annotate(&mut doc, &correlation);
//! let annotated = doc.serialize();
//! ```

// Module declarations
pub mod annotate;
pub mod build;
pub mod correlate;
pub mod dom;
pub mod report;
pub mod types;

// Re-exports for public API
pub use annotate::{annotate, merge_token_list, AnnotateSummary, TESTED_ATTR, TEST_REFS_ATTR};
pub use correlate::correlate;
pub use dom::{Document, NodeId, ParseError};
pub use report::{render_report, ReportOptions, CONTAINER_ID, ID_COLUMN_CLASS, TABLE_CLASS};
pub use types::{
    validate_records, Correlation, DiagnosticKind, LinkContext, RecordError, SectionInfo,
    SectionTests, TestRecord, TestReference, XrefDiagnostic,
};
