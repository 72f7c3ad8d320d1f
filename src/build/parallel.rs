// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parallel correlation of specification documents.
//!
//! Documents are independent units of work: each is read, parsed, correlated,
//! rendered, and annotated without touching shared state, so Rayon makes the
//! fan-out trivial: `par_iter()` over the manifest's spec entries. The test
//! records are read once and shared immutably across the batch.
//!
//! Failure stays local to its document. One unreadable or unparseable file
//! yields an `Err` outcome for that entry while the rest of the batch
//! completes; the caller decides whether that fails the run. Nothing is
//! written here, so a failed document never leaves a half-annotated file
//! behind.

use std::fs;
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use indicatif::ProgressBar;

use crate::annotate::annotate;
use crate::correlate::correlate;
use crate::dom::Document;
use crate::report::{render_report, ReportOptions};
use crate::types::{TestRecord, XrefDiagnostic};

use super::{SpecEntry, SuiteManifest};

/// Everything produced for one document, held in memory until the caller
/// writes it out.
#[derive(Debug)]
pub struct SpecReport {
    /// Manifest-relative path of the document
    pub file: String,
    /// Rendered report fragment
    pub fragment: String,
    /// Annotated document text
    pub annotated: String,
    /// Sections in the document, matched or not
    pub section_count: usize,
    /// Sections that gained test attributes
    pub matched_sections: usize,
    /// References placed across all groups
    pub reference_count: usize,
    /// Cross-references that did not resolve cleanly
    pub diagnostics: Vec<XrefDiagnostic>,
    /// Section ids the annotator could not find
    pub missing_sections: Vec<String>,
}

/// Outcome of one document: its report, or that document's error.
pub struct SpecOutcome {
    pub file: String,
    pub result: Result<SpecReport, String>,
}

/// Correlate and annotate a single document.
fn process_spec(
    input_dir: &Path,
    manifest: &SuiteManifest,
    records: &[TestRecord],
    spec: &SpecEntry,
) -> Result<SpecReport, String> {
    let path = input_dir.join(&spec.file);
    let source = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let mut doc = Document::parse(&source)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    let links = manifest.link_context(spec);
    let correlation = correlate(&doc, records, &links);
    let fragment = render_report(
        &correlation,
        ReportOptions {
            emit_empty: manifest.emit_empty,
        },
    );
    let summary = annotate(&mut doc, &correlation);
    let annotated = doc.serialize();

    Ok(SpecReport {
        file: spec.file.clone(),
        fragment,
        annotated,
        section_count: doc.section_ids().len(),
        matched_sections: summary.annotated,
        reference_count: correlation.reference_count(),
        diagnostics: correlation.diagnostics,
        missing_sections: summary.missing,
    })
}

/// Process every document in the manifest, in parallel when the `parallel`
/// feature is on. Outcome order follows manifest order either way.
pub fn process_specs(
    input_dir: &Path,
    manifest: &SuiteManifest,
    records: &[TestRecord],
) -> Vec<SpecOutcome> {
    #[cfg(feature = "parallel")]
    let specs = manifest.specs.par_iter();
    #[cfg(not(feature = "parallel"))]
    let specs = manifest.specs.iter();

    specs
        .map(|spec| SpecOutcome {
            file: spec.file.clone(),
            result: process_spec(input_dir, manifest, records, spec),
        })
        .collect()
}

/// Process every document in the manifest with progress reporting.
#[cfg(feature = "parallel")]
pub fn process_specs_with_progress(
    input_dir: &Path,
    manifest: &SuiteManifest,
    records: &[TestRecord],
    progress: &ProgressBar,
) -> Vec<SpecOutcome> {
    let counter = AtomicUsize::new(0);
    let total = manifest.specs.len();

    manifest
        .specs
        .par_iter()
        .map(|spec| {
            let outcome = SpecOutcome {
                file: spec.file.clone(),
                result: process_spec(input_dir, manifest, records, spec),
            };

            // Update progress
            let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
            progress.set_position(count as u64);
            progress.set_message(format!("{}/{}", count, total));

            outcome
        })
        .collect()
}

/// Process every document in the manifest with progress reporting.
/// Non-parallel fallback (no-op progress).
#[cfg(not(feature = "parallel"))]
pub fn process_specs_with_progress(
    input_dir: &Path,
    manifest: &SuiteManifest,
    records: &[TestRecord],
) -> Vec<SpecOutcome> {
    process_specs(input_dir, manifest, records)
}
