// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Correlates suite records with the specification sections they exercise.
//!
//! Records arrive in whatever order the suite serializer produced them;
//! groups come back in the order their sections appear in the document. A
//! record naming several sections lands in each of them, and a section named
//! by several records lists each test once.
//!
//! ```text
//! records ──▶ fan out over each record's xref list
//!                   │
//!                   ▼
//!          groups keyed by section id ──▶ sort by document position
//! ```
//!
//! Lookups that fail (unknown section id, section without a heading) become
//! diagnostics rather than errors: one stale cross-reference should not stop
//! the rest of the suite from being reported.

use std::collections::HashMap;

use crate::dom::Document;
use crate::types::{
    Correlation, DiagnosticKind, LinkContext, SectionInfo, SectionTests, TestRecord,
    TestReference, XrefDiagnostic,
};

/// Group `records` by the sections they reference, ordered by the sections'
/// position in `doc`.
///
/// Input order is deliberately discarded: given an unchanged document, the
/// group sequence is reproducible no matter how the suite file is sorted.
/// Records are assumed to have passed [`crate::types::validate_records`].
pub fn correlate(doc: &Document, records: &[TestRecord], links: &LinkContext) -> Correlation {
    let order = doc.section_ids();
    let mut position: HashMap<&str, usize> = HashMap::new();
    for (index, id) in order.iter().enumerate() {
        // First occurrence wins, matching id lookup in the document.
        position.entry(id.as_str()).or_insert(index);
    }

    let mut groups: Vec<SectionTests> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut diagnostics: Vec<XrefDiagnostic> = Vec::new();

    for record in records {
        let reference = TestReference::new(record, links);
        for xref in &record.xref {
            match group_index.get(xref) {
                Some(&at) => {
                    let group = &mut groups[at];
                    if group.tests.iter().any(|test| test.id == reference.id) {
                        diagnostics.push(XrefDiagnostic {
                            xref: xref.clone(),
                            test_id: reference.id.clone(),
                            kind: DiagnosticKind::DuplicateReference,
                        });
                    } else {
                        group.tests.push(reference.clone());
                    }
                }
                None => match section_info(doc, xref, links) {
                    Ok(section) => {
                        group_index.insert(xref.clone(), groups.len());
                        groups.push(SectionTests {
                            section,
                            tests: vec![reference.clone()],
                        });
                    }
                    Err(kind) => diagnostics.push(XrefDiagnostic {
                        xref: xref.clone(),
                        test_id: reference.id.clone(),
                        kind,
                    }),
                },
            }
        }
    }

    // Every group came from a section element found in the document, so its
    // id is guaranteed a position; MAX is unreachable.
    groups.sort_by_key(|group| {
        let at = position.get(group.section.id.as_str()).copied();
        debug_assert!(at.is_some(), "grouped section must exist in the document");
        at.unwrap_or(usize::MAX)
    });

    Correlation {
        sections: groups,
        diagnostics,
    }
}

/// Describe the section with this id, reading its title from the live
/// document rather than trusting anything the suite file claims.
fn section_info(
    doc: &Document,
    id: &str,
    links: &LinkContext,
) -> Result<SectionInfo, DiagnosticKind> {
    let node = doc.section_by_id(id).ok_or(DiagnosticKind::MissingSection)?;
    let heading = doc
        .first_heading(node)
        .ok_or(DiagnosticKind::MissingHeading)?;
    Ok(SectionInfo {
        id: id.to_string(),
        title: doc.inner_html(heading).trim().to_string(),
        url: links.section_url(id),
    })
}
