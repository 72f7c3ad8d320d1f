// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Writes test-reference attributes onto the specification's sections.
//!
//! Every section with correlated tests gains two attributes:
//!
//! | Attribute     | Value                                          |
//! |---------------|------------------------------------------------|
//! | `data-tested` | `"true"`                                       |
//! | `data-tests`  | comma-separated report-row URLs, deduplicated  |
//!
//! A document may be annotated repeatedly, so `data-tests` is treated as a
//! serialized set: the existing value is parsed, unioned with the new rows,
//! and written back. Existing tokens keep their positions and unseen rows
//! append, which makes a rerun with the same correlation a byte-for-byte
//! no-op. Sections without correlated tests are left untouched.
//!
//! Annotation never fails. A correlation computed against a different
//! document can name sections that do not exist here; those groups are
//! skipped and reported in the summary for the caller to log.

use crate::dom::Document;
use crate::types::Correlation;

/// Boolean marker attribute set on every matched section.
pub const TESTED_ATTR: &str = "data-tested";
/// Attribute carrying the merged report-row URL set.
pub const TEST_REFS_ATTR: &str = "data-tests";

/// What [`annotate`] did to the document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotateSummary {
    /// Sections that received attributes
    pub annotated: usize,
    /// Section ids named by the correlation but absent from this document
    pub missing: Vec<String>,
}

/// Annotate every section of `correlation` in place. The caller serializes
/// the document afterwards; nothing is written here.
pub fn annotate(doc: &mut Document, correlation: &Correlation) -> AnnotateSummary {
    let mut summary = AnnotateSummary::default();
    for group in &correlation.sections {
        let id = &group.section.id;
        match doc.section_by_id(id) {
            Some(node) => {
                doc.set_attr(node, TESTED_ATTR, "true");
                let existing = doc.attr(node, TEST_REFS_ATTR).map(str::to_string);
                let merged = merge_token_list(
                    existing.as_deref(),
                    group.tests.iter().map(|test| test.url_table_row.as_str()),
                );
                doc.set_attr(node, TEST_REFS_ATTR, &merged);
                summary.annotated += 1;
            }
            None => summary.missing.push(id.clone()),
        }
    }
    summary
}

/// Union a comma-separated token list with new tokens.
///
/// Order is existing tokens first, in their original positions, then unseen
/// additions in iteration order. Blank tokens and surrounding whitespace are
/// dropped, so a hand-edited attribute still merges cleanly.
pub fn merge_token_list<'a, I>(existing: Option<&'a str>, additions: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tokens: Vec<&str> = Vec::new();
    for token in existing.into_iter().flat_map(|value| value.split(',')) {
        let token = token.trim();
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    for token in additions {
        let token = token.trim();
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens.join(",")
}
