use serde::Deserialize;

use crate::types::LinkContext;

/// Input manifest: `suite.json` in the input directory.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SuiteManifest {
    pub version: u32,
    /// Path of the test records file, relative to the input directory
    pub tests: String,
    /// Base URL under which test definition files are browsable
    pub source_base_url: String,
    /// URL of the published report the fragments end up in
    pub report_url: String,
    /// Emit a bare report container for documents with no matches
    #[serde(default = "default_emit_empty")]
    pub emit_empty: bool,
    /// Specification documents to correlate and annotate
    pub specs: Vec<SpecEntry>,
}

fn default_emit_empty() -> bool {
    true
}

/// One specification document.
#[derive(Deserialize, Clone, Debug)]
pub struct SpecEntry {
    /// Path of the document, relative to the input directory
    pub file: String,
    /// Canonical URL of the published document
    pub url: String,
}

impl SuiteManifest {
    /// Link context for one of the manifest's documents.
    pub fn link_context(&self, spec: &SpecEntry) -> LinkContext {
        LinkContext {
            spec_url: spec.url.clone(),
            source_base_url: self.source_base_url.clone(),
            report_url: self.report_url.clone(),
        }
    }
}
