pub mod manifest;
pub mod parallel;
pub mod records;

use std::fs;
use std::path::Path;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

pub use manifest::*;
pub use parallel::*;
pub use records::*;

/// Manifest filename expected in the input directory.
pub const MANIFEST_FILE: &str = "suite.json";
/// Output subdirectory for report fragments.
pub const FRAGMENT_DIR: &str = "fragments";
/// Output subdirectory for annotated documents.
pub const ANNOTATED_DIR: &str = "annotated";

/// Create a progress style for the main progress bar
#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
    )
    .unwrap()
    .progress_chars("━━╸")
}

/// Aggregate counts for a build run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildSummary {
    /// Documents listed in the manifest
    pub documents: usize,
    /// Documents that failed to read or parse
    pub failed: usize,
    /// Sections with tests, summed over successful documents
    pub matched_sections: usize,
    /// References placed, summed over successful documents
    pub references: usize,
    /// Unresolved or duplicate cross-references
    pub diagnostics: usize,
}

/// Read and parse the suite manifest from the input directory.
pub fn load_manifest(input_dir: &Path) -> Result<SuiteManifest, String> {
    let manifest_path = input_dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&manifest_path)
        .map_err(|e| format!("Failed to read manifest: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("Invalid manifest JSON: {}", e))
}

pub fn run_build(input_dir: &str, output_dir: &str) -> Result<BuildSummary, String> {
    let input_path = Path::new(input_dir);
    let output_path = Path::new(output_dir);

    // 1. Read manifest and test records; malformed input fails fast
    let manifest = load_manifest(input_path)?;
    let records = load_records(&input_path.join(&manifest.tests))?;

    if manifest.specs.is_empty() {
        eprintln!("⚠️  No specification documents in manifest; skipping build");
        return Ok(BuildSummary::default());
    }

    // 2. Correlate documents in parallel with progress bar
    #[cfg(feature = "parallel")]
    let pb = ProgressBar::new(manifest.specs.len() as u64);
    #[cfg(feature = "parallel")]
    pb.set_style(create_progress_style());
    #[cfg(feature = "parallel")]
    pb.set_prefix("Correlating");
    #[cfg(feature = "parallel")]
    pb.set_message("documents...");

    let outcomes = parallel::process_specs_with_progress(
        input_path,
        &manifest,
        &records,
        #[cfg(feature = "parallel")]
        &pb,
    );

    #[cfg(feature = "parallel")]
    pb.finish_with_message(format!("correlated {} documents", outcomes.len()));

    // 3. Write fragments and annotated documents
    fs::create_dir_all(output_path.join(FRAGMENT_DIR))
        .map_err(|e| format!("Failed to create output dir: {}", e))?;
    fs::create_dir_all(output_path.join(ANNOTATED_DIR))
        .map_err(|e| format!("Failed to create output dir: {}", e))?;

    let mut summary = BuildSummary {
        documents: outcomes.len(),
        ..BuildSummary::default()
    };

    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => {
                write_output(output_path, FRAGMENT_DIR, &report.file, &report.fragment)?;
                write_output(output_path, ANNOTATED_DIR, &report.file, &report.annotated)?;

                for diag in &report.diagnostics {
                    eprintln!("⚠️  {}: {}", report.file, diag);
                }
                for id in &report.missing_sections {
                    eprintln!(
                        "⚠️  {}: could not find section element with id \"{}\"",
                        report.file, id
                    );
                }
                eprintln!(
                    "  ✓ {} ({}/{} sections, {} references)",
                    report.file,
                    report.matched_sections,
                    report.section_count,
                    report.reference_count
                );

                summary.matched_sections += report.matched_sections;
                summary.references += report.reference_count;
                summary.diagnostics += report.diagnostics.len();
            }
            Err(e) => {
                eprintln!("❌ {}: {}", outcome.file, e);
                summary.failed += 1;
            }
        }
    }

    // Final summary
    eprintln!();
    if summary.failed == 0 {
        eprintln!("✅ Build complete");
    } else {
        eprintln!(
            "❌ Build failed for {} of {} documents",
            summary.failed, summary.documents
        );
    }
    eprintln!(
        "   {} documents │ {} sections with tests │ {} references │ {} diagnostics",
        summary.documents - summary.failed,
        summary.matched_sections,
        summary.references,
        summary.diagnostics
    );

    Ok(summary)
}

/// Write one output file under `output/<dir>/`, creating parent directories
/// for nested document paths.
fn write_output(output_path: &Path, dir: &str, file: &str, content: &str) -> Result<(), String> {
    let path = output_path.join(dir).join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    fs::write(&path, content).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}
