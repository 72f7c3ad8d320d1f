use clap::Parser;
use std::fs;
use std::path::Path;

use weft::build::{self, run_build};
use weft::dom::Document;

mod cli;
use cli::display;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => match run_build(&input, &output) {
            Ok(summary) => {
                if summary.failed > 0 {
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
        Commands::Check { input } => {
            if let Err(e) = run_check(&input) {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        }
        Commands::Sections { file } => {
            if let Err(e) = print_sections(&file) {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Validate a suite and print a coverage table without writing anything.
///
/// Runs the same per-document pipeline as `build` so that a clean check
/// means a clean build, but all results stay in memory.
fn run_check(input_dir: &str) -> Result<(), String> {
    let input_path = Path::new(input_dir);
    let manifest = build::load_manifest(input_path)?;
    let records = build::load_records(&input_path.join(&manifest.tests))?;

    let outcomes = build::process_specs(input_path, &manifest, &records);

    display::double_header();
    display::title("WEFT SUITE CHECK");
    display::double_footer();
    println!();

    display::section_top("SUITE");
    display::row("");
    display::row(&format!(
        "  Manifest:   {}",
        display::themed(display::CYAN, &[], input_dir)
    ));
    display::row(&format!("  Records:    {}", records.len()));
    display::row(&format!("  Documents:  {}", manifest.specs.len()));
    display::row("");
    display::section_mid("COVERAGE");
    display::row("");
    display::row(&format!(
        "  {}",
        display::styled(
            &[display::DIM],
            &format!(
                "{:<46}{:>14}{:>8}{:>10}",
                "DOCUMENT", "SECTIONS", "COV", "DIAGS"
            )
        )
    ));

    let mut failed = 0usize;
    let mut total_sections = 0usize;
    let mut total_matched = 0usize;
    let mut total_diags = 0usize;

    for outcome in &outcomes {
        let name = display::truncate_path(&outcome.file, 44);
        match &outcome.result {
            Ok(report) => {
                let diags = report.diagnostics.len() + report.missing_sections.len();
                display::row(&format!(
                    "  {}{}{}{}",
                    display::pad_right(&name, 46),
                    display::pad_left(
                        &format!("{}/{}", report.matched_sections, report.section_count),
                        14
                    ),
                    display::pad_left(
                        &display::coverage_colored(report.matched_sections, report.section_count),
                        8
                    ),
                    display::pad_left(&display::diagnostic_count(diags), 10),
                ));
                total_sections += report.section_count;
                total_matched += report.matched_sections;
                total_diags += diags;
            }
            Err(_) => {
                display::row(&format!(
                    "  {}{}",
                    display::pad_right(&name, 46),
                    display::pad_left(
                        &display::themed(display::RED, &[display::BOLD], "FAILED"),
                        14
                    ),
                ));
                failed += 1;
            }
        }
    }

    display::row("");
    display::row(&format!(
        "  {}{}{}{}",
        display::styled(&[display::BOLD], &display::pad_right("TOTAL", 46)),
        display::pad_left(&format!("{}/{}", total_matched, total_sections), 14),
        display::pad_left(&display::coverage_colored(total_matched, total_sections), 8),
        display::pad_left(&display::diagnostic_count(total_diags), 10),
    ));
    display::row("");
    display::section_bot();
    println!();

    for outcome in &outcomes {
        if let Ok(report) = &outcome.result {
            for diag in &report.diagnostics {
                eprintln!("⚠️  {}: {}", report.file, diag);
            }
            for id in &report.missing_sections {
                eprintln!(
                    "⚠️  {}: could not find section element with id \"{}\"",
                    report.file, id
                );
            }
        }
    }
    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            eprintln!("❌ {}: {}", outcome.file, e);
        }
    }

    if failed > 0 {
        return Err(format!(
            "{} of {} documents failed",
            failed,
            outcomes.len()
        ));
    }
    Ok(())
}

/// Print a document's section ids, one per line, in document order.
fn print_sections(file: &str) -> Result<(), String> {
    let source =
        fs::read_to_string(file).map_err(|e| format!("Failed to read {}: {}", file, e))?;
    let doc = Document::parse(&source).map_err(|e| format!("Failed to parse {}: {}", file, e))?;
    for id in doc.section_ids() {
        println!("{}", id);
    }
    Ok(())
}
