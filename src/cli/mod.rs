// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the weft command-line interface.
//!
//! Three subcommands: `build` to run the full correlate/report/annotate
//! pipeline over a suite, `check` to validate a suite and print per-document
//! coverage without writing anything, and `sections` to list one document's
//! section ids in document order.

pub mod display;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "weft",
    about = "Correlates conformance test suites with specification sections",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build report fragments and annotated documents from a suite
    Build {
        /// Input directory containing suite.json, the test records file,
        /// and the specification documents
        #[arg(short, long)]
        input: String,

        /// Output directory for fragments/ and annotated/
        #[arg(short, long)]
        output: String,
    },

    /// Validate a suite and print per-document coverage
    Check {
        /// Input directory containing suite.json
        #[arg(short, long)]
        input: String,
    },

    /// Print a document's section ids in document order
    Sections {
        /// Path to a specification document
        file: String,
    },
}
