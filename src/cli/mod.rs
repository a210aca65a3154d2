pub mod completions;
pub mod convert;
pub mod inspect;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::config::ConversionOptions;
use crate::diagnostics::{Diagnostics, Severity};
use crate::error::Result;
use crate::output::Printer;

/// asciidiag - ASCII-art diagram compiler
#[derive(Parser, Debug)]
#[command(name = "asciidiag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print debug logging to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert diagrams to JSON shape descriptions
    Convert(convert::ConvertArgs),

    /// Print a summary of the shapes and labels found in a diagram
    Inspect(inspect::InspectArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Options from a config file, or the defaults without one.
pub fn load_options(config: Option<&Path>) -> Result<ConversionOptions> {
    match config {
        Some(path) => ConversionOptions::load(path),
        None => Ok(ConversionOptions::default()),
    }
}

/// Print conversion diagnostics as status lines.
pub fn report_diagnostics(printer: &Printer, diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.iter() {
        let is_error = diagnostic.severity == Severity::Error;
        let label = printer.severity(&diagnostic.severity.to_string(), is_error);
        eprintln!("{}: {} {}", label, diagnostic.message, printer.dim(&format!("[{}]", diagnostic.code)));
        if let Some(help) = &diagnostic.help {
            eprintln!("  {} {}", printer.dim("help:"), help);
        }
    }
}
