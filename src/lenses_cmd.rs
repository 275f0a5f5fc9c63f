//! Lenses command implementation
//!
//! Prints the lenses of one file with their reference locations.

use anyhow::{Context, Result};
use std::path::Path;

use nuxt_lens::output::{output_json, JsonResponse, LensesResponse};
use nuxt_lens::{generate_execution_id, Document, Lens, LensProvider, OutputFormat};

/// Print `lenses` in human-readable form.
pub fn print_lenses(file: &Path, lenses: &[Lens]) {
    if lenses.is_empty() {
        println!("{}: no lenses", file.display());
        return;
    }
    for lens in lenses {
        println!(
            "{}:{}:{}  {}  {} [{}]",
            file.display(),
            lens.anchor.line,
            lens.anchor.col,
            lens.label,
            lens.symbol,
            lens.kind
        );
        if let Some(command) = &lens.command {
            for loc in command.locations.iter() {
                println!(
                    "    {}:{}:{}",
                    loc.file_path.display(),
                    loc.start_line,
                    loc.start_col
                );
            }
        }
    }
}

pub fn emit_lenses(file: &Path, lenses: &[Lens], output_format: OutputFormat) -> Result<()> {
    match output_format {
        OutputFormat::Human => {
            print_lenses(file, lenses);
            Ok(())
        }
        OutputFormat::Json => {
            let response = JsonResponse::new(
                LensesResponse::new(file, lenses),
                &generate_execution_id(),
            );
            output_json(&response)
        }
    }
}

pub async fn run_lenses(file: &Path, output_format: OutputFormat) -> Result<()> {
    let mut provider = LensProvider::open(file)?;
    let doc = Document::open(file)
        .await
        .with_context(|| format!("Cannot read {}", file.display()))?;
    let lenses = provider.provide_lenses(&doc).await;
    emit_lenses(file, &lenses, output_format)
}
