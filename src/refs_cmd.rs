//! Refs command implementation
//!
//! Resolves every reference to one named symbol, bypassing the cache.

use anyhow::Result;
use std::path::Path;

use nuxt_lens::output::{output_json, JsonResponse, RefsResponse, Span};
use nuxt_lens::{generate_execution_id, DocumentKind, LensProvider, OutputFormat, SymbolQuery};

pub async fn run_refs(
    file: &Path,
    kind: DocumentKind,
    name: &str,
    output_format: OutputFormat,
) -> Result<()> {
    let mut provider = LensProvider::open(file)?;
    let query = SymbolQuery::new(name, kind).defined_in(file);
    let references = provider.references(&query).await;

    match output_format {
        OutputFormat::Human => {
            println!("{} {} ({} references)", kind, name, references.len());
            for loc in &references {
                println!(
                    "  {}:{}:{}-{}:{}",
                    loc.file_path.display(),
                    loc.start_line,
                    loc.start_col,
                    loc.end_line,
                    loc.end_col
                );
            }
            Ok(())
        }
        OutputFormat::Json => {
            let response = RefsResponse {
                symbol_name: name.to_string(),
                kind,
                file_path: Some(file.to_string_lossy().into_owned()),
                references: references.iter().map(Span::from).collect(),
            };
            output_json(&JsonResponse::new(response, &generate_execution_id()))
        }
    }
}
