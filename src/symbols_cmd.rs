//! Symbols command implementation

use anyhow::Result;
use std::path::Path;

use nuxt_lens::output::{output_json, JsonResponse, SymbolEntry, SymbolsResponse};
use nuxt_lens::{generate_execution_id, DocumentKind, LensConfig, LensProvider, OutputFormat};

pub async fn run_symbols(
    root: &Path,
    kind: Option<DocumentKind>,
    output_format: OutputFormat,
) -> Result<()> {
    let config = LensConfig::load(root)?;
    let mut provider = LensProvider::with_root(root.to_path_buf(), config);

    let kinds: Vec<DocumentKind> = match kind {
        Some(kind) => vec![kind],
        None => DocumentKind::ALL.to_vec(),
    };
    let mut entries = Vec::new();
    for kind in kinds {
        for symbol in provider.symbols(kind).await {
            entries.push(SymbolEntry { kind, symbol });
        }
    }

    match output_format {
        OutputFormat::Human => {
            for entry in &entries {
                let rel = entry
                    .symbol
                    .defining_path
                    .strip_prefix(root)
                    .unwrap_or(&entry.symbol.defining_path);
                println!(
                    "{:<11} {:<32} {}{}",
                    entry.kind,
                    entry.symbol.name,
                    rel.display(),
                    if entry.symbol.is_auto_imported { "" } else { "  (explicit import)" }
                );
            }
            println!("{} symbols", entries.len());
            Ok(())
        }
        OutputFormat::Json => {
            let response = SymbolsResponse {
                root: root.to_string_lossy().into_owned(),
                kind_filter: kind,
                symbols: entries,
            };
            output_json(&JsonResponse::new(response, &generate_execution_id()))
        }
    }
}
