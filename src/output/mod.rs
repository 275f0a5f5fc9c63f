//! JSON output module for CLI commands

pub mod command;

pub use command::{
    generate_execution_id, output_json, ErrorResponse, JsonResponse, LensEntry, LensesResponse,
    OutputFormat, RefsResponse, RootResponse, Span, SymbolEntry, SymbolsResponse,
};
