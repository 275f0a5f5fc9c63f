//! JSON output types for CLI commands
//!
//! Every command wraps its payload in a [`JsonResponse`] carrying a schema
//! version, a per-run execution id and a timestamp.
//!
//! # Span Model
//!
//! References are reported as [`Span`]s over **half-open ranges**
//! `[byte_start, byte_end)`. Lines are 1-indexed, columns are 0-indexed byte
//! offsets within their line, so `source.get(byte_start..byte_end)` is the
//! matched text.
//!
//! ```text
//! Source: "const a = useFoo()"
//!          0123456789...
//!
//! Span for "useFoo": byte_start=10, byte_end=16
//!   start_line=1 start_col=10 end_line=1 end_col=16
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::kind::DocumentKind;
use crate::lens::Lens;
use crate::resolve::ReferenceLocation;
use crate::scan::SymbolInfo;

/// Current JSON output schema version
pub const NUXT_LENS_JSON_SCHEMA_VERSION: &str = "1.0.0";

/// Wrapper for all JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    /// Schema version for parsing stability
    pub schema_version: String,
    /// Unique execution ID for this run
    pub execution_id: String,
    /// Tool name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// RFC 3339 timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Response data
    pub data: T,
}

impl<T> JsonResponse<T> {
    /// Create a new JSON response
    pub fn new(data: T, execution_id: &str) -> Self {
        JsonResponse {
            schema_version: NUXT_LENS_JSON_SCHEMA_VERSION.to_string(),
            execution_id: execution_id.to_string(),
            tool: Some("nuxt-lens".to_string()),
            timestamp: Some(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
            data,
        }
    }
}

/// Span in source code (byte + line/column), half-open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub file_path: String,
    pub byte_start: usize,
    pub byte_end: usize,
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl From<&ReferenceLocation> for Span {
    fn from(loc: &ReferenceLocation) -> Self {
        Span {
            file_path: loc.file_path.to_string_lossy().into_owned(),
            byte_start: loc.byte_start,
            byte_end: loc.byte_end,
            start_line: loc.start_line,
            start_col: loc.start_col,
            end_line: loc.end_line,
            end_col: loc.end_col,
        }
    }
}

/// Response for the root command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub file_path: String,
    pub root: String,
}

/// Response for the symbols command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolsResponse {
    pub root: String,
    /// Kind filter that was applied (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind_filter: Option<DocumentKind>,
    pub symbols: Vec<SymbolEntry>,
}

/// One catalogued symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub kind: DocumentKind,
    #[serde(flatten)]
    pub symbol: SymbolInfo,
}

/// One lens with its references flattened into spans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensEntry {
    pub kind: DocumentKind,
    pub symbol: String,
    pub line: usize,
    pub col: usize,
    pub label: String,
    pub references: Vec<Span>,
}

impl From<&Lens> for LensEntry {
    fn from(lens: &Lens) -> Self {
        LensEntry {
            kind: lens.kind,
            symbol: lens.symbol.clone(),
            line: lens.anchor.line,
            col: lens.anchor.col,
            label: lens.label.clone(),
            references: lens
                .command
                .iter()
                .flat_map(|c| c.locations.iter())
                .map(Span::from)
                .collect(),
        }
    }
}

/// Response for the lenses command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensesResponse {
    pub file_path: String,
    pub lenses: Vec<LensEntry>,
}

impl LensesResponse {
    pub fn new(file_path: &Path, lenses: &[Lens]) -> Self {
        LensesResponse {
            file_path: file_path.to_string_lossy().into_owned(),
            lenses: lenses.iter().map(LensEntry::from).collect(),
        }
    }
}

/// Response for the refs command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefsResponse {
    pub symbol_name: String,
    pub kind: DocumentKind,
    /// Defining file, when given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub references: Vec<Span>,
}

/// Response for errors in JSON mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category/type
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// JSON output with schema versioning
    Json,
}

impl OutputFormat {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Generate a unique execution ID for this run
pub fn generate_execution_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Output JSON to stdout
pub fn output_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{}", json);
    Ok(())
}
