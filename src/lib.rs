//! nuxt-lens: reference-count lenses for Nuxt projects
//!
//! nuxt-lens annotates declarations of components, composables, stores,
//! plugins, middleware, layouts and utilities with how often they are used
//! elsewhere in the project. Resolution is syntactic: file contents are
//! pattern-matched, never parsed into an AST, and every rule for the
//! framework's implicit auto-imports and naming conventions is explicit.
//!
//! # Position Conventions
//!
//! All reference locations use:
//! - **Line positions**: 1-indexed (line 1 is the first line)
//! - **Column positions**: 0-indexed byte offsets within the line
//! - **Byte offsets**: half-open `[start, end)` ranges from file start
//!
//! # Failure Model
//!
//! Scanning and resolution never fail. Unreadable files, unmatched patterns
//! and failing host providers all degrade to "no data"; the only visible
//! effect is a lower count or a missing lens, plus a `log` record.

pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod io;
pub mod kind;
pub mod lens;
pub mod naming;
pub mod output;
pub mod paths;
pub mod patterns;
pub mod project;
pub mod resolve;
pub mod scan;
pub mod seed;
pub mod text;
pub mod version;
pub mod watcher;

pub use cache::{CacheKey, CacheStats, Locations, ReferenceCache, TtlCache};
pub use config::{InvalidationPolicy, LensConfig, RootPolicy};
pub use error::{LensError, Result};
pub use index::{find_dirs, DirectoryIndex, FileFilter, IgnoreSet, SkipReason};
pub use kind::{classify, DocumentKind};
pub use lens::{Document, JumpCommand, Lens, LensProvider, Position};
pub use naming::{hook_name_for, kebab_to_pascal, pascal_to_kebab};
pub use output::{generate_execution_id, output_json, JsonResponse, OutputFormat};
pub use project::{find_project_root, ProjectRoot};
pub use resolve::{resolve, ReferenceLocation, ResolveContext, SymbolQuery};
pub use scan::{scan_kind, DeclarationKind, SymbolCatalog, SymbolInfo};
pub use seed::{NoSeed, ReferenceSeed};
pub use watcher::{EventType, FileChange, FileSystemWatcher, WatcherBatch, WatcherConfig};
