//! nuxt-lens error types.
//!
//! Only configuration, filtering and watching can fail. Scanning and
//! reference resolution degrade to empty results instead of erroring.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for nuxt-lens operations.
#[derive(Error, Debug)]
pub enum LensError {
    /// I/O error during file operations.
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid glob pattern in an include/exclude list.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// The underlying globset error.
        #[source]
        source: globset::Error,
    },

    /// Malformed `.nuxtlens.json`.
    #[error("Invalid configuration in {path}: {source}")]
    Config {
        /// Configuration file path.
        path: PathBuf,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Gitignore rules could not be compiled.
    #[error("Ignore rules error: {0}")]
    Ignore(#[from] ignore::Error),

    /// File-system watcher error.
    #[error("Watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// No ancestor of the path contains a framework configuration file.
    #[error("No project root found above {0}")]
    RootNotFound(PathBuf),

    /// Unknown document kind name.
    #[error("Unknown kind '{0}' (expected component, composable, plugin, middleware, layout, store or utility)")]
    UnknownKind(String),
}

/// Result alias for nuxt-lens operations.
pub type Result<T> = std::result::Result<T, LensError>;
