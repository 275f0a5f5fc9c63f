//! Runtime configuration.
//!
//! Every field has a default, so a project without `.nuxtlens.json` behaves
//! exactly like one with an empty `{}` file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{LensError, Result};

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE_NAME: &str = ".nuxtlens.json";

/// Which config-bearing ancestor wins when none is corroborated by a
/// manifest, VCS or workspace marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootPolicy {
    /// Topmost ancestor holding a framework config file.
    #[default]
    Outermost,
    /// Nearest ancestor holding a framework config file.
    Innermost,
}

/// How a file-change event clears cached reference results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationPolicy {
    /// Clear only the per-kind caches whose candidate files match the change.
    #[default]
    ByKind,
    /// Clear every reference cache on any relevant change.
    ClearAll,
}

/// nuxt-lens configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    /// Reference cache TTL in seconds
    pub reference_ttl_secs: u64,
    /// Directory index TTL in seconds
    pub directory_ttl_secs: u64,
    /// Symbol catalog TTL in seconds
    pub catalog_ttl_secs: u64,
    /// Files read concurrently per batch
    pub batch_size: usize,
    /// Native seed results below this count trigger a text search
    pub seed_threshold: usize,
    pub root_policy: RootPolicy,
    pub invalidation: InvalidationPolicy,
    /// Extra directory names never descended into
    pub extra_ignored_dirs: Vec<String>,
    /// Watcher debounce delay in milliseconds
    pub debounce_ms: u64,
    /// Honour .gitignore / .ignore when enumerating candidate files
    pub gitignore_aware: bool,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            reference_ttl_secs: 300,
            directory_ttl_secs: 1800,
            catalog_ttl_secs: 60,
            batch_size: 50,
            seed_threshold: 5,
            root_policy: RootPolicy::default(),
            invalidation: InvalidationPolicy::default(),
            extra_ignored_dirs: Vec::new(),
            debounce_ms: 300,
            gitignore_aware: true,
        }
    }
}

impl LensConfig {
    /// Load `<root>/.nuxtlens.json`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(LensError::Io { path, source }),
        };
        serde_json::from_str(&raw).map_err(|source| LensError::Config { path, source })
    }

    pub fn reference_ttl(&self) -> Duration {
        Duration::from_secs(self.reference_ttl_secs)
    }

    pub fn directory_ttl(&self) -> Duration {
        Duration::from_secs(self.directory_ttl_secs)
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }

    /// Batch size clamped to at least one file.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
