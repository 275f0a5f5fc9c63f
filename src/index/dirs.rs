//! Directory index: every directory of a logical kind under the root.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::spawn_blocking;
use walkdir::WalkDir;

use crate::cache::TtlCache;
use crate::index::filter::IgnoreSet;

/// Find every directory named `basename` under `root`.
///
/// Ignored subtrees are never descended into, unreadable directories are
/// skipped, and a match nested inside another match is folded into the
/// outer one. Results are sorted.
pub fn find_dirs(root: &Path, basename: &str, ignore: &IgnoreSet) -> Vec<PathBuf> {
    let ignore = ignore.for_dir_search(basename);
    let mut found: Vec<PathBuf> = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            if !entry.file_type().is_dir() {
                return false;
            }
            let name = entry.file_name().to_string_lossy();
            ignore.segment_reason(&name).is_none()
        });

    for entry in walker.filter_map(|e| match e {
        Ok(entry) => Some(entry),
        Err(err) => {
            log::debug!("Skipping unreadable entry: {}", err);
            None
        }
    }) {
        if entry.depth() == 0 || entry.file_name() != basename {
            continue;
        }
        let path = entry.into_path();
        if found.iter().any(|outer| path.starts_with(outer)) {
            continue;
        }
        found.push(path);
    }

    found.sort();
    found
}

/// TTL-cached [`find_dirs`] results keyed by basename.
pub struct DirectoryIndex {
    root: PathBuf,
    ignore: IgnoreSet,
    cache: TtlCache<String, Vec<PathBuf>>,
}

impl DirectoryIndex {
    pub fn new(root: &Path, ignore: IgnoreSet, ttl: Duration) -> Self {
        Self {
            root: root.to_path_buf(),
            ignore,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ignore(&self) -> &IgnoreSet {
        &self.ignore
    }

    /// Directories named `basename`, walking the tree on the blocking pool
    /// only when the cached result has expired.
    pub async fn dirs(&mut self, basename: &str) -> Vec<PathBuf> {
        if let Some(dirs) = self.cache.get(&basename.to_string()) {
            return dirs;
        }
        let root = self.root.clone();
        let ignore = self.ignore.clone();
        let name = basename.to_string();
        let dirs = match spawn_blocking(move || find_dirs(&root, &name, &ignore)).await {
            Ok(dirs) => dirs,
            Err(err) => {
                log::warn!("Directory walk for '{}' failed: {}", basename, err);
                return Vec::new();
            }
        };
        log::debug!("Indexed {} '{}' directories", dirs.len(), basename);
        self.cache.put(basename.to_string(), dirs.clone());
        dirs
    }

    /// Directories for several basenames, de-duplicated.
    pub async fn dirs_for(&mut self, basenames: &[&str]) -> Vec<PathBuf> {
        let mut all: Vec<PathBuf> = Vec::new();
        for name in basenames {
            for dir in self.dirs(name).await {
                if !all.contains(&dir) {
                    all.push(dir);
                }
            }
        }
        all
    }

    pub fn invalidate(&mut self) {
        self.cache.clear();
    }
}
