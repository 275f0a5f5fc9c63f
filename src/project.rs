//! Project root discovery.
//!
//! A project root is an ancestor directory holding a framework config file.
//! Candidates corroborated by a package manifest, VCS directory or
//! workspace file win; otherwise [`RootPolicy`] picks between the outermost
//! and innermost candidate. All file-system errors count as "marker absent".

use std::path::{Path, PathBuf};

use crate::config::RootPolicy;

/// Framework configuration file names that mark a project root.
pub const CONFIG_FILE_NAMES: &[&str] = &["nuxt.config.ts", "nuxt.config.js"];

/// Markers that corroborate a config-bearing directory as the real root.
const CORROBORATING_MARKERS: &[&str] = &[
    "package.json",
    ".git",
    "pnpm-workspace.yaml",
    "lerna.json",
    "nx.json",
    "turbo.json",
];

fn has_config_file(dir: &Path) -> bool {
    CONFIG_FILE_NAMES
        .iter()
        .any(|name| std::fs::metadata(dir.join(name)).map(|m| m.is_file()).unwrap_or(false))
}

fn is_corroborated(dir: &Path) -> bool {
    CORROBORATING_MARKERS
        .iter()
        .any(|marker| std::fs::metadata(dir.join(marker)).is_ok())
}

/// Find the project root for `path`.
///
/// Returns `None` when no ancestor (including `path` itself when it is a
/// directory) holds a framework config file.
pub fn find_project_root(path: &Path, policy: RootPolicy) -> Option<PathBuf> {
    let start = if path.is_dir() { path } else { path.parent()? };

    let candidates: Vec<&Path> = start.ancestors().filter(|dir| has_config_file(dir)).collect();

    if let Some(corroborated) = candidates.iter().find(|dir| is_corroborated(dir)) {
        return Some(corroborated.to_path_buf());
    }

    let fallback = match policy {
        RootPolicy::Outermost => candidates.last(),
        RootPolicy::Innermost => candidates.first(),
    };
    fallback.map(|dir| dir.to_path_buf())
}

/// Session-scoped project root, discovered lazily.
///
/// A successful discovery is kept for the rest of the session; a failed one
/// is retried on the next request.
#[derive(Debug, Default)]
pub struct ProjectRoot {
    root: Option<PathBuf>,
}

impl ProjectRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the root (used when the host already knows it).
    pub fn with_root(root: PathBuf) -> Self {
        Self { root: Some(root) }
    }

    pub fn get(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Return the cached root, discovering it from `path` on first use.
    pub fn get_or_discover(&mut self, path: &Path, policy: RootPolicy) -> Option<&Path> {
        if self.root.is_none() {
            self.root = find_project_root(path, policy);
            match &self.root {
                Some(root) => log::info!("Project root: {}", root.display()),
                None => log::debug!("No project root above {}", path.display()),
            }
        }
        self.root.as_deref()
    }

    /// Forget the cached root so the next request rediscovers it.
    pub fn reset(&mut self) {
        self.root = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_finds_nearest_corroborated_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("app");
        touch(&root.join("nuxt.config.ts"));
        touch(&root.join("package.json"));
        touch(&root.join("components/Foo.vue"));

        let found = find_project_root(&root.join("components/Foo.vue"), RootPolicy::Outermost);
        assert_eq!(found, Some(root));
    }

    #[test]
    fn test_corroborated_inner_beats_uncorroborated_outer() {
        let temp_dir = TempDir::new().unwrap();
        let outer = temp_dir.path();
        touch(&outer.join("nuxt.config.js"));
        let inner = outer.join("packages/site");
        touch(&inner.join("nuxt.config.ts"));
        touch(&inner.join("package.json"));
        touch(&inner.join("pages/index.vue"));

        let found = find_project_root(&inner.join("pages/index.vue"), RootPolicy::Outermost);
        assert_eq!(found, Some(inner));
    }

    #[test]
    fn test_uncorroborated_fallback_follows_policy() {
        let temp_dir = TempDir::new().unwrap();
        let outer = temp_dir.path().join("mono");
        touch(&outer.join("nuxt.config.ts"));
        let inner = outer.join("layer");
        touch(&inner.join("nuxt.config.ts"));
        touch(&inner.join("components/Foo.vue"));
        let file = inner.join("components/Foo.vue");

        assert_eq!(
            find_project_root(&file, RootPolicy::Outermost),
            Some(outer.clone())
        );
        assert_eq!(find_project_root(&file, RootPolicy::Innermost), Some(inner));
    }

    #[test]
    fn test_no_config_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("src/main.ts"));

        let found = find_project_root(&temp_dir.path().join("src/main.ts"), RootPolicy::Outermost);
        // The temp dir lives outside any Nuxt project.
        assert!(found.map(|p| !p.starts_with(temp_dir.path())).unwrap_or(true));
    }

    #[test]
    fn test_session_root_is_cached_and_resettable() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("site");
        touch(&root.join("nuxt.config.ts"));
        touch(&root.join(".git/HEAD"));
        touch(&root.join("app.vue"));

        let mut session = ProjectRoot::new();
        assert!(session.get().is_none());
        let found = session
            .get_or_discover(&root.join("app.vue"), RootPolicy::Outermost)
            .map(Path::to_path_buf);
        assert_eq!(found, Some(root.clone()));

        // Removing the config does not affect the cached session root.
        fs::remove_file(root.join("nuxt.config.ts")).unwrap();
        assert_eq!(session.get(), Some(root.as_path()));

        session.reset();
        assert!(session.get().is_none());
    }
}
