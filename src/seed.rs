//! Host-native reference provider seam.
//!
//! An editor host may already know some references for a declaration. Its
//! answer seeds composable/utility resolution but is never trusted alone.

use std::path::Path;

use crate::resolve::ReferenceLocation;

/// Low-confidence reference source queried at a declaration site.
pub trait ReferenceSeed: Send + Sync {
    /// References to the symbol declared at `line` (1-indexed) and `col`
    /// (0-indexed byte column) of `path`.
    fn references_at(
        &self,
        path: &Path,
        line: usize,
        col: usize,
    ) -> anyhow::Result<Vec<ReferenceLocation>>;
}

/// A host without a native provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSeed;

impl ReferenceSeed for NoSeed {
    fn references_at(
        &self,
        _path: &Path,
        _line: usize,
        _col: usize,
    ) -> anyhow::Result<Vec<ReferenceLocation>> {
        Ok(Vec::new())
    }
}

/// Query `seed`, degrading any failure to an empty list.
pub fn seed_or_empty(
    seed: &dyn ReferenceSeed,
    path: &Path,
    line: usize,
    col: usize,
) -> Vec<ReferenceLocation> {
    match seed.references_at(path, line, col) {
        Ok(locations) => locations,
        Err(err) => {
            log::warn!("Native reference provider failed for {}: {:#}", path.display(), err);
            Vec::new()
        }
    }
}
