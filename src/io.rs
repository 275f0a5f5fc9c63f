//! Batched concurrent file reads.
//!
//! Candidate sets are read in fixed-size chunks. Each chunk's reads run
//! concurrently and are awaited before the next chunk starts, bounding the
//! number of open file handles.

use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

/// A file and its text.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

/// Read one file; any error means "no data from this file".
pub async fn read_text(path: &Path) -> Option<String> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            log::debug!("Skipping unreadable file {}: {}", path.display(), err);
            None
        }
    }
}

/// Read `paths` in chunks of `batch_size`, calling `visit` for every file
/// that could be read. Files are visited in input order within a chunk.
pub async fn for_each_batched<F>(paths: &[PathBuf], batch_size: usize, mut visit: F)
where
    F: FnMut(SourceFile),
{
    for chunk in paths.chunks(batch_size.max(1)) {
        let mut set = JoinSet::new();
        for (position, path) in chunk.iter().enumerate() {
            let path = path.clone();
            set.spawn(async move {
                let text = read_text(&path).await;
                (position, path, text)
            });
        }

        let mut results: Vec<(usize, PathBuf, String)> = Vec::with_capacity(chunk.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((position, path, Some(text))) => results.push((position, path, text)),
                Ok((_, _, None)) => {}
                Err(err) => log::debug!("File read task failed: {}", err),
            }
        }
        results.sort_by_key(|(position, _, _)| *position);

        for (_, path, text) in results {
            visit(SourceFile { path, text });
        }
    }
}

/// Read every file in `paths` (batched), dropping unreadable ones.
pub async fn read_all(paths: &[PathBuf], batch_size: usize) -> Vec<SourceFile> {
    let mut files = Vec::with_capacity(paths.len());
    for_each_batched(paths, batch_size, |file| files.push(file)).await;
    files
}
