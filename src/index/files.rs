//! Candidate-file enumeration.

use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;
use walkdir::WalkDir;

use crate::index::filter::FileFilter;

/// Every file under `dir` accepted by `filter`, sorted.
///
/// Subtrees rejected by the filter are pruned during the walk. Walk errors
/// (permission denied, races with deletion) are logged and skipped.
pub fn enumerate_files(dir: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !entry.file_type().is_dir() || filter.should_descend(entry.path()))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::debug!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| filter.should_skip(path).is_none())
        .collect();

    files.sort();
    files
}

/// [`enumerate_files`] on the blocking pool, off the async executor.
pub async fn enumerate_files_blocking(dir: PathBuf, filter: FileFilter) -> Vec<PathBuf> {
    match spawn_blocking(move || enumerate_files(&dir, &filter)).await {
        Ok(files) => files,
        Err(err) => {
            log::warn!("File enumeration task failed: {}", err);
            Vec::new()
        }
    }
}

/// Glob for files with any of `extensions` at any depth.
pub fn extension_glob(extensions: &[&str]) -> String {
    match extensions {
        [single] => format!("**/*.{}", single),
        many => format!("**/*.{{{}}}", many.join(",")),
    }
}

/// Every file under `dirs` with one of `extensions`, de-duplicated and
/// sorted. Each directory is walked with `filter`'s rules.
pub fn files_in_dirs(dirs: &[PathBuf], extensions: &[&str], filter: &FileFilter) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = dirs
        .iter()
        .flat_map(|dir| enumerate_files(dir, filter))
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| extensions.contains(&e))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files.dedup();
    files
}

/// [`files_in_dirs`] on the blocking pool.
pub async fn files_in_dirs_blocking(
    dirs: Vec<PathBuf>,
    extensions: &'static [&'static str],
    filter: FileFilter,
) -> Vec<PathBuf> {
    match spawn_blocking(move || files_in_dirs(&dirs, extensions, &filter)).await {
        Ok(files) => files,
        Err(err) => {
            log::warn!("File enumeration task failed: {}", err);
            Vec::new()
        }
    }
}
