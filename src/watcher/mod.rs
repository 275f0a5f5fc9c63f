//! Filesystem watcher with debounced batch events.
//!
//! All events within a debounce window are collected, de-duplicated, sorted
//! by path and emitted as one [`WatcherBatch`]. Whether a path was created,
//! modified or deleted is inferred from the file system when the batch is
//! built.
//!
//! # Threading Design
//!
//! The debouncer runs on a dedicated thread and hands batches over an
//! `mpsc` channel. Consumers poll with [`FileSystemWatcher::recv_batch_timeout`]
//! and apply each batch on their own task, so no lens state is ever shared
//! with the watcher thread.

use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::index::{FileFilter, IgnoreSet};
use crate::paths::{is_lexically_within, normalize_lexically, validate_path_within_root, PathValidationError};

/// Type of file event, inferred after debouncing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A directory appeared
    Create,
    /// A file exists after the event
    Modify,
    /// The path no longer exists
    Delete,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Create => write!(f, "CREATE"),
            EventType::Modify => write!(f, "MODIFY"),
            EventType::Delete => write!(f, "DELETE"),
        }
    }
}

/// One changed path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub event_type: EventType,
    pub is_dir: bool,
}

/// Deterministic batch of changed paths, sorted by path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatcherBatch {
    pub changes: Vec<FileChange>,
}

impl WatcherBatch {
    fn from_map(changes: BTreeMap<PathBuf, (EventType, bool)>) -> Self {
        Self {
            changes: changes
                .into_iter()
                .map(|(path, (event_type, is_dir))| FileChange {
                    path,
                    event_type,
                    is_dir,
                })
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.changes.iter().map(|c| c.path.as_path())
    }

    /// Build a batch for paths that changed (used by hosts that have their
    /// own event source).
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let changes = paths
            .into_iter()
            .map(|path| {
                let state = infer_event(&path);
                (normalize_lexically(&path), state)
            })
            .collect();
        Self::from_map(changes)
    }
}

/// Filesystem watcher configuration
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Root directory for path validation
    pub root_path: PathBuf,
    /// Debounce delay in milliseconds
    pub debounce_ms: u64,
    /// Enable .gitignore filtering (default: true)
    pub gitignore_aware: bool,
    /// Directory names appended to the internal ignore list
    pub extra_ignored_dirs: Vec<String>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("."),
            debounce_ms: 300,
            gitignore_aware: true,
            extra_ignored_dirs: Vec::new(),
        }
    }
}

/// Filesystem watcher that emits debounced batches of changed paths.
pub struct FileSystemWatcher {
    watcher_thread: Option<thread::JoinHandle<()>>,
    batch_receiver: Receiver<WatcherBatch>,
}

impl FileSystemWatcher {
    /// Watch `path` recursively until `shutdown` is set.
    ///
    /// `path` is also the root every reported path is validated against.
    pub fn new(path: PathBuf, config: WatcherConfig, shutdown: Arc<AtomicBool>) -> Result<Self> {
        let (batch_tx, batch_rx) = mpsc::channel();

        let config = WatcherConfig {
            root_path: path.clone(),
            ..config
        };

        let thread = thread::spawn(move || {
            if let Err(e) = run_watcher(path, batch_tx, config, shutdown) {
                log::error!("Watcher error: {}", e);
            }
        });

        Ok(Self {
            watcher_thread: Some(thread),
            batch_receiver: batch_rx,
        })
    }

    /// Receive the next batch, blocking until available.
    ///
    /// Returns `None` if the watcher thread has terminated.
    pub fn recv_batch(&self) -> Option<WatcherBatch> {
        self.batch_receiver.recv().ok()
    }

    /// Try to receive a batch without blocking.
    pub fn try_recv_batch(&self) -> Option<WatcherBatch> {
        self.batch_receiver.try_recv().ok()
    }

    /// Receive the next batch with a timeout.
    ///
    /// # Returns
    /// - `Ok(Some(batch))` if a batch is available
    /// - `Ok(None)` if the watcher thread has terminated
    /// - `Err(())` if the timeout elapsed
    pub fn recv_batch_timeout(&self, timeout: Duration) -> std::result::Result<Option<WatcherBatch>, ()> {
        match self.batch_receiver.recv_timeout(timeout) {
            Ok(batch) => Ok(Some(batch)),
            Err(RecvTimeoutError::Timeout) => Err(()),
            Err(RecvTimeoutError::Disconnected) => Ok(None),
        }
    }

    /// Join the watcher thread. The shutdown flag must already be set.
    pub fn shutdown(mut self) {
        if let Some(thread) = self.watcher_thread.take() {
            let _ = thread.join();
        }
    }
}

/// Run the debounced watcher in a dedicated thread.
fn run_watcher(
    path: PathBuf,
    tx: Sender<WatcherBatch>,
    config: WatcherConfig,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    let debounce_duration = Duration::from_millis(config.debounce_ms);
    let root_path = config.root_path.clone();

    // Built once; re-parsing .gitignore per event is wasted work.
    let ignore = IgnoreSet::new(&config.extra_ignored_dirs).for_watching();
    let filter = match FileFilter::new(&root_path, &[], ignore, config.gitignore_aware) {
        Ok(f) => Some(f),
        Err(e) => {
            log::warn!("Failed to create watcher filter: {}", e);
            None
        }
    };

    let mut debouncer = new_debouncer(
        debounce_duration,
        move |result: notify_debouncer_mini::DebounceEventResult| match result {
            Ok(events) => {
                let paths: Vec<PathBuf> = events.into_iter().map(|event| event.path).collect();
                let batch = collect_changes(&paths, &root_path, filter.as_ref());
                if !batch.is_empty() {
                    let _ = tx.send(batch);
                }
            }
            Err(error) => {
                log::error!("Watcher error: {:?}", error);
            }
        },
    )?;

    debouncer.watcher().watch(&path, RecursiveMode::Recursive)?;

    while !shutdown.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(200));
    }

    Ok(())
}

fn infer_event(path: &Path) -> (EventType, bool) {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => (EventType::Create, true),
        Ok(_) => (EventType::Modify, false),
        Err(_) => (EventType::Delete, path.extension().is_none()),
    }
}

/// Turn raw event paths into a batch.
///
/// Filtering rules:
/// - drop paths under dependency/output/non-code directories
/// - drop gitignored paths
/// - drop paths outside the project root (deleted paths are checked
///   lexically because they can no longer be canonicalised)
/// - de-duplicate and sort
fn collect_changes(paths: &[PathBuf], root: &Path, filter: Option<&FileFilter>) -> WatcherBatch {
    let mut changes = BTreeMap::new();

    for path in paths {
        let (event_type, is_dir) = infer_event(path);

        if let Some(f) = filter {
            if f.excluded(path, is_dir).is_some() {
                continue;
            }
        }

        let accepted = match event_type {
            EventType::Delete => {
                if is_lexically_within(path, root) {
                    Some(normalize_lexically(path))
                } else {
                    log::warn!("Watcher rejected path outside project root: {}", path.display());
                    None
                }
            }
            _ => match validate_path_within_root(path, root) {
                Ok(_) => Some(normalize_lexically(path)),
                Err(PathValidationError::OutsideRoot(p, _)) => {
                    log::warn!("Watcher rejected path outside project root: {}", p);
                    None
                }
                // Deleted between the event and this check.
                Err(PathValidationError::CannotCanonicalize(_)) => None,
            },
        };

        if let Some(path) = accepted {
            changes.insert(path, (event_type, is_dir));
        }
    }

    WatcherBatch::from_map(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_batch_is_empty() {
        assert!(WatcherBatch::empty().is_empty());
    }

    #[test]
    fn test_collect_changes_sorts_and_classifies() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("components/new")).unwrap();
        fs::write(root.join("components/Foo.vue"), "<template/>").unwrap();
        fs::write(root.join("app.vue"), "<template/>").unwrap();

        let paths = vec![
            root.join("components/Foo.vue"),
            root.join("app.vue"),
            root.join("components/new"),
            root.join("composables/gone.ts"),
            root.join("app.vue"),
        ];
        let batch = collect_changes(&paths, root, None);
        let summary: Vec<(PathBuf, EventType)> = batch
            .changes
            .iter()
            .map(|c| (c.path.clone(), c.event_type))
            .collect();
        assert_eq!(
            summary,
            vec![
                (root.join("app.vue"), EventType::Modify),
                (root.join("components/Foo.vue"), EventType::Modify),
                (root.join("components/new"), EventType::Create),
                (root.join("composables/gone.ts"), EventType::Delete),
            ]
        );
    }

    #[test]
    fn test_collect_changes_applies_filter() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".nuxt")).unwrap();
        fs::write(root.join(".nuxt/components.d.ts"), "").unwrap();
        fs::create_dir_all(root.join("utils")).unwrap();
        fs::write(root.join("utils/a.ts"), "").unwrap();

        let filter =
            FileFilter::new(root, &[], IgnoreSet::default().for_watching(), false).unwrap();
        let paths = vec![root.join(".nuxt/components.d.ts"), root.join("utils/a.ts")];
        let batch = collect_changes(&paths, root, Some(&filter));
        assert_eq!(batch.paths().collect::<Vec<_>>(), vec![root.join("utils/a.ts")]);
    }

    #[test]
    fn test_collect_changes_rejects_outside_root() {
        let temp_dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let stray = outside.path().join("x.ts");
        fs::write(&stray, "").unwrap();

        let batch = collect_changes(
            &[stray, outside.path().join("deleted.ts")],
            temp_dir.path(),
            None,
        );
        assert!(batch.is_empty());
    }

    #[test]
    fn test_batch_serialization() {
        let batch = WatcherBatch {
            changes: vec![FileChange {
                path: PathBuf::from("/p/a.ts"),
                event_type: EventType::Delete,
                is_dir: false,
            }],
        };
        let json = serde_json::to_string(&batch).unwrap();
        let deserialized: WatcherBatch = serde_json::from_str(&json).unwrap();
        assert_eq!(batch, deserialized);
    }

    #[test]
    fn test_watcher_config_default() {
        let config = WatcherConfig::default();
        assert_eq!(config.root_path, PathBuf::from("."));
        assert_eq!(config.debounce_ms, 300);
        assert!(config.gitignore_aware);
    }
}
