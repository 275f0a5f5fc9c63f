//! Watch command implementation
//!
//! Prints the lenses of one file, then re-prints them after every change
//! batch until SIGINT/SIGTERM.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use nuxt_lens::{Document, FileSystemWatcher, LensProvider, WatcherConfig};

use crate::lenses_cmd::print_lenses;

pub fn run_watch(
    runtime: &Runtime,
    file: PathBuf,
    debounce_ms: Option<u64>,
    gitignore_aware: bool,
) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    #[cfg(unix)]
    {
        use signal_hook::consts::signal;
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([signal::SIGTERM, signal::SIGINT])?;

        std::thread::spawn(move || {
            if signals.forever().next().is_some() {
                shutdown_clone.store(true, Ordering::SeqCst);
            }
        });
    }

    let mut provider = LensProvider::open(&file)?;
    let root = provider
        .root()
        .map(|r| r.to_path_buf())
        .context("Provider has no project root")?;

    let render = |provider: &mut LensProvider| -> Result<()> {
        let doc = runtime
            .block_on(Document::open(&file))
            .with_context(|| format!("Cannot read {}", file.display()))?;
        let lenses = runtime.block_on(provider.provide_lenses(&doc));
        print_lenses(&file, &lenses);
        Ok(())
    };
    render(&mut provider)?;

    let config = WatcherConfig {
        root_path: root.clone(),
        debounce_ms: debounce_ms.unwrap_or(provider.config().debounce_ms),
        gitignore_aware: gitignore_aware && provider.config().gitignore_aware,
        extra_ignored_dirs: provider.config().extra_ignored_dirs.clone(),
    };
    let watcher = FileSystemWatcher::new(root.clone(), config, shutdown.clone())?;
    println!("nuxt-lens watching: {}", root.display());

    while !shutdown.load(Ordering::SeqCst) {
        match watcher.recv_batch_timeout(Duration::from_millis(200)) {
            Ok(Some(batch)) => {
                log::debug!("Change batch with {} paths", batch.changes.len());
                provider.apply_changes(&batch);
                if let Err(e) = render(&mut provider) {
                    log::warn!("{:#}", e);
                }
            }
            Ok(None) => break,
            Err(()) => {}
        }
    }

    shutdown.store(true, Ordering::SeqCst);
    watcher.shutdown();
    println!("SHUTDOWN");
    Ok(())
}
