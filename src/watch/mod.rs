//! File change watching.
//!
//! Watches the project directory (non-recursive) plus individually
//! registered files and forwards one [`Change`] per relevant notify event.
//! No debouncing: every event triggers its own reload.

mod roots;

use std::path::{Path, PathBuf};

use crossbeam::channel::Sender;
use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use thiserror::Error;

use roots::WatchRoots;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to create file watcher")]
    Create(#[source] notify::Error),

    #[error("failed to watch `{0}`")]
    Watch(PathBuf, #[source] notify::Error),
}

/// What to watch.
#[derive(Debug, Clone, Default)]
pub struct WatchSpec {
    /// Directories watched non-recursively.
    pub dirs: Vec<PathBuf>,
    /// Individually watched files.
    pub files: Vec<PathBuf>,
    /// Paths whose changes are never reported.
    pub ignored: Vec<PathBuf>,
}

/// Something changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub paths: Vec<PathBuf>,
}

pub struct ChangeWatcher {
    watcher: RecommendedWatcher,
    roots: WatchRoots,
}

impl ChangeWatcher {
    /// Start watching; changes are sent to `tx`.
    pub fn start(spec: WatchSpec, tx: Sender<Change>) -> Result<Self, WatchError> {
        let ignored = spec.ignored.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    if let Some(change) = relevant_change(&event, &ignored) {
                        crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);
                        let _ = tx.send(change);
                    }
                }
                Err(e) => crate::log!("watch"; "notify error: {}", e),
            }
        })
        .map_err(WatchError::Create)?;

        let mut targets: Vec<(PathBuf, RecursiveMode)> = spec
            .dirs
            .into_iter()
            .map(|dir| (dir, RecursiveMode::NonRecursive))
            .collect();
        targets.extend(
            spec.files
                .into_iter()
                .map(|file| (file, RecursiveMode::NonRecursive)),
        );

        let mut roots = WatchRoots::new(targets);
        roots.attach_existing(&mut watcher)?;
        crate::debug!("watch"; "watching {} paths", roots.attached());

        Ok(Self { watcher, roots })
    }

    /// Re-attach watched paths that were removed and recreated.
    pub fn maintain(&mut self) {
        self.roots.maintain(&mut self.watcher);
    }

    pub fn attached(&self) -> usize {
        self.roots.attached()
    }
}

/// Editor artifacts (swap, backup, hidden files).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// The change `event` represents, if any.
fn relevant_change(event: &notify::Event, ignored: &[PathBuf]) -> Option<Change> {
    match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => {}
        // Metadata-only changes (mtime/chmod noise) would loop reloads.
        EventKind::Modify(notify::event::ModifyKind::Metadata(_)) => return None,
        EventKind::Modify(_) => {}
        _ => return None,
    }

    let paths: Vec<PathBuf> = event
        .paths
        .iter()
        .filter(|p| !is_temp_file(p))
        .filter(|p| !ignored.contains(p))
        .cloned()
        .collect();

    (!paths.is_empty()).then_some(Change { paths })
}
