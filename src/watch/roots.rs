use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

use super::WatchError;

/// Watch-target consistency manager.
///
/// Attaches the targets that exist at startup and re-attaches targets that
/// were removed and recreated (editors that save by rename).
pub(super) struct WatchRoots {
    desired: Vec<(PathBuf, RecursiveMode)>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(targets: Vec<(PathBuf, RecursiveMode)>) -> Self {
        Self {
            desired: targets,
            attached: FxHashSet::default(),
        }
    }

    pub(super) fn attach_existing(
        &mut self,
        watcher: &mut RecommendedWatcher,
    ) -> Result<(), WatchError> {
        for (path, mode) in &self.desired {
            if !path.exists() || self.attached.contains(path) {
                continue;
            }
            watcher
                .watch(path, *mode)
                .map_err(|e| WatchError::Watch(path.clone(), e))?;
            self.attached.insert(path.clone());
        }

        Ok(())
    }

    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        // Drop stale handles for targets that no longer exist.
        self.attached.retain(|path| path.exists());

        for (path, mode) in &self.desired {
            if self.attached.contains(path) || !path.exists() {
                continue;
            }

            if watcher.watch(path, *mode).is_ok() {
                self.attached.insert(path.clone());
                crate::debug!("watch"; "re-attached watch: {}", path.display());
            }
        }
    }

    pub(super) fn attached(&self) -> usize {
        self.attached.len()
    }
}
