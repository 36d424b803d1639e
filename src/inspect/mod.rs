//! Live object-tree inspector.
//!
//! Opening the inspector snapshots the shell's current hierarchy into a
//! mirror. Selecting mirror nodes flags their live objects in the shell's
//! highlight overlay; closing the inspector clears the selection.
//!
//! # Modules
//!
//! - `mirror` - Snapshot tree and lookup
//! - `overlay` - Selection set and paint-time highlighting

pub mod mirror;
pub mod overlay;

pub use mirror::{MirrorId, MirrorNode};

use crate::shell::Shell;

/// Inspector window state.
#[derive(Debug, Default)]
pub struct Inspector {
    mirror: Option<MirrorNode>,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.mirror.is_some()
    }

    #[cfg(test)]
    pub fn mirror(&self) -> Option<&MirrorNode> {
        self.mirror.as_ref()
    }

    /// Open, or refresh if already open, against the shell's current root.
    pub fn open(&mut self, shell: &Shell) -> &MirrorNode {
        let node = mirror::snapshot(shell.root().hierarchy());
        crate::debug!("inspect"; "mirrored {} objects", mirror::count(&node));
        self.mirror.insert(node)
    }

    /// Close the inspector and clear the selection.
    pub fn close(&mut self, shell: &mut Shell) {
        self.mirror = None;
        shell.overlay_mut().clear();
    }

    /// Replace the selection with the live objects linked to `ids`.
    ///
    /// Nodes whose object is non-visual, stale, or not in the mirror are
    /// skipped. Returns the number of objects selected.
    pub fn select(&mut self, ids: &[MirrorId], shell: &mut Shell) -> usize {
        let Some(root) = self.mirror.as_ref() else {
            return 0;
        };

        let table = shell.root().hierarchy();
        let handles: Vec<_> = ids
            .iter()
            .filter_map(|&id| mirror::find(root, id))
            .map(|node| node.object)
            .filter(|&handle| table.positionable(handle).is_some())
            .collect();

        let overlay = shell.overlay_mut();
        overlay.clear();
        for &handle in &handles {
            overlay.select(handle);
        }
        overlay.request_repaint();

        crate::debug!("inspect"; "selected {} of {} nodes", handles.len(), ids.len());
        handles.len()
    }
}
