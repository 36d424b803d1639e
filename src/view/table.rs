//! Live object table.
//!
//! The hierarchy owns its objects in a generational arena. Anything outside
//! the hierarchy (mirror nodes, the selection set) refers to objects only by
//! [`ObjectHandle`], so dropping an object from the table, or dropping the
//! whole table, leaves those handles dangling-but-harmless: lookups return
//! `None`.

use std::sync::atomic::{AtomicU64, Ordering};

use super::{LiveObject, Positionable};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Lookup handle into an [`ObjectTable`].
///
/// Handles from one table never resolve in another, and a handle to a
/// removed object never resolves again even if its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    table: u64,
    index: u32,
    generation: u32,
}

struct Entry {
    object: Box<dyn LiveObject>,
    parent: Option<ObjectHandle>,
    children: Vec<ObjectHandle>,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Arena holding a live object hierarchy with a single root.
pub struct ObjectTable {
    id: u64,
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ObjectHandle,
    live: usize,
}

impl ObjectTable {
    /// Create a table whose root is `root`.
    pub fn new(root: Box<dyn LiveObject>) -> Self {
        let id = NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed);
        let handle = ObjectHandle {
            table: id,
            index: 0,
            generation: 0,
        };
        Self {
            id,
            slots: vec![Slot {
                generation: 0,
                entry: Some(Entry {
                    object: root,
                    parent: None,
                    children: Vec::new(),
                }),
            }],
            free: Vec::new(),
            root: handle,
            live: 1,
        }
    }

    pub fn root(&self) -> ObjectHandle {
        self.root
    }

    /// Number of live objects, root included.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Append `object` as the last child of `parent`.
    ///
    /// Returns `None` if `parent` does not resolve in this table.
    pub fn insert(
        &mut self,
        parent: ObjectHandle,
        object: Box<dyn LiveObject>,
    ) -> Option<ObjectHandle> {
        self.entry(parent)?;

        let entry = Entry {
            object,
            parent: Some(parent),
            children: Vec::new(),
        };
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                ObjectHandle {
                    table: self.id,
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len()).ok()?;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                ObjectHandle {
                    table: self.id,
                    index,
                    generation: 0,
                }
            }
        };

        self.entry_mut(parent)?.children.push(handle);
        self.live += 1;
        Some(handle)
    }

    /// Remove `handle` and its whole subtree. The root cannot be removed.
    #[cfg(test)]
    pub fn remove(&mut self, handle: ObjectHandle) -> bool {
        if handle == self.root || self.entry(handle).is_none() {
            return false;
        }

        if let Some(parent) = self.entry(handle).and_then(|e| e.parent)
            && let Some(parent) = self.entry_mut(parent)
        {
            parent.children.retain(|c| *c != handle);
        }

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(entry) = slot.entry.take() {
                stack.extend(entry.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                self.live -= 1;
            }
        }
        true
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.entry(handle).is_some()
    }

    pub fn get(&self, handle: ObjectHandle) -> Option<&dyn LiveObject> {
        self.entry(handle).map(|e| e.object.as_ref())
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut (dyn LiveObject + 'static)> {
        self.entry_mut(handle).map(|e| e.object.as_mut())
    }

    /// Positional capability of `handle`, if it is a visual object.
    pub fn positionable(&self, handle: ObjectHandle) -> Option<&dyn Positionable> {
        self.get(handle).and_then(|o| o.as_positionable())
    }

    /// Children of `handle` in insertion order (empty if stale).
    pub fn children(&self, handle: ObjectHandle) -> &[ObjectHandle] {
        self.entry(handle).map_or(&[], |e| e.children.as_slice())
    }

    #[cfg(test)]
    pub fn parent(&self, handle: ObjectHandle) -> Option<ObjectHandle> {
        self.entry(handle).and_then(|e| e.parent)
    }

    /// Pre-order walk from the root.
    pub fn walk(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.children(next).iter().rev().copied());
            Some(next)
        })
    }

    fn entry(&self, handle: ObjectHandle) -> Option<&Entry> {
        if handle.table != self.id {
            return None;
        }
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, handle: ObjectHandle) -> Option<&mut Entry> {
        if handle.table != self.id {
            return None;
        }
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_mut()
    }
}
