//! View abstractions the host relies on.
//!
//! The host never paints or lays out widgets itself; it only needs the
//! entry-unit contract expressed by [`RootObject`], plus two capabilities
//! of the objects inside a root's hierarchy:
//!
//! - [`LiveObject`]: every node, with its runtime type name
//! - [`Positionable`]: visual nodes, which have paint bounds
//!
//! Non-visual nodes (layouts, timers) simply do not expose
//! [`Positionable`].

mod table;
pub mod widgets;
mod window;

pub use table::{ObjectHandle, ObjectTable};
pub use window::Window;

use crate::core::{Rect, Size, SizeLimits, WindowFlags};

/// A node of a live view hierarchy.
pub trait LiveObject {
    /// Runtime type name, shown as the inspector label.
    fn type_name(&self) -> &str;

    fn as_positionable(&self) -> Option<&dyn Positionable> {
        None
    }

    fn as_positionable_mut(&mut self) -> Option<&mut dyn Positionable> {
        None
    }
}

/// Capability of visual nodes: they occupy a rectangle.
pub trait Positionable {
    fn geometry(&self) -> Rect;
    fn set_geometry(&mut self, rect: Rect);
}

/// The top-level view produced by the entry unit's constructor.
pub trait RootObject {
    fn type_name(&self) -> &str;

    fn size_limits(&self) -> SizeLimits;

    fn size(&self) -> Size;
    fn resize(&mut self, size: Size);

    fn title(&self) -> &str;
    fn set_title(&mut self, title: &str);

    fn window_flags(&self) -> WindowFlags;
    fn set_window_flags(&mut self, flags: WindowFlags);

    /// Whether the root currently sits in a shell's content slot.
    fn is_parented(&self) -> bool;
    fn set_parented(&mut self, parented: bool);

    /// The child hierarchy, rooted at a node representing this object.
    fn hierarchy(&self) -> &ObjectTable;
}
