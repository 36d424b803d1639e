//! Component construction.
//!
//! Turns a component of a parsed unit into a [`Window`] root with its child
//! hierarchy. `use = "Other"` children inline another component of the same
//! unit; nesting is capped at [`MAX_DEPTH`] and the whole hierarchy at
//! [`MAX_NODES`] objects.

use std::cell::Cell;
use std::path::Path;

use super::manifest::{ChildSpec, ComponentSpec, UnitManifest, parse_flags};
use crate::fault::{Fault, Frame, SourceLocation};
use crate::view::widgets::{self, Frame as FrameNode};
use crate::view::{LiveObject, ObjectHandle, Window};

/// Deepest child nesting a component may produce.
pub const MAX_DEPTH: usize = 64;

/// Most objects one construction may create, root excluded.
pub const MAX_NODES: usize = 10_000;

pub struct Builder<'a> {
    manifest: &'a UnitManifest,
    path: &'a Path,
    nodes: Cell<usize>,
}

impl<'a> Builder<'a> {
    pub fn new(manifest: &'a UnitManifest, path: &'a Path) -> Self {
        Self { manifest, path, nodes: Cell::new(0) }
    }

    /// Construct the component named `name`.
    pub fn build(&self, name: &str) -> Result<Window, Fault> {
        let component = self.component(name)?;
        let frame = self.component_frame(component);
        self.nodes.set(0);

        if let Some(message) = &component.raise {
            return Err(Fault::user("RuntimeError", message.clone()).with_frame(frame));
        }

        let flags = parse_flags(&component.flags).map_err(|f| f.within(frame.clone()))?;
        let mut window = Window::new(component.name()).with_title(component.title.clone());
        if let Some(min) = component.min_size() {
            window = window.with_min_size(min);
        }
        if let Some(max) = component.max_size() {
            window = window.with_max_size(max);
        }
        if let Some(size) = component.size() {
            window = window.with_size(size);
        }
        window = window.with_flags(flags);

        let root = window.root_node();
        for child in &component.children {
            self.add_child(&mut window, root, child, 1)
                .map_err(|f| f.within(frame.clone()))?;
        }
        Ok(window)
    }

    fn add_child(
        &self,
        window: &mut Window,
        parent: ObjectHandle,
        child: &ChildSpec,
        depth: usize,
    ) -> Result<(), Fault> {
        let frame = self.child_frame(child);
        if depth > MAX_DEPTH {
            return Err(Fault::user(
                "RecursionError",
                format!("maximum component depth ({MAX_DEPTH}) exceeded"),
            )
            .with_frame(frame));
        }

        let node = match (child.kind(), child.component()) {
            (Some(kind), None) => {
                let object = widgets::instantiate(kind, child.text.as_deref(), child.rect())
                    .ok_or_else(|| {
                        Fault::user("NameError", format!("unknown widget kind `{kind}`"))
                            .with_frame(frame.clone())
                    })?;
                self.insert(window, parent, object, &frame)?
            }
            (None, Some(name)) => {
                let component = self.component(name).map_err(|f| f.with_frame(frame.clone()))?;
                if let Some(message) = &component.raise {
                    return Err(Fault::user("RuntimeError", message.clone())
                        .with_frame(frame)
                        .with_frame(self.component_frame(component)));
                }
                let object = Box::new(FrameNode::new(name, child.rect()));
                let node = self.insert(window, parent, object, &frame)?;
                for inner in &component.children {
                    self.add_child(window, node, inner, depth + 1)
                        .map_err(|f| f.within(frame.clone()))?;
                }
                node
            }
            _ => {
                return Err(Fault::user(
                    "TypeError",
                    "a child needs exactly one of `kind` or `use`",
                )
                .with_frame(frame));
            }
        };

        for grandchild in &child.children {
            self.add_child(window, node, grandchild, depth + 1)
                .map_err(|f| f.within(frame.clone()))?;
        }
        Ok(())
    }

    fn insert(
        &self,
        window: &mut Window,
        parent: ObjectHandle,
        object: Box<dyn LiveObject>,
        frame: &Frame,
    ) -> Result<ObjectHandle, Fault> {
        let count = self.nodes.get() + 1;
        if count > MAX_NODES {
            return Err(Fault::user(
                "RecursionError",
                format!("component expands to more than {MAX_NODES} objects"),
            )
            .with_frame(frame.clone()));
        }
        self.nodes.set(count);

        window
            .add_child(parent, object)
            .ok_or_else(|| Fault::user("RuntimeError", "parent object no longer exists"))
    }

    fn component(&self, name: &str) -> Result<&'a ComponentSpec, Fault> {
        self.manifest.component(name).ok_or_else(|| {
            Fault::user(
                "NameError",
                format!("component `{name}` is not defined in {}", self.path.display()),
            )
        })
    }

    fn component_frame(&self, component: &ComponentSpec) -> Frame {
        Frame::new(component.name()).at(SourceLocation::new(self.path, component.line, 1))
    }

    fn child_frame(&self, child: &ChildSpec) -> Frame {
        Frame::new(child.label()).at(SourceLocation::new(self.path, child.line, 1))
    }
}
