use std::fmt;

use crate::core::{Rect, Size, SizeLimits, WindowFlags};

use super::widgets::Frame;
use super::{LiveObject, ObjectHandle, ObjectTable, RootObject};

/// General-purpose root object: a titled window with a child hierarchy.
pub struct Window {
    type_name: String,
    title: String,
    limits: SizeLimits,
    size: Size,
    flags: WindowFlags,
    parented: bool,
    table: ObjectTable,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("type_name", &self.type_name)
            .field("title", &self.title)
            .field("size", &self.size)
            .field("flags", &self.flags)
            .field("objects", &self.table.len())
            .finish()
    }
}

impl Window {
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let size = Size::new(640, 480);
        let frame = Frame::new(type_name.clone(), Rect::from_parts(Default::default(), size));
        Self {
            type_name,
            title: String::new(),
            limits: SizeLimits::default(),
            size,
            flags: WindowFlags::empty(),
            parented: false,
            table: ObjectTable::new(Box::new(frame)),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_min_size(mut self, min: Size) -> Self {
        self.limits.min = min;
        self.apply_size(self.size);
        self
    }

    pub fn with_max_size(mut self, max: Size) -> Self {
        self.limits.max = max;
        self.apply_size(self.size);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.apply_size(size);
        self
    }

    pub fn with_flags(mut self, flags: WindowFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Root node of this window's hierarchy.
    pub fn root_node(&self) -> ObjectHandle {
        self.table.root()
    }

    /// Append a child under `parent`; `None` if `parent` is stale.
    pub fn add_child(
        &mut self,
        parent: ObjectHandle,
        object: Box<dyn LiveObject>,
    ) -> Option<ObjectHandle> {
        self.table.insert(parent, object)
    }

    fn apply_size(&mut self, size: Size) {
        self.size = size.clamp(self.limits);
        let root = self.table.root();
        if let Some(frame) = self
            .table
            .get_mut(root)
            .and_then(|o| o.as_positionable_mut())
        {
            frame.set_geometry(Rect::from_parts(Default::default(), self.size));
        }
    }
}

impl RootObject for Window {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn size_limits(&self) -> SizeLimits {
        self.limits
    }

    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.apply_size(size);
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn window_flags(&self) -> WindowFlags {
        self.flags
    }

    fn set_window_flags(&mut self, flags: WindowFlags) {
        self.flags = flags;
    }

    fn is_parented(&self) -> bool {
        self.parented
    }

    fn set_parented(&mut self, parented: bool) {
        self.parented = parented;
    }

    fn hierarchy(&self) -> &ObjectTable {
        &self.table
    }
}
