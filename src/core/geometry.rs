//! Window geometry values.
//!
//! Plain integer geometry as a desktop toolkit reports it. All
//! coordinates are in screen pixels.

use std::fmt;

use bitflags::bitflags;

/// Largest extent a window may be constrained to (toolkit "unbounded").
pub const MAX_EXTENT: i32 = 16_777_215;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Clamp this size into `limits`.
    pub fn clamp(self, limits: SizeLimits) -> Self {
        Self {
            width: self.width.clamp(limits.min.width, limits.max.width.max(limits.min.width)),
            height: self
                .height
                .clamp(limits.min.height, limits.max.height.max(limits.min.height)),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[cfg(test)]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[cfg(test)]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Minimum and maximum size constraints of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeLimits {
    pub min: Size,
    pub max: Size,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min: Size::new(0, 0),
            max: Size::new(MAX_EXTENT, MAX_EXTENT),
        }
    }
}

bitflags! {
    /// Window-level display flags.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        const STAYS_ON_TOP = 1 << 0;
        const FRAMELESS = 1 << 1;
        const TOOL = 1 << 2;
        const DIALOG = 1 << 3;
        const TRANSLUCENT = 1 << 4;
    }
}

impl WindowFlags {
    /// Parse a flag from its config name (`stays_on_top`, `frameless`, ...).
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "stays_on_top" => Some(Self::STAYS_ON_TOP),
            "frameless" => Some(Self::FRAMELESS),
            "tool" => Some(Self::TOOL),
            "dialog" => Some(Self::DIALOG),
            "translucent" => Some(Self::TRANSLUCENT),
            _ => None,
        }
    }
}
