//! Paint-time highlight overlay.
//!
//! Every visual object is painted through a [`PaintStyle`]. The
//! [`HighlightOverlay`] style draws a border around selected objects before
//! delegating to normal painting.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::core::Rect;
use crate::view::{ObjectHandle, ObjectTable};

/// Live objects currently flagged for highlight.
///
/// Holds handles only; an object dropped from its table simply stops
/// resolving.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    handles: FxHashSet<ObjectHandle>,
}

impl SelectionSet {
    pub fn insert(&mut self, handle: ObjectHandle) -> bool {
        self.handles.insert(handle)
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.handles.contains(&handle)
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Drop handles that no longer resolve in `table`.
    pub fn retain_live(&mut self, table: &ObjectTable) {
        self.handles.retain(|h| table.contains(*h));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Self = Self::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Drawing surface handed to paint styles.
pub trait Painter {
    fn save(&mut self);
    fn restore(&mut self);
    fn set_pen(&mut self, color: Color);
    fn draw_rect(&mut self, rect: Rect);
    /// Normal painting of one control.
    fn draw_control(&mut self, type_name: &str, rect: Rect);
}

/// Hook invoked for every paintable object on every repaint.
pub trait PaintStyle {
    fn draw_control(&self, table: &ObjectTable, handle: ObjectHandle, painter: &mut dyn Painter);
}

/// Default style: paint the control, nothing else.
pub struct PlainStyle;

impl PaintStyle for PlainStyle {
    fn draw_control(&self, table: &ObjectTable, handle: ObjectHandle, painter: &mut dyn Painter) {
        if let (Some(object), Some(visual)) = (table.get(handle), table.positionable(handle)) {
            painter.draw_control(object.type_name(), visual.geometry());
        }
    }
}

/// Style that outlines selected objects.
#[derive(Debug)]
pub struct HighlightOverlay {
    selection: SelectionSet,
    pen: Color,
    repaint_requested: bool,
}

impl Default for HighlightOverlay {
    fn default() -> Self {
        Self {
            selection: SelectionSet::default(),
            pen: Color::RED,
            repaint_requested: false,
        }
    }
}

impl HighlightOverlay {
    #[cfg(test)]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    #[cfg(test)]
    pub fn pen(&self) -> Color {
        self.pen
    }

    /// Flag `handle` and request a repaint.
    pub fn select(&mut self, handle: ObjectHandle) {
        self.selection.insert(handle);
        self.repaint_requested = true;
    }

    pub fn clear(&mut self) {
        if !self.selection.is_empty() {
            self.repaint_requested = true;
        }
        self.selection.clear();
    }

    pub fn retain_live(&mut self, table: &ObjectTable) {
        self.selection.retain_live(table);
    }

    pub fn request_repaint(&mut self) {
        self.repaint_requested = true;
    }

    pub fn repaint_requested(&self) -> bool {
        self.repaint_requested
    }

    /// Consume the pending repaint request.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }
}

impl PaintStyle for HighlightOverlay {
    fn draw_control(&self, table: &ObjectTable, handle: ObjectHandle, painter: &mut dyn Painter) {
        if self.selection.contains(handle)
            && let Some(visual) = table.positionable(handle)
        {
            painter.save();
            painter.set_pen(self.pen);
            painter.draw_rect(visual.geometry());
            painter.restore();
        }
        PlainStyle.draw_control(table, handle, painter);
    }
}

/// Paint every visual object of `table` in pre-order through `style`.
///
/// Returns the number of painted objects.
pub fn paint_tree(table: &ObjectTable, style: &dyn PaintStyle, painter: &mut dyn Painter) -> usize {
    let mut painted = 0;
    for handle in table.walk() {
        if table.positionable(handle).is_some() {
            style.draw_control(table, handle, painter);
            painted += 1;
        }
    }
    painted
}

// ============================================================================
// Recording painter
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintOp {
    Save,
    Restore,
    SetPen(Color),
    Rect(Rect),
    Control(String, Rect),
}

/// Painter that records operations; used for headless repaints.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    ops: Vec<PaintOp>,
    pen: Option<Color>,
    saved: Vec<Option<Color>>,
}

impl RecordingPainter {
    #[cfg(test)]
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    #[cfg(test)]
    pub fn pen(&self) -> Option<Color> {
        self.pen
    }

    /// Rectangles drawn as highlight borders.
    pub fn highlights(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Rect(rect) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[cfg(test)]
    pub fn controls(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::Control(..)))
            .count()
    }
}

impl Painter for RecordingPainter {
    fn save(&mut self) {
        self.saved.push(self.pen);
        self.ops.push(PaintOp::Save);
    }

    fn restore(&mut self) {
        self.pen = self.saved.pop().flatten();
        self.ops.push(PaintOp::Restore);
    }

    fn set_pen(&mut self, color: Color) {
        self.pen = Some(color);
        self.ops.push(PaintOp::SetPen(color));
    }

    fn draw_rect(&mut self, rect: Rect) {
        self.ops.push(PaintOp::Rect(rect));
    }

    fn draw_control(&mut self, type_name: &str, rect: Rect) {
        self.ops.push(PaintOp::Control(type_name.to_string(), rect));
    }
}
