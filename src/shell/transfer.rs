//! Cosmetic state transfer onto the shell frame.
//!
//! Copies presentational properties of the displayed root onto the
//! persistent outer frame, so the shell takes on the look of whatever it
//! hosts while its screen position stays put. Application data held by a
//! root is never carried across a rebuild.

use crate::core::{Point, Rect, Size, SizeLimits, WindowFlags};
use crate::view::RootObject;

/// Title bar height the frame geometry adds above the client area.
pub const TITLE_BAR_HEIGHT: i32 = 28;

/// The shell's own window state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellFrame {
    /// Frame top-left; `None` until placed (toolkit default placement).
    pub position: Option<Point>,
    pub size: Size,
    pub limits: SizeLimits,
    pub title: String,
    pub flags: WindowFlags,
    pub visible: bool,
}

impl ShellFrame {
    pub fn new(title: impl Into<String>, min_size: Size) -> Self {
        let limits = SizeLimits {
            min: min_size,
            ..SizeLimits::default()
        };
        Self {
            position: None,
            size: min_size,
            limits,
            title: title.into(),
            flags: WindowFlags::empty(),
            visible: false,
        }
    }

    /// Client-area geometry (below the title bar).
    pub fn geometry(&self) -> Rect {
        let origin = self.position.unwrap_or_default();
        Rect::new(
            origin.x,
            origin.y + TITLE_BAR_HEIGHT,
            self.size.width,
            self.size.height,
        )
    }

    /// Geometry including window decorations.
    pub fn frame_geometry(&self) -> Rect {
        let origin = self.position.unwrap_or_default();
        Rect::new(
            origin.x,
            origin.y,
            self.size.width,
            self.size.height + TITLE_BAR_HEIGHT,
        )
    }

    pub fn move_to(&mut self, position: Point) {
        self.position = Some(position);
    }

    /// Anchor to persist: client x, frame y.
    pub fn anchor(&self) -> Point {
        Point::new(self.geometry().x, self.frame_geometry().y)
    }
}

/// Copies presentational state from a root object onto the shell frame.
pub struct StateTransfer;

impl StateTransfer {
    /// Copy limits, size, title and window flags from `source`, then show.
    ///
    /// Position is never touched.
    pub fn copy(source: &dyn RootObject, frame: &mut ShellFrame) {
        let limits = source.size_limits();
        frame.limits = limits;
        frame.size = source.size().clamp(limits);
        frame.title = source.title().to_string();
        frame.flags = source.window_flags();
        frame.visible = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Window;

    fn source() -> Window {
        Window::new("MainWindow")
            .with_title("My reloading app")
            .with_min_size(Size::new(600, 600))
            .with_max_size(Size::new(2000, 2000))
            .with_size(Size::new(1080, 1080))
            .with_flags(WindowFlags::STAYS_ON_TOP)
    }

    #[test]
    fn test_copy_all_presentational_properties() {
        let mut frame = ShellFrame::new("Reloader", Size::new(400, 300));
        frame.move_to(Point::new(100, 200));

        StateTransfer::copy(&source(), &mut frame);

        assert_eq!(frame.limits.min, Size::new(600, 600));
        assert_eq!(frame.limits.max, Size::new(2000, 2000));
        assert_eq!(frame.size, Size::new(1080, 1080));
        assert_eq!(frame.title, "My reloading app");
        assert_eq!(frame.flags, WindowFlags::STAYS_ON_TOP);
        assert!(frame.visible);
        assert_eq!(frame.position, Some(Point::new(100, 200)));
    }

    #[test]
    fn test_copy_is_idempotent() {
        let mut frame = ShellFrame::new("Reloader", Size::new(400, 300));
        StateTransfer::copy(&source(), &mut frame);
        let once = frame.clone();
        StateTransfer::copy(&source(), &mut frame);
        assert_eq!(frame, once);
    }

    #[test]
    fn test_geometry_and_anchor() {
        let mut frame = ShellFrame::new("Reloader", Size::new(400, 300));
        frame.move_to(Point::new(100, 200));

        assert_eq!(frame.frame_geometry(), Rect::new(100, 200, 400, 300 + TITLE_BAR_HEIGHT));
        assert_eq!(frame.geometry(), Rect::new(100, 200 + TITLE_BAR_HEIGHT, 400, 300));
        assert_eq!(frame.anchor(), Point::new(100, 200));
    }
}
