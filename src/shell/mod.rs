//! The persistent outer window.
//!
//! The shell is created once per process and hosts whatever root object is
//! current: the application's root, or a fault report while faulted. Its
//! frame carries the presentational state copied from the hosted root,
//! plus the on-screen position that survives reloads and hard restarts.
//!
//! # Modules
//!
//! - `position` - Position sidecar file
//! - `toolbar` - Developer actions and shortcuts
//! - `transfer` - Cosmetic copy onto the frame

pub mod position;
pub mod toolbar;
pub mod transfer;

pub use position::PositionError;
pub use toolbar::{Action, Shortcut, Toolbar};
pub use transfer::{ShellFrame, StateTransfer};

use std::path::{Path, PathBuf};

use crate::core::{Rect, Size};
use crate::fault::ReportView;
use crate::inspect::overlay::{HighlightOverlay, Painter, paint_tree};
use crate::view::RootObject;

/// Shell construction settings.
#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub title: String,
    pub min_size: Size,
    pub position_file: PathBuf,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            title: "Reloader".to_string(),
            min_size: Size::new(400, 300),
            position_file: PathBuf::from(position::POSITION_FILE),
        }
    }
}

/// What the shell currently displays.
pub enum Content {
    App(Box<dyn RootObject>),
    Report(ReportView),
}

impl Content {
    pub fn root(&self) -> &dyn RootObject {
        match self {
            Self::App(root) => root.as_ref(),
            Self::Report(view) => view,
        }
    }

    fn root_mut(&mut self) -> &mut dyn RootObject {
        match self {
            Self::App(root) => root.as_mut(),
            Self::Report(view) => view,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Normal,
    Faulted,
}

pub struct Shell {
    frame: ShellFrame,
    content: Content,
    overlay: HighlightOverlay,
    toolbar: Toolbar,
    position_file: PathBuf,
}

impl Shell {
    /// Build the shell around `root`, restoring any persisted position.
    pub fn new(settings: ShellSettings, root: Box<dyn RootObject>) -> Self {
        let mut frame = ShellFrame::new(settings.title, settings.min_size);
        if let Some(record) = position::restore_position(&settings.position_file) {
            frame.move_to(record.into());
            crate::debug!("shell"; "restored position ({}, {})", record.x, record.y);
        }

        let mut shell = Self {
            frame,
            content: Content::App(Box::new(crate::view::Window::new("Placeholder"))),
            overlay: HighlightOverlay::default(),
            toolbar: Toolbar::default(),
            position_file: settings.position_file,
        };
        shell.set_content(Content::App(root));
        shell
    }

    pub fn state(&self) -> ShellState {
        match self.content {
            Content::App(_) => ShellState::Normal,
            Content::Report(_) => ShellState::Faulted,
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The root object currently displayed.
    pub fn root(&self) -> &dyn RootObject {
        self.content.root()
    }

    pub fn frame(&self) -> &ShellFrame {
        &self.frame
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    /// Display `content`, dropping the previous root.
    ///
    /// The new root's presentational state is copied onto the frame and the
    /// shell is shown. Selections into the old hierarchy are discarded.
    pub fn set_content(&mut self, mut content: Content) {
        content.root_mut().set_parented(true);
        StateTransfer::copy(content.root(), &mut self.frame);

        let mut old = std::mem::replace(&mut self.content, content);
        old.root_mut().set_parented(false);
        drop(old);

        self.overlay.retain_live(self.content.root().hierarchy());
        self.overlay.request_repaint();
    }

    /// Display a fault report in place of the application.
    pub fn show_report(&mut self, view: ReportView) {
        self.set_content(Content::Report(view));
    }

    /// Re-copy the displayed root's presentational state onto the frame.
    pub fn reapply_transfer(&mut self) {
        StateTransfer::copy(self.content.root(), &mut self.frame);
    }

    pub fn geometry(&self) -> Rect {
        self.frame.geometry()
    }

    pub fn frame_geometry(&self) -> Rect {
        self.frame.frame_geometry()
    }

    pub fn move_to(&mut self, position: crate::core::Point) {
        self.frame.move_to(position);
    }

    /// Human-readable geometry dump.
    pub fn dump_geometry(&self) -> String {
        format!(
            "geometry: {}\nframe geometry: {}",
            self.geometry(),
            self.frame_geometry()
        )
    }

    /// Write the frame anchor to the position sidecar.
    pub fn persist_position(&self) -> Result<(), PositionError> {
        position::persist_position(self.frame.anchor().into(), &self.position_file)
    }

    pub fn overlay(&self) -> &HighlightOverlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut HighlightOverlay {
        &mut self.overlay
    }

    /// Paint the displayed hierarchy through the highlight overlay.
    pub fn repaint(&mut self, painter: &mut dyn Painter) -> usize {
        self.overlay.take_repaint();
        paint_tree(self.content.root().hierarchy(), &self.overlay, painter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Point, WindowFlags};
    use crate::fault::{Fault, ReportRenderer, TextReportRenderer};
    use crate::inspect::overlay::RecordingPainter;
    use crate::view::Window;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> ShellSettings {
        ShellSettings {
            position_file: dir.path().join(position::POSITION_FILE),
            ..ShellSettings::default()
        }
    }

    fn app() -> Box<dyn RootObject> {
        Box::new(
            Window::new("MainWindow")
                .with_title("My app")
                .with_min_size(Size::new(600, 400))
                .with_size(Size::new(1080, 720)),
        )
    }

    #[test]
    fn test_shell_adopts_root_presentation() {
        let dir = TempDir::new().unwrap();
        let shell = Shell::new(settings(&dir), app());

        assert_eq!(shell.state(), ShellState::Normal);
        assert!(shell.frame().visible);
        assert!(shell.root().is_parented());
        assert_eq!(shell.frame().title, "My app");
        assert_eq!(shell.geometry().size(), Size::new(1080, 720));
        assert_eq!(shell.frame().position, None);
    }

    #[test]
    fn test_restores_persisted_position() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);
        std::fs::write(&settings.position_file, r#"{"x": 100, "y": 200}"#).unwrap();

        let shell = Shell::new(settings, app());
        assert_eq!(shell.frame_geometry().origin(), Point::new(100, 200));
    }

    #[test]
    fn test_malformed_position_uses_default_placement() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);
        std::fs::write(&settings.position_file, "{\"x\": 100").unwrap();

        let shell = Shell::new(settings, app());
        assert_eq!(shell.frame().position, None);
    }

    #[test]
    fn test_persist_then_new_shell_anchors_same_place() {
        let dir = TempDir::new().unwrap();
        let mut shell = Shell::new(settings(&dir), app());
        shell.move_to(Point::new(30, 45));
        shell.persist_position().unwrap();

        let next = Shell::new(settings(&dir), app());
        assert_eq!(next.frame_geometry().origin(), Point::new(30, 45));
    }

    #[test]
    fn test_report_content_is_faulted() {
        let dir = TempDir::new().unwrap();
        let mut shell = Shell::new(settings(&dir), app());
        shell.move_to(Point::new(10, 10));

        let view = TextReportRenderer::default().render(&Fault::user("Exception", "boom"));
        shell.show_report(view);

        assert_eq!(shell.state(), ShellState::Faulted);
        assert!(shell.frame().visible);
        assert_eq!(shell.frame().title, "Error");
        assert!(shell.frame().flags.contains(WindowFlags::STAYS_ON_TOP));
        assert_eq!(shell.frame_geometry().origin(), Point::new(10, 10));

        shell.set_content(Content::App(app()));
        assert_eq!(shell.state(), ShellState::Normal);
        assert_eq!(shell.frame().title, "My app");
        assert!(shell.frame().flags.is_empty());
    }

    #[test]
    fn test_replacing_content_drops_selection() {
        let dir = TempDir::new().unwrap();
        let mut shell = Shell::new(settings(&dir), app());
        let root = shell.root().hierarchy().root();
        shell.overlay_mut().select(root);

        shell.set_content(Content::App(app()));
        assert!(shell.overlay().selection().is_empty());
    }

    #[test]
    fn test_repaint_highlights_selection() {
        let dir = TempDir::new().unwrap();
        let mut shell = Shell::new(settings(&dir), app());
        let root = shell.root().hierarchy().root();
        shell.overlay_mut().select(root);

        let mut painter = RecordingPainter::default();
        assert_eq!(shell.repaint(&mut painter), 1);
        assert_eq!(painter.highlights(), vec![Rect::new(0, 0, 1080, 720)]);
        assert!(!shell.overlay().repaint_requested());
    }

    #[test]
    fn test_dump_geometry() {
        let dir = TempDir::new().unwrap();
        let mut shell = Shell::new(settings(&dir), app());
        shell.move_to(Point::new(5, 6));
        let dump = shell.dump_geometry();
        assert!(dump.contains("geometry: Rect(5, 34, 1080x720)"));
        assert!(dump.contains("frame geometry: Rect(5, 6, 1080x748)"));
    }
}
