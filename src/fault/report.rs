//! Fault report rendering.
//!
//! The renderer turns a [`Fault`] into displayable content: a
//! [`ReportView`], which the shell shows in place of the application root.
//! Rendering must not fail; an unreadable source file yields an empty
//! excerpt.

use std::fs;
use std::path::Path;

use crate::core::{Rect, Size, SizeLimits, WindowFlags};
use crate::view::widgets::{Layout, Widget, WidgetKind};
use crate::view::{ObjectTable, RootObject, Window};

use super::{Fault, SourceLocation};

/// Renders faults into report views.
pub trait ReportRenderer {
    fn render(&self, fault: &Fault) -> ReportView;
}

/// One line of a source excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcerptLine {
    pub number: usize,
    pub text: String,
    /// The failing line.
    pub focus: bool,
}

/// Everything a report shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultReport {
    pub type_name: String,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub excerpt: Vec<ExcerptLine>,
    pub trace: String,
}

impl FaultReport {
    /// Plain-text rendering of the report.
    pub fn to_text(&self) -> String {
        let mut out = format!("{}: {}\n", self.type_name, self.message);
        if let Some(loc) = &self.location {
            out.push_str(&format!("Source at line {}\n{loc}\n", loc.line));
        }
        if !self.excerpt.is_empty() {
            out.push('\n');
            for line in &self.excerpt {
                let marker = if line.focus { '>' } else { ' ' };
                out.push_str(&format!("{marker} {:>4} | {}\n", line.number, line.text));
            }
        }
        out.push('\n');
        out.push_str(&self.trace);
        out
    }
}

/// Root object showing a fault report.
pub struct ReportView {
    window: Window,
    report: FaultReport,
}

impl ReportView {
    #[cfg(test)]
    pub fn report(&self) -> &FaultReport {
        &self.report
    }

    pub fn text(&self) -> String {
        self.report.to_text()
    }
}

impl RootObject for ReportView {
    fn type_name(&self) -> &str {
        self.window.type_name()
    }

    fn size_limits(&self) -> SizeLimits {
        self.window.size_limits()
    }

    fn size(&self) -> Size {
        self.window.size()
    }

    fn resize(&mut self, size: Size) {
        self.window.resize(size);
    }

    fn title(&self) -> &str {
        self.window.title()
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn window_flags(&self) -> WindowFlags {
        self.window.window_flags()
    }

    fn set_window_flags(&mut self, flags: WindowFlags) {
        self.window.set_window_flags(flags);
    }

    fn is_parented(&self) -> bool {
        self.window.is_parented()
    }

    fn set_parented(&mut self, parented: bool) {
        self.window.set_parented(parented);
    }

    fn hierarchy(&self) -> &ObjectTable {
        self.window.hierarchy()
    }
}

/// Built-in renderer producing a plain-text report window.
#[derive(Debug, Clone)]
pub struct TextReportRenderer {
    pub title: String,
    pub min_size: Size,
    /// Lines shown before and after the failing line.
    pub context: usize,
}

impl Default for TextReportRenderer {
    fn default() -> Self {
        Self {
            title: "Error".to_string(),
            min_size: Size::new(900, 700),
            context: 2,
        }
    }
}

impl TextReportRenderer {
    pub fn build_report(&self, fault: &Fault) -> FaultReport {
        let location = fault.location().cloned();
        let excerpt = location
            .as_ref()
            .map(|loc| excerpt(&loc.file, loc.line, self.context))
            .unwrap_or_default();

        FaultReport {
            type_name: fault.type_name().to_string(),
            message: fault.message().to_string(),
            location,
            excerpt,
            trace: fault.format_trace(),
        }
    }
}

impl ReportRenderer for TextReportRenderer {
    fn render(&self, fault: &Fault) -> ReportView {
        let report = self.build_report(fault);

        let mut window = Window::new("ReportWindow")
            .with_title(self.title.clone())
            .with_min_size(self.min_size)
            .with_size(self.min_size)
            .with_flags(WindowFlags::STAYS_ON_TOP);

        let width = self.min_size.width;
        let height = self.min_size.height;
        let root = window.root_node();
        if let Some(body) = window.add_child(
            root,
            Box::new(Widget::new(WidgetKind::Panel).with_rect(Rect::new(0, 0, width, height))),
        ) {
            window.add_child(body, Box::new(Layout::vertical()));
            window.add_child(
                body,
                Box::new(Widget::new(WidgetKind::Panel).with_rect(Rect::new(0, 0, width, 5))),
            );
            window.add_child(
                body,
                Box::new(
                    Widget::label(report.to_text()).with_rect(Rect::new(0, 5, width, height - 5)),
                ),
            );
        }

        ReportView { window, report }
    }
}

/// Read up to `context` lines around `line` (1-based) from `path`.
pub fn excerpt(path: &Path, line: usize, context: usize) -> Vec<ExcerptLine> {
    let Ok(source) = fs::read_to_string(path) else {
        return Vec::new();
    };
    if line == 0 {
        return Vec::new();
    }

    let first = line.saturating_sub(context).max(1);
    let last = line + context;

    source
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, text))
        .filter(|(number, _)| (first..=last).contains(number))
        .map(|(number, text)| ExcerptLine {
            number,
            text: text.to_string(),
            focus: number == line,
        })
        .collect()
}
