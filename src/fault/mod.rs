//! User-code faults.
//!
//! A [`Fault`] is what user code produces when it fails: during a unit's
//! re-execution, inside a root constructor, or by panicking in an event
//! handler. Faults are values, routed by the host loop to the
//! [`FaultInterceptor`], which swaps the shell's content for a report.
//!
//! # Modules
//!
//! - `interceptor` - Normal/Faulted lifecycle and panic capture
//! - `panic` - Panic hook and payload conversion
//! - `report` - Report renderer contract and the built-in text renderer

mod interceptor;
mod panic;
pub mod report;

pub use interceptor::FaultInterceptor;
pub use panic::{catch, fault_from_panic};
#[cfg(test)]
pub(crate) use panic::hook_lock;
pub use report::{ReportRenderer, ReportView, TextReportRenderer};

use std::fmt;
use std::path::PathBuf;

/// A file position, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.file.display(), self.line, self.column)
    }
}

/// One call-stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: String,
    pub location: Option<SourceLocation>,
}

impl Frame {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(
                f,
                "  File \"{}\", line {}, in {}",
                loc.file.display(),
                loc.line,
                self.function
            ),
            None => write!(f, "  in {}", self.function),
        }
    }
}

/// Call-stack trace, outermost frame first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackTrace {
    frames: Vec<Frame>,
}

impl StackTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Innermost frame that carries a location.
    pub fn innermost_location(&self) -> Option<&SourceLocation> {
        self.frames.iter().rev().find_map(|f| f.location.as_ref())
    }
}

/// Fault category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    /// Any fault raised by user code, named by its type.
    User { name: String },
    /// Source that could not be parsed, with the exact failing position.
    Syntax(SourceLocation),
}

/// A fault raised by user code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    kind: FaultKind,
    message: String,
    trace: StackTrace,
}

impl Fault {
    pub fn user(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::User { name: name.into() },
            message: message.into(),
            trace: StackTrace::new(),
        }
    }

    pub fn syntax(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind: FaultKind::Syntax(location),
            message: message.into(),
            trace: StackTrace::new(),
        }
    }

    /// Wrap in an outer frame (the caller of where this fault was raised).
    pub fn within(mut self, frame: Frame) -> Self {
        self.trace.frames.insert(0, frame);
        self
    }

    /// Append an inner frame (closer to where the fault was raised).
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.trace.frames.push(frame);
        self
    }

    #[cfg(test)]
    pub fn kind(&self) -> &FaultKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    #[cfg(test)]
    pub fn trace(&self) -> &StackTrace {
        &self.trace
    }

    #[cfg(test)]
    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, FaultKind::Syntax(_))
    }

    /// Type name shown in reports.
    pub fn type_name(&self) -> &str {
        match &self.kind {
            FaultKind::User { name } => name,
            FaultKind::Syntax(_) => "SyntaxError",
        }
    }

    /// Where the fault happened.
    ///
    /// Syntax faults report their own location; everything else uses the
    /// innermost located frame of the trace.
    pub fn location(&self) -> Option<&SourceLocation> {
        match &self.kind {
            FaultKind::Syntax(location) => Some(location),
            FaultKind::User { .. } => self.trace.innermost_location(),
        }
    }

    /// Python-style formatted trace, ending with the fault line.
    pub fn format_trace(&self) -> String {
        let mut out = String::from("Traceback (most recent call last):\n");
        for frame in self.trace.frames() {
            out.push_str(&frame.to_string());
            out.push('\n');
        }
        if let FaultKind::Syntax(loc) = &self.kind {
            out.push_str(&format!(
                "  File \"{}\", line {}, column {}\n",
                loc.file.display(),
                loc.line,
                loc.column
            ));
        }
        out.push_str(&format!("{}: {}", self.type_name(), self.message));
        out
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_location_is_innermost_frame() {
        let fault = Fault::user("ValueError", "boom")
            .with_frame(Frame::new("build_child").at(SourceLocation::new("window.toml", 12, 1)))
            .within(Frame::new("MainWindow").at(SourceLocation::new("window.toml", 3, 1)))
            .within(Frame::new("soft_reload"));

        assert_eq!(fault.trace().frames().len(), 3);
        assert_eq!(fault.trace().frames()[0].function, "soft_reload");
        assert_eq!(
            fault.location(),
            Some(&SourceLocation::new("window.toml", 12, 1))
        );
    }

    #[test]
    fn test_syntax_location_wins_over_trace() {
        let fault = Fault::syntax("expected `=`", SourceLocation::new("x", 10, 4))
            .within(Frame::new("reload").at(SourceLocation::new("host.toml", 1, 1)));

        assert!(fault.is_syntax());
        assert_eq!(fault.type_name(), "SyntaxError");
        assert_eq!(fault.location(), Some(&SourceLocation::new("x", 10, 4)));
    }

    #[test]
    fn test_format_trace() {
        let fault = Fault::user("RuntimeError", "boom")
            .with_frame(Frame::new("MainWindow").at(SourceLocation::new("window.toml", 3, 1)));
        let trace = fault.format_trace();

        assert!(trace.starts_with("Traceback (most recent call last):"));
        assert!(trace.contains("File \"window.toml\", line 3, in MainWindow"));
        assert!(trace.ends_with("RuntimeError: boom"));
    }
}
