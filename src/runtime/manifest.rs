//! Unit file schema.
//!
//! A unit file is TOML:
//!
//! ```toml
//! [[component]]
//! name = "MainWindow"
//! title = "My app"
//! min_size = [600, 400]
//! size = [1080, 720]
//! flags = ["stays_on_top"]
//!
//! [[component.child]]
//! kind = "VBoxLayout"
//!
//! [[component.child.child]]
//! kind = "Label"
//! text = "Hello!"
//! rect = [10, 10, 200, 24]
//! ```
//!
//! Parse and schema errors become syntax faults carrying the line and
//! column of the offending span.

use std::path::Path;

use serde::Deserialize;
use toml::Spanned;

use crate::core::{Rect, Size, WindowFlags};
use crate::fault::{Fault, SourceLocation};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitManifest {
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentSpec>,
    /// Report renderer settings; only meaningful in the report unit.
    #[serde(default)]
    pub report: Option<ReportSpec>,
}

/// A zero-argument root constructor.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentSpec {
    pub name: Spanned<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub min_size: Option<[i32; 2]>,
    #[serde(default)]
    pub max_size: Option<[i32; 2]>,
    #[serde(default)]
    pub size: Option<[i32; 2]>,
    #[serde(default)]
    pub flags: Vec<String>,
    /// Construction raises a `RuntimeError` with this message.
    #[serde(default)]
    pub raise: Option<String>,
    #[serde(default, rename = "child")]
    pub children: Vec<ChildSpec>,
    /// Line of the component's `name` key.
    #[serde(skip)]
    pub line: usize,
}

/// A node of a component's hierarchy.
///
/// Exactly one of `kind` (built-in widget) or `use` (another component of
/// the same unit, inlined) is expected.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChildSpec {
    #[serde(default)]
    pub kind: Option<Spanned<String>>,
    #[serde(default, rename = "use")]
    pub component: Option<Spanned<String>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub rect: Option<[i32; 4]>,
    #[serde(default, rename = "child")]
    pub children: Vec<ChildSpec>,
    /// Line of the `kind` or `use` key.
    #[serde(skip)]
    pub line: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSpec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub min_size: Option<[i32; 2]>,
    #[serde(default)]
    pub context: Option<usize>,
}

impl UnitManifest {
    pub fn component(&self, name: &str) -> Option<&ComponentSpec> {
        self.components.iter().find(|c| c.name.get_ref() == name)
    }
}

impl ComponentSpec {
    pub fn name(&self) -> &str {
        self.name.get_ref()
    }

    pub fn min_size(&self) -> Option<Size> {
        self.min_size.map(|[w, h]| Size::new(w, h))
    }

    pub fn max_size(&self) -> Option<Size> {
        self.max_size.map(|[w, h]| Size::new(w, h))
    }

    pub fn size(&self) -> Option<Size> {
        self.size.map(|[w, h]| Size::new(w, h))
    }
}

impl ChildSpec {
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_ref().map(|k| k.get_ref().as_str())
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_ref().map(|c| c.get_ref().as_str())
    }

    /// Label used for stack frames.
    pub fn label(&self) -> &str {
        self.kind().or(self.component()).unwrap_or("<child>")
    }

    pub fn rect(&self) -> Rect {
        self.rect
            .map_or_else(Rect::default, |[x, y, w, h]| Rect::new(x, y, w, h))
    }
}

/// Parse a unit file's contents.
pub fn parse(source: &str, path: &Path) -> Result<UnitManifest, Fault> {
    let mut manifest: UnitManifest = toml::from_str(source).map_err(|e| {
        let (line, column) = e
            .span()
            .map_or((1, 1), |span| line_column(source, span.start));
        Fault::syntax(e.message().trim_end(), SourceLocation::new(path, line, column))
    })?;

    for component in &mut manifest.components {
        component.line = line_column(source, component.name.span().start).0;
        annotate(source, &mut component.children);
    }
    Ok(manifest)
}

fn annotate(source: &str, children: &mut [ChildSpec]) {
    for child in children {
        let span = child
            .kind
            .as_ref()
            .or(child.component.as_ref())
            .map(|s| s.span().start);
        child.line = span.map_or(1, |start| line_column(source, start).0);
        annotate(source, &mut child.children);
    }
}

/// Resolve window flag names, failing on the first unknown one.
pub fn parse_flags(names: &[String]) -> Result<WindowFlags, Fault> {
    names.iter().try_fold(WindowFlags::empty(), |flags, name| {
        WindowFlags::from_config_name(name)
            .map(|flag| flags | flag)
            .ok_or_else(|| Fault::user("ValueError", format!("unknown window flag `{name}`")))
    })
}

/// 1-based line and column of byte `offset` in `source`.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
