//! Declarative unit runtime.
//!
//! Code units are TOML files. Executing a unit parses it and defines one
//! zero-argument constructor per `[[component]]`; re-executing it after an
//! edit swaps in constructors built from the new file contents.
//!
//! # Modules
//!
//! - `build` - Component to root object construction
//! - `manifest` - Unit file schema and syntax faults

pub mod build;
pub mod manifest;

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::core::Size;
use crate::fault::{Fault, ReportRenderer, TextReportRenderer};
use crate::registry::{Definitions, Origin, RENDERER_NAME, UnitLoader, UnitName};
use crate::view::RootObject;

use build::Builder;
use manifest::ReportSpec;

/// Built-in widget library unit.
pub const WIDGETS_UNIT: &str = "widgets";

/// Where units come from.
#[derive(Debug, Clone)]
pub struct RuntimeLayout {
    /// Directory scanned for user units.
    pub project_root: PathBuf,
    /// Config file; backs the entry unit.
    pub config_file: PathBuf,
    /// Directory scanned for platform units.
    pub stdlib_root: PathBuf,
    pub entry_unit: UnitName,
    pub report_unit: UnitName,
    /// Files in `project_root` that are never units.
    pub excluded: Vec<PathBuf>,
}

/// Loader for `*.toml` view units.
pub struct ManifestLoader {
    layout: RuntimeLayout,
}

impl ManifestLoader {
    pub fn new(layout: RuntimeLayout) -> Self {
        Self { layout }
    }

    fn report_file(&self) -> PathBuf {
        self.layout
            .project_root
            .join(format!("{}.toml", self.layout.report_unit))
    }

    fn is_excluded(&self, path: &Path) -> bool {
        path == self.layout.config_file
            || path == self.report_file()
            || self.layout.excluded.iter().any(|e| e == path)
    }

    fn execute_file(&self, name: &UnitName, path: &Path) -> Result<Definitions, Fault> {
        let source = fs::read_to_string(path).map_err(|e| {
            Fault::user(
                "OSError",
                format!("cannot read unit `{name}` from {}: {e}", path.display()),
            )
        })?;
        let manifest = Rc::new(manifest::parse(&source, path)?);
        let path: Rc<Path> = Rc::from(path);

        let mut definitions = Definitions::new();
        for component in &manifest.components {
            let manifest = Rc::clone(&manifest);
            let path = Rc::clone(&path);
            let component_name = component.name().to_string();
            definitions.define_constructor(
                component.name(),
                Rc::new(move || {
                    let window = Builder::new(&manifest, &path).build(&component_name)?;
                    Ok(Box::new(window) as Box<dyn RootObject>)
                }),
            );
        }

        if let Some(spec) = &manifest.report {
            definitions.define_renderer(RENDERER_NAME, report_renderer(spec));
        } else if *name == self.layout.report_unit {
            definitions.define_renderer(RENDERER_NAME, Rc::new(TextReportRenderer::default()));
        }
        Ok(definitions)
    }
}

impl UnitLoader for ManifestLoader {
    fn execute(&self, name: &UnitName, origin: &Origin) -> Result<Definitions, Fault> {
        if *name == self.layout.entry_unit {
            // Bootstrap unit; nothing to define.
            return Ok(Definitions::new());
        }

        match origin {
            Origin::File(path) => self.execute_file(name, path),
            Origin::Synthetic if *name == self.layout.report_unit => {
                let mut definitions = Definitions::new();
                definitions.define_renderer(RENDERER_NAME, Rc::new(TextReportRenderer::default()));
                Ok(definitions)
            }
            Origin::Synthetic => Ok(Definitions::new()),
        }
    }

    fn discover(&self) -> Vec<(UnitName, Origin)> {
        let layout = &self.layout;
        let mut units = vec![
            (
                layout.entry_unit.clone(),
                Origin::File(layout.config_file.clone()),
            ),
            (UnitName::from(WIDGETS_UNIT), Origin::Synthetic),
        ];

        let report_file = self.report_file();
        let report_origin = if report_file.is_file() {
            Origin::File(report_file)
        } else {
            Origin::Synthetic
        };
        units.push((layout.report_unit.clone(), report_origin));

        units.extend(unit_files(&layout.stdlib_root).into_iter().map(unit_entry));
        units.extend(
            unit_files(&layout.project_root)
                .into_iter()
                .filter(|path| !self.is_excluded(path))
                .map(unit_entry),
        );
        units
    }
}

fn unit_entry(path: PathBuf) -> (UnitName, Origin) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (UnitName::from(stem), Origin::File(path))
}

/// `*.toml` files directly inside `dir`, sorted by name.
fn unit_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();
    files
}

fn report_renderer(spec: &ReportSpec) -> Rc<dyn ReportRenderer> {
    let defaults = TextReportRenderer::default();
    Rc::new(TextReportRenderer {
        title: spec.title.clone().unwrap_or(defaults.title),
        min_size: spec
            .min_size
            .map_or(defaults.min_size, |[w, h]| Size::new(w, h)),
        context: spec.context.unwrap_or(defaults.context),
    })
}
