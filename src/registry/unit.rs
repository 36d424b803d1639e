//! Code units and their definitions.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::fault::{Fault, ReportRenderer};
use crate::view::RootObject;

/// Qualified unit name, unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitName(String);

impl UnitName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UnitName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for UnitName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Where a unit's code comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(PathBuf),
    /// Built into the host; no source file.
    Synthetic,
}

impl Origin {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Synthetic => None,
        }
    }
}

/// Name a report unit defines its renderer under.
pub const RENDERER_NAME: &str = "render";

/// Zero-argument root constructor.
pub type Constructor = Rc<dyn Fn() -> Result<Box<dyn RootObject>, Fault>>;

/// A named top-level definition.
#[derive(Clone)]
pub enum Export {
    Constructor(Constructor),
    Renderer(Rc<dyn ReportRenderer>),
}

/// The definitions produced by executing a unit once.
#[derive(Clone, Default)]
pub struct Definitions {
    exports: FxHashMap<String, Export>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_constructor(&mut self, name: impl Into<String>, constructor: Constructor) {
        self.exports
            .insert(name.into(), Export::Constructor(constructor));
    }

    pub fn define_renderer(&mut self, name: impl Into<String>, renderer: Rc<dyn ReportRenderer>) {
        self.exports.insert(name.into(), Export::Renderer(renderer));
    }

    pub fn constructor(&self, name: &str) -> Option<Constructor> {
        match self.exports.get(name)? {
            Export::Constructor(c) => Some(Rc::clone(c)),
            Export::Renderer(_) => None,
        }
    }

    /// The renderer this unit defines under the name `render`.
    pub fn renderer(&self) -> Option<Rc<dyn ReportRenderer>> {
        match self.exports.get(RENDERER_NAME)? {
            Export::Renderer(r) => Some(Rc::clone(r)),
            Export::Constructor(_) => None,
        }
    }

    /// Defined names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.exports.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

}

impl fmt::Debug for Definitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definitions")
            .field("names", &self.names())
            .finish()
    }
}

/// A loaded, independently reloadable unit of code.
///
/// Reloading replaces `definitions` in place; name and origin never change.
#[derive(Debug)]
pub struct CodeUnit {
    name: UnitName,
    origin: Origin,
    definitions: Definitions,
    generation: u64,
}

impl CodeUnit {
    pub fn new(name: UnitName, origin: Origin, definitions: Definitions) -> Self {
        Self {
            name,
            origin,
            definitions,
            generation: 0,
        }
    }

    pub fn name(&self) -> &UnitName {
        &self.name
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// How many times this unit has been re-executed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(super) fn replace_definitions(&mut self, definitions: Definitions) {
        self.definitions = definitions;
        self.generation += 1;
    }
}
