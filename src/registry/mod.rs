//! Code unit registry.
//!
//! The registry owns every loaded [`CodeUnit`] and the [`UnitLoader`] that
//! executes them. Units keep their registration order; reloading a unit
//! re-executes its top-level definitions through the loader and swaps the
//! result in place.
//!
//! # Modules
//!
//! - `classify` - Platform/user partition (pure)
//! - `unit` - Unit identity, origin and definitions

pub mod classify;
mod unit;

pub use classify::{Classification, PlatformRoots};
pub use unit::{CodeUnit, Constructor, Definitions, Origin, RENDERER_NAME, UnitName};

use rustc_hash::FxHashMap;

use crate::fault::{Fault, Frame};

/// Executes a unit's top-level definitions.
pub trait UnitLoader {
    /// Run `name` from `origin` and return what it defines.
    fn execute(&self, name: &UnitName, origin: &Origin) -> Result<Definitions, Fault>;

    /// Units present at startup, in import order.
    fn discover(&self) -> Vec<(UnitName, Origin)> {
        Vec::new()
    }
}

/// Owned set of loaded code units.
pub struct CodeUnitRegistry {
    units: Vec<CodeUnit>,
    index: FxHashMap<UnitName, usize>,
    loader: Box<dyn UnitLoader>,
}

impl CodeUnitRegistry {
    pub fn new(loader: Box<dyn UnitLoader>) -> Self {
        Self {
            units: Vec::new(),
            index: FxHashMap::default(),
            loader,
        }
    }

    /// Import every unit the loader discovers.
    ///
    /// Stops at the first unit whose first execution faults; units imported
    /// before it stay registered.
    pub fn import_discovered(&mut self) -> Result<usize, Fault> {
        let discovered = self.loader.discover();
        let mut imported = 0;
        for (name, origin) in discovered {
            if self.import(name, origin)? {
                imported += 1;
            }
        }
        Ok(imported)
    }

    /// Execute and register a unit. Already-registered names are left alone.
    ///
    /// Returns whether the unit was newly registered.
    pub fn import(&mut self, name: UnitName, origin: Origin) -> Result<bool, Fault> {
        if self.index.contains_key(&name) {
            return Ok(false);
        }

        let definitions = self
            .loader
            .execute(&name, &origin)
            .map_err(|fault| fault.within(import_frame(&name, &origin)))?;

        crate::debug!("reload"; "imported {} ({} definitions)", name, definitions.len());
        self.insert(CodeUnit::new(name, origin, definitions));
        Ok(true)
    }

    /// Register an already-executed unit, replacing any unit of the same name.
    pub fn insert(&mut self, unit: CodeUnit) {
        match self.index.get(unit.name()) {
            Some(&i) => self.units[i] = unit,
            None => {
                self.index.insert(unit.name().clone(), self.units.len());
                self.units.push(unit);
            }
        }
    }

    /// Re-execute `name` in place.
    ///
    /// On fault the unit keeps its previous definitions.
    pub fn reload(&mut self, name: &UnitName) -> Result<(), Fault> {
        let Some(&i) = self.index.get(name) else {
            return Err(Fault::user(
                "UnitNotFound",
                format!("no unit named `{name}` is loaded"),
            ));
        };

        let origin = self.units[i].origin().clone();
        let definitions = self
            .loader
            .execute(name, &origin)
            .map_err(|fault| fault.within(reload_frame(name, &origin)))?;

        self.units[i].replace_definitions(definitions);
        crate::debug!("reload"; "re-executed {} (generation {})", name, self.units[i].generation());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CodeUnit> {
        self.index.get(name).map(|&i| &self.units[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Units in registration order.
    #[cfg(test)]
    pub fn units(&self) -> &[CodeUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn classify(&self, roots: &PlatformRoots) -> Classification {
        classify::classify(&self.units, roots)
    }

    /// Look up `constructor` in the current definitions of `unit`.
    pub fn constructor(&self, unit: &str, constructor: &str) -> Option<Constructor> {
        self.get(unit)?.definitions().constructor(constructor)
    }
}

fn import_frame(name: &UnitName, origin: &Origin) -> Frame {
    let frame = Frame::new(format!("<import {name}>"));
    match origin.path() {
        Some(path) => frame.at(crate::fault::SourceLocation::new(path, 1, 1)),
        None => frame,
    }
}

fn reload_frame(name: &UnitName, origin: &Origin) -> Frame {
    let frame = Frame::new(format!("<reload {name}>"));
    match origin.path() {
        Some(path) => frame.at(crate::fault::SourceLocation::new(path, 1, 1)),
        None => frame,
    }
}

#[cfg(test)]
pub(crate) mod tests;
