//! Unit classification.
//!
//! Pure functions partitioning loaded units into platform and user code.
//! No side effects.

use std::path::{Path, PathBuf};

use super::unit::{CodeUnit, Origin, UnitName};

/// Runtime installation roots. Units under either are platform code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRoots {
    pub install_root: PathBuf,
    pub stdlib_root: PathBuf,
}

impl PlatformRoots {
    pub fn new(install_root: impl Into<PathBuf>, stdlib_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            stdlib_root: stdlib_root.into(),
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.install_root) || path.starts_with(&self.stdlib_root)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitClass {
    /// Ships with the runtime; never reloaded.
    Platform,
    /// Project code; eligible for reload.
    User,
}

/// Classify a single unit.
///
/// Synthetic units have no origin and count as platform.
pub fn classify_unit(unit: &CodeUnit, roots: &PlatformRoots) -> UnitClass {
    match unit.origin() {
        Origin::Synthetic => UnitClass::Platform,
        Origin::File(path) if roots.contains(path) => UnitClass::Platform,
        Origin::File(_) => UnitClass::User,
    }
}

/// Partition of loaded units for one reload pass.
///
/// Every unit appears on exactly one side, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub platform: Vec<UnitName>,
    pub user: Vec<UnitName>,
}

impl Classification {
    /// User units to reload: everything on the user side except `entry`.
    pub fn reload_set(&self, entry: &UnitName) -> Vec<UnitName> {
        self.user.iter().filter(|n| *n != entry).cloned().collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.platform.len() + self.user.len()
    }
}

/// Partition `units` into platform and user code.
pub fn classify<'a>(
    units: impl IntoIterator<Item = &'a CodeUnit>,
    roots: &PlatformRoots,
) -> Classification {
    let mut result = Classification::default();
    for unit in units {
        match classify_unit(unit, roots) {
            UnitClass::Platform => result.platform.push(unit.name().clone()),
            UnitClass::User => result.user.push(unit.name().clone()),
        }
    }
    result
}
