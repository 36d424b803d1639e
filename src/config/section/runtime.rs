//! `[runtime]` section configuration.
//!
//! Units under either root are platform code and never reloaded.
//!
//! ```toml
//! [runtime]
//! install_root = "/opt/hotshell"     # Default: directory of the executable
//! stdlib_root = "/opt/hotshell/lib"  # Default: <install_root>/lib
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub install_root: Option<PathBuf>,
    pub stdlib_root: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Fill unset roots from `exe_dir` and make relative roots absolute.
    pub fn resolve(&mut self, project_root: &std::path::Path, exe_dir: PathBuf) {
        let install = match self.install_root.take() {
            Some(path) if path.is_relative() => project_root.join(path),
            Some(path) => path,
            None => exe_dir,
        };
        let stdlib = match self.stdlib_root.take() {
            Some(path) if path.is_relative() => project_root.join(path),
            Some(path) => path,
            None => install.join("lib"),
        };
        self.install_root = Some(install);
        self.stdlib_root = Some(stdlib);
    }
}
