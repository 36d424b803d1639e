//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! enable = true              # Soft reload on file changes
//! files = ["../shared.toml"] # Extra individually watched files
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub enable: bool,
    /// Relative paths resolve against the project root.
    pub files: Vec<PathBuf>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enable: true,
            files: Vec::new(),
        }
    }
}
