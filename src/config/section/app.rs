//! `[app]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [app]
//! main = "window"            # Unit exposing the root constructor
//! constructor = "MainWindow" # Zero-argument constructor name
//! entry = "__entry__"        # Process entry unit, never reloaded
//! report = "report"          # Fault-report unit, reloaded first
//! ```

use serde::{Deserialize, Serialize};

/// Which units play which role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub main: String,
    pub constructor: String,
    pub entry: String,
    pub report: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            main: "window".to_string(),
            constructor: "MainWindow".to_string(),
            entry: "__entry__".to_string(),
            report: "report".to_string(),
        }
    }
}
