//! `[shell]` and `[persist]` section configuration.
//!
//! ```toml
//! [shell]
//! title = "Reloader"
//! min_size = [400, 300]
//!
//! [persist]
//! position_file = "window_position.json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub title: String,
    pub min_size: [i32; 2],
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            title: "Reloader".to_string(),
            min_size: [400, 300],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistConfig {
    /// Relative paths resolve against the project root.
    pub position_file: PathBuf,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            position_file: PathBuf::from(crate::shell::position::POSITION_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_shell_config() {
        let config = test_parse_config("[shell]\ntitle = \"Dev\"\nmin_size = [640, 480]");
        assert_eq!(config.shell.title, "Dev");
        assert_eq!(config.shell.min_size, [640, 480]);
    }

    #[test]
    fn test_persist_defaults() {
        let config = test_parse_config("");
        assert_eq!(
            config.persist.position_file.to_str(),
            Some("window_position.json")
        );
    }
}
