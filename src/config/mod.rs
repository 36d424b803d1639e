//! Host configuration management for `hotshell.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [app], [watch], [runtime], [shell], [persist]
//! ├── types/         # ConfigError, global config handle
//! └── mod.rs         # HostConfig (this file)
//! ```
//!
//! A missing config file is not an error: the project root is then the
//! working directory and every section takes its defaults.

pub mod section;
pub mod types;
mod util;

use util::{exe_dir, find_config_file};

pub use section::{AppConfig, PersistConfig, RuntimeConfig, ShellConfig, WatchConfig};
pub use types::{ConfigError, cfg, init_config};

use crate::cli::{Cli, Commands, RunArgs};
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing hotshell.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Unit roles
    #[serde(default)]
    pub app: AppConfig,

    /// File watching
    #[serde(default)]
    pub watch: WatchConfig,

    /// Platform roots
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Outer window defaults
    #[serde(default)]
    pub shell: ShellConfig,

    /// Position sidecar
    #[serde(default)]
    pub persist: PersistConfig,
}

impl HostConfig {
    /// Load configuration for `cli`.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory (cwd when there is no config file).
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let (config_path, exists) = match find_config_file(&cli.config) {
            Some(path) => (path, true),
            None => (cwd.join(&cli.config), false),
        };

        let mut config = if exists {
            Self::from_path(&config_path)?
        } else {
            crate::debug!("config"; "no {} found, using defaults", cli.config.display());
            Self::default()
        };

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.config_path = config_path;
        config.finalize(&root, exe_dir());

        if let Commands::Run { args } = &cli.command {
            config.apply_run_args(args);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve relative paths against `root` and fill derived defaults.
    fn finalize(&mut self, root: &Path, exe_dir: PathBuf) {
        self.root = root.to_path_buf();
        self.runtime.resolve(root, exe_dir);
        if self.persist.position_file.is_relative() {
            self.persist.position_file = root.join(&self.persist.position_file);
        }
        for file in &mut self.watch.files {
            if file.is_relative() {
                *file = root.join(&*file);
            }
        }
    }

    /// Apply `run` command flags over file values.
    fn apply_run_args(&mut self, args: &RunArgs) {
        crate::logger::set_verbose(args.verbose);

        if let Some(main) = &args.main {
            self.app.main = main.clone();
        }
        if let Some(constructor) = &args.constructor {
            self.app.constructor = constructor.clone();
        }
        Self::update_option(&mut self.watch.enable, args.watch.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let app = &self.app;
        for (field, value) in [
            ("app.main", &app.main),
            ("app.constructor", &app.constructor),
            ("app.entry", &app.entry),
            ("app.report", &app.report),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("`{field}` must not be empty")));
            }
        }
        if app.main == app.entry {
            return Err(ConfigError::Validation(
                "`app.main` cannot be the entry unit, which is never reloaded".to_string(),
            ));
        }
        let [w, h] = self.shell.min_size;
        if w <= 0 || h <= 0 {
            return Err(ConfigError::Validation(
                "`shell.min_size` must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    pub fn install_root(&self) -> PathBuf {
        self.runtime.install_root.clone().unwrap_or_default()
    }

    pub fn stdlib_root(&self) -> PathBuf {
        self.runtime.stdlib_root.clone().unwrap_or_default()
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> HostConfig {
    let (parsed, ignored) = HostConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_are_collected() {
        let (_, ignored) =
            HostConfig::parse_with_ignored("[app]\nmain = \"w\"\ncolour = 1\n[extra]\n").unwrap();
        assert_eq!(ignored, vec!["app.colour".to_string(), "extra".to_string()]);
    }

    #[test]
    fn test_finalize_resolves_paths() {
        let mut config = test_parse_config("[watch]\nfiles = [\"shared.toml\", \"/abs.toml\"]");
        config.finalize(Path::new("/home/me/app"), PathBuf::from("/opt/hotshell"));

        assert_eq!(
            config.persist.position_file,
            PathBuf::from("/home/me/app/window_position.json")
        );
        assert_eq!(
            config.watch.files,
            vec![
                PathBuf::from("/home/me/app/shared.toml"),
                PathBuf::from("/abs.toml")
            ]
        );
        assert_eq!(config.stdlib_root(), PathBuf::from("/opt/hotshell/lib"));
    }

    #[test]
    fn test_run_args_override() {
        let mut config = test_parse_config("[watch]\nenable = true");
        config.apply_run_args(&RunArgs {
            main: Some("editor".into()),
            constructor: None,
            watch: Some(false),
            verbose: false,
        });
        assert_eq!(config.app.main, "editor");
        assert_eq!(config.app.constructor, "MainWindow");
        assert!(!config.watch.enable);
    }

    #[test]
    fn test_validate() {
        assert!(test_parse_config("").validate().is_ok());
        assert!(test_parse_config("[app]\nmain = \"\"").validate().is_err());
        assert!(test_parse_config("[app]\nmain = \"__entry__\"").validate().is_err());
        assert!(test_parse_config("[shell]\nmin_size = [0, 10]").validate().is_err());
    }

    #[test]
    fn test_syntax_error() {
        assert!(HostConfig::parse_with_ignored("[app\n").is_err());
        assert!(HostConfig::parse_with_ignored("[app]\nmain = 3").is_err());
    }
}
