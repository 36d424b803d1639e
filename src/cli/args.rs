//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Development host that hot-reloads view units inside a persistent shell
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: hotshell.toml)
    #[arg(short = 'C', long, default_value = "hotshell.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the host and show the main view
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Show the persisted shell position
    #[command(visible_alias = "p")]
    Position {
        /// Delete the position file
        #[arg(long)]
        clear: bool,
    },
}

/// Arguments of the run command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Unit exposing the root constructor
    #[arg(short, long)]
    pub main: Option<String>,

    /// Zero-argument constructor to call in the main unit
    #[arg(short, long)]
    pub constructor: Option<String>,

    /// Enable file watching for soft reload
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub watch: Option<bool>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
