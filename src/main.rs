//! hotshell - a development host that hot-reloads view units inside a
//! persistent shell window.

mod cli;
mod config;
mod core;
mod fault;
mod host;
mod inspect;
mod logger;
mod registry;
mod reload;
mod runtime;
mod shell;
mod view;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{HostConfig, cfg, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    init_config(HostConfig::load(&cli)?);

    match &cli.command {
        Commands::Run { .. } => cli::run::run_host(&cfg()),
        Commands::Position { clear } => cli::position::show_position(&cfg(), *clear),
    }
}
