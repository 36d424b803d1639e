//! `run` command: start the host.

use anyhow::{Context, Result};

use crate::config::HostConfig;
use crate::core::{self, Size};
use crate::host::{Host, HostChannels, input};
use crate::registry::{CodeUnitRegistry, PlatformRoots, UnitName};
use crate::reload::{ReloadEngine, ReloadTargets};
use crate::runtime::{ManifestLoader, RuntimeLayout};
use crate::shell::ShellSettings;
use crate::watch::{ChangeWatcher, WatchSpec};

/// Wire everything up from `config` and run the host loop.
pub fn run_host(config: &HostConfig) -> Result<()> {
    let engine = build_engine(config);
    let settings = shell_settings(config);

    let (shutdown_tx, shutdown_rx) = crossbeam::channel::bounded(1);
    core::register_shutdown(shutdown_tx);

    let (change_tx, change_rx) = crossbeam::channel::unbounded();
    let watcher = if config.watch.enable {
        let watcher = ChangeWatcher::start(watch_spec(config), change_tx)
            .context("failed to start file watcher")?;
        crate::log!("watch"; "watching {} for changes", config.get_root().display());
        Some(watcher)
    } else {
        drop(change_tx);
        None
    };

    let host = Host::start(engine, settings);
    crate::log!("shell"; "type `help` for commands");

    let (command_tx, command_rx) = crossbeam::channel::unbounded();
    input::spawn_reader(command_tx);

    let channels = HostChannels {
        commands: command_rx,
        changes: if watcher.is_some() {
            change_rx
        } else {
            crossbeam::channel::never()
        },
        shutdown: shutdown_rx,
    };
    host.run(channels, watcher);
    Ok(())
}

fn build_engine(config: &HostConfig) -> ReloadEngine {
    let app = &config.app;
    let layout = RuntimeLayout {
        project_root: config.get_root().to_path_buf(),
        config_file: config.config_path.clone(),
        stdlib_root: config.stdlib_root(),
        entry_unit: UnitName::from(app.entry.as_str()),
        report_unit: UnitName::from(app.report.as_str()),
        excluded: vec![config.persist.position_file.clone()],
    };
    let registry = CodeUnitRegistry::new(Box::new(ManifestLoader::new(layout)));
    let roots = PlatformRoots::new(config.install_root(), config.stdlib_root());
    let targets = ReloadTargets {
        main: UnitName::from(app.main.as_str()),
        constructor: app.constructor.clone(),
        entry: UnitName::from(app.entry.as_str()),
        report: UnitName::from(app.report.as_str()),
    };
    ReloadEngine::new(registry, roots, targets)
}

fn shell_settings(config: &HostConfig) -> ShellSettings {
    let [width, height] = config.shell.min_size;
    ShellSettings {
        title: config.shell.title.clone(),
        min_size: Size::new(width, height),
        position_file: config.persist.position_file.clone(),
    }
}

fn watch_spec(config: &HostConfig) -> WatchSpec {
    WatchSpec {
        dirs: vec![config.get_root().to_path_buf()],
        files: config.watch.files.clone(),
        ignored: vec![config.persist.position_file.clone()],
    }
}
