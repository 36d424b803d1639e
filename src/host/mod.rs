//! The host event loop.
//!
//! Single-threaded: file changes, developer commands and shutdown are
//! queued onto channels and handled one at a time, each to completion.
//! Any fault escaping a handler, returned or panicked, goes to the
//! [`FaultInterceptor`].
//!
//! # Modules
//!
//! - `input` - Stdin command parsing and reader thread

pub mod input;

use crossbeam::channel::Receiver;

use crate::fault::{self, Fault, FaultInterceptor};
use crate::inspect::overlay::RecordingPainter;
use crate::inspect::{Inspector, mirror};
use crate::logger;
use crate::reload::{ReloadEngine, restart};
use crate::shell::{Shell, ShellSettings, ShellState};
use crate::view::{RootObject, Window};
use crate::watch::{Change, ChangeWatcher};

pub use input::Command;

/// Events delivered to the host loop.
#[derive(Debug)]
pub enum HostEvent {
    Changed(Change),
    Command(Command),
    InputClosed,
}

/// What the loop does after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Restart,
    Quit,
}

/// Channels feeding the loop.
pub struct HostChannels {
    pub commands: Receiver<HostEvent>,
    pub changes: Receiver<Change>,
    pub shutdown: Receiver<()>,
}

pub struct Host {
    engine: ReloadEngine,
    shell: Shell,
    interceptor: FaultInterceptor,
    inspector: Inspector,
}

impl Host {
    /// Install the interceptor, import units and build the shell.
    ///
    /// If the first root cannot be built, the shell starts faulted.
    pub fn start(mut engine: ReloadEngine, settings: ShellSettings) -> Self {
        let mut interceptor = FaultInterceptor::new(engine.targets().report.clone());
        interceptor.install();

        let (shell, fault) = match fault::catch(|| engine.start()) {
            Ok(root) => (Shell::new(settings, root), None),
            Err(fault) => {
                let placeholder: Box<dyn RootObject> = Box::new(Window::new("Placeholder"));
                (Shell::new(settings, placeholder), Some(fault))
            }
        };

        let mut host = Self {
            engine,
            shell,
            interceptor,
            inspector: Inspector::new(),
        };
        match fault {
            Some(fault) => host.intercept(&fault),
            None => {
                crate::log!("shell"; "showing {} ({} units loaded)",
                    host.shell.root().type_name(), host.engine.registry().len());
            }
        }
        host
    }

    #[cfg(test)]
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    #[cfg(test)]
    pub fn engine(&self) -> &ReloadEngine {
        &self.engine
    }

    #[cfg(test)]
    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    #[cfg(test)]
    pub fn interceptor(&self) -> &FaultInterceptor {
        &self.interceptor
    }

    /// Handle one event; faults escaping it are intercepted.
    pub fn handle(&mut self, event: HostEvent) -> Flow {
        match fault::catch(|| Ok(self.dispatch(event))) {
            Ok(flow) => flow,
            Err(fault) => {
                self.intercept(&fault);
                Flow::Continue
            }
        }
    }

    fn dispatch(&mut self, event: HostEvent) -> Flow {
        match event {
            HostEvent::Changed(change) => {
                let names: Vec<String> = change
                    .paths
                    .iter()
                    .filter_map(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .collect();
                crate::log!("watch"; "changed: {}", names.join(", "));
                self.soft_reload();
                Flow::Continue
            }
            HostEvent::Command(command) => self.command(command),
            HostEvent::InputClosed => {
                crate::debug!("shell"; "stdin closed, commands disabled");
                Flow::Continue
            }
        }
    }

    fn command(&mut self, command: Command) -> Flow {
        logger::status_detach();
        match command {
            Command::Soft => self.soft_reload(),
            Command::Hard => return self.hard_restart(),
            Command::Geometry => {
                for line in self.shell.dump_geometry().lines() {
                    crate::log!("shell"; "{}", line);
                }
            }
            Command::Tree => {
                let node = self.inspector.open(&self.shell);
                crate::log!("inspect"; "{} objects\n{}", mirror::count(node),
                    mirror::render_tree(node).trim_end());
            }
            Command::Select(ids) => {
                if !self.inspector.is_open() {
                    crate::log!("inspect"; "inspector is closed, open it with `tree`");
                } else {
                    self.inspector.select(&ids, &mut self.shell);
                }
            }
            Command::Close => self.inspector.close(&mut self.shell),
            Command::Help => {
                for line in self.shell.toolbar().help().lines() {
                    crate::log!("shell"; "{}", line);
                }
            }
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Reload user code; a fault switches the shell to the report.
    pub fn soft_reload(&mut self) {
        let was_faulted = self.shell.state() == ShellState::Faulted;
        match fault::catch(|| self.engine.soft_reload(&mut self.shell)) {
            Ok(summary) => {
                crate::debug!("reload"; "reloaded {:?}, {} new, {} platform units kept",
                    summary.reloaded, summary.imported, summary.platform);
                if was_faulted {
                    crate::log!("reload"; "recovered");
                }
            }
            Err(fault) => self.intercept(&fault),
        }
    }

    /// Persist the position; the loop then re-executes the process.
    pub fn hard_restart(&mut self) -> Flow {
        if let Err(e) = self.shell.persist_position() {
            crate::log!("error"; "failed to save window position: {}", e);
        }
        Flow::Restart
    }

    fn intercept(&mut self, fault: &Fault) {
        self.interceptor
            .intercept(fault, &mut self.shell, self.engine.registry());
    }

    /// Repaint headlessly when the overlay asked for it.
    fn repaint_if_requested(&mut self) {
        if !self.shell.overlay().repaint_requested() {
            return;
        }
        let mut painter = RecordingPainter::default();
        let painted = self.shell.repaint(&mut painter);
        for rect in painter.highlights() {
            crate::log!("inspect"; "highlight {}", rect);
        }
        crate::debug!("shell"; "repainted {} objects", painted);
    }

    /// Process events until quit or shutdown.
    pub fn run(mut self, channels: HostChannels, mut watcher: Option<ChangeWatcher>) {
        loop {
            if crate::core::is_shutdown() {
                break;
            }
            let flow = crossbeam::select! {
                recv(channels.commands) -> event => match event {
                    Ok(event) => self.handle(event),
                    Err(_) => Flow::Quit,
                },
                recv(channels.changes) -> change => match change {
                    Ok(change) => {
                        let flow = self.handle(HostEvent::Changed(change));
                        if let Some(watcher) = watcher.as_mut() {
                            watcher.maintain();
                        }
                        flow
                    }
                    Err(_) => Flow::Continue,
                },
                recv(channels.shutdown) -> _ => Flow::Quit,
            };

            match flow {
                Flow::Continue => self.repaint_if_requested(),
                Flow::Restart => {
                    self.interceptor.uninstall();
                    let error = restart::exec_self();
                    crate::log!("error"; "hard restart failed: {}", error);
                    self.interceptor.install();
                }
                Flow::Quit => break,
            }
        }
        crate::log!("shell"; "bye");
    }
}
