//! Developer commands read from stdin.
//!
//! Each line is one command, given by name or by its key shortcut:
//!
//! ```text
//! soft              soft reload now
//! hard | ctrl+r     hard restart (persists position first)
//! geometry          dump shell geometry
//! tree | ctrl+d     open/refresh the inspector and print the mirror
//! select 3 5        highlight mirror nodes 3 and 5
//! close             close the inspector
//! help              list actions
//! quit              leave the host
//! ```

use std::io::BufRead;
use std::thread;

use crossbeam::channel::Sender;

use crate::inspect::MirrorId;
use crate::shell::{Action, Shortcut};

use super::HostEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Soft,
    Hard,
    Geometry,
    Tree,
    Select(Vec<MirrorId>),
    Close,
    Help,
    Quit,
}

impl From<Action> for Command {
    fn from(action: Action) -> Self {
        match action {
            Action::HardRestart => Self::Hard,
            Action::SoftReload => Self::Soft,
            Action::DumpGeometry => Self::Geometry,
            Action::DumpObjectTree => Self::Tree,
        }
    }
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    if let Some(shortcut) = Shortcut::parse(head) {
        return Action::for_shortcut(shortcut)
            .map(|action| Some(action.into()))
            .ok_or_else(|| format!("no action bound to {shortcut}"));
    }

    let command = match head.to_ascii_lowercase().as_str() {
        "soft" | "reload" => Command::Soft,
        "hard" | "restart" => Command::Hard,
        "geometry" | "geo" => Command::Geometry,
        "tree" | "inspect" => Command::Tree,
        "select" | "sel" => {
            let ids = words
                .by_ref()
                .map(|w| {
                    w.parse::<u32>()
                        .map(MirrorId)
                        .map_err(|_| format!("invalid node id `{w}`"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Command::Select(ids)
        }
        "close" => Command::Close,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command `{other}` (try `help`)")),
    };

    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument `{extra}`"));
    }
    Ok(Some(command))
}

/// Read commands from stdin on a background thread.
///
/// Sends [`HostEvent::InputClosed`] at end of input.
pub fn spawn_reader(tx: Sender<HostEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Ok(Some(command)) => {
                    if tx.send(HostEvent::Command(command)).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(message) => crate::log!("error"; "{}", message),
            }
        }
        let _ = tx.send(HostEvent::InputClosed);
    })
}
