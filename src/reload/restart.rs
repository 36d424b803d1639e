//! Hard restart.
//!
//! Replaces the running process with a fresh copy of itself, same
//! executable and arguments.

use std::io;
use std::process::Command;

/// Command that re-runs the current process.
pub fn self_command() -> io::Result<Command> {
    let exe = std::env::current_exe()?;
    let mut command = Command::new(exe);
    command.args(std::env::args_os().skip(1));
    Ok(command)
}

/// Re-exec the current process. Returns only on failure.
#[cfg(unix)]
pub fn exec_self() -> io::Error {
    use std::os::unix::process::CommandExt;

    crate::log!("reload"; "hard restart");
    match self_command() {
        Ok(mut command) => command.exec(),
        Err(e) => e,
    }
}

/// Spawn a fresh copy of the current process, then exit. Returns only on
/// failure.
#[cfg(not(unix))]
pub fn exec_self() -> io::Error {
    crate::log!("reload"; "hard restart");
    match self_command().and_then(|mut command| command.spawn()) {
        Ok(_) => std::process::exit(0),
        Err(e) => e,
    }
}
