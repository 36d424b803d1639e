//! `position` command: inspect or clear the persisted shell position.

use anyhow::{Context, Result};

use crate::config::HostConfig;
use crate::shell::position::{clear_position, restore_position};

pub fn show_position(config: &HostConfig, clear: bool) -> Result<()> {
    let path = &config.persist.position_file;

    if clear {
        let removed = clear_position(path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
        if removed {
            crate::log!("shell"; "cleared {}", path.display());
        } else {
            crate::log!("shell"; "no saved position");
        }
        return Ok(());
    }

    match restore_position(path) {
        Some(record) => crate::log!("shell"; "saved position: ({}, {})", record.x, record.y),
        None => crate::log!("shell"; "no saved position, default placement"),
    }
    Ok(())
}
