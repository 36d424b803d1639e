//! Configuration section definitions.
//!
//! | Section     | Purpose                                       |
//! |-------------|-----------------------------------------------|
//! | `[app]`     | Entry, main and report unit names             |
//! | `[watch]`   | File watching                                 |
//! | `[runtime]` | Platform roots used for unit classification   |
//! | `[shell]`   | Outer window defaults                         |
//! | `[persist]` | Position sidecar location                     |

mod app;
mod runtime;
mod shell;
mod watch;

pub use app::AppConfig;
pub use runtime::RuntimeConfig;
pub use shell::{PersistConfig, ShellConfig};
pub use watch::WatchConfig;
