//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads.

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;

use crate::config::HostConfig;

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<HostConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(HostConfig::default()));

#[inline]
pub fn cfg() -> Arc<HostConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: HostConfig) -> Arc<HostConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
