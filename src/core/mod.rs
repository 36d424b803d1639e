//! Core types - plain values shared across the codebase.

mod geometry;
mod state;

pub use geometry::{Point, Rect, Size, SizeLimits, WindowFlags};
pub use state::{is_shutdown, register_shutdown, setup_shutdown_handler};
