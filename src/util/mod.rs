//! Utility helpers for chartop.

mod format;

pub use format::{format_created, truncate};
