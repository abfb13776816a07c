//! CLI library components for `qloader`.

pub mod commands;
pub mod input;
pub mod logging;
pub mod render;
pub mod summary;
