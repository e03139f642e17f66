//! Port traits (interfaces) for external dependencies.

pub mod config_port;
pub mod tick_port;
