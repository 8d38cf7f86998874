//! Dcman Core - Device manager and built-in plugin table
//!
//! This crate provides:
//! - The declarative table of built-in plugins and `register_builtin_plugins`
//! - `DeviceManager`: per-device plugin binding and configuration dispatch
//! - Startup helpers (configuration loading, logging initialization)

pub mod manager;
pub mod plugins;
pub mod startup;

pub use manager::DeviceManager;
pub use plugins::{BUILTIN_PLUGINS, register_builtin_plugins, registry_with_builtins};
pub use startup::{Configuration, LoggingConfig, init_logging};
