//! Application startup utilities
//!
//! Configuration loading and logging initialization, invoked once by the
//! `dcman` binary before the plugin table is registered.

mod config;
mod logging;

pub use config::Configuration;
pub use logging::{LoggingConfig, init_logging};
