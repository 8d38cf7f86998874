//! Juniper vendor-baseline plugin for dcman
//!
//! This crate provides:
//! - `JuniperConf`: the vendor-wide fallback plugin (any product, any role)
//! - Curly-brace-free command rendering (`set`/`delete` lines)
//! - A `Transport` trait abstracting the device session, with a loopback
//!   implementation used by tests and by family plugins built on top
//!
//! The MX and QFX family plugins compose `JuniperConf` rather than
//! reimplementing the session/commit machinery.

pub mod conf;
pub mod render;
pub mod transport;

pub use conf::{JuniperConf, MAX_COMMIT_ATTEMPTS, registration, registration_with_transport};
pub use render::render_delta;
pub use transport::{LoopbackTransport, Transport, TransportFactory};

/// Plugin name as it appears in the registry
pub const PLUGIN_NAME: &str = "juniper_conf";
