//! Dcman Plugin - Plugin SPI definitions
//!
//! This crate provides:
//! - The `DeviceConf` trait every vendor/product plugin implements
//! - `PluginDescriptor`: a plugin's registration claim (vendor, products, roles)
//! - `PluginRegistry`: vendor-keyed registry with best-match resolution
//! - The configuration model shared between the manager and the plugins

use async_trait::async_trait;

pub mod descriptor;
pub mod model;
pub mod registry;

pub use descriptor::{ConfFactory, PluginDescriptor};
pub use model::{CommitResult, ConfigDelta, ConfigOp, DeviceFacts, DeviceMeta};
pub use registry::{PluginRegistry, ResolvedPlugin};

use dcman_common::DcmanError;

/// Device-configuration plugin contract.
///
/// One instance is bound per managed device; the manager drives the
/// lifecycle in order: `initialize`, any number of `fetch_facts` /
/// `push_config` calls, then `shutdown`.
#[async_trait]
pub trait DeviceConf: Send + Sync {
    /// Plugin name, unique across the registry
    fn name(&self) -> &str;

    /// Vendor this instance configures
    fn vendor(&self) -> &str;

    /// Establish the device session and verify reachability
    async fn initialize(&self) -> Result<(), DcmanError>;

    /// Collect device identity facts (model, OS version, serial)
    async fn fetch_facts(&self) -> Result<DeviceFacts, DcmanError>;

    /// Render and commit a configuration delta on the device
    async fn push_config(&self, delta: &ConfigDelta) -> Result<CommitResult, DcmanError>;

    /// Tear down the device session
    async fn shutdown(&self) -> Result<(), DcmanError>;
}
