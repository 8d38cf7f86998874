//! MX-family plugin for dcman
//!
//! `MxConf` serves Juniper MX and vMX routers in spine and gateway roles.
//! It composes the juniper baseline for sessions and commits, and prefixes
//! each push with the chassis scaffolding MX routing features require.

use std::sync::Arc;

use async_trait::async_trait;
use dcman_common::{DcmanError, DeviceRole, VENDOR_JUNIPER};
use dcman_plugin::{
    CommitResult, ConfigDelta, DeviceConf, DeviceFacts, DeviceMeta, PluginDescriptor,
};
use dcman_plugin_juniper::{
    JuniperConf, LoopbackTransport, Transport, TransportFactory, render_delta,
};

/// Plugin name as it appears in the registry
pub const PLUGIN_NAME: &str = "mx_conf";

/// Product patterns claimed by this plugin (mx, vmx families)
pub const PRODUCT_PATTERNS: &[&str] = &["^v?mx"];

/// Chassis scaffolding every MX push carries.
///
/// Enhanced-ip network services gate IRB and dynamic-tunnel features; the
/// line is idempotent on the device so it rides along with every commit.
const CHASSIS_SCAFFOLDING: &str = "set chassis network-services enhanced-ip";

pub struct MxConf {
    base: JuniperConf,
}

impl MxConf {
    pub fn new(meta: DeviceMeta, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: JuniperConf::with_name(PLUGIN_NAME, meta, transport),
        }
    }
}

#[async_trait]
impl DeviceConf for MxConf {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn vendor(&self) -> &str {
        VENDOR_JUNIPER
    }

    async fn initialize(&self) -> Result<(), DcmanError> {
        self.base.initialize().await
    }

    async fn fetch_facts(&self) -> Result<DeviceFacts, DcmanError> {
        self.base.fetch_facts().await
    }

    async fn push_config(&self, delta: &ConfigDelta) -> Result<CommitResult, DcmanError> {
        delta.validate()?;
        if delta.is_empty() {
            return self.base.commit_lines(&[]).await;
        }
        let mut lines = vec![CHASSIS_SCAFFOLDING.to_string()];
        lines.extend(render_delta(delta));
        self.base.commit_lines(&lines).await
    }

    async fn shutdown(&self) -> Result<(), DcmanError> {
        self.base.shutdown().await
    }
}

/// Registry descriptor with a custom transport
pub fn registration_with_transport(transport_factory: TransportFactory) -> PluginDescriptor {
    PluginDescriptor::new(
        PLUGIN_NAME,
        VENDOR_JUNIPER,
        Arc::new(move |meta: &DeviceMeta| {
            let transport = transport_factory(meta);
            Ok(Box::new(MxConf::new(meta.clone(), transport)) as Box<dyn DeviceConf>)
        }),
    )
    .with_products(PRODUCT_PATTERNS)
    .with_roles(&[DeviceRole::Spine, DeviceRole::Gateway])
}

/// Registry descriptor for MX-family routers
pub fn registration() -> PluginDescriptor {
    registration_with_transport(LoopbackTransport::factory())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mx_meta() -> DeviceMeta {
        DeviceMeta::new("spine-1", "juniper", "mx480", DeviceRole::Spine)
            .with_management_ip("10.10.0.10")
    }

    #[tokio::test]
    async fn test_push_prefixes_chassis_scaffolding() {
        let meta = mx_meta();
        let transport = Arc::new(LoopbackTransport::new(meta.clone()));
        let conf = MxConf::new(meta, transport.clone());

        let delta = ConfigDelta::new().set(&["interfaces", "irb", "unit 5", "family inet"], "");
        conf.push_config(&delta).await.unwrap();

        let committed = transport.committed().await;
        assert_eq!(
            committed,
            vec![vec![
                "set chassis network-services enhanced-ip".to_string(),
                "set interfaces irb unit 5 family inet".to_string(),
            ]]
        );
    }

    #[tokio::test]
    async fn test_empty_delta_skips_scaffolding() {
        let meta = mx_meta();
        let transport = Arc::new(LoopbackTransport::new(meta.clone()));
        let conf = MxConf::new(meta, transport.clone());

        let result = conf.push_config(&ConfigDelta::new()).await.unwrap();
        assert_eq!(result.attempts, 0);
        assert!(transport.committed().await.is_empty());
    }

    #[test]
    fn test_registration_claims_mx_products_only() {
        let desc = registration();
        desc.validate().unwrap();
        assert_eq!(desc.name, PLUGIN_NAME);
        assert_eq!(desc.products, vec!["^v?mx"]);
        assert!(desc.serves_role(DeviceRole::Spine));
        assert!(!desc.serves_role(DeviceRole::Leaf));
    }
}
