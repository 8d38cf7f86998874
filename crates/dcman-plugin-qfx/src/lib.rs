//! QFX-family plugin for dcman
//!
//! `QfxConf` serves Juniper QFX switches in leaf and spine roles. It
//! composes the juniper baseline, adds VXLAN/EVPN switch scaffolding on
//! leaf pushes, and rejects operations QFX platforms do not support.

use std::sync::Arc;

use async_trait::async_trait;
use dcman_common::{DcmanError, DeviceRole, VENDOR_JUNIPER};
use dcman_plugin::{
    CommitResult, ConfigDelta, ConfigOp, DeviceConf, DeviceFacts, DeviceMeta, PluginDescriptor,
};
use dcman_plugin_juniper::{
    JuniperConf, LoopbackTransport, Transport, TransportFactory, render_delta,
};

/// Plugin name as it appears in the registry
pub const PLUGIN_NAME: &str = "qfx_conf";

/// Product patterns claimed by this plugin
pub const PRODUCT_PATTERNS: &[&str] = &["^qfx"];

/// Config subtrees QFX switches do not implement
const UNSUPPORTED_SUBTREES: &[&str] = &["dynamic-tunnels", "services"];

/// Switch scaffolding for leaf pushes: VXLAN encapsulation under EVPN
const LEAF_SCAFFOLDING: &[&str] = &[
    "set protocols evpn encapsulation vxlan",
    "set switch-options vtep-source-interface lo0.0",
];

pub struct QfxConf {
    base: JuniperConf,
    role: DeviceRole,
}

impl QfxConf {
    pub fn new(meta: DeviceMeta, transport: Arc<dyn Transport>) -> Self {
        let role = meta.role;
        Self {
            base: JuniperConf::with_name(PLUGIN_NAME, meta, transport),
            role,
        }
    }

    fn check_supported(&self, delta: &ConfigDelta) -> Result<(), DcmanError> {
        for op in &delta.ops {
            let root = op.path().first().map(String::as_str).unwrap_or_default();
            if UNSUPPORTED_SUBTREES.contains(&root) {
                return Err(DcmanError::UnsupportedOperation {
                    plugin: PLUGIN_NAME.to_string(),
                    operation: format!("{} {}", op_kind(op), op.path().join(" ")),
                });
            }
        }
        Ok(())
    }
}

fn op_kind(op: &ConfigOp) -> &'static str {
    match op {
        ConfigOp::Set { .. } => "set",
        ConfigOp::Delete { .. } => "delete",
    }
}

#[async_trait]
impl DeviceConf for QfxConf {
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
        self.check_supported(delta)?;
        if delta.is_empty() {
            return self.base.commit_lines(&[]).await;
        }
        let mut lines = Vec::new();
        if self.role == DeviceRole::Leaf {
            lines.extend(LEAF_SCAFFOLDING.iter().map(|s| (*s).to_string()));
        }
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
            Ok(Box::new(QfxConf::new(meta.clone(), transport)) as Box<dyn DeviceConf>)
        }),
    )
    .with_products(PRODUCT_PATTERNS)
    .with_roles(&[DeviceRole::Leaf, DeviceRole::Spine])
}

/// Registry descriptor for QFX-family switches
pub fn registration() -> PluginDescriptor {
    registration_with_transport(LoopbackTransport::factory())
}
