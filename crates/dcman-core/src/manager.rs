//! Device manager: plugin binding and configuration dispatch
//!
//! The manager owns the registry and a table of managed devices. Adding a
//! device resolves its best plugin claim and binds an initialized plugin
//! instance; pushes dispatch to that binding. A device whose vendor,
//! product, or role changes gets rebound on update.

use std::sync::Arc;

use dashmap::DashMap;
use dcman_common::DcmanError;
use dcman_plugin::{
    CommitResult, ConfigDelta, DeviceConf, DeviceFacts, DeviceMeta, PluginRegistry,
};

struct DeviceBinding {
    meta: DeviceMeta,
    plugin_name: String,
    conf: Arc<dyn DeviceConf>,
}

pub struct DeviceManager {
    registry: Arc<PluginRegistry>,
    devices: DashMap<String, DeviceBinding>,
}

impl DeviceManager {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            registry,
            devices: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    fn bind(&self, meta: &DeviceMeta) -> Result<DeviceBinding, DcmanError> {
        let resolved = self
            .registry
            .resolve(meta)
            .ok_or_else(|| DcmanError::PluginNotFound {
                vendor: meta.vendor.clone(),
                product: meta.product.clone(),
                role: meta.role.to_string(),
            })?;
        let conf: Arc<dyn DeviceConf> = Arc::from(resolved.instantiate(meta)?);
        Ok(DeviceBinding {
            meta: meta.clone(),
            plugin_name: resolved.descriptor.name.clone(),
            conf,
        })
    }

    /// Start managing a device: resolve, instantiate and initialize its plugin
    pub async fn add_device(&self, meta: DeviceMeta) -> Result<(), DcmanError> {
        if self.devices.contains_key(&meta.name) {
            return Err(DcmanError::DeviceAlreadyManaged(meta.name));
        }
        let binding = self.bind(&meta)?;
        binding
            .conf
            .initialize()
            .await
            .map_err(|e| DcmanError::PluginInit {
                plugin: binding.plugin_name.clone(),
                reason: e.to_string(),
            })?;
        tracing::info!(
            device = %meta.name,
            plugin = %binding.plugin_name,
            product = %meta.product,
            role = %meta.role,
            "device bound"
        );
        self.devices.insert(meta.name.clone(), binding);
        Ok(())
    }

    /// Apply an inventory update.
    ///
    /// A change to the device's vendor/product/role claim rebinds the
    /// device; other metadata changes are absorbed in place. The
    /// replacement binding is resolved and initialized before the old one
    /// is torn down, so a failed rebind leaves the device on its current
    /// plugin.
    pub async fn update_device(&self, meta: DeviceMeta) -> Result<(), DcmanError> {
        let needs_rebind = {
            let current = self
                .devices
                .get(&meta.name)
                .ok_or_else(|| DcmanError::DeviceNotFound(meta.name.clone()))?;
            !current.meta.same_claim(&meta)
        };

        if !needs_rebind {
            if let Some(mut entry) = self.devices.get_mut(&meta.name) {
                entry.meta = meta;
            }
            return Ok(());
        }

        let name = meta.name.clone();
        let binding = self.bind(&meta)?;
        binding
            .conf
            .initialize()
            .await
            .map_err(|e| DcmanError::PluginInit {
                plugin: binding.plugin_name.clone(),
                reason: e.to_string(),
            })?;
        let new_plugin = binding.plugin_name.clone();

        let old = self.devices.insert(name.clone(), binding);
        if let Some(old) = old {
            tracing::info!(
                device = %name,
                old_plugin = %old.plugin_name,
                new_plugin = %new_plugin,
                "device claim changed, rebound"
            );
            if let Err(e) = old.conf.shutdown().await {
                tracing::warn!(device = %name, error = %e, "old binding shutdown failed");
            }
        }
        Ok(())
    }

    /// Stop managing a device and shut its binding down
    pub async fn remove_device(&self, name: &str) -> Result<(), DcmanError> {
        let (_, binding) = self
            .devices
            .remove(name)
            .ok_or_else(|| DcmanError::DeviceNotFound(name.to_string()))?;
        binding.conf.shutdown().await?;
        tracing::info!(device = %name, "device unbound");
        Ok(())
    }

    /// Push a configuration delta to a managed device
    pub async fn push(&self, name: &str, delta: &ConfigDelta) -> Result<CommitResult, DcmanError> {
        let conf = self.conf_for(name)?;
        conf.push_config(delta).await
    }

    /// Collect identity facts from a managed device
    pub async fn facts(&self, name: &str) -> Result<DeviceFacts, DcmanError> {
        let conf = self.conf_for(name)?;
        conf.fetch_facts().await
    }

    /// Name of the plugin bound to a device
    pub fn plugin_for(&self, name: &str) -> Option<String> {
        self.devices.get(name).map(|b| b.plugin_name.clone())
    }

    /// Names of all managed devices, sorted
    pub fn devices(&self) -> Vec<String> {
        let mut names: Vec<String> = self.devices.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    // Clone the Arc out of the map so no guard is held across awaits
    fn conf_for(&self, name: &str) -> Result<Arc<dyn DeviceConf>, DcmanError> {
        self.devices
            .get(name)
            .map(|b| b.conf.clone())
            .ok_or_else(|| DcmanError::DeviceNotFound(name.to_string()))
    }
}
