//! Plugin registration descriptors
//!
//! A `PluginDescriptor` is a plugin's claim on the registry: which vendor it
//! serves, which products (regex patterns over the normalized product name),
//! which roles, and a factory that binds the plugin to a concrete device.

use std::sync::Arc;

use dcman_common::{DcmanError, DeviceRole, is_valid_identifier};

use crate::DeviceConf;
use crate::model::DeviceMeta;

/// Factory producing a per-device plugin instance
pub type ConfFactory =
    Arc<dyn Fn(&DeviceMeta) -> Result<Box<dyn DeviceConf>, DcmanError> + Send + Sync>;

/// Registration claim of one plugin
#[derive(Clone)]
pub struct PluginDescriptor {
    /// Unique plugin name, e.g. "mx_conf"
    pub name: String,
    /// Vendor served, compared case-insensitively
    pub vendor: String,
    /// Regex patterns over the normalized (lowercase) product name.
    /// A literal pattern (no regex metacharacters) is an exact claim and
    /// outranks pattern matches during resolution.
    pub products: Vec<String>,
    /// Roles served; `None` claims every role
    pub roles: Option<Vec<DeviceRole>>,
    /// Per-device instance factory
    pub factory: ConfFactory,
}

impl PluginDescriptor {
    pub fn new(
        name: impl Into<String>,
        vendor: impl Into<String>,
        factory: ConfFactory,
    ) -> Self {
        Self {
            name: name.into(),
            vendor: vendor.into(),
            products: vec![dcman_common::PRODUCT_ANY.to_string()],
            roles: None,
            factory,
        }
    }

    pub fn with_products(mut self, patterns: &[&str]) -> Self {
        self.products = patterns.iter().map(|p| (*p).to_string()).collect();
        self
    }

    pub fn with_roles(mut self, roles: &[DeviceRole]) -> Self {
        self.roles = Some(roles.to_vec());
        self
    }

    /// Validate the descriptor before it enters the registry.
    ///
    /// Pattern compilation happens again at registration; this check exists
    /// so table construction errors carry the offending plugin's name.
    pub fn validate(&self) -> Result<(), DcmanError> {
        if !is_valid_identifier(&self.name) {
            return Err(DcmanError::IllegalArgument(format!(
                "plugin name '{}' is not a valid identifier",
                self.name
            )));
        }
        if self.vendor.trim().is_empty() {
            return Err(DcmanError::IllegalArgument(format!(
                "plugin '{}' has an empty vendor",
                self.name
            )));
        }
        if self.products.is_empty() {
            return Err(DcmanError::IllegalArgument(format!(
                "plugin '{}' claims no products",
                self.name
            )));
        }
        for pattern in &self.products {
            regex::Regex::new(pattern).map_err(|e| DcmanError::InvalidProductPattern {
                name: self.name.clone(),
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(roles) = &self.roles
            && roles.is_empty()
        {
            return Err(DcmanError::IllegalArgument(format!(
                "plugin '{}' claims an empty role set",
                self.name
            )));
        }
        Ok(())
    }

    /// Whether this descriptor serves the given role
    pub fn serves_role(&self, role: DeviceRole) -> bool {
        match &self.roles {
            None => true,
            Some(roles) => roles.contains(&role),
        }
    }
}

impl std::fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("vendor", &self.vendor)
            .field("products", &self.products)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}
