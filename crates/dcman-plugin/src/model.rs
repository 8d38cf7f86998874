//! Data model shared between the device manager and the plugins
//!
//! Provides:
//! - `DeviceMeta`: the lookup key the registry resolves plugins against
//! - `ConfigDelta` / `ConfigOp`: ordered configuration change sets
//! - `CommitResult` and `DeviceFacts`

use chrono::{DateTime, Utc};
use dcman_common::{DcmanError, DeviceRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a managed device, as reported by inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Device name, unique across the manager
    pub name: String,
    /// Vendor string, compared case-insensitively
    pub vendor: String,
    /// Product/model string, e.g. "mx480" or "qfx5100-48s"
    pub product: String,
    /// OS version, when inventory knows it
    pub os_version: Option<String>,
    /// Fabric role of the device
    pub role: DeviceRole,
    /// Management address used by the transport
    pub management_ip: String,
}

impl DeviceMeta {
    pub fn new(
        name: impl Into<String>,
        vendor: impl Into<String>,
        product: impl Into<String>,
        role: DeviceRole,
    ) -> Self {
        Self {
            name: name.into(),
            vendor: vendor.into(),
            product: product.into(),
            os_version: None,
            role,
            management_ip: String::new(),
        }
    }

    pub fn with_os_version(mut self, version: impl Into<String>) -> Self {
        self.os_version = Some(version.into());
        self
    }

    pub fn with_management_ip(mut self, ip: impl Into<String>) -> Self {
        self.management_ip = ip.into();
        self
    }

    /// Whether two metas resolve to the same registry claim.
    ///
    /// The manager rebinds a device's plugin when this changes, not on
    /// every inventory refresh.
    pub fn same_claim(&self, other: &DeviceMeta) -> bool {
        dcman_common::normalize_vendor(&self.vendor)
            == dcman_common::normalize_vendor(&other.vendor)
            && dcman_common::normalize_product(&self.product)
                == dcman_common::normalize_product(&other.product)
            && self.role == other.role
    }
}

/// A single configuration operation at a hierarchical path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ConfigOp {
    /// Set a leaf value, e.g. `interfaces/irb/unit 5/family inet` -> address
    Set { path: Vec<String>, value: String },
    /// Delete a subtree
    Delete { path: Vec<String> },
}

impl ConfigOp {
    pub fn path(&self) -> &[String] {
        match self {
            ConfigOp::Set { path, .. } => path,
            ConfigOp::Delete { path } => path,
        }
    }
}

/// Ordered set of configuration operations for one push
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDelta {
    pub ops: Vec<ConfigOp>,
}

impl ConfigDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, path: &[&str], value: impl Into<String>) -> Self {
        self.ops.push(ConfigOp::Set {
            path: path.iter().map(|s| (*s).to_string()).collect(),
            value: value.into(),
        });
        self
    }

    pub fn delete(mut self, path: &[&str]) -> Self {
        self.ops.push(ConfigOp::Delete {
            path: path.iter().map(|s| (*s).to_string()).collect(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Reject malformed operations before they reach a device.
    ///
    /// Deltas arrive over deserialization boundaries too, so plugins call
    /// this at the top of every push rather than trusting the builder.
    pub fn validate(&self) -> Result<(), DcmanError> {
        for op in &self.ops {
            if op.path().is_empty() {
                return Err(DcmanError::IllegalArgument(
                    "config operation with empty path".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Outcome of a committed configuration push
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitResult {
    pub commit_id: Uuid,
    pub committed_at: DateTime<Utc>,
    /// Attempts taken, including the successful one
    pub attempts: u32,
    /// Non-fatal device warnings collected during commit
    pub warnings: Vec<String>,
}

impl CommitResult {
    pub fn new(attempts: u32) -> Self {
        Self {
            commit_id: Uuid::new_v4(),
            committed_at: Utc::now(),
            attempts,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Identity facts collected from a device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFacts {
    pub hostname: String,
    pub model: String,
    pub os_version: String,
    pub serial_number: Option<String>,
}
