//! Dcman Common - Shared types and utilities
//!
//! This crate provides the foundational types used across all dcman components:
//! - Error types
//! - Device role and vendor constants
//! - Identifier validation helpers

pub mod error;
pub mod utils;

// Re-exports for convenience
pub use error::DcmanError;
pub use utils::{is_valid_identifier, normalize_product, normalize_vendor};

/// Vendor name of the built-in baseline plugins
pub const VENDOR_JUNIPER: &str = "juniper";

/// Pattern claiming every product of a vendor (registry fallback tier)
pub const PRODUCT_ANY: &str = ".*";

/// Roles a managed device can take in the fabric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceRole {
    Leaf,
    Spine,
    Gateway,
    Pnf,
}

impl DeviceRole {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceRole::Leaf => "leaf",
            DeviceRole::Spine => "spine",
            DeviceRole::Gateway => "gateway",
            DeviceRole::Pnf => "pnf",
        }
    }
}

impl std::fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeviceRole {
    type Err = DcmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "leaf" => Ok(DeviceRole::Leaf),
            "spine" => Ok(DeviceRole::Spine),
            "gateway" => Ok(DeviceRole::Gateway),
            "pnf" => Ok(DeviceRole::Pnf),
            other => Err(DcmanError::IllegalArgument(format!(
                "unknown device role '{other}'"
            ))),
        }
    }
}
