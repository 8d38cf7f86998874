//! Error types for dcman
//!
//! A single application-level error enum shared by the plugin SPI, the
//! vendor plugins, and the device manager. Registration and resolution
//! failures are startup-fatal for the caller; transport and commit failures
//! surface per-operation.

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum DcmanError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("plugin '{0}' already registered")]
    DuplicatePlugin(String),

    #[error("plugin '{name}' has invalid product pattern '{pattern}': {reason}")]
    InvalidProductPattern {
        name: String,
        pattern: String,
        reason: String,
    },

    #[error(
        "plugin '{plugin}' claims product '{product}' for vendor '{vendor}', already claimed by '{other}'"
    )]
    OverlappingExactClaim {
        plugin: String,
        other: String,
        vendor: String,
        product: String,
    },

    #[error("no plugin registered for vendor '{vendor}' product '{product}' role '{role}'")]
    PluginNotFound {
        vendor: String,
        product: String,
        role: String,
    },

    #[error("device '{0}' not managed")]
    DeviceNotFound(String),

    #[error("device '{0}' already managed")]
    DeviceAlreadyManaged(String),

    #[error("plugin '{plugin}' failed to initialize: {reason}")]
    PluginInit { plugin: String, reason: String },

    #[error("transport error: {0}")]
    TransportError(String),

    #[error("commit failed after {attempts} attempt(s): {reason}")]
    CommitError { attempts: u32, reason: String },

    #[error("operation not supported by '{plugin}': {operation}")]
    UnsupportedOperation { plugin: String, operation: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl DcmanError {
    /// Whether the caller should treat this error as fatal at startup.
    ///
    /// Registration-time failures abort startup; everything else is
    /// scoped to a single device or operation.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            DcmanError::DuplicatePlugin(_)
                | DcmanError::InvalidProductPattern { .. }
                | DcmanError::OverlappingExactClaim { .. }
                | DcmanError::ConfigError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_fatal_classification() {
        assert!(DcmanError::DuplicatePlugin("mx".into()).is_startup_fatal());
        assert!(
            DcmanError::InvalidProductPattern {
                name: "qfx".into(),
                pattern: "(".into(),
                reason: "unclosed group".into(),
            }
            .is_startup_fatal()
        );
        assert!(
            DcmanError::OverlappingExactClaim {
                plugin: "b_conf".into(),
                other: "a_conf".into(),
                vendor: "juniper".into(),
                product: "mx480".into(),
            }
            .is_startup_fatal()
        );
        assert!(!DcmanError::TransportError("timeout".into()).is_startup_fatal());
    }

    #[test]
    fn test_plugin_not_found_message() {
        let err = DcmanError::PluginNotFound {
            vendor: "cisco".into(),
            product: "nexus".into(),
            role: "leaf".into(),
        };
        assert_eq!(
            err.to_string(),
            "no plugin registered for vendor 'cisco' product 'nexus' role 'leaf'"
        );
    }
}
