//! Built-in plugin registration
//!
//! Every built-in plugin appears once in `BUILTIN_PLUGINS`; registration
//! walks the table in order and aborts on the first failure, which the
//! caller treats as fatal at startup. Adding a plugin means adding one
//! table entry; the table is the single place the built-in set is defined.

use dcman_common::DcmanError;
use dcman_plugin::{PluginDescriptor, PluginRegistry};

/// One table entry: plugin name and its registration function
pub type BuiltinEntry = (&'static str, fn() -> PluginDescriptor);

/// Built-in plugins, registered in order.
///
/// The juniper baseline goes first; the family plugins outrank it through
/// narrower product claims, not registration order.
pub const BUILTIN_PLUGINS: &[BuiltinEntry] = &[
    ("juniper_conf", dcman_plugin_juniper::registration),
    ("mx_conf", dcman_plugin_mx::registration),
    ("qfx_conf", dcman_plugin_qfx::registration),
];

/// Register a table of plugins, failing fast on the first bad entry.
///
/// Entries registered before a failure stay registered; nothing is promised
/// about them once the error propagates.
pub fn register_table(
    registry: &PluginRegistry,
    table: &[BuiltinEntry],
) -> Result<(), DcmanError> {
    for (name, registration) in table {
        let descriptor = registration();
        if descriptor.name != *name {
            return Err(DcmanError::InternalError(format!(
                "plugin table entry '{}' produced descriptor named '{}'",
                name, descriptor.name
            )));
        }
        registry.register(descriptor)?;
    }
    Ok(())
}

/// Register every built-in plugin into the given registry.
///
/// Called once at startup, before any plugin lookup. Any failure here is
/// fatal: there is no retry and no partial-success contract.
pub fn register_builtin_plugins(registry: &PluginRegistry) -> Result<(), DcmanError> {
    register_table(registry, BUILTIN_PLUGINS)?;
    tracing::info!(plugins = ?registry.list(), "built-in plugins registered");
    Ok(())
}

/// Convenience constructor: a fresh registry with the built-in set loaded
pub fn registry_with_builtins() -> Result<PluginRegistry, DcmanError> {
    let registry = PluginRegistry::new();
    register_builtin_plugins(&registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dcman_common::DeviceRole;
    use dcman_plugin::DeviceMeta;

    use super::*;

    #[test]
    fn test_builtin_registration_succeeds_once() {
        let registry = PluginRegistry::new();
        register_builtin_plugins(&registry).unwrap();
        assert_eq!(registry.len(), BUILTIN_PLUGINS.len());
    }

    #[test]
    fn test_all_builtins_resolvable_after_registration() {
        let registry = registry_with_builtins().unwrap();

        let cases = [
            ("mx480", DeviceRole::Gateway, "mx_conf"),
            ("vmx", DeviceRole::Spine, "mx_conf"),
            ("qfx5100-48s", DeviceRole::Leaf, "qfx_conf"),
            ("qfx10002", DeviceRole::Spine, "qfx_conf"),
            // anything else Juniper falls back to the baseline
            ("ex4300", DeviceRole::Leaf, "juniper_conf"),
            // role outside a family claim falls back too
            ("mx480", DeviceRole::Leaf, "juniper_conf"),
        ];
        for (product, role, expected) in cases {
            let meta = DeviceMeta::new("dev", "juniper", product, role);
            let resolved = registry.resolve(&meta).unwrap();
            assert_eq!(resolved.descriptor.name, expected, "product {product}");
        }
    }

    #[test]
    fn test_second_registration_into_same_registry_fails() {
        let registry = registry_with_builtins().unwrap();
        let err = register_builtin_plugins(&registry).unwrap_err();
        assert!(matches!(err, DcmanError::DuplicatePlugin(_)));
    }

    #[test]
    fn test_bad_table_entry_fails_fast() {
        fn broken() -> dcman_plugin::PluginDescriptor {
            dcman_plugin::PluginDescriptor::new(
                "broken_conf",
                "juniper",
                Arc::new(|_| Err(DcmanError::InternalError("unused".to_string()))),
            )
            .with_products(&["^qfx("])
        }

        let table: &[BuiltinEntry] = &[
            ("juniper_conf", dcman_plugin_juniper::registration),
            ("broken_conf", broken),
            ("mx_conf", dcman_plugin_mx::registration),
        ];

        let registry = PluginRegistry::new();
        let err = register_table(&registry, table).unwrap_err();
        assert!(matches!(err, DcmanError::InvalidProductPattern { .. }));
        // entries before the failure stay; the one after was never reached
        assert_eq!(registry.list(), vec!["juniper_conf"]);
    }

    #[test]
    fn test_table_entry_name_mismatch_detected() {
        let table: &[BuiltinEntry] = &[("qfx_conf", dcman_plugin_mx::registration)];
        let registry = PluginRegistry::new();
        let err = register_table(&registry, table).unwrap_err();
        assert!(matches!(err, DcmanError::InternalError(_)));
    }
}
