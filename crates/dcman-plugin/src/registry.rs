//! Central plugin registry with best-match resolution
//!
//! Plugins register a descriptor per vendor; lookups resolve the most
//! specific claim for a device: an exact product claim beats a product
//! pattern, which beats a vendor-wide wildcard. Role filtering applies at
//! every tier.

use dashmap::DashMap;
use dcman_common::{DcmanError, normalize_product, normalize_vendor};
use regex::Regex;

use crate::DeviceConf;
use crate::descriptor::PluginDescriptor;
use crate::model::DeviceMeta;

/// Specificity tier of a product claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    /// `.*`, the vendor-wide fallback
    Wildcard,
    /// Non-trivial regex, e.g. `^qfx`
    Pattern,
    /// Literal product name, e.g. `mx480`
    Exact,
}

struct ProductMatcher {
    regex: Regex,
    tier: MatchTier,
    literal: String,
}

/// A pattern made of plain product-name characters is an exact claim
fn is_literal(pattern: &str) -> bool {
    !pattern.is_empty()
        && pattern
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl ProductMatcher {
    fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let tier = if pattern == dcman_common::PRODUCT_ANY {
            MatchTier::Wildcard
        } else if is_literal(pattern) {
            MatchTier::Exact
        } else {
            MatchTier::Pattern
        };
        Ok(Self {
            regex: Regex::new(pattern)?,
            tier,
            literal: pattern.to_string(),
        })
    }

    fn matches(&self, product: &str) -> Option<MatchTier> {
        match self.tier {
            MatchTier::Exact => (self.literal == product).then_some(MatchTier::Exact),
            _ => self.regex.is_match(product).then_some(self.tier),
        }
    }
}

struct RegisteredPlugin {
    descriptor: PluginDescriptor,
    matchers: Vec<ProductMatcher>,
}

/// A resolved registry entry, ready to instantiate
#[derive(Clone)]
pub struct ResolvedPlugin {
    pub descriptor: PluginDescriptor,
    pub tier: MatchTier,
}

impl ResolvedPlugin {
    /// Bind the plugin to a concrete device
    pub fn instantiate(&self, meta: &DeviceMeta) -> Result<Box<dyn DeviceConf>, DcmanError> {
        (self.descriptor.factory)(meta)
    }
}

/// Vendor-keyed plugin registry
pub struct PluginRegistry {
    plugins: DashMap<String, Vec<RegisteredPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: DashMap::new(),
        }
    }

    /// Register a plugin descriptor.
    ///
    /// Fails on invalid descriptors, duplicate plugin names, and exact
    /// product claims another plugin of the same vendor already holds; the
    /// caller treats all of these as fatal at startup.
    pub fn register(&self, descriptor: PluginDescriptor) -> Result<(), DcmanError> {
        descriptor.validate()?;

        if self.get(&descriptor.name).is_some() {
            return Err(DcmanError::DuplicatePlugin(descriptor.name.clone()));
        }

        let mut matchers = Vec::with_capacity(descriptor.products.len());
        for pattern in &descriptor.products {
            // validate() already compiled these; keep the error path anyway
            let matcher =
                ProductMatcher::compile(pattern).map_err(|e| DcmanError::InvalidProductPattern {
                    name: descriptor.name.clone(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
            matchers.push(matcher);
        }

        let vendor = normalize_vendor(&descriptor.vendor);

        // An exact literal may only be claimed once per vendor; pattern
        // overlap is legitimate (families shadow the baseline) and resolves
        // through tiering instead.
        if let Some(bucket) = self.plugins.get(&vendor) {
            for matcher in matchers.iter().filter(|m| m.tier == MatchTier::Exact) {
                for registered in bucket.iter() {
                    let taken = registered
                        .matchers
                        .iter()
                        .any(|m| m.tier == MatchTier::Exact && m.literal == matcher.literal);
                    if taken {
                        return Err(DcmanError::OverlappingExactClaim {
                            plugin: descriptor.name.clone(),
                            other: registered.descriptor.name.clone(),
                            vendor,
                            product: matcher.literal.clone(),
                        });
                    }
                }
            }
        }
        tracing::info!(
            plugin = %descriptor.name,
            vendor = %vendor,
            products = ?descriptor.products,
            "plugin registered"
        );
        self.plugins.entry(vendor).or_default().push(RegisteredPlugin {
            descriptor,
            matchers,
        });
        Ok(())
    }

    /// Resolve the most specific plugin claim for a device.
    ///
    /// Ties within a tier go to the earliest registration; `None` means no
    /// plugin serves this vendor/product/role combination.
    pub fn resolve(&self, meta: &DeviceMeta) -> Option<ResolvedPlugin> {
        let vendor = normalize_vendor(&meta.vendor);
        let product = normalize_product(&meta.product);
        let bucket = self.plugins.get(&vendor)?;

        let mut best: Option<ResolvedPlugin> = None;
        for entry in bucket.iter() {
            if !entry.descriptor.serves_role(meta.role) {
                continue;
            }
            let Some(tier) = entry
                .matchers
                .iter()
                .filter_map(|m| m.matches(&product))
                .max()
            else {
                continue;
            };

            match &best {
                Some(current) if tier <= current.tier => {
                    if tier == current.tier {
                        tracing::debug!(
                            device = %meta.name,
                            kept = %current.descriptor.name,
                            ignored = %entry.descriptor.name,
                            "ambiguous plugin claim, keeping earliest registration"
                        );
                    }
                }
                _ => {
                    best = Some(ResolvedPlugin {
                        descriptor: entry.descriptor.clone(),
                        tier,
                    });
                }
            }
        }
        best
    }

    /// Get a registered descriptor by plugin name
    pub fn get(&self, name: &str) -> Option<PluginDescriptor> {
        self.plugins.iter().find_map(|bucket| {
            bucket
                .value()
                .iter()
                .find(|p| p.descriptor.name == name)
                .map(|p| p.descriptor.clone())
        })
    }

    /// List all registered plugin names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .plugins
            .iter()
            .flat_map(|bucket| {
                bucket
                    .value()
                    .iter()
                    .map(|p| p.descriptor.name.clone())
                    .collect::<Vec<_>>()
            })
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.plugins.iter().map(|bucket| bucket.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dcman_common::DeviceRole;

    use super::*;
    use crate::descriptor::ConfFactory;

    fn noop_factory() -> ConfFactory {
        Arc::new(|_meta| Err(DcmanError::InternalError("noop".to_string())))
    }

    fn registry_with_tiers() -> PluginRegistry {
        let registry = PluginRegistry::new();
        registry
            .register(PluginDescriptor::new(
                "juniper_conf",
                "juniper",
                noop_factory(),
            ))
            .unwrap();
        registry
            .register(
                PluginDescriptor::new("qfx_conf", "juniper", noop_factory())
                    .with_products(&["^qfx"])
                    .with_roles(&[DeviceRole::Leaf, DeviceRole::Spine]),
            )
            .unwrap();
        registry
            .register(
                PluginDescriptor::new("qfx5100_conf", "juniper", noop_factory())
                    .with_products(&["qfx5100-48s"])
                    .with_roles(&[DeviceRole::Leaf]),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_exact_beats_pattern_beats_wildcard() {
        let registry = registry_with_tiers();

        let meta = DeviceMeta::new("d1", "juniper", "QFX5100-48S", DeviceRole::Leaf);
        let resolved = registry.resolve(&meta).unwrap();
        assert_eq!(resolved.descriptor.name, "qfx5100_conf");
        assert_eq!(resolved.tier, MatchTier::Exact);

        let meta = DeviceMeta::new("d2", "juniper", "qfx10002", DeviceRole::Spine);
        let resolved = registry.resolve(&meta).unwrap();
        assert_eq!(resolved.descriptor.name, "qfx_conf");
        assert_eq!(resolved.tier, MatchTier::Pattern);

        let meta = DeviceMeta::new("d3", "juniper", "srx340", DeviceRole::Gateway);
        let resolved = registry.resolve(&meta).unwrap();
        assert_eq!(resolved.descriptor.name, "juniper_conf");
        assert_eq!(resolved.tier, MatchTier::Wildcard);
    }

    #[test]
    fn test_role_filter_applies_before_tiering() {
        let registry = registry_with_tiers();

        // qfx5100_conf only serves leafs; a spine falls back to qfx_conf
        let meta = DeviceMeta::new("d1", "juniper", "qfx5100-48s", DeviceRole::Spine);
        let resolved = registry.resolve(&meta).unwrap();
        assert_eq!(resolved.descriptor.name, "qfx_conf");
    }

    #[test]
    fn test_unknown_vendor_resolves_to_none() {
        let registry = registry_with_tiers();
        let meta = DeviceMeta::new("d1", "cisco", "nexus-9000", DeviceRole::Leaf);
        assert!(registry.resolve(&meta).is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let registry = registry_with_tiers();
        let err = registry
            .register(PluginDescriptor::new(
                "qfx_conf",
                "juniper",
                noop_factory(),
            ))
            .unwrap_err();
        assert!(matches!(err, DcmanError::DuplicatePlugin(name) if name == "qfx_conf"));
        // registry unchanged
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_overlapping_exact_claim_rejected() {
        let registry = registry_with_tiers();
        // qfx5100-48s is already claimed exactly by qfx5100_conf
        let err = registry
            .register(
                PluginDescriptor::new("other_conf", "juniper", noop_factory())
                    .with_products(&["qfx5100-48s"]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DcmanError::OverlappingExactClaim { ref plugin, ref other, .. }
                if plugin == "other_conf" && other == "qfx5100_conf"
        ));
        assert_eq!(registry.len(), 3);

        // the same literal under another vendor is a fresh claim
        registry
            .register(
                PluginDescriptor::new("other_conf", "cisco", noop_factory())
                    .with_products(&["qfx5100-48s"]),
            )
            .unwrap();

        // pattern overlap stays legal: families shadow the baseline by tier
        registry
            .register(
                PluginDescriptor::new("qfx_big_conf", "juniper", noop_factory())
                    .with_products(&["^qfx10"]),
            )
            .unwrap();
    }

    #[test]
    fn test_list_is_sorted() {
        let registry = registry_with_tiers();
        assert_eq!(
            registry.list(),
            vec!["juniper_conf", "qfx5100_conf", "qfx_conf"]
        );
    }
}
