//! Utility functions for dcman
//!
//! Small helpers shared across the plugin SPI and vendor plugins.

use std::sync::LazyLock;

/// Regex pattern for validating identifiers (plugin names, device names)
static VALID_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("^[a-zA-Z0-9_.:-]+$").expect("Invalid regex pattern"));

/// Validate an identifier contains only allowed characters
///
/// Allowed characters: alphanumeric, underscore, dot, colon, hyphen.
/// Empty strings are rejected.
///
/// # Examples
///
/// ```
/// use dcman_common::is_valid_identifier;
///
/// assert!(is_valid_identifier("qfx-5100"));
/// assert!(is_valid_identifier("mx_conf"));
/// assert!(!is_valid_identifier("with spaces"));
/// assert!(!is_valid_identifier(""));
/// ```
pub fn is_valid_identifier(s: &str) -> bool {
    VALID_PATTERN.is_match(s)
}

/// Normalize a vendor name for registry keys.
///
/// Vendors compare case-insensitively; "Juniper" and "juniper" are the
/// same registry bucket.
pub fn normalize_vendor(vendor: &str) -> String {
    vendor.trim().to_ascii_lowercase()
}

/// Normalize a product name for matching.
///
/// Products from inventory sources come with mixed casing and surrounding
/// whitespace ("QFX5100-48S "); matching happens on the lowercase form.
pub fn normalize_product(product: &str) -> String {
    product.trim().to_ascii_lowercase()
}
