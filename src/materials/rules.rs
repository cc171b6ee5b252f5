//! Loading for the rule and accessory catalogs.
//!
//! Provides two loading methods for each:
//! - `default_*()` - Loads the catalog embedded at compile time
//! - `load_*(path)` - Loads a catalog file (TOML, or JSON from a catalog service)

use std::path::Path;

use anyhow::Result;
use tracing::warn;

use crate::catalog::load_catalog_items;

use super::accessories::AccessoryCatalog;
use super::formula::QuantityFormula;
use super::types::RuleCatalog;

/// Default rule catalog, from `config/material_rules.toml`.
const DEFAULT_RULES: &str = include_str!("../../config/material_rules.toml");

/// Default accessory catalog, from `config/accessories.toml`.
const DEFAULT_ACCESSORIES: &str = include_str!("../../config/accessories.toml");

/// Load a rule catalog from a file.
///
/// Rules whose formula is not recognized are kept (they size to nothing)
/// but reported here so a bad catalog shows up at load time.
///
/// # Example
/// ```ignore
/// let rules = load_rule_catalog(Path::new("/path/to/material_rules.toml"))?;
/// ```
pub fn load_rule_catalog(path: &Path) -> Result<RuleCatalog> {
    let catalog = RuleCatalog {
        rules: load_catalog_items(path, "rules")?,
    };
    for rule in &catalog.rules {
        if let QuantityFormula::Unrecognized(text) = &rule.quantity_formula {
            warn!("{}: rule {} has unrecognized formula {:?}", path.display(), rule.id, text);
        }
    }
    Ok(catalog)
}

/// Get the rule catalog embedded in the binary.
///
/// Covers shingles, hip and ridge, ridge vent, underlayment, starter, drip
/// edge, ice and water shield, nails, caulk and the two low-slope rolls.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_rule_catalog() -> RuleCatalog {
    toml::from_str(DEFAULT_RULES).expect("embedded material_rules.toml must be valid TOML")
}

/// Load an accessory catalog from a file.
pub fn load_accessory_catalog(path: &Path) -> Result<AccessoryCatalog> {
    Ok(AccessoryCatalog {
        accessories: load_catalog_items(path, "accessories")?,
    })
}

/// Get the accessory catalog embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_accessory_catalog() -> AccessoryCatalog {
    toml::from_str(DEFAULT_ACCESSORIES).expect("embedded accessories.toml must be valid TOML")
}
