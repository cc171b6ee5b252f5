//! Type definitions for the price catalog.

use serde::{Deserialize, Serialize};

/// Root of price_catalog.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceCatalog {
    #[serde(default)]
    pub items: Vec<PriceCatalogEntry>,
}

/// One supplier price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCatalogEntry {
    #[serde(alias = "itemName")]
    pub item_name: String,
    #[serde(alias = "pricePerUnit")]
    pub price_per_unit: f64,
    #[serde(default, alias = "unitOfMeasure")]
    pub unit_of_measure: String,
    #[serde(default)]
    pub category: String,
}

/// The catalog entry chosen for a line and how well it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceMatch {
    pub catalog_index: usize,
    /// 3 exact name, 2 same category and unit, 1 name containment, 0 none
    pub score: u8,
}
