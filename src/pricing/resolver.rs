//! Fill unit prices on order lines from the price catalog.

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::catalog::load_catalog_items;
use crate::materials::MaterialLineItem;
use crate::settings::PricingSettings;

use super::matching::{best_match, MatchKey};
use super::types::PriceCatalog;

/// Sample supplier price list, from `config/price_catalog.toml`.
const DEFAULT_PRICES: &str = include_str!("../../config/price_catalog.toml");

/// Resolves line prices against one immutable catalog snapshot.
pub struct PriceResolver<'a> {
    catalog: &'a PriceCatalog,
    keys: Vec<MatchKey>,
    min_score: u8,
}

impl<'a> PriceResolver<'a> {
    pub fn new(catalog: &'a PriceCatalog, settings: &PricingSettings) -> Self {
        let keys = catalog.items.iter().map(MatchKey::for_entry).collect();
        Self {
            catalog,
            keys,
            min_score: settings.min_match_score,
        }
    }

    /// Price every line.
    ///
    /// Lines that already carry a price keep it; only their cost is
    /// recomputed. Others take the best-scoring catalog entry. A line left
    /// without a candidate, or matched only at score 0, is flagged for review.
    pub fn resolve(&self, lines: Vec<MaterialLineItem>) -> Vec<MaterialLineItem> {
        let mut unmatched = 0;
        let resolved: Vec<MaterialLineItem> = lines
            .into_iter()
            .map(|mut line| {
                if line.unit_price != 0.0 {
                    line.set_unit_price(line.unit_price);
                    debug!("{}: keeping fixed price {:.2}", line.item_name, line.unit_price);
                    return line;
                }

                self.resolve_line(&mut line);
                if line.needs_review {
                    unmatched += 1;
                }
                line
            })
            .collect();

        info!(
            "Priced {} material lines, {} need review",
            resolved.len(),
            unmatched
        );
        resolved
    }

    fn resolve_line(&self, line: &mut MaterialLineItem) {
        let key = MatchKey::new(&line.item_name, &line.unit_of_measure, &line.category);

        let accepted = best_match(&key, &self.keys).filter(|m| m.score >= self.min_score);
        match accepted {
            Some(found) => {
                let entry = &self.catalog.items[found.catalog_index];
                line.set_unit_price(entry.price_per_unit);
                line.match_score = Some(found.score);
                line.needs_review = found.score == 0;
                if line.needs_review {
                    warn!(
                        "{}: no real catalog match, took {:?} at score 0",
                        line.item_name, entry.item_name
                    );
                } else {
                    debug!(
                        "{}: matched {:?} (score {}) at {:.2}",
                        line.item_name, entry.item_name, found.score, entry.price_per_unit
                    );
                }
            }
            None => {
                warn!("{}: no catalog price found", line.item_name);
                line.set_unit_price(0.0);
                line.match_score = None;
                line.needs_review = true;
            }
        }
    }
}

/// Load a price catalog from a file (TOML, or JSON from the catalog service).
pub fn load_price_catalog(path: &Path) -> Result<PriceCatalog> {
    Ok(PriceCatalog {
        items: load_catalog_items(path, "items")?,
    })
}

/// Get the sample price catalog embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_price_catalog() -> PriceCatalog {
    toml::from_str(DEFAULT_PRICES).expect("embedded price_catalog.toml must be valid TOML")
}
