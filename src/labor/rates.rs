//! Labor rate lookup with built-in fallbacks.
//!
//! Rate sheets may leave out conditions; any missing condition is priced
//! from `fallback_rate` so the charge still appears on the estimate.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};

use crate::catalog::load_catalog_items;

use super::types::{Billing, LaborCondition, LaborRateCatalog, LaborRateEntry};

/// Default labor rate sheet, from `config/labor_rates.toml`.
const DEFAULT_LABOR_RATES: &str = include_str!("../../config/labor_rates.toml");

/// Rate used when the sheet has nothing for a condition. Per square,
/// per linear foot or flat according to the condition's billing.
pub fn fallback_rate(condition: LaborCondition) -> f64 {
    match condition {
        LaborCondition::StandardInstall => 95.0,
        LaborCondition::SecondStory => 10.0,
        LaborCondition::ThirdStory => 20.0,
        LaborCondition::Pitch8 => 10.0,
        LaborCondition::Pitch9 => 15.0,
        LaborCondition::Pitch10 => 20.0,
        LaborCondition::Pitch11 => 25.0,
        LaborCondition::Pitch12Plus => 35.0,
        LaborCondition::NoTrailerAccess => 10.0,
        LaborCondition::SecondLayerRemoval => 15.0,
        LaborCondition::RidgeVentInstall => 3.0,
        LaborCondition::HandLoad => 8.0,
        LaborCondition::DisposalBase => 450.0,
        LaborCondition::DisposalExcessWeight => 150.0,
    }
}

pub fn fallback_description(condition: LaborCondition) -> &'static str {
    match condition {
        LaborCondition::StandardInstall => "Standard shingle tear-off and install",
        LaborCondition::SecondStory => "Second story upcharge",
        LaborCondition::ThirdStory => "Third story upcharge",
        LaborCondition::Pitch8 => "8/12 pitch upcharge",
        LaborCondition::Pitch9 => "9/12 pitch upcharge",
        LaborCondition::Pitch10 => "10/12 pitch upcharge",
        LaborCondition::Pitch11 => "11/12 pitch upcharge",
        LaborCondition::Pitch12Plus => "12/12 and steeper pitch upcharge",
        LaborCondition::NoTrailerAccess => "No trailer access upcharge",
        LaborCondition::SecondLayerRemoval => "Second layer removal",
        LaborCondition::RidgeVentInstall => "Ridge vent install",
        LaborCondition::HandLoad => "Hand load materials",
        LaborCondition::DisposalBase => "Disposal fee",
        LaborCondition::DisposalExcessWeight => "Disposal excess weight fee",
    }
}

/// Rate and description resolved for one condition.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRate {
    pub description: String,
    pub rate: f64,
    pub from_catalog: bool,
}

/// Condition-keyed view over a rate sheet. The first row for a condition wins.
#[derive(Debug, Clone, Default)]
pub struct RateTable<'a> {
    entries: BTreeMap<LaborCondition, &'a LaborRateEntry>,
}

impl<'a> RateTable<'a> {
    pub fn new(catalog: &'a LaborRateCatalog) -> Self {
        let mut entries = BTreeMap::new();
        for entry in &catalog.rates {
            match entry.condition_type.parse::<LaborCondition>() {
                Ok(condition) => {
                    if entries.contains_key(&condition) {
                        debug!("Duplicate rate row for {}, keeping the first", condition);
                    } else {
                        entries.insert(condition, entry);
                    }
                }
                Err(_) => warn!(
                    "Labor rate {:?} has unknown condition type {:?}, ignoring",
                    entry.id, entry.condition_type
                ),
            }
        }
        Self { entries }
    }

    /// Rate for a condition, read from the column its billing uses.
    /// Flat charges take `flat_rate`, else `rate_per_square`.
    pub fn rate_for(&self, condition: LaborCondition) -> ResolvedRate {
        let entry = self.entries.get(&condition);

        let rate = entry.and_then(|e| match condition.billing() {
            Billing::PerSquare => e.rate_per_square,
            Billing::PerLinearFoot => e.rate_per_linear_foot,
            Billing::Flat => e.flat_rate.or(e.rate_per_square),
        });
        let rate = rate.filter(|r| r.is_finite() && *r >= 0.0);

        let description = entry
            .map(|e| e.description.trim())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| fallback_description(condition))
            .to_string();

        match rate {
            Some(rate) => ResolvedRate {
                description,
                rate,
                from_catalog: true,
            },
            None => {
                debug!("No usable rate for {}, using fallback", condition);
                ResolvedRate {
                    description,
                    rate: fallback_rate(condition),
                    from_catalog: false,
                }
            }
        }
    }
}

/// Load a labor rate sheet from a file (TOML, or JSON from the rate service).
pub fn load_labor_rates(path: &Path) -> Result<LaborRateCatalog> {
    Ok(LaborRateCatalog {
        rates: load_catalog_items(path, "rates")?,
    })
}

/// Get the labor rate sheet embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_labor_rates() -> LaborRateCatalog {
    toml::from_str(DEFAULT_LABOR_RATES).expect("embedded labor_rates.toml must be valid TOML")
}
