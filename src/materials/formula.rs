//! Closed set of quantity formulas a material order rule can name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::measurement::RoofMeasurementSet;

/// How a rule turns roof measurements into an order quantity.
///
/// Catalogs spell these as text; parsing accepts the kebab identifiers
/// ("bundles-per-square") as well as the legacy expression spellings
/// ("roof_area_sq * 3"). Text that matches neither is kept as
/// `Unrecognized` and produces no order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuantityFormula {
    /// ceil(effective squares * 3)
    BundlesPerSquare,
    /// ceil((hips + ridges) / 30)
    HipRidgePer30Ft,
    /// ceil(ridges / 4), only when the job wants ridge vent
    RidgeVentPer4Ft,
    /// ceil(effective squares / 10)
    UnderlaymentPer10Sq,
    /// ceil((eaves + rakes) / 100)
    StarterPer100Ft,
    /// ceil((eaves + rakes) / 10 + 5)
    DripEdgePer10Ft,
    /// ceil(valleys / 66)
    IceWaterPer66Ft,
    /// ceil(effective squares / 15)
    ConsumablesPer15Sq,
    /// ceil(low-slope squares)
    LowPitchAreaDirect,
    /// ceil(low-slope squares / 2)
    LowPitchAreaHalf,
    /// A one-off quantity, always ordered
    Fixed(u32),
    Unrecognized(String),
}

/// Spare drip edge pieces added on top of the run length.
const DRIP_EDGE_SPARE_PIECES: f64 = 5.0;

impl QuantityFormula {
    /// Parse catalog text into a formula.
    pub fn parse(text: &str) -> QuantityFormula {
        let compact: String = text
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        // Legacy expression spellings
        let legacy = match compact.as_str() {
            "roof_area_sq*3" => Some(QuantityFormula::BundlesPerSquare),
            "(hips+ridges)/30" | "(ridges+hips)/30" => Some(QuantityFormula::HipRidgePer30Ft),
            "ridges/4" => Some(QuantityFormula::RidgeVentPer4Ft),
            "roof_area_sq/10" => Some(QuantityFormula::UnderlaymentPer10Sq),
            "(eaves+rakes)/100" => Some(QuantityFormula::StarterPer100Ft),
            "(eaves+rakes)/10+5" => Some(QuantityFormula::DripEdgePer10Ft),
            "valleys/66" => Some(QuantityFormula::IceWaterPer66Ft),
            "roof_area_sq/15" => Some(QuantityFormula::ConsumablesPer15Sq),
            "low_pitch_area" => Some(QuantityFormula::LowPitchAreaDirect),
            "low_pitch_area/2" => Some(QuantityFormula::LowPitchAreaHalf),
            _ => None,
        };
        if let Some(formula) = legacy {
            return formula;
        }

        let kebab = compact.replace('_', "-");
        match kebab.as_str() {
            "bundles-per-square" => QuantityFormula::BundlesPerSquare,
            "hip-ridge-per-30ft" => QuantityFormula::HipRidgePer30Ft,
            "ridge-vent-per-4ft" => QuantityFormula::RidgeVentPer4Ft,
            "underlayment-per-10sq" => QuantityFormula::UnderlaymentPer10Sq,
            "starter-per-100ft" => QuantityFormula::StarterPer100Ft,
            "drip-edge-per-10ft" => QuantityFormula::DripEdgePer10Ft,
            "ice-water-per-66ft" => QuantityFormula::IceWaterPer66Ft,
            "consumables-per-15sq" => QuantityFormula::ConsumablesPer15Sq,
            "low-pitch-area-direct" => QuantityFormula::LowPitchAreaDirect,
            "low-pitch-area-half" => QuantityFormula::LowPitchAreaHalf,
            _ => {
                let fixed = kebab.strip_prefix("fixed:").unwrap_or(&kebab);
                match fixed.parse::<u32>() {
                    Ok(quantity) => QuantityFormula::Fixed(quantity),
                    Err(_) => QuantityFormula::Unrecognized(text.trim().to_string()),
                }
            }
        }
    }

    /// Canonical identifier, as written back to catalogs.
    pub fn identifier(&self) -> String {
        match self {
            QuantityFormula::BundlesPerSquare => "bundles-per-square".to_string(),
            QuantityFormula::HipRidgePer30Ft => "hip-ridge-per-30ft".to_string(),
            QuantityFormula::RidgeVentPer4Ft => "ridge-vent-per-4ft".to_string(),
            QuantityFormula::UnderlaymentPer10Sq => "underlayment-per-10sq".to_string(),
            QuantityFormula::StarterPer100Ft => "starter-per-100ft".to_string(),
            QuantityFormula::DripEdgePer10Ft => "drip-edge-per-10ft".to_string(),
            QuantityFormula::IceWaterPer66Ft => "ice-water-per-66ft".to_string(),
            QuantityFormula::ConsumablesPer15Sq => "consumables-per-15sq".to_string(),
            QuantityFormula::LowPitchAreaDirect => "low-pitch-area-direct".to_string(),
            QuantityFormula::LowPitchAreaHalf => "low-pitch-area-half".to_string(),
            QuantityFormula::Fixed(quantity) => format!("fixed:{}", quantity),
            QuantityFormula::Unrecognized(text) => text.clone(),
        }
    }

    /// Unrounded quantity for this formula. None for unrecognized formulas.
    pub fn raw_value(&self, set: &RoofMeasurementSet) -> Option<f64> {
        let squares = f64::from(set.effective_squares);
        let value = match self {
            QuantityFormula::BundlesPerSquare => squares * 3.0,
            QuantityFormula::HipRidgePer30Ft => set.hips_and_ridges() / 30.0,
            QuantityFormula::RidgeVentPer4Ft => set.edges.ridges / 4.0,
            QuantityFormula::UnderlaymentPer10Sq => squares / 10.0,
            QuantityFormula::StarterPer100Ft => set.eaves_and_rakes() / 100.0,
            QuantityFormula::DripEdgePer10Ft => set.eaves_and_rakes() / 10.0 + DRIP_EDGE_SPARE_PIECES,
            QuantityFormula::IceWaterPer66Ft => set.edges.valleys / 66.0,
            QuantityFormula::ConsumablesPer15Sq => squares / 15.0,
            QuantityFormula::LowPitchAreaDirect => set.low_pitch_squares,
            QuantityFormula::LowPitchAreaHalf => set.low_pitch_squares / 2.0,
            QuantityFormula::Fixed(quantity) => f64::from(*quantity),
            QuantityFormula::Unrecognized(_) => return None,
        };
        Some(value)
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, QuantityFormula::Fixed(_))
    }

    /// Whether this formula orders ridge vent, which the job must ask for.
    pub fn needs_ridge_vent(&self) -> bool {
        matches!(self, QuantityFormula::RidgeVentPer4Ft)
    }
}

impl From<String> for QuantityFormula {
    fn from(text: String) -> Self {
        QuantityFormula::parse(&text)
    }
}

impl From<QuantityFormula> for String {
    fn from(formula: QuantityFormula) -> Self {
        formula.identifier()
    }
}

impl fmt::Display for QuantityFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}
