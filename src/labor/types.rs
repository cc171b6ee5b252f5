//! Type definitions for labor pricing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;

// =============================================================================
// CONDITIONS
// =============================================================================

/// Every labor charge the calculator knows how to gate and quantify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborCondition {
    StandardInstall,
    SecondStory,
    ThirdStory,
    #[serde(rename = "pitch_8_12")]
    Pitch8,
    #[serde(rename = "pitch_9_12")]
    Pitch9,
    #[serde(rename = "pitch_10_12")]
    Pitch10,
    #[serde(rename = "pitch_11_12")]
    Pitch11,
    #[serde(rename = "pitch_12_plus")]
    Pitch12Plus,
    NoTrailerAccess,
    SecondLayerRemoval,
    RidgeVentInstall,
    HandLoad,
    DisposalBase,
    DisposalExcessWeight,
}

/// How a condition's quantity is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Billing {
    PerSquare,
    PerLinearFoot,
    Flat,
}

impl LaborCondition {
    pub const ALL: [LaborCondition; 14] = [
        LaborCondition::StandardInstall,
        LaborCondition::SecondStory,
        LaborCondition::ThirdStory,
        LaborCondition::Pitch8,
        LaborCondition::Pitch9,
        LaborCondition::Pitch10,
        LaborCondition::Pitch11,
        LaborCondition::Pitch12Plus,
        LaborCondition::NoTrailerAccess,
        LaborCondition::SecondLayerRemoval,
        LaborCondition::RidgeVentInstall,
        LaborCondition::HandLoad,
        LaborCondition::DisposalBase,
        LaborCondition::DisposalExcessWeight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LaborCondition::StandardInstall => "standard_install",
            LaborCondition::SecondStory => "second_story",
            LaborCondition::ThirdStory => "third_story",
            LaborCondition::Pitch8 => "pitch_8_12",
            LaborCondition::Pitch9 => "pitch_9_12",
            LaborCondition::Pitch10 => "pitch_10_12",
            LaborCondition::Pitch11 => "pitch_11_12",
            LaborCondition::Pitch12Plus => "pitch_12_plus",
            LaborCondition::NoTrailerAccess => "no_trailer_access",
            LaborCondition::SecondLayerRemoval => "second_layer_removal",
            LaborCondition::RidgeVentInstall => "ridge_vent_install",
            LaborCondition::HandLoad => "hand_load",
            LaborCondition::DisposalBase => "disposal_base",
            LaborCondition::DisposalExcessWeight => "disposal_excess_weight",
        }
    }

    pub fn billing(&self) -> Billing {
        match self {
            LaborCondition::RidgeVentInstall => Billing::PerLinearFoot,
            LaborCondition::DisposalBase | LaborCondition::DisposalExcessWeight => Billing::Flat,
            _ => Billing::PerSquare,
        }
    }

    /// Steep-pitch bucket for a rise; None below 8/12.
    pub fn pitch_bucket(rise: u32) -> Option<LaborCondition> {
        match rise {
            0..=7 => None,
            8 => Some(LaborCondition::Pitch8),
            9 => Some(LaborCondition::Pitch9),
            10 => Some(LaborCondition::Pitch10),
            11 => Some(LaborCondition::Pitch11),
            _ => Some(LaborCondition::Pitch12Plus),
        }
    }
}

impl fmt::Display for LaborCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaborCondition {
    type Err = EstimatorError;

    /// Accepts the snake_case names plus the spellings rate sheets tend to
    /// use ("Pitch 10/12", "12/12+", "disposal-excess-weight").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .replace('+', " plus")
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect::<String>()
            .split('_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        let key = key.strip_prefix("pitch_").unwrap_or(&key);
        let condition = match key {
            "8_12" => LaborCondition::Pitch8,
            "9_12" => LaborCondition::Pitch9,
            "10_12" => LaborCondition::Pitch10,
            "11_12" => LaborCondition::Pitch11,
            "12_12" | "12_12_plus" | "12_plus" => LaborCondition::Pitch12Plus,
            "standard_install" | "install" => LaborCondition::StandardInstall,
            "second_story" | "2nd_story" => LaborCondition::SecondStory,
            "third_story" | "3rd_story" => LaborCondition::ThirdStory,
            "no_trailer_access" | "no_trailer" => LaborCondition::NoTrailerAccess,
            "second_layer_removal" | "second_layer" => LaborCondition::SecondLayerRemoval,
            "ridge_vent_install" | "ridge_vent" => LaborCondition::RidgeVentInstall,
            "hand_load" | "hand_load_materials" => LaborCondition::HandLoad,
            "disposal_base" | "disposal" => LaborCondition::DisposalBase,
            "disposal_excess_weight" | "disposal_excess" => LaborCondition::DisposalExcessWeight,
            _ => {
                return Err(EstimatorError::Catalog(format!(
                    "Unknown labor condition type: {}",
                    s
                )))
            }
        };
        Ok(condition)
    }
}

// =============================================================================
// CATALOG TYPES (loaded from labor_rates.toml)
// =============================================================================

/// Root of the labor rate catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaborRateCatalog {
    #[serde(default)]
    pub rates: Vec<LaborRateEntry>,
}

/// One rate sheet row. `condition_type` is free text from the rate service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborRateEntry {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "conditionType")]
    pub condition_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "ratePerSquare")]
    pub rate_per_square: Option<f64>,
    #[serde(default, alias = "ratePerLinearFoot")]
    pub rate_per_linear_foot: Option<f64>,
    #[serde(default, alias = "flatRate")]
    pub flat_rate: Option<f64>,
}

// =============================================================================
// OUTPUT TYPES
// =============================================================================

/// One priced labor charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborLineItem {
    pub condition_type: LaborCondition,
    pub description: String,
    pub rate_per_square: Option<f64>,
    pub rate_per_linear_foot: Option<f64>,
    pub flat_rate: Option<f64>,
    /// Squares, linear feet, or a count of flat charges
    pub quantity: f64,
    pub extended_cost: f64,
}
