//! Tunable business parameters for the estimate engine.
//!
//! Provides two loading methods:
//! - `default_settings()` - Loads the settings embedded in the binary
//! - `load_settings(path)` - Loads an override file; omitted keys keep their defaults

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default settings embedded in the binary at compile time.
const DEFAULT_SETTINGS: &str = include_str!("../config/settings.toml");

/// Root settings object. Every section falls back to its `Default` when omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub waste: WasteSettings,
    pub margin: MarginSettings,
    pub tax: TaxSettings,
    pub financing: FinancingSettings,
    pub low_pitch: LowPitchSettings,
    pub pricing: PricingSettings,
}

/// Waste percentages used when a structure arrives without a suggested-waste figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WasteSettings {
    pub tiny_area_percent: f64,
    pub tiny_area_max_squares: f64,
    pub steep_min_rise: u32,
    pub steep_percent: f64,
    pub baseline_percent: f64,
}

impl Default for WasteSettings {
    fn default() -> Self {
        Self {
            tiny_area_percent: 94.0,
            tiny_area_max_squares: 2.0,
            steep_min_rise: 10,
            steep_percent: 18.0,
            baseline_percent: 12.0,
        }
    }
}

impl WasteSettings {
    /// Waste percent for a structure of `base_squares` whose predominant pitch
    /// has the given rise (None when the pitch label could not be read).
    pub fn percent_for(&self, base_squares: f64, predominant_rise: Option<u32>) -> f64 {
        if base_squares > 0.0 && base_squares < self.tiny_area_max_squares {
            self.tiny_area_percent
        } else if predominant_rise.is_some_and(|rise| rise >= self.steep_min_rise) {
            self.steep_percent
        } else {
            self.baseline_percent
        }
    }
}

/// Valid range for the target contribution fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginSettings {
    pub min_contribution: f64,
    pub max_contribution: f64,
    pub default_contribution: f64,
}

impl Default for MarginSettings {
    fn default() -> Self {
        Self {
            min_contribution: 0.26,
            max_contribution: 0.51,
            default_contribution: 0.40,
        }
    }
}

impl MarginSettings {
    /// Clamp a contribution fraction into the configured range.
    ///
    /// Returns (clamped_value, was_clamped). Bounds given in the wrong order
    /// are swapped; a non-finite input falls back to the default contribution.
    pub fn clamp(&self, value: f64) -> (f64, bool) {
        let min = self.min_contribution.min(self.max_contribution);
        let max = self.min_contribution.max(self.max_contribution);

        if !value.is_finite() {
            return (self.default_contribution.clamp(min, max), true);
        }

        if value < min {
            (min, true)
        } else if value > max {
            (max, true)
        } else {
            (value, false)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxSettings {
    pub material_rate: f64,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self { material_rate: 0.08 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingSettings {
    pub origination_fee: f64,
}

impl Default for FinancingSettings {
    fn default() -> Self {
        Self {
            origination_fee: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowPitchSettings {
    pub max_rise: u32,
}

impl Default for LowPitchSettings {
    fn default() -> Self {
        Self { max_rise: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    pub min_match_score: u8,
}

/// A settings value that looks wrong but does not stop the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsWarning {
    pub field: String,
    pub message: String,
    pub value: String,
}

impl EngineSettings {
    /// Check settings for values outside their sensible ranges.
    /// The engine still runs with whatever it was given.
    pub fn validate(&self) -> Vec<SettingsWarning> {
        let mut warnings = Vec::new();

        if self.margin.min_contribution > self.margin.max_contribution {
            warnings.push(SettingsWarning {
                field: "margin.min_contribution".to_string(),
                message: format!(
                    "Contribution bounds are inverted ({} > {}); they will be swapped",
                    self.margin.min_contribution, self.margin.max_contribution
                ),
                value: self.margin.min_contribution.to_string(),
            });
        }

        for (field, value) in [
            ("margin.min_contribution", self.margin.min_contribution),
            ("margin.max_contribution", self.margin.max_contribution),
            ("margin.default_contribution", self.margin.default_contribution),
            ("tax.material_rate", self.tax.material_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                warnings.push(SettingsWarning {
                    field: field.to_string(),
                    message: format!("{} should be a fraction between 0 and 1", field),
                    value: value.to_string(),
                });
            }
        }

        if self.financing.origination_fee < 0.0 {
            warnings.push(SettingsWarning {
                field: "financing.origination_fee".to_string(),
                message: "Origination fee is negative".to_string(),
                value: self.financing.origination_fee.to_string(),
            });
        }

        for (field, value) in [
            ("waste.tiny_area_percent", self.waste.tiny_area_percent),
            ("waste.steep_percent", self.waste.steep_percent),
            ("waste.baseline_percent", self.waste.baseline_percent),
        ] {
            if value < 0.0 {
                warnings.push(SettingsWarning {
                    field: field.to_string(),
                    message: format!("{} is negative", field),
                    value: value.to_string(),
                });
            }
        }

        if self.pricing.min_match_score > 3 {
            warnings.push(SettingsWarning {
                field: "pricing.min_match_score".to_string(),
                message: "No candidate can score above 3; every line will go unpriced".to_string(),
                value: self.pricing.min_match_score.to_string(),
            });
        }

        for w in &warnings {
            warn!("{}", w.message);
        }

        warnings
    }
}

/// Load settings from a TOML file. Keys missing from the file keep their defaults.
pub fn load_settings(path: &Path) -> Result<EngineSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings: EngineSettings = toml::from_str(&content)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(settings)
}

/// Apply an override file on top of `base`. Keys the file leaves out keep
/// the values from `base`, not the built-in defaults.
pub fn layer_settings(base: &EngineSettings, path: &Path) -> Result<EngineSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let overrides: toml::Table = toml::from_str(&content)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;

    let mut merged = match toml::Value::try_from(base).context("Failed to serialize base settings")? {
        toml::Value::Table(table) => table,
        _ => toml::Table::new(),
    };
    merge_tables(&mut merged, overrides);

    let settings: EngineSettings = toml::Value::Table(merged)
        .try_into()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(settings)
}

fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(incoming) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, incoming);
                    continue;
                }
                base.insert(key, toml::Value::Table(incoming));
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Per-user settings file: `<config dir>/roof-estimator/settings.toml`.
pub fn user_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("roof-estimator").join("settings.toml"))
}

/// Get the default settings embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_settings() -> EngineSettings {
    toml::from_str(DEFAULT_SETTINGS).expect("embedded settings.toml must be valid TOML")
}
