//! Type definitions for material ordering.
//!
//! Rules come from the rule catalog (TOML or JSON); line items are what the
//! quantity engine emits and the price resolver fills in.

use serde::{Deserialize, Serialize};

use super::formula::QuantityFormula;

// =============================================================================
// CATALOG TYPES (loaded from material_rules.toml)
// =============================================================================

/// Root of the rule catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleCatalog {
    #[serde(default)]
    pub rules: Vec<MaterialOrderRule>,
}

/// One order rule: a material and the formula that sizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialOrderRule {
    pub id: String,
    #[serde(alias = "materialName")]
    pub material_name: String,
    /// Supplier unit code ("BD", "RL", "PC")
    #[serde(alias = "unitOfMeasure")]
    pub unit_of_measure: String,
    #[serde(alias = "quantityFormula")]
    pub quantity_formula: QuantityFormula,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

// =============================================================================
// OUTPUT TYPES
// =============================================================================

/// One line of a material order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLineItem {
    /// Rule id, or `acc-<kind>` for accessories
    pub id: String,
    pub item_name: String,
    pub unit_of_measure: String,
    pub quantity: u32,
    /// 0 until resolved
    pub unit_price: f64,
    pub extended_cost: f64,
    pub category: String,
    /// No usable catalog match was found for this line
    #[serde(default)]
    pub needs_review: bool,
    /// Score of the catalog entry the price came from
    #[serde(default)]
    pub match_score: Option<u8>,
}

impl MaterialLineItem {
    /// Unpriced line for a rule.
    pub fn from_rule(rule: &MaterialOrderRule, quantity: u32) -> Self {
        Self {
            id: rule.id.clone(),
            item_name: rule.material_name.clone(),
            unit_of_measure: rule.unit_of_measure.clone(),
            quantity,
            unit_price: 0.0,
            extended_cost: 0.0,
            category: rule.category.clone(),
            needs_review: false,
            match_score: None,
        }
    }

    /// Set the unit price and recompute the extended cost.
    pub fn set_unit_price(&mut self, unit_price: f64) {
        self.unit_price = unit_price;
        self.extended_cost = f64::from(self.quantity) * unit_price;
    }
}
