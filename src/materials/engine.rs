//! Quantity rule evaluation.
//!
//! The `QuantityEngine` reads an immutable rule catalog and sizes each rule
//! against a `RoofMeasurementSet`, producing unpriced order lines.

use tracing::{debug, info, warn};

use crate::measurement::RoofMeasurementSet;

use super::formula::QuantityFormula;
use super::types::{MaterialLineItem, MaterialOrderRule, RuleCatalog};

/// Evaluates material order rules against roof measurements.
pub struct QuantityEngine<'a> {
    rules: &'a RuleCatalog,
}

impl<'a> QuantityEngine<'a> {
    pub fn new(rules: &'a RuleCatalog) -> Self {
        Self { rules }
    }

    /// Size every rule in catalog order.
    ///
    /// Quantities are rounded up to whole units. Rules that come out at zero,
    /// name an unknown formula, or order ridge vent on a job without it are
    /// left out. Fixed-quantity rules are always emitted.
    pub fn evaluate(&self, set: &RoofMeasurementSet) -> Vec<MaterialLineItem> {
        let lines: Vec<MaterialLineItem> = self
            .rules
            .rules
            .iter()
            .filter_map(|rule| self.evaluate_rule(rule, set))
            .collect();

        info!(
            "Sized {} of {} material rules for {} effective squares",
            lines.len(),
            self.rules.rules.len(),
            set.effective_squares
        );
        lines
    }

    fn evaluate_rule(&self, rule: &MaterialOrderRule, set: &RoofMeasurementSet) -> Option<MaterialLineItem> {
        let formula = &rule.quantity_formula;

        if let QuantityFormula::Unrecognized(text) = formula {
            warn!("Rule {} has unrecognized formula {:?}, skipping", rule.id, text);
            return None;
        }

        if formula.needs_ridge_vent() && !set.conditions.ridge_vent {
            debug!("Rule {} skipped: job has no ridge vent", rule.id);
            return None;
        }

        let raw = formula.raw_value(set)?;
        let quantity = round_up_quantity(raw);

        if quantity == 0 && !formula.is_fixed() {
            debug!("Rule {} ({}) sized to 0, omitted", rule.id, formula);
            return None;
        }

        debug!(
            "Rule {} ({}): {:.3} -> {} {}",
            rule.id, formula, raw, quantity, rule.unit_of_measure
        );
        Some(MaterialLineItem::from_rule(rule, quantity))
    }
}

/// Round a raw quantity up to whole purchasable units. Negative or
/// non-finite values become 0; values past `u32::MAX` saturate there.
pub fn round_up_quantity(raw: f64) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let units = raw.ceil();
    if units > f64::from(u32::MAX) {
        warn!("Quantity {} exceeds {}, saturating", raw, u32::MAX);
        return u32::MAX;
    }
    units as u32
}
