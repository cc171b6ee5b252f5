//! Cost roll-up and contract price.
//!
//! The contract price is found by inverting a target contribution fraction:
//! `total = subtotal / fraction`. The fraction is clamped to the configured
//! range first, and a zero fraction falls back to pricing at cost.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::labor::LaborLineItem;
use crate::materials::MaterialLineItem;
use crate::settings::EngineSettings;

/// Totals for one estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub total_material_cost: f64,
    pub total_labor_cost: f64,
    pub material_tax: f64,
    /// Materials + tax + labor
    pub subtotal: f64,
    /// Contribution fraction actually used, after clamping
    pub contribution_fraction: f64,
    pub contribution_was_clamped: bool,
    /// Financing fee included in `total_cost`, 0 when not financed
    pub financing_fee: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub profit_margin: f64,
}

/// Roll up priced materials and labor into a `CostSummary`.
///
/// `target_contribution` of None uses the configured default. The financing
/// fee is added after the margin is computed, so it never affects profit.
pub fn summarize(
    materials: &[MaterialLineItem],
    labor: &[LaborLineItem],
    target_contribution: Option<f64>,
    financed: bool,
    settings: &EngineSettings,
) -> CostSummary {
    let total_material_cost: f64 = materials.iter().map(|m| m.extended_cost).sum();
    let total_labor_cost: f64 = labor.iter().map(|l| l.extended_cost).sum();
    let material_tax = total_material_cost * settings.tax.material_rate;
    let subtotal = total_material_cost + material_tax + total_labor_cost;

    let requested = target_contribution.unwrap_or(settings.margin.default_contribution);
    let (fraction, was_clamped) = settings.margin.clamp(requested);
    if was_clamped {
        warn!(
            "Contribution fraction {} outside [{}, {}], using {}",
            requested, settings.margin.min_contribution, settings.margin.max_contribution, fraction
        );
    }

    let (total_cost, profit, profit_margin) = invert_contribution(subtotal, fraction);

    let financing_fee = if financed {
        settings.financing.origination_fee
    } else {
        0.0
    };

    let summary = CostSummary {
        total_material_cost,
        total_labor_cost,
        material_tax,
        subtotal,
        contribution_fraction: fraction,
        contribution_was_clamped: was_clamped,
        financing_fee,
        total_cost: total_cost + financing_fee,
        profit,
        profit_margin,
    };

    info!(
        "Subtotal {:.2} at contribution {:.2} -> contract {:.2}",
        summary.subtotal, summary.contribution_fraction, summary.total_cost
    );
    summary
}

/// Returns (total_cost, profit, profit_margin) for a cost and a
/// contribution fraction. A fraction at or below 0 prices at cost.
pub fn invert_contribution(subtotal: f64, fraction: f64) -> (f64, f64, f64) {
    let total_cost = if fraction > 0.0 {
        subtotal / fraction
    } else {
        subtotal
    };
    let profit = total_cost - subtotal;
    let profit_margin = if total_cost > 0.0 {
        profit / total_cost
    } else {
        0.0
    };
    (total_cost, profit, profit_margin)
}
