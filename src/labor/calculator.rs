//! Labor line generation.
//!
//! Each condition is gated by the job's flags and quantified by effective
//! squares, a pitch segment's squares, ridge length or a flat count.

use tracing::{debug, info};

use crate::measurement::RoofMeasurementSet;

use super::rates::RateTable;
use super::types::{Billing, LaborCondition, LaborLineItem, LaborRateCatalog};

/// Squares per excess-weight disposal charge.
pub const DISPOSAL_EXCESS_INCREMENT: u32 = 30;

/// Prices labor for one measurement set against one rate sheet snapshot.
pub struct LaborCalculator<'a> {
    rates: RateTable<'a>,
}

impl<'a> LaborCalculator<'a> {
    pub fn new(catalog: &'a LaborRateCatalog) -> Self {
        Self {
            rates: RateTable::new(catalog),
        }
    }

    /// Produce labor lines in a fixed order: install, story upcharge, pitch
    /// upcharges, access and removal upcharges, ridge vent, hand load, then
    /// disposal.
    pub fn evaluate(&self, set: &RoofMeasurementSet) -> Vec<LaborLineItem> {
        let conditions = &set.conditions;
        let squares = f64::from(set.effective_squares);
        let mut lines = Vec::new();

        lines.push(self.line(LaborCondition::StandardInstall, squares));

        if conditions.third_story {
            lines.push(self.line(LaborCondition::ThirdStory, squares));
        } else if conditions.stories >= 2 {
            lines.push(self.line(LaborCondition::SecondStory, squares));
        }

        for segment in &set.pitch_segments {
            let bucket = segment.rise().and_then(LaborCondition::pitch_bucket);
            match bucket {
                Some(condition) if segment.squares > 0.0 => {
                    lines.push(self.line(condition, segment.squares));
                }
                Some(_) => debug!("Pitch {} has no area, no upcharge", segment.pitch),
                None => {}
            }
        }

        if !conditions.trailer_access {
            lines.push(self.line(LaborCondition::NoTrailerAccess, squares));
        }

        if conditions.second_layer {
            lines.push(self.line(LaborCondition::SecondLayerRemoval, squares));
        }

        if conditions.ridge_vent && set.edges.ridges > 0.0 {
            lines.push(self.line(LaborCondition::RidgeVentInstall, set.edges.ridges));
        }

        if conditions.hand_load {
            lines.push(self.line(LaborCondition::HandLoad, squares));
        }

        lines.push(self.line(LaborCondition::DisposalBase, 1.0));

        let excess = disposal_excess_count(set.effective_squares);
        if excess > 0 {
            lines.push(self.line(LaborCondition::DisposalExcessWeight, f64::from(excess)));
        }

        info!(
            "Generated {} labor lines for {} effective squares",
            lines.len(),
            set.effective_squares
        );
        lines
    }

    fn line(&self, condition: LaborCondition, quantity: f64) -> LaborLineItem {
        let resolved = self.rates.rate_for(condition);
        let extended_cost = quantity * resolved.rate;

        debug!(
            "{}: {} x {:.2} = {:.2}",
            condition, quantity, resolved.rate, extended_cost
        );

        let (rate_per_square, rate_per_linear_foot, flat_rate) = match condition.billing() {
            Billing::PerSquare => (Some(resolved.rate), None, None),
            Billing::PerLinearFoot => (None, Some(resolved.rate), None),
            Billing::Flat => (None, None, Some(resolved.rate)),
        };

        LaborLineItem {
            condition_type: condition,
            description: resolved.description,
            rate_per_square,
            rate_per_linear_foot,
            flat_rate,
            quantity,
            extended_cost,
        }
    }
}

/// Number of excess-weight disposal charges: one per full 30 squares.
pub fn disposal_excess_count(effective_squares: u32) -> u32 {
    effective_squares / DISPOSAL_EXCESS_INCREMENT
}
