//! The full estimate pipeline.
//!
//! Normalize -> size materials -> price materials -> labor -> summary. Each
//! stage reads the catalogs by shared reference; nothing is mutated in place,
//! so identical requests produce identical estimates.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::labor::{default_labor_rates, LaborCalculator, LaborLineItem, LaborRateCatalog};
use crate::materials::{
    accessory_lines, default_accessory_catalog, default_rule_catalog, AccessoryCatalog,
    AccessoryOrder, MaterialLineItem, QuantityEngine, RuleCatalog,
};
use crate::measurement::{
    normalize, JobConditions, ProviderReport, RoofMeasurementSet, StructureRecord,
    StructureSelection,
};
use crate::pricing::{default_price_catalog, PriceCatalog, PriceResolver};
use crate::settings::EngineSettings;
use crate::summary::{summarize, CostSummary};

/// Reference data snapshot for one calculation.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub rules: RuleCatalog,
    pub prices: PriceCatalog,
    pub labor_rates: LaborRateCatalog,
    pub accessories: AccessoryCatalog,
}

impl Catalogs {
    /// The catalogs embedded in the binary.
    pub fn defaults() -> Self {
        Self {
            rules: default_rule_catalog(),
            prices: default_price_catalog(),
            labor_rates: default_labor_rates(),
            accessories: default_accessory_catalog(),
        }
    }
}

/// Options the user picks on the estimate form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobOptions {
    pub no_trailer_access: bool,
    pub second_layer: bool,
    pub ridge_vent: bool,
    pub third_story: bool,
    pub hand_load: bool,
    /// Overrides the story count read from the report
    pub stories: Option<u32>,
    /// None uses the configured default contribution
    pub target_contribution: Option<f64>,
    pub financed: bool,
    pub accessories: Vec<AccessoryOrder>,
}

impl JobOptions {
    /// Job conditions for these options, with `report_stories` used when
    /// no story count was given.
    pub fn conditions(&self, report_stories: u32) -> JobConditions {
        JobConditions {
            trailer_access: !self.no_trailer_access,
            second_layer: self.second_layer,
            ridge_vent: self.ridge_vent,
            third_story: self.third_story,
            hand_load: self.hand_load,
            stories: self.stories.unwrap_or(report_stories).max(1),
        }
    }
}

/// Everything needed to run one estimate.
#[derive(Debug, Clone, Default)]
pub struct EstimateRequest {
    pub records: Vec<StructureRecord>,
    pub selection: StructureSelection,
    pub options: JobOptions,
    /// Story count from the measurement report
    pub report_stories: u32,
}

impl EstimateRequest {
    pub fn from_report(report: &ProviderReport, selection: StructureSelection, options: JobOptions) -> Self {
        Self {
            records: report.structure_records(),
            selection,
            options,
            report_stories: report.story_count(),
        }
    }
}

/// A finished estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub measurements: RoofMeasurementSet,
    pub materials: Vec<MaterialLineItem>,
    pub labor: Vec<LaborLineItem>,
    pub summary: CostSummary,
}

impl Estimate {
    /// Material lines that could not be priced confidently.
    pub fn lines_needing_review(&self) -> impl Iterator<Item = &MaterialLineItem> {
        self.materials.iter().filter(|m| m.needs_review)
    }
}

/// Runs the pipeline against one catalog snapshot and one settings object.
pub struct Estimator<'a> {
    catalogs: &'a Catalogs,
    settings: &'a EngineSettings,
}

impl<'a> Estimator<'a> {
    pub fn new(catalogs: &'a Catalogs, settings: &'a EngineSettings) -> Self {
        Self { catalogs, settings }
    }

    pub fn estimate(&self, request: &EstimateRequest) -> Estimate {
        let conditions = request.options.conditions(request.report_stories);
        let measurements = normalize(&request.records, &request.selection, conditions, self.settings);

        let mut materials = QuantityEngine::new(&self.catalogs.rules).evaluate(&measurements);
        materials.extend(accessory_lines(
            &request.options.accessories,
            &self.catalogs.accessories,
        ));
        let materials = PriceResolver::new(&self.catalogs.prices, &self.settings.pricing).resolve(materials);

        let labor = LaborCalculator::new(&self.catalogs.labor_rates).evaluate(&measurements);

        let summary = summarize(
            &materials,
            &labor,
            request.options.target_contribution,
            request.options.financed,
            self.settings,
        );

        info!(
            "Estimate: {} material lines, {} labor lines, total {:.2}",
            materials.len(),
            labor.len(),
            summary.total_cost
        );

        Estimate {
            measurements,
            materials,
            labor,
            summary,
        }
    }
}
