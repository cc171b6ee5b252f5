use std::io::Write;
use std::path::PathBuf;

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use tempfile::Builder;

use roof_estimator::labor::{LaborCondition, LaborLineItem};
use roof_estimator::materials::{load_rule_catalog, AccessoryKind, AccessoryOrder, MaterialLineItem};
use roof_estimator::measurement::{ProviderReport, StructureSelection};
use roof_estimator::pricing::load_price_catalog;
use roof_estimator::settings::{default_settings, layer_settings};
use roof_estimator::{Catalogs, Estimate, EstimateRequest, Estimator, JobOptions};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_report(name: &str) -> ProviderReport {
    let json = std::fs::read_to_string(fixture_path(name)).expect("Failed to read fixture");
    ProviderReport::from_json(&json).expect("Failed to parse fixture")
}

fn run(report: &ProviderReport, selection: StructureSelection, options: JobOptions) -> Estimate {
    let catalogs = Catalogs::defaults();
    let settings = default_settings();
    let request = EstimateRequest::from_report(report, selection, options);
    Estimator::new(&catalogs, &settings).estimate(&request)
}

fn quantities(lines: &[MaterialLineItem]) -> Vec<(&str, u32)> {
    lines.iter().map(|l| (l.id.as_str(), l.quantity)).collect()
}

fn labor_summary(lines: &[LaborLineItem]) -> Vec<(LaborCondition, f64)> {
    lines.iter().map(|l| (l.condition_type, l.quantity)).collect()
}

#[test]
fn test_single_structure_scenario() {
    let report = load_report("single_structure.json");
    let estimate = run(&report, StructureSelection::All, JobOptions::default());

    assert_eq!(estimate.measurements.effective_squares, 20);
    assert_eq!(estimate.measurements.eaves_and_rakes(), 150.0);
    assert_eq!(estimate.measurements.hips_and_ridges(), 60.0);

    assert_eq!(
        quantities(&estimate.materials),
        vec![
            ("shingles", 60),
            ("hip-ridge", 2),
            ("underlayment", 2),
            ("starter", 2),
            ("drip-edge", 20),
            ("nails", 2),
            ("caulk", 2),
        ]
    );

    assert_eq!(
        labor_summary(&estimate.labor),
        vec![
            (LaborCondition::StandardInstall, 20.0),
            (LaborCondition::DisposalBase, 1.0),
        ]
    );
}

#[test]
fn test_single_structure_prices_and_totals() {
    let report = load_report("single_structure.json");
    let estimate = run(&report, StructureSelection::All, JobOptions::default());

    let underlayment = estimate
        .materials
        .iter()
        .find(|m| m.item_name == "Synthetic Roofing Underlayment")
        .expect("underlayment line");
    assert_eq!(underlayment.unit_of_measure, "RL");
    assert_eq!(underlayment.match_score, Some(3));
    assert_eq!(underlayment.extended_cost, 184.0);
    assert_eq!(estimate.lines_needing_review().count(), 0);

    for line in &estimate.materials {
        assert_relative_eq!(line.extended_cost, f64::from(line.quantity) * line.unit_price);
    }

    let summary = &estimate.summary;
    let materials: f64 = estimate.materials.iter().map(|m| m.extended_cost).sum();
    let labor: f64 = estimate.labor.iter().map(|l| l.extended_cost).sum();
    assert_relative_eq!(summary.total_material_cost, materials, epsilon = 1e-9);
    assert_relative_eq!(summary.total_labor_cost, labor, epsilon = 1e-9);
    assert_relative_eq!(summary.material_tax, materials * 0.08, epsilon = 1e-9);
    assert_relative_eq!(
        summary.subtotal,
        materials * 1.08 + labor,
        epsilon = 1e-9
    );
    assert_relative_eq!(summary.total_cost, summary.subtotal / 0.40, epsilon = 1e-6);
    assert_relative_eq!(summary.profit_margin, 0.60, epsilon = 1e-9);
}

#[test]
fn test_two_structures_merged() {
    let report = load_report("two_structures.json");
    let estimate = run(&report, StructureSelection::All, JobOptions::default());
    let set = &estimate.measurements;

    // 26.4 -> 27 plus the garage's derived 4.5 * 1.12 -> 6
    assert_eq!(set.effective_squares, 33);
    assert_eq!(set.structures, vec![1, 2]);
    assert_eq!(set.edges.drip_edge, 250.0);
    assert_relative_eq!(set.low_pitch_squares, 4.5, epsilon = 1e-9);
    assert_eq!(set.predominant_pitch.as_deref(), Some("8/12"));
    assert_eq!(set.conditions.stories, 2);

    assert_eq!(
        quantities(&estimate.materials),
        vec![
            ("shingles", 99),
            ("hip-ridge", 3),
            ("underlayment", 4),
            ("starter", 3),
            ("drip-edge", 30),
            ("ice-water", 1),
            ("nails", 3),
            ("caulk", 3),
            ("low-slope-cap", 5),
            ("low-slope-base", 3),
        ]
    );

    assert_eq!(
        labor_summary(&estimate.labor),
        vec![
            (LaborCondition::StandardInstall, 33.0),
            (LaborCondition::SecondStory, 33.0),
            (LaborCondition::Pitch8, 16.0),
            (LaborCondition::DisposalBase, 1.0),
            (LaborCondition::DisposalExcessWeight, 1.0),
        ]
    );
}

#[test]
fn test_structure_selection() {
    let report = load_report("two_structures.json");
    let garage = run(&report, StructureSelection::only([2]), JobOptions::default());

    assert_eq!(garage.measurements.effective_squares, 6);
    assert_eq!(garage.measurements.edges.drip_edge, 70.0);
    assert!(garage
        .labor
        .iter()
        .all(|l| l.condition_type != LaborCondition::Pitch8));
}

#[test]
fn test_job_options_add_upcharges_and_ridge_vent() {
    let report = load_report("single_structure.json");
    let options = JobOptions {
        no_trailer_access: true,
        second_layer: true,
        ridge_vent: true,
        third_story: true,
        hand_load: true,
        stories: Some(3),
        ..Default::default()
    };
    let estimate = run(&report, StructureSelection::All, options);

    let vent = estimate
        .materials
        .iter()
        .find(|m| m.id == "ridge-vent")
        .expect("ridge vent ordered");
    assert_eq!(vent.quantity, 10);

    assert_eq!(
        labor_summary(&estimate.labor),
        vec![
            (LaborCondition::StandardInstall, 20.0),
            (LaborCondition::ThirdStory, 20.0),
            (LaborCondition::NoTrailerAccess, 20.0),
            (LaborCondition::SecondLayerRemoval, 20.0),
            (LaborCondition::RidgeVentInstall, 40.0),
            (LaborCondition::HandLoad, 20.0),
            (LaborCondition::DisposalBase, 1.0),
        ]
    );
}

#[test]
fn test_financed_estimate_adds_fee_after_margin() {
    let report = load_report("single_structure.json");
    let plain = run(&report, StructureSelection::All, JobOptions::default());
    let financed = run(
        &report,
        StructureSelection::All,
        JobOptions {
            financed: true,
            ..Default::default()
        },
    );

    assert_relative_eq!(
        financed.summary.total_cost,
        plain.summary.total_cost + 500.0,
        epsilon = 1e-6
    );
    assert_eq!(financed.summary.profit, plain.summary.profit);
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let report = load_report("two_structures.json");
    let options = JobOptions {
        ridge_vent: true,
        target_contribution: Some(0.33),
        accessories: vec![
            AccessoryOrder {
                kind: AccessoryKind::LeadBoot3In,
                quantity: 2,
            },
            AccessoryOrder {
                kind: AccessoryKind::TurtleVent,
                quantity: 4,
            },
        ],
        ..Default::default()
    };

    let first = serde_json::to_string(&run(&report, StructureSelection::All, options.clone())).unwrap();
    let second = serde_json::to_string(&run(&report, StructureSelection::All, options)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_layered_settings_change_contribution_range() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[margin]\nmin_contribution = 0.35\nmax_contribution = 0.60").unwrap();
    let settings = layer_settings(&default_settings(), file.path()).unwrap();

    let report = load_report("single_structure.json");
    let catalogs = Catalogs::defaults();
    let request = EstimateRequest::from_report(
        &report,
        StructureSelection::All,
        JobOptions {
            target_contribution: Some(0.30),
            ..Default::default()
        },
    );
    let estimate = Estimator::new(&catalogs, &settings).estimate(&request);

    assert!(estimate.summary.contribution_was_clamped);
    assert_eq!(estimate.summary.contribution_fraction, 0.35);
}

#[test]
fn test_catalog_service_json_overrides() {
    let mut rules = Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        rules,
        r#"{{"rules": [
            {{"id": "1", "materialName": "Field Shingles", "unitOfMeasure": "Bundle",
              "quantityFormula": "roof_area_sq * 3", "description": "", "category": "Shingles"}},
            {{"id": "2", "materialName": "Roofing Staples", "unitOfMeasure": "BX",
              "quantityFormula": "roof_area_sq / 15", "description": "", "category": "Fasteners"}},
            {{"id": "3", "materialName": "Dumpster Permit", "unitOfMeasure": "EA",
              "quantityFormula": "fixed:1", "description": "", "category": "Fees"}}
        ]}}"#
    )
    .unwrap();

    let mut prices = Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        prices,
        r#"[
            {{"itemName": "Starter Strip", "pricePerUnit": 40.0, "unitOfMeasure": "BD", "category": "Shingles"}},
            {{"itemName": "Field Shingles®", "pricePerUnit": 36.0, "unitOfMeasure": "BD", "category": "Shingles"}}
        ]"#
    )
    .unwrap();

    let catalogs = Catalogs {
        rules: load_rule_catalog(rules.path()).unwrap(),
        prices: load_price_catalog(prices.path()).unwrap(),
        ..Catalogs::defaults()
    };
    let settings = default_settings();
    let report = load_report("single_structure.json");
    let request = EstimateRequest::from_report(&report, StructureSelection::All, JobOptions::default());
    let estimate = Estimator::new(&catalogs, &settings).estimate(&request);

    assert_eq!(quantities(&estimate.materials), vec![("1", 60), ("2", 2), ("3", 1)]);

    let shingles = &estimate.materials[0];
    assert_eq!(shingles.match_score, Some(3));
    assert_eq!(shingles.unit_price, 36.0);

    // Nothing in the price list resembles staples or a permit
    assert!(estimate.materials[1].needs_review);
    assert!(estimate.materials[2].needs_review);
}
