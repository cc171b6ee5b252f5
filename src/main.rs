use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use roof_estimator::labor::load_labor_rates;
use roof_estimator::materials::{load_accessory_catalog, load_rule_catalog, AccessoryOrder};
use roof_estimator::measurement::{ProviderReport, StructureSelection};
use roof_estimator::pricing::load_price_catalog;
use roof_estimator::settings::{default_settings, layer_settings, user_settings_path};
use roof_estimator::{Catalogs, EngineSettings, EstimateRequest, Estimator, JobOptions};

/// Price a roofing job from a measurement report.
#[derive(Parser, Debug)]
#[command(name = "roof-estimator")]
#[command(about = "Material takeoff, labor and contract price from a roof measurement report")]
struct Args {
    /// Measurement report JSON from the report parser
    report: PathBuf,

    /// Structure numbers to include, e.g. "1,3" (default: all)
    #[arg(long, value_delimiter = ',')]
    structures: Vec<u32>,

    /// Settings override file (applied after the per-user settings file)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Material rule catalog (TOML or JSON)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Labor rate sheet (TOML or JSON)
    #[arg(long)]
    labor_rates: Option<PathBuf>,

    /// Supplier price catalog (TOML or JSON)
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Accessory catalog (TOML or JSON)
    #[arg(long)]
    accessories: Option<PathBuf>,

    /// The crew cannot park a trailer at the house
    #[arg(long)]
    no_trailer_access: bool,

    /// An existing second layer must be torn off
    #[arg(long)]
    second_layer: bool,

    /// Install ridge vent
    #[arg(long)]
    ridge_vent: bool,

    /// Third story upcharge (replaces the second story upcharge)
    #[arg(long)]
    third_story: bool,

    /// Materials must be carried up by hand
    #[arg(long)]
    hand_load: bool,

    /// Story count (default: read from the report)
    #[arg(long)]
    stories: Option<u32>,

    /// Target contribution fraction, e.g. 0.40
    #[arg(long)]
    contribution: Option<f64>,

    /// Add the financing origination fee
    #[arg(long)]
    financed: bool,

    /// Accessory count as kind=qty, e.g. turtle-vent=4 (repeatable)
    #[arg(long = "accessory")]
    accessories_ordered: Vec<AccessoryOrder>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let settings = resolve_settings(&args)?;
    settings.validate();
    let catalogs = resolve_catalogs(&args)?;

    let json = std::fs::read_to_string(&args.report)
        .with_context(|| format!("Failed to read report {}", args.report.display()))?;
    let report = ProviderReport::from_json(&json)
        .with_context(|| format!("Invalid report {}", args.report.display()))?;

    let selection = if args.structures.is_empty() {
        StructureSelection::All
    } else {
        StructureSelection::only(args.structures.iter().copied())
    };

    let options = JobOptions {
        no_trailer_access: args.no_trailer_access,
        second_layer: args.second_layer,
        ridge_vent: args.ridge_vent,
        third_story: args.third_story,
        hand_load: args.hand_load,
        stories: args.stories,
        target_contribution: args.contribution,
        financed: args.financed,
        accessories: args.accessories_ordered.clone(),
    };

    let request = EstimateRequest::from_report(&report, selection, options);
    let estimate = Estimator::new(&catalogs, &settings).estimate(&request);

    for line in estimate.lines_needing_review() {
        info!("Needs review: {} ({} {})", line.item_name, line.quantity, line.unit_of_measure);
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&estimate)?
    } else {
        serde_json::to_string(&estimate)?
    };
    println!("{}", output);

    Ok(())
}

/// Embedded defaults, then the per-user file if present, then `--settings`.
fn resolve_settings(args: &Args) -> Result<EngineSettings> {
    let mut settings = default_settings();

    if let Some(path) = user_settings_path().filter(|p| p.is_file()) {
        debug!("Applying user settings from {}", path.display());
        settings = layer_settings(&settings, &path)?;
    }

    if let Some(path) = &args.settings {
        debug!("Applying settings from {}", path.display());
        settings = layer_settings(&settings, path)?;
    }

    Ok(settings)
}

fn resolve_catalogs(args: &Args) -> Result<Catalogs> {
    let mut catalogs = Catalogs::defaults();

    if let Some(path) = &args.rules {
        catalogs.rules = load_rule_catalog(path)?;
    }
    if let Some(path) = &args.prices {
        catalogs.prices = load_price_catalog(path)?;
    }
    if let Some(path) = &args.labor_rates {
        catalogs.labor_rates = load_labor_rates(path)?;
    }
    if let Some(path) = &args.accessories {
        catalogs.accessories = load_accessory_catalog(path)?;
    }

    Ok(catalogs)
}
