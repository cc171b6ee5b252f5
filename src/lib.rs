//! Roofing estimate engine.
//!
//! Turns roof measurements into a priced material order, a labor breakdown
//! and a contract price:
//!
//! 1. `measurement` merges the selected structures into one measurement set
//! 2. `materials` sizes the order from the rule catalog
//! 3. `pricing` fills unit prices from the supplier catalog
//! 4. `labor` prices install, upcharges and disposal
//! 5. `summary` rolls everything up and inverts the target contribution
//!
//! `estimate::Estimator` runs the whole pipeline.

mod catalog;
pub mod error;
pub mod estimate;
pub mod labor;
pub mod materials;
pub mod measurement;
pub mod pricing;
pub mod settings;
pub mod summary;

pub use error::EstimatorError;
pub use estimate::{Catalogs, Estimate, EstimateRequest, Estimator, JobOptions};
pub use settings::EngineSettings;
pub use summary::CostSummary;
