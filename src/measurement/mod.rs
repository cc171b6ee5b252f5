//! Roof geometry: provider payload, waste heuristics and structure merging.
//!
//! # Architecture
//!
//! - **Report**: The measurement provider's JSON, read into `StructureRecord`s
//! - **Waste**: Suggested squares derived for structures the provider left blank
//! - **Normalizer**: Selected structures merged into one `RoofMeasurementSet`
//!
//! # Example
//!
//! ```ignore
//! use roof_estimator::measurement::{normalize, JobConditions, ProviderReport, StructureSelection};
//! use roof_estimator::settings::default_settings;
//!
//! let report = ProviderReport::from_json(&json)?;
//! let set = normalize(
//!     &report.structure_records(),
//!     &StructureSelection::All,
//!     JobConditions::default(),
//!     &default_settings(),
//! );
//! println!("{} effective squares", set.effective_squares);
//! ```

mod normalizer;
mod report;
mod types;
mod waste;

pub use normalizer::{low_pitch_squares, merge_pitch_segments, normalize, StructureSelection};
pub use report::{
    parse_story_count, EdgeRow, PitchRow, ProviderReport, RoofTotals, StructureReport, WasteRow,
};
pub use types::*;
pub use waste::{classify_complexity, derive_suggested_squares, suggested_squares};
