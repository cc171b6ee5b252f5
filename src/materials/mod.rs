//! Material ordering: rule-driven quantities and hand-entered accessories.
//!
//! # Architecture
//!
//! - **Rules**: Loaded from a rule catalog (or the embedded defaults)
//! - **Formulas**: A closed set of quantity formulas, parsed from catalog text
//! - **Evaluation**: Measurements -> unpriced order lines, rounded up
//! - **Accessories**: User counts -> order lines, with fixed prices where known
//!
//! # Example
//!
//! ```ignore
//! use roof_estimator::materials::{default_rule_catalog, QuantityEngine};
//!
//! let rules = default_rule_catalog();
//! let lines = QuantityEngine::new(&rules).evaluate(&measurements);
//!
//! for line in &lines {
//!     println!("{} {} {}", line.quantity, line.unit_of_measure, line.item_name);
//! }
//! ```

mod accessories;
mod engine;
mod formula;
mod rules;
mod types;

pub use accessories::{
    accessory_lines, AccessoryCatalog, AccessoryDefinition, AccessoryKind, AccessoryOrder,
};
pub use engine::{round_up_quantity, QuantityEngine};
pub use formula::QuantityFormula;
pub use rules::{
    default_accessory_catalog, default_rule_catalog, load_accessory_catalog, load_rule_catalog,
};
pub use types::*;
