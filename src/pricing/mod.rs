//! Price resolution for material order lines.
//!
//! Rule names rarely match supplier catalog names byte for byte, so lines
//! are matched on normalized names, units and categories and the best
//! scoring entry supplies the price.
//!
//! # Example
//!
//! ```ignore
//! use roof_estimator::pricing::{default_price_catalog, PriceResolver};
//! use roof_estimator::settings::PricingSettings;
//!
//! let prices = default_price_catalog();
//! let priced = PriceResolver::new(&prices, &PricingSettings::default()).resolve(lines);
//! ```

mod matching;
mod resolver;
mod types;

pub use matching::{best_match, normalize_name, normalize_unit, score_match, MatchKey};
pub use resolver::{default_price_catalog, load_price_catalog, PriceResolver};
pub use types::*;
