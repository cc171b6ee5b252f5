//! Labor pricing from a conditional rate sheet.
//!
//! # Architecture
//!
//! - **Conditions**: A closed set of labor charges, parsed leniently from rate sheets
//! - **Rates**: Sheet rows keyed by condition, with built-in fallbacks for gaps
//! - **Calculator**: Measurements + job flags -> ordered labor lines
//!
//! # Example
//!
//! ```ignore
//! use roof_estimator::labor::{default_labor_rates, LaborCalculator};
//!
//! let rates = default_labor_rates();
//! for line in LaborCalculator::new(&rates).evaluate(&measurements) {
//!     println!("{}: {} -> {:.2}", line.description, line.quantity, line.extended_cost);
//! }
//! ```

mod calculator;
mod rates;
mod types;

pub use calculator::{disposal_excess_count, LaborCalculator, DISPOSAL_EXCESS_INCREMENT};
pub use rates::{
    default_labor_rates, fallback_description, fallback_rate, load_labor_rates, RateTable,
    ResolvedRate,
};
pub use types::*;
