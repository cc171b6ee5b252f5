//! Accessory items entered by hand (pipe boots, vents, flashing kits).
//!
//! These are not sized by formulas; the user supplies a count per kind and
//! the accessory catalog supplies the name, unit and, where known, a fixed price.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::EstimatorError;

use super::types::MaterialLineItem;

/// Accessory kinds the order form knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessoryKind {
    #[serde(rename = "lead-boot-1.5in")]
    LeadBoot1_5In,
    #[serde(rename = "lead-boot-2in")]
    LeadBoot2In,
    #[serde(rename = "lead-boot-3in")]
    LeadBoot3In,
    TurtleVent,
    ChimneyFlashingKit,
    BaseFlashing,
    VentCap,
}

impl AccessoryKind {
    pub const ALL: [AccessoryKind; 7] = [
        AccessoryKind::LeadBoot1_5In,
        AccessoryKind::LeadBoot2In,
        AccessoryKind::LeadBoot3In,
        AccessoryKind::TurtleVent,
        AccessoryKind::ChimneyFlashingKit,
        AccessoryKind::BaseFlashing,
        AccessoryKind::VentCap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessoryKind::LeadBoot1_5In => "lead-boot-1.5in",
            AccessoryKind::LeadBoot2In => "lead-boot-2in",
            AccessoryKind::LeadBoot3In => "lead-boot-3in",
            AccessoryKind::TurtleVent => "turtle-vent",
            AccessoryKind::ChimneyFlashingKit => "chimney-flashing-kit",
            AccessoryKind::BaseFlashing => "base-flashing",
            AccessoryKind::VentCap => "vent-cap",
        }
    }

    /// Synthetic line id for this accessory.
    pub fn line_id(&self) -> String {
        format!("acc-{}", self.as_str())
    }
}

impl fmt::Display for AccessoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessoryKind {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['_', ' '], "-");
        AccessoryKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| EstimatorError::Catalog(format!("Unknown accessory kind: {}", s)))
    }
}

/// Catalog entry describing one accessory kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryDefinition {
    pub kind: AccessoryKind,
    #[serde(alias = "itemName")]
    pub item_name: String,
    #[serde(alias = "unitOfMeasure")]
    pub unit_of_measure: String,
    #[serde(default)]
    pub category: String,
    /// Fixed price per unit; None leaves the line for the price resolver
    #[serde(default, alias = "unitPrice")]
    pub unit_price: Option<f64>,
}

/// Root of accessories.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessoryCatalog {
    #[serde(default)]
    pub accessories: Vec<AccessoryDefinition>,
}

impl AccessoryCatalog {
    pub fn definition(&self, kind: AccessoryKind) -> Option<&AccessoryDefinition> {
        self.accessories.iter().find(|d| d.kind == kind)
    }
}

/// A user-entered accessory count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryOrder {
    pub kind: AccessoryKind,
    pub quantity: u32,
}

impl FromStr for AccessoryOrder {
    type Err = EstimatorError;

    /// Parse `kind=qty`, e.g. `turtle-vent=4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, quantity) = s
            .split_once('=')
            .ok_or_else(|| EstimatorError::Catalog(format!("Expected kind=qty, got {:?}", s)))?;
        let quantity = quantity.trim().parse::<u32>().map_err(|_| {
            EstimatorError::Catalog(format!("Invalid accessory quantity in {:?}", s))
        })?;
        Ok(AccessoryOrder {
            kind: kind.parse()?,
            quantity,
        })
    }
}

/// Build order lines for the user's accessories, in the order given.
///
/// Zero quantities are omitted. Kinds missing from the catalog still get a
/// line, named after the kind and left unpriced.
pub fn accessory_lines(orders: &[AccessoryOrder], catalog: &AccessoryCatalog) -> Vec<MaterialLineItem> {
    orders
        .iter()
        .filter(|order| order.quantity > 0)
        .map(|order| {
            let mut line = match catalog.definition(order.kind) {
                Some(def) => MaterialLineItem {
                    id: order.kind.line_id(),
                    item_name: def.item_name.clone(),
                    unit_of_measure: def.unit_of_measure.clone(),
                    quantity: order.quantity,
                    unit_price: 0.0,
                    extended_cost: 0.0,
                    category: def.category.clone(),
                    needs_review: false,
                    match_score: None,
                },
                None => {
                    warn!("Accessory {} missing from catalog", order.kind);
                    MaterialLineItem {
                        id: order.kind.line_id(),
                        item_name: order.kind.as_str().to_string(),
                        unit_of_measure: "EA".to_string(),
                        quantity: order.quantity,
                        unit_price: 0.0,
                        extended_cost: 0.0,
                        category: "Accessories".to_string(),
                        needs_review: false,
                        match_score: None,
                    }
                }
            };

            if let Some(price) = catalog.definition(order.kind).and_then(|d| d.unit_price) {
                line.set_unit_price(price);
            }
            debug!("Accessory {} x{}", line.item_name, line.quantity);
            line
        })
        .collect()
}
