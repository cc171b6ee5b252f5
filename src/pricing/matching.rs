//! Name and unit normalization plus the match scoring function.
//!
//! Scores:
//! - 3: normalized names are equal
//! - 2: names differ but category and normalized unit both agree
//! - 1: one normalized name contains the other
//! - 0: nothing in common

use super::types::{PriceCatalogEntry, PriceMatch};

pub const SCORE_EXACT_NAME: u8 = 3;
pub const SCORE_CATEGORY_AND_UNIT: u8 = 2;
pub const SCORE_NAME_CONTAINS: u8 = 1;
pub const SCORE_NONE: u8 = 0;

/// Normalize an item name for comparison.
///
/// Lowercases, drops trademark glyphs, periods, commas and quote marks,
/// spells `&` as "and", then collapses whitespace.
pub fn normalize_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        match c {
            '™' | '®' | '©' | '.' | ',' | '"' | '\'' | '\u{201C}' | '\u{201D}' | '\u{2018}'
            | '\u{2019}' => {}
            '&' => cleaned.push_str(" and "),
            _ => cleaned.push(c),
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map a unit spelling onto its canonical name ("BD", "bdl", "Bundles" -> "bundle").
/// Unknown units are returned lowercased and trimmed.
pub fn normalize_unit(unit: &str) -> String {
    let key: String = unit
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '.' | ' '))
        .collect();

    let canonical = match key.as_str() {
        "bd" | "bdl" | "bdle" | "bndl" | "bundle" | "bundles" => "bundle",
        "rl" | "rol" | "roll" | "rolls" => "roll",
        "pc" | "pcs" | "piece" | "pieces" => "piece",
        "ct" | "ctn" | "carton" | "cartons" => "carton",
        "bx" | "box" | "boxes" => "box",
        "tb" | "tube" | "tubes" => "tube",
        "ea" | "each" => "each",
        "kt" | "kit" | "kits" => "kit",
        "lf" | "lnft" | "linearfoot" | "linearfeet" => "linear foot",
        "sq" | "square" | "squares" => "square",
        "gal" | "gallon" | "gallons" => "gallon",
        "pl" | "pail" | "pails" => "pail",
        "lb" | "lbs" | "pound" | "pounds" => "pound",
        _ => return key,
    };
    canonical.to_string()
}

/// The normalized fields of one side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchKey {
    pub name: String,
    pub unit: String,
    pub category: String,
}

impl MatchKey {
    pub fn new(name: &str, unit: &str, category: &str) -> Self {
        Self {
            name: normalize_name(name),
            unit: normalize_unit(unit),
            category: category.trim().to_lowercase(),
        }
    }

    pub fn for_entry(entry: &PriceCatalogEntry) -> Self {
        Self::new(&entry.item_name, &entry.unit_of_measure, &entry.category)
    }
}

/// Score how well a catalog entry matches a line.
pub fn score_match(line: &MatchKey, entry: &MatchKey) -> u8 {
    let names_present = !line.name.is_empty() && !entry.name.is_empty();

    if names_present && line.name == entry.name {
        return SCORE_EXACT_NAME;
    }

    if !line.category.is_empty()
        && line.category == entry.category
        && !line.unit.is_empty()
        && line.unit == entry.unit
    {
        return SCORE_CATEGORY_AND_UNIT;
    }

    if names_present && (line.name.contains(&entry.name) || entry.name.contains(&line.name)) {
        return SCORE_NAME_CONTAINS;
    }

    SCORE_NONE
}

/// Pick the best-scoring catalog entry for a line.
///
/// The first entry with the strictly highest score wins, so catalog order
/// breaks ties. Returns None only for an empty catalog.
pub fn best_match(line: &MatchKey, entries: &[MatchKey]) -> Option<PriceMatch> {
    let mut best: Option<PriceMatch> = None;
    let mut best_score: i16 = -1;

    for (index, entry) in entries.iter().enumerate() {
        let score = score_match(line, entry);
        if i16::from(score) > best_score {
            best_score = i16::from(score);
            best = Some(PriceMatch {
                catalog_index: index,
                score,
            });
        }
    }

    best
}
