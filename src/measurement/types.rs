//! Type definitions for roof geometry.
//!
//! `StructureRecord` is what the measurement provider hands us per structure;
//! `RoofMeasurementSet` is the canonical, merged geometry every later stage reads.

use serde::{Deserialize, Serialize};

/// Area units per roofing square.
pub const SQUARE_FEET_PER_SQUARE: f64 = 100.0;

/// A portion of roof area sharing one slope, e.g. "8/12".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchSegment {
    /// Pitch label as reported ("8/12")
    pub pitch: String,
    /// Area contribution in squares
    pub squares: f64,
    /// Share of the roof as reported by the provider; not recomputed after merge
    pub percent_of_roof: f64,
}

impl PitchSegment {
    pub fn new(pitch: &str, squares: f64) -> Self {
        Self {
            pitch: pitch.to_string(),
            squares,
            percent_of_roof: 0.0,
        }
    }

    /// Rise of this segment's pitch (the 8 in "8/12").
    pub fn rise(&self) -> Option<u32> {
        parse_rise(&self.pitch)
    }
}

/// Read the rise from a pitch label: "8/12" -> 8, "12/12+" -> 12.
/// Returns None for labels without a leading number.
pub fn parse_rise(label: &str) -> Option<u32> {
    let rise = label.trim().split('/').next()?.trim();
    rise.parse::<u32>().ok()
}

/// Linear edge lengths, all in feet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinearMeasurements {
    pub eaves: f64,
    pub rakes: f64,
    pub valleys: f64,
    pub hips: f64,
    pub ridges: f64,
    pub flashing: f64,
    pub step_flashing: f64,
    pub drip_edge: f64,
}

impl LinearMeasurements {
    /// Copy with every negative or non-finite length replaced by 0.
    pub fn clamped(&self) -> Self {
        Self {
            eaves: non_negative(self.eaves),
            rakes: non_negative(self.rakes),
            valleys: non_negative(self.valleys),
            hips: non_negative(self.hips),
            ridges: non_negative(self.ridges),
            flashing: non_negative(self.flashing),
            step_flashing: non_negative(self.step_flashing),
            drip_edge: non_negative(self.drip_edge),
        }
    }

    /// Names of the lengths `clamped` would change.
    pub fn clamped_fields(&self) -> Vec<&'static str> {
        [
            ("eaves", self.eaves),
            ("rakes", self.rakes),
            ("valleys", self.valleys),
            ("hips", self.hips),
            ("ridges", self.ridges),
            ("flashing", self.flashing),
            ("step_flashing", self.step_flashing),
            ("drip_edge", self.drip_edge),
        ]
        .into_iter()
        .filter(|(_, value)| non_negative(*value) != *value)
        .map(|(name, _)| name)
        .collect()
    }

    /// Add another structure's lengths to these.
    pub fn accumulate(&mut self, other: &LinearMeasurements) {
        self.eaves += other.eaves;
        self.rakes += other.rakes;
        self.valleys += other.valleys;
        self.hips += other.hips;
        self.ridges += other.ridges;
        self.flashing += other.flashing;
        self.step_flashing += other.step_flashing;
        self.drip_edge += other.drip_edge;
    }
}

/// Clamp a measurement to a usable non-negative value.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// How involved a structure's roof is, judged from its pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Complexity {
    #[default]
    Simple,
    Normal,
    Complex,
}

impl Complexity {
    /// Parse the provider's label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Complexity> {
        match label.trim().to_lowercase().as_str() {
            "simple" => Some(Complexity::Simple),
            "normal" => Some(Complexity::Normal),
            "complex" => Some(Complexity::Complex),
            _ => None,
        }
    }
}

/// Job-site conditions that gate rules and upcharges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConditions {
    pub trailer_access: bool,
    pub second_layer: bool,
    pub ridge_vent: bool,
    pub third_story: bool,
    pub hand_load: bool,
    pub stories: u32,
}

impl Default for JobConditions {
    fn default() -> Self {
        Self {
            trailer_access: true,
            second_layer: false,
            ridge_vent: false,
            third_story: false,
            hand_load: false,
            stories: 1,
        }
    }
}

/// One structure's measurements as supplied by the measurement provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructureRecord {
    pub structure_number: u32,
    pub area_sqft: f64,
    pub predominant_pitch: String,
    pub complexity: Option<Complexity>,
    pub edges: LinearMeasurements,
    pub pitch_segments: Vec<PitchSegment>,
    /// Provider's waste-adjusted squares, if it computed one
    pub suggested_squares: Option<f64>,
}

/// Canonical geometry for one estimate. Built once per calculation pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoofMeasurementSet {
    /// Structure numbers merged into this set, in input order
    pub structures: Vec<u32>,
    /// Raw roof area in squares, before waste
    pub total_area_squares: f64,
    /// Waste-adjusted squares, rounded up per structure then summed
    pub effective_squares: u32,
    pub edges: LinearMeasurements,
    /// Area in squares on pitches flat enough to need low-slope materials
    pub low_pitch_squares: f64,
    pub pitch_segments: Vec<PitchSegment>,
    pub predominant_pitch: Option<String>,
    pub complexity: Complexity,
    pub conditions: JobConditions,
}

impl RoofMeasurementSet {
    pub fn eaves_and_rakes(&self) -> f64 {
        self.edges.eaves + self.edges.rakes
    }

    pub fn hips_and_ridges(&self) -> f64 {
        self.edges.hips + self.edges.ridges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rise() {
        assert_eq!(parse_rise("8/12"), Some(8));
        assert_eq!(parse_rise(" 10/12 "), Some(10));
        assert_eq!(parse_rise("12/12+"), Some(12));
        assert_eq!(parse_rise("0/12"), Some(0));
        assert_eq!(parse_rise("flat"), None);
        assert_eq!(parse_rise(""), None);
    }

    #[test]
    fn test_clamped_replaces_negative_and_nan() {
        let edges = LinearMeasurements {
            eaves: -4.0,
            rakes: f64::NAN,
            ridges: 30.0,
            ..Default::default()
        };
        let clamped = edges.clamped();
        assert_eq!(clamped.eaves, 0.0);
        assert_eq!(clamped.rakes, 0.0);
        assert_eq!(clamped.ridges, 30.0);
    }

    #[test]
    fn test_clamped_fields_names_changed_lengths() {
        let edges = LinearMeasurements {
            eaves: -4.0,
            rakes: f64::NAN,
            ridges: 30.0,
            ..Default::default()
        };
        assert_eq!(edges.clamped_fields(), vec!["eaves", "rakes"]);
        assert!(LinearMeasurements::default().clamped_fields().is_empty());
    }

    #[test]
    fn test_accumulate_sums_every_edge() {
        let mut total = LinearMeasurements {
            eaves: 10.0,
            hips: 5.0,
            ..Default::default()
        };
        total.accumulate(&LinearMeasurements {
            eaves: 2.5,
            hips: 1.0,
            drip_edge: 7.0,
            ..Default::default()
        });
        assert_eq!(total.eaves, 12.5);
        assert_eq!(total.hips, 6.0);
        assert_eq!(total.drip_edge, 7.0);
    }

    #[test]
    fn test_complexity_label_and_order() {
        assert_eq!(Complexity::from_label("COMPLEX"), Some(Complexity::Complex));
        assert_eq!(Complexity::from_label("normal"), Some(Complexity::Normal));
        assert_eq!(Complexity::from_label("weird"), None);
        assert!(Complexity::Complex > Complexity::Simple);
    }

    #[test]
    fn test_default_conditions_allow_trailer() {
        let conditions = JobConditions::default();
        assert!(conditions.trailer_access);
        assert_eq!(conditions.stories, 1);
    }
}
