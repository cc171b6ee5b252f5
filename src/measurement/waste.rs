//! Waste and complexity heuristics for structures the provider left incomplete.

use tracing::{debug, warn};

use crate::settings::WasteSettings;

use super::types::{
    non_negative, parse_rise, Complexity, PitchSegment, StructureRecord, SQUARE_FEET_PER_SQUARE,
};

/// Rise at or above which a pitch makes a structure complex.
const COMPLEX_MIN_RISE: u32 = 12;

/// Waste-adjusted squares for a structure with no provider figure.
///
/// `base = area / 100`, then `base * (1 + percent / 100)` with the percent
/// picked by `WasteSettings::percent_for`.
pub fn derive_suggested_squares(area_sqft: f64, predominant_pitch: &str, waste: &WasteSettings) -> f64 {
    let base = non_negative(area_sqft) / SQUARE_FEET_PER_SQUARE;
    let percent = waste.percent_for(base, parse_rise(predominant_pitch));
    debug!(
        "Derived waste {}% for {:.2} squares at pitch {:?}",
        percent, base, predominant_pitch
    );
    base * (1.0 + percent / 100.0)
}

/// The structure's suggested squares: the provider's figure when present
/// (negative clamps to 0), otherwise derived from area and predominant pitch.
/// A non-finite provider figure counts as missing.
pub fn suggested_squares(record: &StructureRecord, waste: &WasteSettings) -> f64 {
    match record.suggested_squares {
        Some(squares) if squares.is_finite() => {
            if squares < 0.0 {
                warn!(
                    "Structure {} has negative suggested squares {}, clamping to 0",
                    record.structure_number, squares
                );
                return 0.0;
            }
            squares
        }
        _ => derive_suggested_squares(record.area_sqft, &record.predominant_pitch, waste),
    }
}

/// Classify a structure from its pitch breakdown.
///
/// Any pitch of 12/12 or steeper is complex; more than two distinct pitches
/// is normal; anything else is simple.
pub fn classify_complexity(segments: &[PitchSegment]) -> Complexity {
    if segments
        .iter()
        .any(|s| s.rise().is_some_and(|rise| rise >= COMPLEX_MIN_RISE))
    {
        return Complexity::Complex;
    }

    let mut labels: Vec<&str> = segments.iter().map(|s| s.pitch.as_str()).collect();
    labels.sort_unstable();
    labels.dedup();

    if labels.len() > 2 {
        Complexity::Normal
    } else {
        Complexity::Simple
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(area_sqft: f64, pitch: &str, suggested: Option<f64>) -> StructureRecord {
        StructureRecord {
            structure_number: 1,
            area_sqft,
            predominant_pitch: pitch.to_string(),
            suggested_squares: suggested,
            ..Default::default()
        }
    }

    #[test]
    fn test_baseline_waste() {
        let squares = derive_suggested_squares(1500.0, "6/12", &WasteSettings::default());
        assert_relative_eq!(squares, 16.8, epsilon = 1e-9);
    }

    #[test]
    fn test_steep_waste() {
        let squares = derive_suggested_squares(1500.0, "10/12", &WasteSettings::default());
        assert_relative_eq!(squares, 17.7, epsilon = 1e-9);
    }

    #[test]
    fn test_tiny_structure_penalty() {
        // 150 sq ft = 1.5 squares, below the 2-square threshold
        let squares = derive_suggested_squares(150.0, "4/12", &WasteSettings::default());
        assert_relative_eq!(squares, 1.5 * 1.94, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_area_derives_zero() {
        let squares = derive_suggested_squares(-300.0, "6/12", &WasteSettings::default());
        assert_eq!(squares, 0.0);
    }

    #[test]
    fn test_provider_figure_wins() {
        let waste = WasteSettings::default();
        assert_eq!(suggested_squares(&record(1500.0, "6/12", Some(18.33)), &waste), 18.33);
    }

    #[test]
    fn test_negative_provider_figure_clamps_to_zero() {
        let waste = WasteSettings::default();
        assert_eq!(suggested_squares(&record(1500.0, "6/12", Some(-3.0)), &waste), 0.0);
    }

    #[test]
    fn test_non_finite_provider_figure_is_derived() {
        let waste = WasteSettings::default();
        let squares = suggested_squares(&record(1500.0, "6/12", Some(f64::NAN)), &waste);
        assert_relative_eq!(squares, 16.8, epsilon = 1e-9);
        let squares = suggested_squares(&record(1500.0, "6/12", None), &waste);
        assert_relative_eq!(squares, 16.8, epsilon = 1e-9);
    }

    #[test]
    fn test_classify_complexity() {
        let simple = vec![PitchSegment::new("6/12", 10.0), PitchSegment::new("4/12", 2.0)];
        assert_eq!(classify_complexity(&simple), Complexity::Simple);

        let normal = vec![
            PitchSegment::new("6/12", 10.0),
            PitchSegment::new("4/12", 2.0),
            PitchSegment::new("8/12", 1.0),
        ];
        assert_eq!(classify_complexity(&normal), Complexity::Normal);

        let complex = vec![PitchSegment::new("12/12", 3.0)];
        assert_eq!(classify_complexity(&complex), Complexity::Complex);

        assert_eq!(classify_complexity(&[]), Complexity::Simple);
    }
}
