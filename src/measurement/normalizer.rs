//! Merge selected structures into one `RoofMeasurementSet`.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::settings::EngineSettings;

use super::types::{
    non_negative, JobConditions, PitchSegment, RoofMeasurementSet, StructureRecord,
    SQUARE_FEET_PER_SQUARE,
};
use super::waste::{classify_complexity, suggested_squares};

/// Which structures of a report to include in the estimate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StructureSelection {
    #[default]
    All,
    Only(BTreeSet<u32>),
}

impl StructureSelection {
    pub fn only<I: IntoIterator<Item = u32>>(numbers: I) -> Self {
        StructureSelection::Only(numbers.into_iter().collect())
    }

    pub fn includes(&self, structure_number: u32) -> bool {
        match self {
            StructureSelection::All => true,
            StructureSelection::Only(numbers) => numbers.contains(&structure_number),
        }
    }
}

/// Build the canonical measurement set from the selected structures.
///
/// Effective squares are the sum of each structure's suggested squares rounded
/// up on its own, not the rounded sum. Edges are summed, pitch segments merged
/// by label. With a single structure its own pitch label is kept as the
/// predominant pitch.
pub fn normalize(
    records: &[StructureRecord],
    selection: &StructureSelection,
    conditions: JobConditions,
    settings: &EngineSettings,
) -> RoofMeasurementSet {
    let included: Vec<&StructureRecord> = records
        .iter()
        .filter(|r| selection.includes(r.structure_number))
        .collect();

    let mut set = RoofMeasurementSet {
        conditions,
        ..Default::default()
    };

    if included.is_empty() {
        warn!(
            "No structures selected out of {}, estimate will be empty",
            records.len()
        );
        return set;
    }

    for record in &included {
        if record.area_sqft < 0.0 {
            warn!(
                "Structure {} has negative area {}, clamping to 0",
                record.structure_number, record.area_sqft
            );
        }

        let clamped_edges = record.edges.clamped_fields();
        if !clamped_edges.is_empty() {
            warn!(
                "Structure {} has negative or invalid {}, clamping to 0",
                record.structure_number,
                clamped_edges.join(", ")
            );
        }
        let bad_pitches = clamped_pitches(&record.pitch_segments);
        if !bad_pitches.is_empty() {
            warn!(
                "Structure {} has negative or invalid area on pitch {}, clamping to 0",
                record.structure_number,
                bad_pitches.join(", ")
            );
        }

        let squares = non_negative(suggested_squares(record, &settings.waste));
        let rounded = whole_squares(squares);
        debug!(
            "Structure {}: {:.2} suggested squares -> {}",
            record.structure_number, squares, rounded
        );

        set.effective_squares = set.effective_squares.saturating_add(rounded);
        set.total_area_squares += non_negative(record.area_sqft) / SQUARE_FEET_PER_SQUARE;
        set.edges.accumulate(&record.edges.clamped());
        merge_pitch_segments(&mut set.pitch_segments, &record.pitch_segments);

        let complexity = record
            .complexity
            .unwrap_or_else(|| classify_complexity(&record.pitch_segments));
        set.complexity = set.complexity.max(complexity);
        set.structures.push(record.structure_number);
    }

    set.low_pitch_squares = low_pitch_squares(&set.pitch_segments, settings.low_pitch.max_rise);
    set.predominant_pitch = match included.as_slice() {
        [only] if !only.predominant_pitch.trim().is_empty() => {
            Some(only.predominant_pitch.trim().to_string())
        }
        _ => predominant_pitch(&set.pitch_segments),
    };

    info!(
        "Normalized {} structure(s): {} effective squares, {:.2} raw squares",
        set.structures.len(),
        set.effective_squares,
        set.total_area_squares
    );

    set
}

/// Round suggested squares up to whole squares, saturating at `u32::MAX`.
fn whole_squares(squares: f64) -> u32 {
    let whole = squares.ceil();
    if whole > f64::from(u32::MAX) {
        warn!("Suggested squares {} exceed {}, saturating", squares, u32::MAX);
        return u32::MAX;
    }
    whole as u32
}

/// Labels of segments whose area would be clamped to 0.
fn clamped_pitches(segments: &[PitchSegment]) -> Vec<&str> {
    segments
        .iter()
        .filter(|s| non_negative(s.squares) != s.squares)
        .map(|s| s.pitch.as_str())
        .collect()
}

/// Merge incoming segments into `merged`: same labels add their area,
/// new labels are appended. Percent-of-roof keeps the first value seen.
pub fn merge_pitch_segments(merged: &mut Vec<PitchSegment>, incoming: &[PitchSegment]) {
    for segment in incoming {
        let squares = non_negative(segment.squares);
        match merged.iter_mut().find(|s| s.pitch == segment.pitch) {
            Some(existing) => existing.squares += squares,
            None => merged.push(PitchSegment {
                pitch: segment.pitch.clone(),
                squares,
                percent_of_roof: segment.percent_of_roof,
            }),
        }
    }
}

/// Squares on pitches with rise at or below `max_rise`.
pub fn low_pitch_squares(segments: &[PitchSegment], max_rise: u32) -> f64 {
    segments
        .iter()
        .filter(|s| s.rise().is_some_and(|rise| rise <= max_rise))
        .map(|s| s.squares)
        .sum()
}

/// Label with the largest area; the first one seen wins ties.
fn predominant_pitch(segments: &[PitchSegment]) -> Option<String> {
    let mut best: Option<&PitchSegment> = None;
    for segment in segments {
        if best.map_or(true, |b| segment.squares > b.squares) {
            best = Some(segment);
        }
    }
    best.map(|s| s.pitch.clone())
}
