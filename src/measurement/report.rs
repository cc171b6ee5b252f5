//! Measurement provider payload.
//!
//! The external report parser returns JSON shaped like this. Only the roof
//! geometry is read; property info, walls and window/door tables are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::EstimatorError;

use super::types::{
    Complexity, LinearMeasurements, PitchSegment, StructureRecord, SQUARE_FEET_PER_SQUARE,
};
use super::waste::classify_complexity;

/// Root of the provider's JSON report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderReport {
    pub roof_measurements: RoofTotals,
    pub pitch_breakdown: Vec<PitchRow>,
    pub suggested_waste: Option<WasteRow>,
    pub all_waste_calculations: Vec<WasteRow>,
    /// Per-structure breakdown; empty for single-structure reports
    pub structures: Vec<StructureReport>,
}

/// Report-level totals across all structures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoofTotals {
    pub total_area_sqft: f64,
    pub total_facets: u32,
    pub predominant_pitch: String,
    /// Free text from the report, e.g. "2" or "1 Story"
    pub num_stories: String,
    pub ridges_ft: f64,
    pub hips_ft: f64,
    pub valleys_ft: f64,
    pub rakes_ft: f64,
    pub eaves_ft: f64,
    pub flashing_ft: f64,
    pub step_flashing_ft: f64,
    pub drip_edge_ft: f64,
    pub estimated_attic_sqft: Option<f64>,
}

/// One column of the report's areas-per-pitch table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchRow {
    pub pitch: String,
    pub area_sqft: f64,
    pub percent_of_roof: f64,
}

/// One column of the report's waste table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WasteRow {
    pub waste_percent: u32,
    pub area_sqft: f64,
    pub squares: f64,
    pub is_suggested: bool,
}

/// Edge lengths for one structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeRow {
    pub ridges_ft: f64,
    pub hips_ft: f64,
    pub valleys_ft: f64,
    pub rakes_ft: f64,
    pub eaves_ft: f64,
    pub flashing_ft: f64,
    pub step_flashing_ft: f64,
    pub drip_edge_ft: f64,
}

/// One structure in a multi-structure report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureReport {
    pub structure_number: u32,
    pub total_area_sqft: f64,
    pub total_facets: u32,
    pub predominant_pitch: String,
    pub complexity: Option<String>,
    pub measurements: EdgeRow,
    pub pitch_breakdown: Vec<PitchRow>,
    pub suggested_waste: Option<WasteRow>,
    pub all_waste_calculations: Vec<WasteRow>,
}

impl ProviderReport {
    /// Parse the provider's JSON payload.
    ///
    /// Accepts the bare report or the parse service's response envelope
    /// (`{"success": true, "data": {...}}`). A failed response or a payload
    /// with neither `roof_measurements` nor `structures` is an error.
    pub fn from_json(json: &str) -> Result<Self, EstimatorError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| EstimatorError::Report(e.to_string()))?;
        let report = unwrap_envelope(value)?;

        let has_geometry = report
            .as_object()
            .is_some_and(|o| o.contains_key("roof_measurements") || o.contains_key("structures"));
        if !has_geometry {
            return Err(EstimatorError::Report(
                "payload has neither roof_measurements nor structures".to_string(),
            ));
        }

        serde_json::from_value(report).map_err(|e| EstimatorError::Report(e.to_string()))
    }

    /// Story count from the report's free-text field; 1 when unreadable.
    pub fn story_count(&self) -> u32 {
        parse_story_count(&self.roof_measurements.num_stories)
    }

    /// One record per structure. Reports without a structure breakdown
    /// produce a single record from the report-level totals.
    pub fn structure_records(&self) -> Vec<StructureRecord> {
        if self.structures.is_empty() {
            debug!("No structure breakdown, using report-level totals");
            return vec![self.report_level_record()];
        }

        self.structures
            .iter()
            .map(|s| {
                let pitch_segments = pitch_segments(&s.pitch_breakdown);
                let complexity = s
                    .complexity
                    .as_deref()
                    .and_then(Complexity::from_label)
                    .unwrap_or_else(|| classify_complexity(&pitch_segments));

                StructureRecord {
                    structure_number: s.structure_number,
                    area_sqft: s.total_area_sqft,
                    predominant_pitch: s.predominant_pitch.clone(),
                    complexity: Some(complexity),
                    edges: s.measurements.linear(),
                    pitch_segments,
                    suggested_squares: suggested_row(&s.suggested_waste, &s.all_waste_calculations)
                        .map(|row| row.squares),
                }
            })
            .collect()
    }

    /// Record built from the report-level totals.
    ///
    /// Without a suggested-waste figure the raw area in squares is used;
    /// report-level totals are never run through the waste heuristic.
    fn report_level_record(&self) -> StructureRecord {
        let r = &self.roof_measurements;
        let pitch_segments = pitch_segments(&self.pitch_breakdown);
        let suggested = suggested_row(&self.suggested_waste, &self.all_waste_calculations)
            .map(|row| row.squares)
            .unwrap_or(r.total_area_sqft / SQUARE_FEET_PER_SQUARE);

        StructureRecord {
            structure_number: 1,
            area_sqft: r.total_area_sqft,
            predominant_pitch: r.predominant_pitch.clone(),
            complexity: Some(classify_complexity(&pitch_segments)),
            edges: r.linear(),
            pitch_segments,
            suggested_squares: Some(suggested),
        }
    }
}

/// Pick the suggested waste row: the explicit one, else a table row flagged as suggested.
fn suggested_row<'a>(explicit: &'a Option<WasteRow>, table: &'a [WasteRow]) -> Option<&'a WasteRow> {
    explicit
        .as_ref()
        .or_else(|| table.iter().find(|row| row.is_suggested))
}

fn pitch_segments(rows: &[PitchRow]) -> Vec<PitchSegment> {
    rows.iter()
        .map(|row| PitchSegment {
            pitch: row.pitch.trim().to_string(),
            squares: row.area_sqft / SQUARE_FEET_PER_SQUARE,
            percent_of_roof: row.percent_of_roof,
        })
        .collect()
}

impl EdgeRow {
    pub fn linear(&self) -> LinearMeasurements {
        with_drip_edge_fallback(LinearMeasurements {
            eaves: self.eaves_ft,
            rakes: self.rakes_ft,
            valleys: self.valleys_ft,
            hips: self.hips_ft,
            ridges: self.ridges_ft,
            flashing: self.flashing_ft,
            step_flashing: self.step_flashing_ft,
            drip_edge: self.drip_edge_ft,
        })
    }
}

impl RoofTotals {
    pub fn linear(&self) -> LinearMeasurements {
        with_drip_edge_fallback(LinearMeasurements {
            eaves: self.eaves_ft,
            rakes: self.rakes_ft,
            valleys: self.valleys_ft,
            hips: self.hips_ft,
            ridges: self.ridges_ft,
            flashing: self.flashing_ft,
            step_flashing: self.step_flashing_ft,
            drip_edge: self.drip_edge_ft,
        })
    }
}

/// Strip the parse service's `{"success", "data"}` wrapper if present.
fn unwrap_envelope(value: Value) -> Result<Value, EstimatorError> {
    let Value::Object(mut root) = value else {
        return Ok(value);
    };

    if root.get("success").and_then(Value::as_bool) == Some(false) {
        let field = |key: &str| root.get(key).and_then(Value::as_str).unwrap_or_default();
        let error = match field("error") {
            "" => "unknown error",
            error => error,
        };
        let message = format!("report service failed: {} {}", error, field("detail"));
        warn!("{}", message.trim_end());
        return Err(EstimatorError::Report(message.trim_end().to_string()));
    }

    let wrapped = root.contains_key("success") || !root.contains_key("roof_measurements");
    match root.remove("data") {
        Some(data @ Value::Object(_)) if wrapped => {
            debug!("Unwrapped report service envelope");
            Ok(data)
        }
        Some(other) => {
            root.insert("data".to_string(), other);
            Ok(Value::Object(root))
        }
        None => Ok(Value::Object(root)),
    }
}

/// Drip edge runs along eaves and rakes; use that when the report has none.
fn with_drip_edge_fallback(mut edges: LinearMeasurements) -> LinearMeasurements {
    if edges.drip_edge <= 0.0 {
        edges.drip_edge = edges.eaves + edges.rakes;
    }
    edges
}

/// Parse the first integer out of a stories field ("2", "1 Story", ">1").
pub fn parse_story_count(text: &str) -> u32 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => {
            if !text.trim().is_empty() {
                warn!("Could not read story count from {:?}, assuming 1", text);
            }
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = r#"{
        "property": {"address": "12 Oak Lane, Springfield, IL 62704"},
        "roof_measurements": {
            "total_area_sqft": 2150,
            "total_facets": 9,
            "predominant_pitch": "6/12",
            "num_stories": "2",
            "ridges_ft": 42,
            "hips_ft": 18,
            "valleys_ft": 24,
            "rakes_ft": 60,
            "eaves_ft": 90,
            "flashing_ft": 6,
            "step_flashing_ft": 12,
            "drip_edge_ft": 0,
            "estimated_attic_sqft": null
        },
        "pitch_breakdown": [
            {"pitch": "6/12", "area_sqft": 1800, "percent_of_roof": 83.7},
            {"pitch": "2/12", "area_sqft": 350, "percent_of_roof": 16.3}
        ],
        "suggested_waste": null,
        "all_waste_calculations": [
            {"waste_percent": 0, "area_sqft": 2150, "squares": 21.5, "is_suggested": false},
            {"waste_percent": 12, "area_sqft": 2408, "squares": 24.33, "is_suggested": true}
        ],
        "windows_doors": []
    }"#;

    #[test]
    fn test_parse_single_structure_report() {
        let report = ProviderReport::from_json(SINGLE).unwrap();
        assert_eq!(report.roof_measurements.total_area_sqft, 2150.0);
        assert_eq!(report.pitch_breakdown.len(), 2);
        assert_eq!(report.story_count(), 2);
    }

    #[test]
    fn test_report_level_record_uses_flagged_waste_row() {
        let report = ProviderReport::from_json(SINGLE).unwrap();
        let records = report.structure_records();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.suggested_squares, Some(24.33));
        // drip edge reported as 0 falls back to eaves + rakes
        assert_eq!(record.edges.drip_edge, 150.0);
        assert_eq!(record.pitch_segments[0].squares, 18.0);
        assert_eq!(record.pitch_segments[1].squares, 3.5);
    }

    #[test]
    fn test_report_level_without_waste_uses_raw_area() {
        let report = ProviderReport::from_json(
            r#"{"roof_measurements": {"total_area_sqft": 1800, "predominant_pitch": "6/12"}}"#,
        )
        .unwrap();
        let records = report.structure_records();
        assert_eq!(records[0].suggested_squares, Some(18.0));
    }

    #[test]
    fn test_structure_records_leave_missing_waste_unset() {
        let report = ProviderReport::from_json(
            r#"{
                "roof_measurements": {"total_area_sqft": 3000},
                "structures": [
                    {"structure_number": 1, "total_area_sqft": 2000, "predominant_pitch": "8/12",
                     "measurements": {"eaves_ft": 80, "rakes_ft": 40, "drip_edge_ft": 120},
                     "pitch_breakdown": [{"pitch": "8/12", "area_sqft": 2000, "percent_of_roof": 100}],
                     "suggested_waste": {"waste_percent": 14, "area_sqft": 2280, "squares": 22.8, "is_suggested": true}},
                    {"structure_number": 2, "total_area_sqft": 1000, "predominant_pitch": "4/12",
                     "complexity": "Complex",
                     "measurements": {"eaves_ft": 30}}
                ]
            }"#,
        )
        .unwrap();

        let records = report.structure_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].suggested_squares, Some(22.8));
        assert_eq!(records[0].complexity, Some(Complexity::Simple));
        assert_eq!(records[1].suggested_squares, None);
        assert_eq!(records[1].complexity, Some(Complexity::Complex));
        assert_eq!(records[1].edges.drip_edge, 30.0);
    }

    #[test]
    fn test_invalid_json_is_report_error() {
        let err = ProviderReport::from_json("{not json").unwrap_err();
        assert!(matches!(err, EstimatorError::Report(_)));
    }

    #[test]
    fn test_success_envelope_is_unwrapped() {
        let wrapped = format!(r#"{{"success": true, "data": {}}}"#, SINGLE);
        let report = ProviderReport::from_json(&wrapped).unwrap();
        assert_eq!(report.roof_measurements.total_area_sqft, 2150.0);
        assert_eq!(report.story_count(), 2);
        assert_eq!(report.structure_records()[0].suggested_squares, Some(24.33));
    }

    #[test]
    fn test_failure_envelope_is_report_error() {
        let err = ProviderReport::from_json(
            r#"{"success": false, "error": "parse_failed", "detail": "no pages"}"#,
        )
        .unwrap_err();
        match err {
            EstimatorError::Report(message) => {
                assert!(message.contains("parse_failed"), "message was {}", message);
                assert!(message.contains("no pages"), "message was {}", message);
            }
            other => panic!("Expected a report error, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_without_geometry_is_report_error() {
        for json in [r#"{}"#, r#"{"foo": 1}"#, r#"{"success": true, "data": {}}"#, "[]"] {
            let err = ProviderReport::from_json(json).unwrap_err();
            assert!(matches!(err, EstimatorError::Report(_)), "accepted {}", json);
        }
    }

    #[test]
    fn test_structures_only_payload_parses() {
        let report = ProviderReport::from_json(
            r#"{"structures": [{"structure_number": 1, "total_area_sqft": 900}]}"#,
        )
        .unwrap();
        assert_eq!(report.structures.len(), 1);
    }

    #[test]
    fn test_parse_story_count() {
        assert_eq!(parse_story_count("2"), 2);
        assert_eq!(parse_story_count("1 Story"), 1);
        assert_eq!(parse_story_count(">1"), 1);
        assert_eq!(parse_story_count("3 stories"), 3);
        assert_eq!(parse_story_count(""), 1);
        assert_eq!(parse_story_count("unknown"), 1);
    }
}
