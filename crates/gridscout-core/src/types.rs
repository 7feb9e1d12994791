//! Domain types shared across the detection pipeline.
//!
//! Candidates are transient per request: they are created during one
//! detection run and returned directly to the caller. Serialized field
//! names are camelCase to match the external response shape.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Per-axis proximity check: both latitude and longitude differ by
    /// less than `epsilon` degrees.
    #[must_use]
    pub fn within_degrees(self, other: GeoPoint, epsilon: f64) -> bool {
        (self.lat - other.lat).abs() < epsilon && (self.lng - other.lng).abs() < epsilon
    }
}

/// Which detection path produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMethod {
    #[serde(rename = "keyword-search-enhanced")]
    KeywordSearchEnhanced,
    #[serde(rename = "satellite-ml-analysis")]
    SatelliteMlAnalysis,
}

/// Structured indicator flags extracted from a satellite image verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub has_transformers: bool,
    pub has_transmission_lines: bool,
    pub has_switching_equipment: bool,
    pub has_control_building: bool,
    pub has_security_fencing: bool,
    pub voltage_indicators: Vec<String>,
    pub confidence: u8,
}

/// A substation candidate discovered by either detection path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredSubstation {
    /// Provider place identifier, or synthetic `ml_<lat>_<lng>` for
    /// vision-only detections.
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub place_id: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub types: Vec<String>,
    /// Heuristic trust value, 0–100.
    pub confidence_score: u8,
    pub detection_method: DetectionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_analysis: Option<ImageAnalysis>,
}

impl DiscoveredSubstation {
    #[must_use]
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Rounded-coordinate key for this candidate's ~100 m cell.
    #[must_use]
    pub fn coord_key(&self) -> (i64, i64) {
        rounded_coord_key(self.latitude, self.longitude)
    }
}

/// Rounds a coordinate pair to 3 decimal places (~100 m cells) and returns
/// the scaled integers, so the key is `Eq`/`Hash` without float caveats.
#[must_use]
pub fn rounded_coord_key(lat: f64, lng: f64) -> (i64, i64) {
    #[allow(clippy::cast_possible_truncation)]
    let key = (
        (lat * 1000.0).round() as i64,
        (lng * 1000.0).round() as i64,
    );
    key
}
