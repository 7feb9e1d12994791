//! Vision API wire types and the structured analysis verdict.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Chat-completion wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub(crate) enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsed verdict
// ---------------------------------------------------------------------------

/// The model's structured verdict for one satellite image.
///
/// Every field defaults, so a reply missing fields still parses; a reply
/// that fails to parse at all is replaced by [`SatelliteAnalysis::default`]
/// (a negative verdict) rather than failing the scan.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SatelliteAnalysis {
    pub is_substation: bool,
    pub confidence: f64,
    pub has_transformers: bool,
    pub has_transmission_lines: bool,
    pub has_switching_equipment: bool,
    pub has_control_building: bool,
    pub has_security_fencing: bool,
    pub voltage_indicators: Vec<String>,
    pub reasoning: String,
}

impl SatelliteAnalysis {
    /// Confidence clamped into the 0–100 integer range.
    #[must_use]
    pub fn confidence_score(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let score = self.confidence.clamp(0.0, 100.0).round() as u8;
        score
    }
}
