//! Defensive parsing of model replies.
//!
//! The prompt demands bare JSON but models routinely wrap the object in
//! prose or code fences. The extractor grabs the outermost brace-delimited
//! block; anything that still fails to parse becomes a negative verdict
//! instead of an error, so one chatty reply never aborts a scan.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::SatelliteAnalysis;

fn json_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Greedy across newlines: first `{` through last `}`.
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex"))
}

/// Extracts the outermost `{…}` block from a model reply, if any.
#[must_use]
pub fn extract_json_block(text: &str) -> Option<&str> {
    json_block_re().find(text).map(|m| m.as_str())
}

/// Parses a model reply into a [`SatelliteAnalysis`], falling back to the
/// default negative verdict (`is_substation=false, confidence=0`) when no
/// JSON block is present or the block does not parse.
#[must_use]
pub fn parse_analysis_or_default(text: &str) -> SatelliteAnalysis {
    let Some(block) = extract_json_block(text) else {
        tracing::debug!("vision reply contained no JSON block, treating as negative");
        return SatelliteAnalysis::default();
    };
    match serde_json::from_str::<SatelliteAnalysis>(block) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::debug!(error = %e, "vision reply JSON did not parse, treating as negative");
            SatelliteAnalysis::default()
        }
    }
}
