//! Satellite imagery and vision-model analysis.
//!
//! Builds static satellite image URLs for grid cells and submits them to a
//! vision-capable chat-completion model, parsing the model's free-form
//! reply into a structured verdict with a parse-or-default fallback.

mod client;
mod error;
mod imagery;
mod parse;
mod prompt;
mod types;

pub use client::VisionClient;
pub use error::VisionError;
pub use imagery::satellite_image_url;
pub use parse::{extract_json_block, parse_analysis_or_default};
pub use prompt::analysis_prompt;
pub use types::SatelliteAnalysis;
