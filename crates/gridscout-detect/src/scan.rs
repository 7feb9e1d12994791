//! Satellite grid-scan phase.
//!
//! Lays a 5×5 grid of ~1 km cells around the center, row-major, and
//! submits a static satellite image of each cell to the vision model.
//! Cells close to an already-discovered candidate are skipped before any
//! external call is made. At most [`MAX_ANALYZED_CELLS`] cells are
//! actually analyzed per scan.

use std::time::Duration;

use gridscout_core::{DetectionMethod, DiscoveredSubstation, GeoPoint, ImageAnalysis};
use gridscout_vision::{satellite_image_url, SatelliteAnalysis, VisionClient};

use crate::detector::{cap_reached, DetectorConfig};

/// Grid half-width in cells: offsets −2..=2 on each axis.
const GRID_RADIUS_CELLS: i32 = 2;
/// Cell spacing in degrees (~1 km).
const GRID_SPACING_DEG: f64 = 0.01;
/// Hard cap on cells submitted to the vision model per scan.
const MAX_ANALYZED_CELLS: usize = 9;
/// Cells within this per-axis distance (≈300 m) of an existing candidate
/// are skipped at generation time. Distinct from the ~100 m dedup cell —
/// coarse early-skip, fine final-merge.
const PROXIMITY_SKIP_DEG: f64 = 0.003;
/// Verdicts must exceed this confidence (after boosts) to be admitted.
const SATELLITE_ADMIT_THRESHOLD: u8 = 75;

/// Runs the grid scan, appending admitted synthetic candidates to `found`.
///
/// Per-cell failures (model call, malformed reply) are logged and count as
/// negative detections; the scan continues with the next cell. The scan
/// stops early once `found` reaches `cap` (cap > 0).
pub(crate) async fn run(
    vision: &VisionClient,
    config: &DetectorConfig,
    center: GeoPoint,
    cap: usize,
    found: &mut Vec<DiscoveredSubstation>,
) {
    let mut analyzed = 0usize;

    'grid: for di in -GRID_RADIUS_CELLS..=GRID_RADIUS_CELLS {
        for dj in -GRID_RADIUS_CELLS..=GRID_RADIUS_CELLS {
            if cap_reached(found.len(), cap) {
                tracing::debug!(cap, "result cap reached, stopping satellite scan");
                break 'grid;
            }
            if analyzed >= MAX_ANALYZED_CELLS {
                tracing::debug!(analyzed, "cell analysis budget exhausted");
                break 'grid;
            }

            let cell = GeoPoint::new(
                center.lat + f64::from(di) * GRID_SPACING_DEG,
                center.lng + f64::from(dj) * GRID_SPACING_DEG,
            );

            if found
                .iter()
                .any(|s| s.location().within_degrees(cell, PROXIMITY_SKIP_DEG))
            {
                tracing::debug!(lat = cell.lat, lng = cell.lng, "cell near known candidate, skipping");
                continue;
            }

            if analyzed > 0 && config.cell_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(config.cell_delay_ms)).await;
            }
            analyzed += 1;

            let image_url = match satellite_image_url(
                config.imagery_base_url.as_deref(),
                &config.imagery_api_key,
                cell,
            ) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(error = %e, "imagery URL construction failed, skipping cell");
                    continue;
                }
            };

            let verdict = match vision.analyze_satellite_image(image_url.as_str()).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    tracing::warn!(
                        lat = cell.lat,
                        lng = cell.lng,
                        error = %e,
                        "cell analysis failed, treating as negative"
                    );
                    continue;
                }
            };

            let confidence = boosted_confidence(&verdict);
            if verdict.is_substation && confidence > SATELLITE_ADMIT_THRESHOLD {
                tracing::info!(
                    lat = cell.lat,
                    lng = cell.lng,
                    confidence,
                    "satellite detection admitted"
                );
                found.push(synthetic_substation(cell, confidence, &verdict));
            }
        }
    }

    tracing::info!(analyzed, count = found.len(), "satellite scan phase complete");
}

/// Applies the conservative indicator boosts to the raw model confidence.
///
/// +5 when transformers and transmission lines are both present; +5 when
/// fencing and switching equipment are both present. Each boost applies
/// independently; the result is capped at 100.
fn boosted_confidence(verdict: &SatelliteAnalysis) -> u8 {
    let mut confidence = u32::from(verdict.confidence_score());
    if verdict.has_transformers && verdict.has_transmission_lines {
        confidence += 5;
    }
    if verdict.has_security_fencing && verdict.has_switching_equipment {
        confidence += 5;
    }
    u8::try_from(confidence.min(100)).unwrap_or(100)
}

fn synthetic_substation(
    cell: GeoPoint,
    confidence: u8,
    verdict: &SatelliteAnalysis,
) -> DiscoveredSubstation {
    let id = format!("ml_{:.6}_{:.6}", cell.lat, cell.lng);
    DiscoveredSubstation {
        id: id.clone(),
        name: format!("AI Detected: Substation ({confidence}% confidence)"),
        latitude: cell.lat,
        longitude: cell.lng,
        place_id: id,
        address: format!("Satellite detection near {:.4}, {:.4}", cell.lat, cell.lng),
        rating: None,
        types: vec!["electrical_substation".to_owned(), "ml_detected".to_owned()],
        confidence_score: confidence,
        detection_method: DetectionMethod::SatelliteMlAnalysis,
        image_analysis: Some(ImageAnalysis {
            has_transformers: verdict.has_transformers,
            has_transmission_lines: verdict.has_transmission_lines,
            has_switching_equipment: verdict.has_switching_equipment,
            has_control_building: verdict.has_control_building,
            has_security_fencing: verdict.has_security_fencing,
            voltage_indicators: verdict.voltage_indicators.clone(),
            confidence: verdict.confidence_score(),
        }),
    }
}
