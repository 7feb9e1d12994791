//! Deduplication and ranking.
//!
//! Candidates are collapsed into ~100 m coordinate cells (3-decimal
//! rounding on each axis); each cell keeps its single best entry. The
//! survivors are then sorted by confidence descending, with first-seen
//! order preserved among equals.

use std::collections::HashMap;

use gridscout_core::{rounded_coord_key, DetectionMethod, DiscoveredSubstation};

/// Collapses coordinate-cell duplicates and ranks the survivors.
///
/// Within a cell, a later candidate replaces the kept one only when its
/// confidence is strictly higher, or equal with keyword provenance beating
/// satellite provenance. The pass is idempotent: feeding its output back
/// in returns the same list in the same order.
#[must_use]
pub fn dedupe_and_rank(candidates: Vec<DiscoveredSubstation>) -> Vec<DiscoveredSubstation> {
    let before = candidates.len();
    // First-seen order held in the Vec; the map stores indices into it so
    // a stable sort afterwards keeps insertion order among equals.
    let mut kept: Vec<DiscoveredSubstation> = Vec::new();
    let mut by_cell: HashMap<(i64, i64), usize> = HashMap::new();

    for candidate in candidates {
        match by_cell.get(&candidate.coord_key()) {
            Some(&idx) => {
                if replaces(&candidate, &kept[idx]) {
                    kept[idx] = candidate;
                }
            }
            None => {
                by_cell.insert(candidate.coord_key(), kept.len());
                kept.push(candidate);
            }
        }
    }

    kept.sort_by(|a, b| b.confidence_score.cmp(&a.confidence_score));
    tracing::debug!(before, after = kept.len(), "dedup and rank complete");
    kept
}

/// Whether `challenger` should displace `incumbent` within a cell.
fn replaces(challenger: &DiscoveredSubstation, incumbent: &DiscoveredSubstation) -> bool {
    if challenger.confidence_score != incumbent.confidence_score {
        return challenger.confidence_score > incumbent.confidence_score;
    }
    challenger.detection_method == DetectionMethod::KeywordSearchEnhanced
        && incumbent.detection_method == DetectionMethod::SatelliteMlAnalysis
}
