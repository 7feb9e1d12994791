//! Confidence scoring and the batch validation pass.

use gridscout_core::{DetectionMethod, DiscoveredSubstation, Heuristics};

/// Scores a keyword-provenance candidate.
///
/// Base 50; +30 for a strong indicator in the name; +5 per weak indicator
/// matched, capped at +15; +5 when the provider supplied a rating.
/// Clamped to 100.
#[must_use]
pub fn keyword_confidence(heuristics: &Heuristics, name: &str, has_rating: bool) -> u8 {
    let mut score: u32 = 50;
    if heuristics.has_strong_indicator(name) {
        score += 30;
    }
    score += 5 * u32::try_from(heuristics.weak_indicator_count(name).min(3)).unwrap_or(3);
    if has_rating {
        score += 5;
    }
    u8::try_from(score.min(100)).unwrap_or(100)
}

/// Batch validation over the full candidate set, run once after both
/// detection phases.
///
/// Keyword-provenance entries whose name carries a strong indicator are
/// force-kept with confidence raised to at least the promotion floor.
/// Everything else survives only above its provenance-specific threshold.
/// (Satellite entries always carry a generated "Substation" label, so the
/// strong-indicator promotion applies to keyword provenance only —
/// otherwise the satellite confidence threshold would never fire.)
#[must_use]
pub fn batch_validate(
    heuristics: &Heuristics,
    candidates: Vec<DiscoveredSubstation>,
) -> Vec<DiscoveredSubstation> {
    let before = candidates.len();
    let kept: Vec<DiscoveredSubstation> = candidates
        .into_iter()
        .filter_map(|mut c| match c.detection_method {
            DetectionMethod::KeywordSearchEnhanced => {
                if heuristics.has_strong_indicator(&c.name) {
                    c.confidence_score = c.confidence_score.max(heuristics.promotion_floor);
                    Some(c)
                } else if c.confidence_score > heuristics.keyword_keep_threshold {
                    Some(c)
                } else {
                    None
                }
            }
            DetectionMethod::SatelliteMlAnalysis => {
                (c.confidence_score > heuristics.satellite_keep_threshold).then_some(c)
            }
        })
        .collect();
    tracing::debug!(before, after = kept.len(), "batch validation complete");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, confidence: u8, method: DetectionMethod) -> DiscoveredSubstation {
        DiscoveredSubstation {
            id: name.to_owned(),
            name: name.to_owned(),
            latitude: 51.0,
            longitude: -114.0,
            place_id: name.to_owned(),
            address: String::new(),
            rating: None,
            types: vec!["establishment".to_owned()],
            confidence_score: confidence,
            detection_method: method,
            image_analysis: None,
        }
    }

    #[test]
    fn keyword_confidence_plain_substation() {
        let h = Heuristics::default();
        // base 50 + strong 30 + weak cap 15 = 95 without rating.
        let score = keyword_confidence(&h, "Downtown Substation", false);
        assert!(score >= 85, "got {score}");
    }

    #[test]
    fn keyword_confidence_is_clamped_to_100() {
        let h = Heuristics::default();
        let score = keyword_confidence(&h, "Power Grid Transmission Substation", true);
        assert_eq!(score, 100);
    }

    #[test]
    fn keyword_confidence_weak_only_name_scores_lower() {
        let h = Heuristics::default();
        // "station" is weak but not strong: 50 + 5 = 55.
        let score = keyword_confidence(&h, "Pump Station", false);
        assert!(score < 70, "got {score}");
        assert!(score > 50, "got {score}");
    }

    #[test]
    fn strong_indicator_promotes_keyword_entry_to_floor() {
        let h = Heuristics::default();
        let out = batch_validate(
            &h,
            vec![candidate(
                "West Transmission Yard",
                40,
                DetectionMethod::KeywordSearchEnhanced,
            )],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].confidence_score, 90);
    }

    #[test]
    fn strong_indicator_does_not_lower_existing_confidence() {
        let h = Heuristics::default();
        let out = batch_validate(
            &h,
            vec![candidate(
                "Downtown Substation",
                97,
                DetectionMethod::KeywordSearchEnhanced,
            )],
        );
        assert_eq!(out[0].confidence_score, 97);
    }

    #[test]
    fn weak_keyword_entry_below_threshold_is_dropped() {
        let h = Heuristics::default();
        let out = batch_validate(
            &h,
            vec![candidate(
                "Pump Yard",
                50,
                DetectionMethod::KeywordSearchEnhanced,
            )],
        );
        assert!(out.is_empty(), "50 is not strictly above the 50 threshold");
    }

    #[test]
    fn satellite_entry_uses_its_own_threshold() {
        let h = Heuristics::default();
        let keep = candidate(
            "AI Detected: Substation (80% confidence)",
            80,
            DetectionMethod::SatelliteMlAnalysis,
        );
        let drop = candidate(
            "AI Detected: Substation (60% confidence)",
            60,
            DetectionMethod::SatelliteMlAnalysis,
        );
        let out = batch_validate(&h, vec![keep, drop]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].confidence_score, 80);
    }

    #[test]
    fn satellite_labels_are_not_promoted_by_strong_indicator() {
        // The generated label contains "substation"; the promotion rule must
        // not lift a 62-confidence satellite hit to 90.
        let h = Heuristics::default();
        let out = batch_validate(
            &h,
            vec![candidate(
                "AI Detected: Substation (62% confidence)",
                62,
                DetectionMethod::SatelliteMlAnalysis,
            )],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].confidence_score, 62);
    }
}
