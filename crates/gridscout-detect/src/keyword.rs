//! Keyword place-search phase.
//!
//! Iterates a fixed list of synonym phrases in array order, following the
//! provider's pagination token through a bounded page loop per phrase.
//! Admission runs per place before it joins the accumulator; duplicates by
//! provider id are skipped. One phrase failing never aborts the phase.

use std::time::Duration;

use gridscout_core::{DetectionMethod, DiscoveredSubstation, GeoPoint};
use gridscout_places::{PlaceResult, PlacesClient, PlacesError};

use crate::detector::{cap_reached, DetectorConfig};
use crate::validate::keyword_confidence;

/// Synonym phrases, processed in this order.
pub const SEARCH_PHRASES: [&str; 10] = [
    "electrical substation",
    "power substation",
    "transmission substation",
    "distribution substation",
    "switching station",
    "transformer station",
    "utility substation",
    "electric substation",
    "substation",
    "power grid station",
];

/// Providers return at most ~60 results over 3 pages; the bound also
/// guards against continuation-token loops.
const MAX_PAGES_PER_PHRASE: usize = 3;

/// Search radius with a positive result cap.
const RADIUS_CAPPED_M: u32 = 100_000;
/// Wider radius when the caller asked for everything.
const RADIUS_UNLIMITED_M: u32 = 500_000;

/// Runs the keyword phase, appending admitted places to `found`.
///
/// Stops issuing external calls as soon as `found` reaches `cap` (cap > 0).
pub(crate) async fn run(
    places: &PlacesClient,
    config: &DetectorConfig,
    center: GeoPoint,
    cap: usize,
    found: &mut Vec<DiscoveredSubstation>,
) {
    let radius_m = if cap == 0 {
        RADIUS_UNLIMITED_M
    } else {
        RADIUS_CAPPED_M
    };

    for (idx, phrase) in SEARCH_PHRASES.iter().enumerate() {
        if cap_reached(found.len(), cap) {
            tracing::debug!(cap, "result cap reached, stopping keyword search");
            break;
        }
        if idx > 0 && config.phrase_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.phrase_delay_ms)).await;
        }
        if let Err(e) = search_phrase(places, config, phrase, center, radius_m, cap, found).await {
            tracing::warn!(phrase, error = %e, "keyword phrase search failed, continuing");
        }
    }

    tracing::info!(count = found.len(), "keyword search phase complete");
}

/// Searches one phrase through its pagination pages.
///
/// A failure on the first page propagates (logged by the caller as a
/// per-phrase failure); a failure on a continuation page stops pagination
/// for this phrase only.
async fn search_phrase(
    places: &PlacesClient,
    config: &DetectorConfig,
    phrase: &str,
    center: GeoPoint,
    radius_m: u32,
    cap: usize,
    found: &mut Vec<DiscoveredSubstation>,
) -> Result<(), PlacesError> {
    let mut token: Option<String> = None;

    for page_idx in 0..MAX_PAGES_PER_PHRASE {
        if page_idx > 0 && config.page_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.page_delay_ms)).await;
        }

        let page = match places
            .text_search(phrase, center, radius_m, token.as_deref())
            .await
        {
            Ok(page) => page,
            Err(e) if page_idx > 0 => {
                tracing::warn!(
                    phrase,
                    page = page_idx,
                    error = %e,
                    "pagination fetch failed, stopping pagination for this phrase"
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        for place in page.results {
            if cap_reached(found.len(), cap) {
                return Ok(());
            }
            admit(config, place, found);
        }

        token = page.next_page_token;
        if token.is_none() {
            break;
        }
    }

    Ok(())
}

/// Applies the per-place admission filter and appends on success.
fn admit(config: &DetectorConfig, place: PlaceResult, found: &mut Vec<DiscoveredSubstation>) {
    if found.iter().any(|s| s.place_id == place.place_id) {
        return;
    }
    if !config.heuristics.admits(&place.name, &place.types) {
        tracing::debug!(name = %place.name, "place rejected by admission filter");
        return;
    }

    let confidence = keyword_confidence(
        &config.heuristics,
        &place.name,
        place.rating.is_some(),
    );
    found.push(DiscoveredSubstation {
        id: place.place_id.clone(),
        name: place.name,
        latitude: place.geometry.location.lat,
        longitude: place.geometry.location.lng,
        place_id: place.place_id,
        address: place
            .formatted_address
            .unwrap_or_else(|| "Address unavailable".to_owned()),
        rating: place.rating,
        types: place.types,
        confidence_score: confidence,
        detection_method: DetectionMethod::KeywordSearchEnhanced,
        image_analysis: None,
    });
}
