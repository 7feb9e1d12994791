//! Pipeline orchestrator.

use gridscout_core::{AppConfig, DiscoveredSubstation, GeoPoint, Heuristics};
use gridscout_places::PlacesClient;
use gridscout_vision::VisionClient;

use crate::{dedup, keyword, scan, validate};

/// Tunables for one detector instance.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub heuristics: Heuristics,
    /// Delay between keyword phrase iterations.
    pub phrase_delay_ms: u64,
    /// Delay before fetching a pagination continuation page.
    pub page_delay_ms: u64,
    /// Delay between satellite grid cell analyses.
    pub cell_delay_ms: u64,
    /// Key embedded in static imagery URLs handed to the vision model.
    pub imagery_api_key: String,
    /// Override for the imagery host; `None` targets production.
    pub imagery_base_url: Option<String>,
}

impl DetectorConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            heuristics: Heuristics::default(),
            phrase_delay_ms: config.phrase_delay_ms,
            page_delay_ms: config.page_delay_ms,
            cell_delay_ms: config.cell_delay_ms,
            imagery_api_key: config.maps_api_key.clone(),
            imagery_base_url: None,
        }
    }
}

/// Runs the full detection pipeline around a center coordinate.
///
/// Constructed once per process and shared; each [`detect`] call owns its
/// accumulator, so concurrent requests do not share mutable state.
///
/// [`detect`]: SubstationDetector::detect
pub struct SubstationDetector {
    places: PlacesClient,
    vision: Option<VisionClient>,
    config: DetectorConfig,
}

impl SubstationDetector {
    #[must_use]
    pub fn new(places: PlacesClient, vision: Option<VisionClient>, config: DetectorConfig) -> Self {
        Self {
            places,
            vision,
            config,
        }
    }

    /// Discovers substations around `center`.
    ///
    /// `max_results` of 0 means unlimited. `use_imagery` gates the
    /// satellite scan; the scan is also skipped (with a log line, not an
    /// error) when no vision client is configured.
    ///
    /// Provider failures inside either phase are recovered locally — the
    /// pipeline always produces a (possibly empty) result list.
    pub async fn detect(
        &self,
        center: GeoPoint,
        max_results: usize,
        use_imagery: bool,
    ) -> Vec<DiscoveredSubstation> {
        let mut found: Vec<DiscoveredSubstation> = Vec::new();

        keyword::run(&self.places, &self.config, center, max_results, &mut found).await;

        if use_imagery {
            match &self.vision {
                Some(vision) => {
                    scan::run(vision, &self.config, center, max_results, &mut found).await;
                }
                None => {
                    tracing::warn!(
                        "vision credential not configured, skipping satellite scan"
                    );
                }
            }
        }

        tracing::info!(
            candidates = found.len(),
            "detection phases complete, validating"
        );

        let validated = validate::batch_validate(&self.config.heuristics, found);
        dedup::dedupe_and_rank(validated)
    }
}

/// True once the accumulator has reached a positive cap.
pub(crate) fn cap_reached(len: usize, cap: usize) -> bool {
    cap > 0 && len >= cap
}
