//! POST /api/v1/detect — run the detection pipeline for one request.

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use gridscout_core::{DiscoveredSubstation, GeoPoint};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DetectRequest {
    /// Free-text location, geocoded before the pipeline runs.
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// 0 or omitted means unlimited.
    pub max_results: Option<usize>,
    /// Defaults to true.
    pub use_image_analysis: Option<bool>,
}

/// POST /api/v1/detect — discover substations around a center.
///
/// Either `location` or explicit `latitude`+`longitude` is required.
/// Detection failures inside the pipeline degrade to partial or empty
/// lists; only malformed requests or geocoding failures return error
/// envelopes.
pub(super) async fn run_detection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DetectRequest>,
) -> Result<Json<ApiResponse<Vec<DiscoveredSubstation>>>, ApiError> {
    let rid = &req_id.0;

    let center = resolve_center(&state, rid, &body).await?;
    let max_results = body.max_results.unwrap_or(0);
    let use_imagery = body.use_image_analysis.unwrap_or(true);

    tracing::info!(
        lat = center.lat,
        lng = center.lng,
        max_results,
        use_imagery,
        "detection request"
    );

    let found = state.detector.detect(center, max_results, use_imagery).await;

    Ok(Json(ApiResponse {
        data: found,
        meta: ResponseMeta::new(rid.clone()),
    }))
}

/// Resolves the request to a center coordinate, geocoding `location` when
/// no explicit pair was supplied.
async fn resolve_center(
    state: &AppState,
    rid: &str,
    body: &DetectRequest,
) -> Result<GeoPoint, ApiError> {
    if let (Some(lat), Some(lng)) = (body.latitude, body.longitude) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(ApiError::new(
                rid,
                "validation_error",
                format!("coordinates out of range: {lat}, {lng}"),
            ));
        }
        return Ok(GeoPoint::new(lat, lng));
    }

    let Some(location) = body.location.as_deref().map(str::trim).filter(|l| !l.is_empty())
    else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "either 'location' or 'latitude' and 'longitude' is required",
        ));
    };

    match state.places.geocode(location).await {
        Ok(Some(point)) => Ok(point),
        Ok(None) => Err(ApiError::new(
            rid,
            "not_found",
            format!("location '{location}' could not be geocoded"),
        )),
        Err(e) => {
            tracing::error!(location, error = %e, "geocoding failed");
            Err(ApiError::new(
                rid,
                "internal_error",
                "geocoding request failed",
            ))
        }
    }
}
