mod detect;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use gridscout_detect::SubstationDetector;
use gridscout_places::PlacesClient;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<SubstationDetector>,
    /// Separate handle for geocoding free-text locations before the
    /// pipeline runs.
    pub places: Arc<PlacesClient>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/detect", post(detect::run_detection))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(_state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData { status: "ok" },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use gridscout_core::Heuristics;
    use gridscout_detect::DetectorConfig;
    use gridscout_places::RetryPolicy;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_unknown_code_maps_to_internal_error() {
        let response = ApiError::new("req-2", "internal_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::new("req-3", "not_found", "no such place").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    fn test_state(places_base: &str) -> AppState {
        let retry = RetryPolicy {
            max_retries: 0,
            backoff_base_ms: 1,
        };
        let places = PlacesClient::with_base_url("places-key", 5, retry, places_base)
            .expect("places client");
        let detector_places = PlacesClient::with_base_url("places-key", 5, retry, places_base)
            .expect("places client");
        let config = DetectorConfig {
            heuristics: Heuristics::default(),
            phrase_delay_ms: 0,
            page_delay_ms: 0,
            cell_delay_ms: 0,
            imagery_api_key: "imagery-key".to_owned(),
            imagery_base_url: Some(places_base.to_owned()),
        };
        AppState {
            detector: Arc::new(SubstationDetector::new(detector_places, None, config)),
            places: Arc::new(places),
        }
    }

    fn post_detect(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/detect")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json parse")
    }

    #[tokio::test]
    async fn health_returns_ok_envelope() {
        let server = MockServer::start().await;
        let app = build_app(test_state(&server.uri()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "health-req-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-request-id").map(|v| v.to_str().unwrap()),
            Some("health-req-1")
        );
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert_eq!(json["meta"]["request_id"].as_str(), Some("health-req-1"));
    }

    #[tokio::test]
    async fn detect_without_center_returns_validation_error() {
        let server = MockServer::start().await;
        let app = build_app(test_state(&server.uri()));
        let response = app
            .oneshot(post_detect(json!({ "maxResults": 5 })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"].as_str(), Some("validation_error"));
    }

    #[tokio::test]
    async fn detect_rejects_out_of_range_coordinates() {
        let server = MockServer::start().await;
        let app = build_app(test_state(&server.uri()));
        let response = app
            .oneshot(post_detect(json!({ "latitude": 91.0, "longitude": 0.0 })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn detect_with_coordinates_returns_data_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/place/textsearch/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [{
                    "place_id": "p1",
                    "name": "Downtown Substation",
                    "formatted_address": "1 Grid Rd",
                    "geometry": { "location": { "lat": 51.1, "lng": -114.1 } },
                    "types": ["establishment"]
                }]
            })))
            .mount(&server)
            .await;

        let app = build_app(test_state(&server.uri()));
        let response = app
            .oneshot(post_detect(json!({
                "latitude": 51.0451,
                "longitude": -114.0719,
                "maxResults": 5,
                "useImageAnalysis": false
            })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["name"].as_str(), Some("Downtown Substation"));
        assert_eq!(
            data[0]["detectionMethod"].as_str(),
            Some("keyword-search-enhanced")
        );
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn detect_geocodes_free_text_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [{
                    "geometry": { "location": { "lat": 51.0447, "lng": -114.0719 } }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/maps/api/place/textsearch/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ZERO_RESULTS",
                "results": []
            })))
            .mount(&server)
            .await;

        let app = build_app(test_state(&server.uri()));
        let response = app
            .oneshot(post_detect(json!({
                "location": "Calgary, AB",
                "useImageAnalysis": false
            })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn detect_unknown_location_returns_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ZERO_RESULTS",
                "results": []
            })))
            .mount(&server)
            .await;

        let app = build_app(test_state(&server.uri()));
        let response = app
            .oneshot(post_detect(json!({ "location": "Nowhereville XYZ" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
