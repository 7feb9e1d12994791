//! Integration tests for `VisionClient` using wiremock HTTP mocks.

use gridscout_vision::{VisionClient, VisionError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> VisionClient {
    VisionClient::with_base_url("test-key", "gpt-4o", 30, base_url)
        .expect("client construction should not fail")
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn positive_verdict_is_parsed() {
    let server = MockServer::start().await;

    let content = r#"{"isSubstation": true, "confidence": 88, "hasTransformers": true, "hasTransmissionLines": true, "hasSwitchingEquipment": false, "hasControlBuilding": true, "hasSecurityFencing": true, "voltageIndicators": ["138kV"], "reasoning": "visible transformer rows"}"#;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({ "model": "gpt-4o" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let verdict = client
        .analyze_satellite_image("https://imagery.example.com/cell.png")
        .await
        .expect("should parse verdict");

    assert!(verdict.is_substation);
    assert_eq!(verdict.confidence_score(), 88);
    assert!(verdict.has_transformers);
    assert_eq!(verdict.voltage_indicators, vec!["138kV".to_owned()]);
}

#[tokio::test]
async fn prose_wrapped_verdict_is_extracted() {
    let server = MockServer::start().await;

    let content = "Sure! Here's the analysis: {\"isSubstation\": true, \"confidence\": 95} Hope that helps!";

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let verdict = client
        .analyze_satellite_image("https://imagery.example.com/cell.png")
        .await
        .expect("should extract embedded JSON");

    assert!(verdict.is_substation);
    assert_eq!(verdict.confidence_score(), 95);
}

#[tokio::test]
async fn non_json_reply_degrades_to_negative_verdict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("I can't tell what this image shows.")),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let verdict = client
        .analyze_satellite_image("https://imagery.example.com/cell.png")
        .await
        .expect("unparseable text is not an error");

    assert!(!verdict.is_substation);
    assert_eq!(verdict.confidence_score(), 0);
}

#[tokio::test]
async fn api_error_status_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429).set_body_string(r#"{"error": "rate limit exceeded"}"#),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .analyze_satellite_image("https://imagery.example.com/cell.png")
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::ApiError { status: 429, .. }));
}

#[tokio::test]
async fn empty_choices_is_empty_completion_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .analyze_satellite_image("https://imagery.example.com/cell.png")
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::EmptyCompletion));
}
