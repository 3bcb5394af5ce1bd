//! HTTP backend provider against a mocked `/api/ai` endpoint.

use actearly_core::selector::TipCategory;
use actearly_core::{
    BackendProvider, ContentProvider, Environment, PlanSource, ProviderError, SessionRequest,
    SessionSelector,
};
use mockito::Matcher;
use serde_json::json;
use url::Url;

fn request(custom: &str) -> SessionRequest {
    SessionRequest {
        count: 2,
        priorities: vec![],
        environment: Environment::Office,
        exclude_names: vec![],
        custom_instructions: Some(custom.to_string()),
    }
}

fn provider_for(server: &mockito::ServerGuard) -> BackendProvider {
    BackendProvider::new(Some(Url::parse(&server.url()).unwrap()))
}

fn ok_text(text: &str) -> String {
    json!({ "ok": true, "data": { "text": text } }).to_string()
}

const GENERATED: &str = r#"[
  {"name": "Knee Circles", "instructions": ["Lift foot.", "Circle slowly."],
   "benefits": "Lubricates the joint.", "prevention": "Stiff knees.",
   "category": "Knees", "posture": "Seated"},
  {"name": "Heel Slides", "instructions": ["Slide heel back.", "Return."],
   "benefits": "Mobilizes the knee.", "prevention": "Loss of range.",
   "category": "Knees", "posture": "Seated", "isStandingRecommended": false}
]"#;

/// Test: a generated session is parsed from the backend text payload.
#[tokio::test]
async fn test_generate_session_parses_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/ai")
        .match_body(Matcher::PartialJson(json!({ "task": "generate_session" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ok_text(GENERATED))
        .create_async()
        .await;

    let exercises = provider_for(&server)
        .generate_session(&request("my knees ache"))
        .await
        .unwrap();
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0].name, "Knee Circles");
    assert_eq!(exercises[1].duration_seconds, 60);
    mock.assert_async().await;
}

/// Test: the prompt carries the user's instructions.
#[tokio::test]
async fn test_prompt_is_sent_in_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/ai")
        .match_body(Matcher::Regex("my knees ache".to_string()))
        .with_body(ok_text(GENERATED))
        .create_async()
        .await;

    provider_for(&server)
        .generate_session(&request("my knees ache"))
        .await
        .unwrap();
    mock.assert_async().await;
}

/// Test: `ok: false` becomes a rejection carrying the backend message.
#[tokio::test]
async fn test_backend_rejection() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/ai")
        .with_status(500)
        .with_body(json!({ "ok": false, "error": "quota exceeded" }).to_string())
        .create_async()
        .await;

    let err = provider_for(&server)
        .generate_session(&request("neck"))
        .await
        .unwrap_err();
    match err {
        ProviderError::Rejected(message) => assert_eq!(message, "quota exceeded"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

/// Test: a gateway error without the backend envelope is a transport failure.
#[tokio::test]
async fn test_gateway_error_without_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/ai")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let err = provider_for(&server)
        .generate_session(&request("neck"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Http(_)));
}

/// Test: the unavailability marker is reported as such.
#[tokio::test]
async fn test_unavailable_marker() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/ai")
        .with_body(ok_text("AI temporarily unavailable. Please try again later."))
        .create_async()
        .await;

    let err = provider_for(&server)
        .generate_session(&request("neck"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Unavailable));
}

/// Test: every provider failure ends in a local session.
#[tokio::test]
async fn test_selector_falls_back_on_bad_payloads() {
    for body in [
        ok_text("Here are some exercises for you!"),
        ok_text("[{\"name\": 1}]"),
        ok_text("[]"),
        "not json at all".to_string(),
    ] {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/ai")
            .with_body(body)
            .create_async()
            .await;

        let selector = SessionSelector::with_seed(provider_for(&server), 3);
        let plan = selector.select(&request("neck")).await;
        assert_eq!(plan.source, PlanSource::Library);
        assert!(!plan.ai_available);
        assert_eq!(plan.exercises.len(), 2);
    }
}

/// Test: an unreachable backend falls back as well.
#[tokio::test]
async fn test_selector_falls_back_when_unreachable() {
    let provider = BackendProvider::new(Some(Url::parse("http://127.0.0.1:9").unwrap()));
    let selector = SessionSelector::with_seed(provider, 3);
    let plan = selector.select(&request("neck")).await;
    assert_eq!(plan.source, PlanSource::Library);
    assert_eq!(plan.exercises.len(), 2);
}

/// Test: wisdom tips come from the backend when it delivers.
#[tokio::test]
async fn test_wisdom_tips_from_backend() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/ai")
        .match_body(Matcher::PartialJson(json!({ "task": "health_wisdom" })))
        .with_body(ok_text(
            r#"[{"category": "Hack", "text": "Stand during calls."}]"#,
        ))
        .create_async()
        .await;

    let selector = SessionSelector::with_seed(provider_for(&server), 3);
    let deck = selector.wisdom_tips(Some("standing desk")).await;
    assert!(deck.ai_available);
    assert_eq!(deck.tips.len(), 1);
    assert_eq!(deck.tips[0].category, TipCategory::Hack);
}
