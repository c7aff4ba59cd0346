use crate::helpers::{config_with, spawn_proxy};
use nurture_proxy::{
    client::ProxyClient,
    gemini::{Content, Role, Source},
    wellness::{Assistant, MatchProfile, MoodAnalysis, WellnessError},
};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn text_response(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
}

async fn assistant_for(upstream: &MockServer) -> Assistant {
    let base = spawn_proxy(config_with(&[])).await;
    let client = ProxyClient::new(&base).expect("Base URL is valid");
    Assistant::with_api_url(client, format!("{}/generate", upstream.uri()))
}

#[tokio::test]
async fn test_daily_thought_strips_quotes() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_response("  \u{201c}You are doing amazing.\u{201d}\n")),
        )
        .mount(&upstream)
        .await;

    let thought = assistant_for(&upstream).await.daily_thought("Asha").await;
    assert_eq!(thought, "Hello Asha, You got this. You are doing amazing.");
}

#[tokio::test]
async fn test_daily_thought_falls_back_on_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;

    let thought = assistant_for(&upstream).await.daily_thought("Asha").await;
    assert_eq!(
        thought,
        "Hello Asha, You got this. Self-care is not selfish, it is sacred."
    );
}

#[tokio::test]
async fn test_care_plan_requests_search_and_collects_sources() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "tools": [{ "google_search": {} }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Food (Ahara): khichdi" }] },
                "groundingMetadata": {
                    "groundingAttributions": [
                        { "web": { "uri": "https://ayur.example/khichdi", "title": "Khichdi" } },
                        { "web": { "title": "No link" } }
                    ]
                }
            }]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let plan = assistant_for(&upstream)
        .await
        .care_plan("low energy and poor sleep")
        .await
        .expect("Plan is generated");

    assert_eq!(plan.text, "Food (Ahara): khichdi");
    assert_eq!(
        plan.sources,
        vec![Source {
            uri: "https://ayur.example/khichdi".into(),
            title: "Khichdi".into(),
        }]
    );
}

#[tokio::test]
async fn test_care_plan_rejects_short_query_without_calling() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let err = assistant_for(&upstream)
        .await
        .care_plan("tired")
        .await
        .unwrap_err();
    assert!(matches!(err, WellnessError::InputTooShort { field: "query", .. }));
}

#[tokio::test]
async fn test_care_plan_propagates_proxy_errors() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;

    let err = assistant_for(&upstream)
        .await
        .care_plan("low energy and poor sleep")
        .await
        .unwrap_err();
    assert!(matches!(err, WellnessError::Client(_)));
}

#[tokio::test]
async fn test_mood_analysis_parses_json_text() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(
            r#"{"mood":"Tired","insight":"Rest is part of healing."}"#,
        )))
        .mount(&upstream)
        .await;

    let analysis = assistant_for(&upstream)
        .await
        .analyze_mood("Barely slept again, but the baby smiled.")
        .await
        .expect("Entry is long enough");

    assert_eq!(
        analysis,
        MoodAnalysis {
            mood: "Tired".into(),
            insight: "Rest is part of healing.".into(),
        }
    );
}

#[tokio::test]
async fn test_mood_analysis_falls_back_on_malformed_output() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Tired, probably")))
        .mount(&upstream)
        .await;

    let analysis = assistant_for(&upstream)
        .await
        .analyze_mood("Barely slept again.")
        .await
        .expect("Entry is long enough");

    assert_eq!(analysis.mood, "Reflective");
}

#[tokio::test]
async fn test_peer_chat_keeps_history() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("I hear you.")))
        .mount(&upstream)
        .await;

    let assistant = assistant_for(&upstream).await;
    let mut chat = assistant.peer_chat();
    let profile = MatchProfile {
        mood: "Anxious".into(),
        health: "Back pain".into(),
        problem: "I can't get the baby to latch".into(),
        preference: "feeding".into(),
    };

    let opening = chat.start(&profile).await.expect("Problem is long enough");
    assert_eq!(opening, "I hear you.");
    assert_eq!(chat.reply("   ").await, None);
    assert_eq!(chat.reply("Thank you").await.as_deref(), Some("I hear you."));

    assert_eq!(
        chat.history(),
        &[
            Content::with_role(Role::Model, "I hear you."),
            Content::with_role(Role::User, "Thank you"),
            Content::with_role(Role::Model, "I hear you."),
        ]
    );

    let received = upstream
        .received_requests()
        .await
        .expect("Request recording is enabled by default");
    assert_eq!(received.len(), 2);
    let second: Value = serde_json::from_slice(&received[1].body).expect("Body is JSON");
    assert_eq!(second["contents"].as_array().map(Vec::len), Some(2));
    assert_eq!(second["contents"][1]["role"], "user");
}

#[tokio::test]
async fn test_peer_chat_requires_a_problem() {
    let upstream = MockServer::start().await;
    let mut chat = assistant_for(&upstream).await.peer_chat();

    let err = chat.start(&MatchProfile::default()).await.unwrap_err();
    assert!(matches!(err, WellnessError::InputTooShort { field: "problem", .. }));
    assert!(chat.history().is_empty());
}
