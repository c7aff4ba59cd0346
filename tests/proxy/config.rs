use crate::helpers::{PROVIDER_ENV, app, config_with, get, send};
use http::StatusCode;
use insta::assert_snapshot;
use rstest::rstest;
use serde_json::json;

#[tokio::test]
async fn test_all_provider_fields_are_served() {
    let (status, body) = send(app(config_with(&[])), get("/api/config")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "apiKey": "fb-api-key",
            "authDomain": "nurture.firebaseapp.com",
            "projectId": "nurture",
            "storageBucket": "nurture.appspot.com",
            "messagingSenderId": "1234567890",
            "appId": "1:1234567890:web:abc",
            "measurementId": "G-TEST"
        })
    );
}

#[rstest]
#[case::api_key(0)]
#[case::auth_domain(1)]
#[case::project_id(2)]
#[case::storage_bucket(3)]
#[case::messaging_sender_id(4)]
#[case::app_id(5)]
#[case::measurement_id(6)]
#[tokio::test]
async fn test_any_missing_field_fails(#[case] index: usize) {
    let (key, _) = PROVIDER_ENV[index];
    let (status, body) = send(app(config_with(&[(key, "")])), get("/api/config")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Server configuration error." }));
}

#[tokio::test]
async fn test_config_does_not_need_the_secret() {
    let (status, body) = send(
        app(config_with(&[("GEMINI_API_KEY", "")])),
        get("/api/config"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_snapshot!(body["projectId"].as_str().unwrap_or_default(), @"nurture");
}
