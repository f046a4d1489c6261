mod helpers;

use helpers::app::{json_request, make_test_app, send};
use uuid::Uuid;

#[tokio::test]
async fn anonymous_login_mints_identity_and_token() {
    let test_app = make_test_app().await;
    let (status, body) = send(
        &test_app.app,
        json_request("POST", "/api/auth/anonymous", None, None),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    let owner_id = body["data"]["owner_id"].as_str().unwrap();
    assert!(Uuid::parse_str(owner_id).is_ok());
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
    assert!(body["data"]["expires_at"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn minted_token_opens_protected_routes() {
    let test_app = make_test_app().await;
    let (_, body) = send(
        &test_app.app,
        json_request("POST", "/api/auth/anonymous", None, None),
    )
    .await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let auth = format!("Bearer {token}");

    let (status, body) = send(
        &test_app.app,
        json_request("GET", "/api/sessions/current", Some(&auth), None),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], serde_json::Value::Null);
}

#[tokio::test]
async fn protected_routes_reject_missing_and_bad_tokens() {
    let test_app = make_test_app().await;

    let (status, _) = send(
        &test_app.app,
        json_request("GET", "/api/sessions/current", None, None),
    )
    .await;
    assert_eq!(status, 401);

    let (status, _) = send(
        &test_app.app,
        json_request(
            "GET",
            "/api/sessions/current",
            Some("Bearer not-a-real-token"),
            None,
        ),
    )
    .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn every_login_gets_a_distinct_identity() {
    let test_app = make_test_app().await;
    let (_, first) = send(
        &test_app.app,
        json_request("POST", "/api/auth/anonymous", None, None),
    )
    .await;
    let (_, second) = send(
        &test_app.app,
        json_request("POST", "/api/auth/anonymous", None, None),
    )
    .await;
    assert_ne!(first["data"]["owner_id"], second["data"]["owner_id"]);
}
