mod helpers;

use helpers::app::{bearer_for, json_request, make_test_app, send};
use serde_json::json;

#[tokio::test]
async fn create_session_returns_join_and_qr_urls() {
    let test_app = make_test_app().await;
    let auth = bearer_for("lect-1");

    let (status, body) = send(
        &test_app.app,
        json_request("POST", "/api/sessions", Some(&auth), None),
    )
    .await;

    assert_eq!(status, 201);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["owner_id"], "lect-1");
    assert_eq!(data["active"], true);

    let session_id = data["id"].as_str().unwrap();
    let join_url = data["join_url"].as_str().unwrap();
    assert!(join_url.ends_with(&format!("/join/lect-1/{session_id}")));

    let qr = data["qr_image_url"].as_str().unwrap();
    assert!(qr.contains("size=256x256"));
    assert!(qr.contains("bgcolor=f0f0f0"));
    assert!(qr.contains("data="));
}

#[tokio::test]
async fn current_session_round_trip() {
    let test_app = make_test_app().await;
    let auth = bearer_for("lect-1");

    let (_, created) = send(
        &test_app.app,
        json_request("POST", "/api/sessions", Some(&auth), None),
    )
    .await;
    let session_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &test_app.app,
        json_request("GET", "/api/sessions/current", Some(&auth), None),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], session_id.as_str());
    assert!(body["data"]["elapsed"].as_str().unwrap().contains(':'));

    // another owner has no current session
    let other = bearer_for("lect-2");
    let (_, body) = send(
        &test_app.app,
        json_request("GET", "/api/sessions/current", Some(&other), None),
    )
    .await;
    assert_eq!(body["data"], serde_json::Value::Null);
}

#[tokio::test]
async fn ending_a_session_is_idempotent_and_clears_current() {
    let test_app = make_test_app().await;
    let auth = bearer_for("lect-1");

    let (_, created) = send(
        &test_app.app,
        json_request("POST", "/api/sessions", Some(&auth), None),
    )
    .await;
    let session_id = created["data"]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/sessions/{session_id}");
    let (status, _) = send(&test_app.app, json_request("DELETE", &uri, Some(&auth), None)).await;
    assert_eq!(status, 200);

    let (status, _) = send(&test_app.app, json_request("DELETE", &uri, Some(&auth), None)).await;
    assert_eq!(status, 200);

    let (_, body) = send(
        &test_app.app,
        json_request("GET", "/api/sessions/current", Some(&auth), None),
    )
    .await;
    assert_eq!(body["data"], serde_json::Value::Null);
}

#[tokio::test]
async fn records_are_owner_scoped_and_ordered() {
    let test_app = make_test_app().await;
    let auth = bearer_for("lect-1");

    let (_, created) = send(
        &test_app.app,
        json_request("POST", "/api/sessions", Some(&auth), None),
    )
    .await;
    let session_id = created["data"]["id"].as_str().unwrap().to_string();

    for name in ["Alice", "Bob", "Carol"] {
        let (status, _) = send(
            &test_app.app,
            json_request(
                "POST",
                &format!("/api/join/lect-1/{session_id}"),
                None,
                Some(json!({ "name": name })),
            ),
        )
        .await;
        assert_eq!(status, 201);
    }

    let uri = format!("/api/sessions/{session_id}/records");
    let (status, body) = send(&test_app.app, json_request("GET", &uri, Some(&auth), None)).await;
    assert_eq!(status, 200);
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    let times: Vec<&str> = records
        .iter()
        .map(|r| r["joined_at"].as_str().unwrap())
        .collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);

    // a different owner cannot read them
    let other = bearer_for("lect-2");
    let (status, _) = send(&test_app.app, json_request("GET", &uri, Some(&other), None)).await;
    assert_eq!(status, 404);
}
