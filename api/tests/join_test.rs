mod helpers;

use helpers::app::{bearer_for, json_request, make_test_app, send};
use serde_json::json;

async fn start_session(
    test_app: &helpers::app::TestApp,
    owner: &str,
) -> String {
    let auth = bearer_for(owner);
    let (status, body) = send(
        &test_app.app,
        json_request("POST", "/api/sessions", Some(&auth), None),
    )
    .await;
    assert_eq!(status, 201);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn full_lecture_scenario() {
    let test_app = make_test_app().await;
    let auth = bearer_for("lect-1");
    let session_id = start_session(&test_app, "lect-1").await;
    let join_uri = format!("/api/join/lect-1/{session_id}");

    // landing page probe
    let (status, body) = send(&test_app.app, json_request("GET", &join_uri, None, None)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["joinable"], true);

    // Jane joins
    let (status, body) = send(
        &test_app.app,
        json_request("POST", &join_uri, None, Some(json!({ "name": "Jane Doe" }))),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["already_registered"], false);

    // Jane resubmits; still exactly one record
    let (status, body) = send(
        &test_app.app,
        json_request("POST", &join_uri, None, Some(json!({ "name": "Jane Doe" }))),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["already_registered"], true);

    let records_uri = format!("/api/sessions/{session_id}/records");
    let (_, body) = send(
        &test_app.app,
        json_request("GET", &records_uri, Some(&auth), None),
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["student_name"], "Jane Doe");

    // lecturer ends the session; joining stops immediately
    let (status, _) = send(
        &test_app.app,
        json_request(
            "DELETE",
            &format!("/api/sessions/{session_id}"),
            Some(&auth),
            None,
        ),
    )
    .await;
    assert_eq!(status, 200);

    let (status, body) = send(&test_app.app, json_request("GET", &join_uri, None, None)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["joinable"], false);

    let (status, _) = send(
        &test_app.app,
        json_request("POST", &join_uri, None, Some(json!({ "name": "Jane Doe" }))),
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn name_length_is_validated() {
    let test_app = make_test_app().await;
    let session_id = start_session(&test_app, "lect-1").await;
    let join_uri = format!("/api/join/lect-1/{session_id}");

    let (status, body) = send(
        &test_app.app,
        json_request("POST", &join_uri, None, Some(json!({ "name": "J" }))),
    )
    .await;
    assert_eq!(status, 422);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &test_app.app,
        json_request("POST", &join_uri, None, Some(json!({ "name": "Jo" }))),
    )
    .await;
    assert_eq!(status, 201);
}

#[tokio::test]
async fn unknown_session_is_not_joinable() {
    let test_app = make_test_app().await;

    let (status, body) = send(
        &test_app.app,
        json_request("GET", "/api/join/lect-1/nope", None, None),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["joinable"], false);

    let (status, _) = send(
        &test_app.app,
        json_request(
            "POST",
            "/api/join/lect-1/nope",
            None,
            Some(json!({ "name": "Jane Doe" })),
        ),
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn identity_keyed_submissions_allow_duplicate_names() {
    let test_app = make_test_app().await;
    let auth = bearer_for("lect-1");
    let session_id = start_session(&test_app, "lect-1").await;
    let join_uri = format!("/api/join/lect-1/{session_id}");

    for identity in ["uid-a", "uid-b"] {
        let (status, _) = send(
            &test_app.app,
            json_request(
                "POST",
                &join_uri,
                None,
                Some(json!({ "name": "Jane Doe", "student_identity": identity })),
            ),
        )
        .await;
        assert_eq!(status, 201);
    }

    let (_, body) = send(
        &test_app.app,
        json_request(
            "GET",
            &format!("/api/sessions/{session_id}/records"),
            Some(&auth),
            None,
        ),
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn success_page_falls_back_to_student() {
    let test_app = make_test_app().await;
    let session_id = start_session(&test_app, "lect-1").await;

    let uri = format!("/api/join/lect-1/{session_id}/success?name=Jane%20Doe");
    let (status, body) = send(&test_app.app, json_request("GET", &uri, None, None)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Jane Doe");

    let uri = format!("/api/join/lect-1/{session_id}/success");
    let (_, body) = send(&test_app.app, json_request("GET", &uri, None, None)).await;
    assert_eq!(body["data"]["name"], "Student");
    assert!(
        body["data"]["message"]
            .as_str()
            .unwrap()
            .contains("Student")
    );
}
