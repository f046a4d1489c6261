mod helpers;

use api::ws::attendance::topics::attendance_session_topic;
use helpers::app::{bearer_for, json_request, make_test_app, send};
use serde_json::{Value, json};
use tokio::time::{Duration, timeout};

async fn next_event(rx: &mut tokio::sync::broadcast::Receiver<String>) -> Value {
    let raw = timeout(Duration::from_millis(200), rx.recv())
        .await
        .expect("no event arrived")
        .expect("topic closed");
    serde_json::from_str(&raw).expect("event was not JSON")
}

#[tokio::test]
async fn submissions_are_broadcast_on_the_session_topic() {
    let test_app = make_test_app().await;
    let auth = bearer_for("lect-1");

    let (_, created) = send(
        &test_app.app,
        json_request("POST", "/api/sessions", Some(&auth), None),
    )
    .await;
    let session_id = created["data"]["id"].as_str().unwrap().to_string();

    let topic = attendance_session_topic(&session_id);
    let mut rx = test_app.ctx.app().ws().subscribe(&topic).await;

    let (status, _) = send(
        &test_app.app,
        json_request(
            "POST",
            &format!("/api/join/lect-1/{session_id}"),
            None,
            Some(json!({ "name": "Jane Doe" })),
        ),
    )
    .await;
    assert_eq!(status, 201);

    let event = next_event(&mut rx).await;
    assert_eq!(event["type"], "event");
    assert_eq!(event["event"], "attendance.marked");
    assert_eq!(event["topic"], topic);
    assert_eq!(event["payload"]["student_name"], "Jane Doe");
    assert_eq!(event["payload"]["count"], 1);
}

#[tokio::test]
async fn ending_the_session_is_broadcast() {
    let test_app = make_test_app().await;
    let auth = bearer_for("lect-1");

    let (_, created) = send(
        &test_app.app,
        json_request("POST", "/api/sessions", Some(&auth), None),
    )
    .await;
    let session_id = created["data"]["id"].as_str().unwrap().to_string();

    let topic = attendance_session_topic(&session_id);
    let mut rx = test_app.ctx.app().ws().subscribe(&topic).await;

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

    let event = next_event(&mut rx).await;
    assert_eq!(event["event"], "attendance.session_deleted");
    assert_eq!(event["payload"]["session_id"], session_id.as_str());
}

#[tokio::test]
async fn websocket_upgrade_requires_a_token() {
    let test_app = make_test_app().await;
    let (status, _) = send(
        &test_app.app,
        json_request("GET", "/ws/attendance/lect-1/some-session", None, None),
    )
    .await;
    assert_eq!(status, 401);
}
