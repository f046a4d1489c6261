mod helpers;

use helpers::app::{json_request, make_test_app, send};

#[tokio::test]
async fn health_endpoint_is_public() {
    let test_app = make_test_app().await;
    let (status, body) = send(&test_app.app, json_request("GET", "/api/health", None, None)).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "OK");
}
