use api::auth::claims::generate_token;
use api::routes::routes;
use api::state::AppContext;
use api::ws::ws_routes;
use axum::{Router, body::Body, http::Request, response::Response};
use serde_json::Value;
use std::convert::Infallible;
use tempfile::TempDir;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use util::{state::AppState, ws::WebSocketManager};

pub struct TestApp {
    pub app: BoxCloneService<Request<Body>, Response, Infallible>,
    pub ctx: AppContext,
    _storage: TempDir,
}

/// Fresh app per test: in-memory database with migrations applied, a
/// temporary storage root, and the full router wired exactly as in main.
pub async fn make_test_app() -> TestApp {
    let db = db::test_utils::setup_test_db().await;
    let state = AppState::new(db, WebSocketManager::new());
    let storage = TempDir::new().expect("Failed to create temp storage root");
    let ctx = AppContext::new(state, storage.path()).expect("Failed to build app context");

    let router = Router::new()
        .nest("/api", routes(ctx.clone()))
        .nest("/ws", ws_routes(ctx.clone()));

    TestApp {
        app: router.into_service().boxed_clone(),
        ctx,
        _storage: storage,
    }
}

pub fn bearer_for(owner_id: &str) -> String {
    let (token, _) = generate_token(owner_id).expect("Failed to sign test token");
    format!("Bearer {token}")
}

pub async fn send(
    app: &BoxCloneService<Request<Body>, Response, Infallible>,
    req: Request<Body>,
) -> (axum::http::StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body was not JSON")
    };
    (status, json)
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    match body {
        Some(value) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(value.to_string()))
            .expect("failed to build request"),
        None => builder.body(Body::empty()).expect("failed to build request"),
    }
}
