use axum::{
    Extension,
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use super::topics::attendance_session_topic;
use crate::auth::AuthUser;
use crate::state::AppContext;
use util::ws::WebSocketManager;

/// GET /ws/attendance/{owner_id}/{session_id}
///
/// Upgrades and subscribes the socket to the session's attendance topic.
/// Everything emitted on the topic (marked records, session deletion) is
/// forwarded verbatim; the socket sends nothing of interest upstream.
pub async fn attendance_session_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppContext>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path((_owner_id, session_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let manager = state.app().ws_clone();
    let client_id = claims.sub;
    ws.on_upgrade(move |socket| serve_socket(manager, socket, client_id, session_id))
}

async fn serve_socket(
    manager: WebSocketManager,
    socket: WebSocket,
    client_id: String,
    session_id: String,
) {
    let topic = attendance_session_topic(&session_id);
    let mut rx = manager.subscribe(&topic).await;
    manager.register(&topic, &client_id).await;

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(json) => {
                    if sink.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                // Dropped messages are tolerable; the dashboard refetches
                // the snapshot on reconnect.
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(topic, skipped, "attendance feed lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Ping(data))) => {
                    if sink.send(Message::Pong(data)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    manager.unregister(&topic, &client_id).await;
}
