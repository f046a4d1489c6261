use crate::state::AppContext;
use axum::{
    Router,
    routing::{get, post},
};

mod common;
mod get;
mod post;

pub use common::{JoinRequest, JoinResponse, JoinabilityResponse, SuccessPageResponse};
pub use get::{check_join, join_success};
pub use post::submit_attendance;

/// `/join` route group (student side). Public: students have no identity
/// token when they scan the code; the URL itself carries the owner and
/// session tokens.
pub fn join_routes() -> Router<AppContext> {
    Router::new()
        .route("/{owner_id}/{session_id}", get(check_join))
        .route("/{owner_id}/{session_id}", post(submit_attendance))
        .route("/{owner_id}/{session_id}/success", get(join_success))
}
