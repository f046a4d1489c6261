use crate::state::AppContext;
use axum::{Router, routing::post};

mod post;

pub use post::anonymous_login;

/// `/auth` route group. Anonymous sign-in is the only entry point; there
/// are no accounts or passwords.
pub fn auth_routes() -> Router<AppContext> {
    Router::new().route("/anonymous", post(anonymous_login))
}
