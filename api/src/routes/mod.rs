//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → health probe (public)
//! - `/auth` → anonymous sign-in (public)
//! - `/sessions` → lecturer session management (authenticated)
//! - `/join` → student join endpoints (public; students have no token yet)

use crate::auth::guards::allow_authenticated;
use crate::routes::{
    auth::auth_routes, health::health_routes, join::join_routes, sessions::session_routes,
};
use crate::state::AppContext;
use axum::Router;

pub mod auth;
pub mod health;
pub mod join;
pub mod sessions;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppContext) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest(
            "/sessions",
            session_routes().route_layer(axum::middleware::from_fn(allow_authenticated)),
        )
        .nest("/join", join_routes())
        .with_state(app_state)
}
