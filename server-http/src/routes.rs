use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get, MethodRouter},
    Router,
};
use shared::config::Role;
use tower_http::trace::TraceLayer;

/// Largest request body read by any handler.
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Route served at `/` for each role
pub fn role_route(role: Role) -> MethodRouter<AppState> {
    match role {
        Role::Front => any(handlers::front),
        Role::Service => get(handlers::use_post).post(handlers::service),
        Role::Data => get(handlers::use_post).post(handlers::data),
        Role::Rate => get(handlers::use_post).post(handlers::rate),
    }
}

/// Build and configure the application router
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/version", get(handlers::version).post(handlers::version))
        .route("/healthz", get(handlers::healthz))
        .route("/readinez", any(handlers::readinez));

    if let Some(role) = state.config.role {
        router = router.route("/", role_route(role));
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
