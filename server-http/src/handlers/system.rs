use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bootcamp::planes::control::Readiness;

/// GET|POST /version
pub async fn version(State(state): State<AppState>) -> String {
    state.config.revision()
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "Healthz: alive!"
}

/// ANY /readinez
pub async fn readinez(State(state): State<AppState>) -> Response {
    match state.readiness.check().await {
        Readiness::Ready(body) => (StatusCode::OK, body).into_response(),
        Readiness::NotReady(_) => (StatusCode::SERVICE_UNAVAILABLE, "Not Ready").into_response(),
    }
}
