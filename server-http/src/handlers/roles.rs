use crate::api::requests::{GreetingRequest, RateRequest, TokenRequest};
use crate::api::{ApiError, JsonBody};
use crate::forward::Forwarded;
use crate::state::AppState;
use axum::extract::State;
use tracing::info;

/// Text the front role sends to the service role on every request.
pub const FRONT_GREETING: &str = "kubernetes bootcamp";

/// GET / on roles that only accept POST
pub async fn use_post() -> &'static str {
    "Please use POST"
}

/// ANY / (front): request ignored, fixed greeting forwarded to the service role
pub async fn front(State(state): State<AppState>) -> Result<Forwarded, ApiError> {
    let payload = GreetingRequest {
        text: FRONT_GREETING.to_string(),
    };
    Ok(state
        .forwarder
        .post_json(&state.config.service_url, &payload)
        .await?)
}

/// POST / (service): mint a token for the text and ask the data role to resolve it
pub async fn service(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<GreetingRequest>,
) -> Result<Forwarded, ApiError> {
    let text = state.config.text_override.clone().unwrap_or(req.text);
    info!(text = %text, "Greeting received");

    let token = state.greetings.register(&text).await?;
    info!(token = %token, "Greeting registered");

    let payload = TokenRequest { hash: token };
    Ok(state
        .forwarder
        .post_json(&state.config.data_url, &payload)
        .await?)
}

/// POST / (data): resolve a token to its greeting text
pub async fn data(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<TokenRequest>,
) -> Result<String, ApiError> {
    Ok(state.token_resolver.resolve(&req.hash).await?)
}

/// POST / (rate): resolve a subscriber number to its scaled rate
pub async fn rate(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RateRequest>,
) -> Result<String, ApiError> {
    Ok(state.rate_resolver.resolve(&req.msisdn).await?)
}
