use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;
use shared::{Error, Result};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Upstream response relayed as-is.
#[derive(Debug)]
pub struct Forwarded {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for Forwarded {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

/// Posts JSON to another role. One attempt per call, bounded by the client timeout.
#[derive(Clone, Debug)]
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    #[instrument(skip(self, payload))]
    pub async fn post_json<P>(&self, url: &str, payload: &P) -> Result<Forwarded>
    where
        P: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Forwarded request failed");
                Error::ForwardFailed(format!("POST {}: {}", url, e))
            })?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        info!(url = %url, status = %status, "Forwarded request completed");

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::ForwardFailed(format!("reading body from {}: {}", url, e)))?;

        Ok(Forwarded {
            status,
            content_type,
            body,
        })
    }
}
