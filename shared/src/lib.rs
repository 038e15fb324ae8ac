// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("cache unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),
    #[error("forward failed: {0}")]
    ForwardFailed(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
