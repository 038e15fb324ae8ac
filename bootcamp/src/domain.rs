use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use shared::{Error, Result};
use std::cmp::Ordering;

/// Namespace prepended to every rate cache key.
pub const RATE_CACHE_NAMESPACE: &str = "RATE_CACHE:";

/// Hash field holding the scaled rate.
pub const RATE_FIELD: &str = "RATE";

/// Sentinel key written by the data role's readiness probe.
pub const READINESS_PROBE_KEY: &str = "readiness_probe";

/// Longest token the greetings table accepts.
pub const MAX_TOKEN_LEN: usize = 100;

/// Greeting text in its persisted form: hex-encoded UTF-8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedGreeting(String);

impl EncodedGreeting {
    pub fn encode(text: &str) -> Self {
        Self(hex::encode(text.as_bytes()))
    }

    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Token under which this greeting is cached and persisted: the MD5 of the hex form.
    pub fn token(&self) -> String {
        hex::encode(Md5::digest(self.0.as_bytes()))
    }

    pub fn decode(&self) -> Result<String> {
        let bytes = hex::decode(&self.0)
            .map_err(|e| Error::CorruptPayload(format!("invalid hex payload: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| Error::CorruptPayload(format!("payload is not UTF-8: {}", e)))
    }
}

pub fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(Error::BadRequest("hash must not be empty".into()));
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(Error::BadRequest(format!(
            "hash must be at most {} characters",
            MAX_TOKEN_LEN
        )));
    }
    Ok(())
}

/// Cache key for a subscriber number: the namespace plus its first `prefix_len` characters.
pub fn rate_cache_key(subscriber: &str, prefix_len: usize) -> String {
    let prefix: String = subscriber.chars().take(prefix_len).collect();
    format!("{}{}", RATE_CACHE_NAMESPACE, prefix)
}

/// Row of the read-only rate reference table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    #[serde(default)]
    pub id: i64,
    pub prefix: String,
    /// Rate multiplied by 100.
    pub scaled_rate: i64,
    #[serde(default)]
    pub trunk: Option<String>,
    pub len: u32,
}

impl RateRecord {
    pub fn new(prefix: impl Into<String>, len: u32, scaled_rate: i64) -> Self {
        Self {
            id: 0,
            prefix: prefix.into(),
            scaled_rate,
            trunk: None,
            len,
        }
    }

    /// The stored prefix must occur at offset 0 of the subscriber key.
    pub fn matches(&self, subscriber: &str) -> bool {
        subscriber.starts_with(self.prefix.as_str())
    }

    /// Ordering where the preferred record sorts first: longer `len`, then lower rate.
    pub fn precedence(&self, other: &Self) -> Ordering {
        other
            .len
            .cmp(&self.len)
            .then(self.scaled_rate.cmp(&other.scaled_rate))
    }
}

/// Picks the best matching record for a subscriber key.
pub fn best_rate<'a, I>(records: I, subscriber: &str) -> Option<&'a RateRecord>
where
    I: IntoIterator<Item = &'a RateRecord>,
{
    records
        .into_iter()
        .filter(|record| record.matches(subscriber))
        .min_by(|a, b| a.precedence(b))
}
