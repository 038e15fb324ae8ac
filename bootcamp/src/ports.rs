#![deny(clippy::all)]

use crate::domain::RateRecord;
use async_trait::async_trait;
use shared::Result;
use std::time::Duration;

// Ports are the pluggable extension points for the cache and store backends.
// Adapters report connectivity failures as `UpstreamUnavailable` (cache) or
// `StoreUnavailable` (store); a missing key is `Ok(None)`, never an error.

/// Port for the remote key-value cache (e.g., Redis)
#[async_trait]
pub trait KeyValueCache: Send + Sync + 'static {
    /// Liveness ping, returns the server's reply
    async fn ping(&self) -> Result<String>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a plain value without expiry, clearing any previous TTL
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// Sets one hash field, keeping the key's current TTL
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()>;

    /// Bounds the key's lifetime. Returns false when the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;
}

/// Port for the append-only greetings table
#[async_trait]
pub trait GreetingStore: Send + Sync + 'static {
    async fn ping(&self) -> Result<()>;

    /// Creates the table if it is absent. Safe to call on every request.
    async fn ensure_schema(&self) -> Result<()>;

    /// Appends a row. Existing rows for the same token are left alone.
    async fn insert(&self, token: &str, text_hex: &str) -> Result<()>;

    /// Canonical hex payload for a token
    async fn fetch_text(&self, token: &str) -> Result<Option<String>>;
}

/// Port for the read-only rate reference table
#[async_trait]
pub trait RateTable: Send + Sync + 'static {
    async fn ping(&self) -> Result<()>;

    /// Longest-prefix match for the subscriber key, ties broken by lowest rate
    async fn best_match(&self, subscriber: &str) -> Result<Option<RateRecord>>;
}
