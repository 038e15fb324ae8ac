use async_trait::async_trait;
use bootcamp::ports::KeyValueCache;
use moka::Expiry;
use moka::future::Cache;
use shared::{Error, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
enum StoredValue {
    Text(String),
    Hash(HashMap<String, String>),
}

#[derive(Clone, Debug)]
struct Entry {
    value: StoredValue,
    ttl: Option<Duration>,
    /// Carry the remaining lifetime over on update instead of applying `ttl`
    keep_ttl: bool,
}

/// Per-entry expiry following Redis rules: `SET` clears the TTL, `HSET`
/// keeps whatever is left, `EXPIRE` replaces it.
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        if value.keep_ttl {
            duration_until_expiry
        } else {
            value.ttl
        }
    }
}

/// Moka-based in-process stand-in for the remote key-value cache
pub struct MokaCache {
    cache: Cache<String, Entry>,
}

impl MokaCache {
    /// Create a new Moka cache bounded to `max_entries`
    pub fn new(name: &str, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .name(name)
            .max_capacity(max_entries)
            .expire_after(EntryExpiry)
            .build();

        Self { cache }
    }

    pub fn with_defaults() -> Self {
        Self::new("bootcamp", 100_000)
    }

    /// Number of live entries, after flushing moka's pending maintenance.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    fn wrong_type(key: &str) -> Error {
        Error::Internal(format!(
            "WRONGTYPE operation against key '{}' holding the wrong kind of value",
            key
        ))
    }
}

#[async_trait]
impl KeyValueCache for MokaCache {
    async fn ping(&self) -> Result<String> {
        Ok("PONG".to_string())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.cache.get(key).await {
            Some(Entry {
                value: StoredValue::Text(text),
                ..
            }) => Ok(Some(text)),
            Some(_) => Err(Self::wrong_type(key)),
            None => Ok(None), // Either doesn't exist or TTL expired
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = Entry {
            value: StoredValue::Text(value.to_string()),
            ttl: None,
            keep_ttl: false,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        match self.cache.get(key).await {
            Some(Entry {
                value: StoredValue::Hash(fields),
                ..
            }) => Ok(fields.get(field).cloned()),
            Some(_) => Err(Self::wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        let mut fields = match self.cache.get(key).await {
            Some(Entry {
                value: StoredValue::Hash(fields),
                ..
            }) => fields,
            Some(_) => return Err(Self::wrong_type(key)),
            None => HashMap::new(),
        };
        fields.insert(field.to_string(), value.to_string());

        let entry = Entry {
            value: StoredValue::Hash(fields),
            ttl: None,
            keep_ttl: true,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let Some(current) = self.cache.get(key).await else {
            return Ok(false);
        };

        let entry = Entry {
            value: current.value,
            ttl: Some(ttl),
            keep_ttl: false,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(true)
    }
}

impl Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}
