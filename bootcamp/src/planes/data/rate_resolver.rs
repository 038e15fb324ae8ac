use crate::domain::{RATE_FIELD, rate_cache_key};
use crate::ports::{KeyValueCache, RateTable};
use shared::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Read-through resolution of scaled call rates.
///
/// Subscribers sharing the first `prefix_len` characters share one cache entry;
/// every entry written here carries a TTL.
#[derive(Clone)]
pub struct RateResolver {
    cache: Arc<dyn KeyValueCache>,
    rates: Arc<dyn RateTable>,
    prefix_len: usize,
    ttl: Duration,
}

impl RateResolver {
    pub fn new(
        cache: Arc<dyn KeyValueCache>,
        rates: Arc<dyn RateTable>,
        prefix_len: usize,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            rates,
            prefix_len: prefix_len.max(1),
            ttl,
        }
    }

    pub fn cache_key(&self, subscriber: &str) -> String {
        rate_cache_key(subscriber, self.prefix_len)
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, subscriber: &str) -> Result<String> {
        if subscriber.is_empty() {
            return Err(Error::BadRequest("msisdn must not be empty".into()));
        }

        let key = self.cache_key(subscriber);

        if let Some(rate) = self.cache.hget(&key, RATE_FIELD).await? {
            debug!(key = %key, rate = %rate, "Rate cache hit");
            return Ok(rate);
        }

        let record = self
            .rates
            .best_match(subscriber)
            .await?
            .ok_or_else(|| Error::NotFound(format!("no rate found for {}", subscriber)))?;

        let rate = record.scaled_rate.to_string();
        self.cache.hset(&key, RATE_FIELD, &rate).await?;
        self.cache.expire(&key, self.ttl).await?;

        info!(
            key = %key,
            prefix = %record.prefix,
            rate = %rate,
            trunk = ?record.trunk,
            ttl_secs = self.ttl.as_secs(),
            "Rate cached from reference table"
        );

        Ok(rate)
    }
}
