pub mod memory_store;
pub mod moka_cache;
pub mod postgres_store;
pub mod redis_cache;

pub use memory_store::MemoryStore;
pub use moka_cache::MokaCache;
pub use postgres_store::PostgresStore;
pub use redis_cache::RedisCache;

use bootcamp::domain::RateRecord;
use bootcamp::ports::{GreetingStore, KeyValueCache, RateTable};
use shared::Result;
use shared::config::{Backend, Config};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const BACKEND_TIMEOUT: Duration = Duration::from_secs(5);

/// The cache and store handles every role is built from.
#[derive(Clone)]
pub struct Backends {
    pub cache: Arc<dyn KeyValueCache>,
    pub greetings: Arc<dyn GreetingStore>,
    pub rates: Arc<dyn RateTable>,
}

impl Backends {
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.backend {
            Backend::Remote => {
                info!("Using Redis cache and PostgreSQL store");
                let cache = Arc::new(RedisCache::connect_lazy(&config.redis_url, BACKEND_TIMEOUT)?);
                let store = Arc::new(PostgresStore::connect_lazy(
                    &config.database_url,
                    BACKEND_TIMEOUT,
                )?);
                Ok(Self {
                    cache,
                    greetings: store.clone(),
                    rates: store,
                })
            }
            Backend::Memory => {
                info!("Using in-memory cache and store");
                let store = match &config.rates_file {
                    Some(path) => MemoryStore::from_rates_file(path)?,
                    None => MemoryStore::default(),
                };
                Ok(Self::with_memory_store(store))
            }
        }
    }

    pub fn in_memory(rates: Vec<RateRecord>) -> Self {
        Self::with_memory_store(MemoryStore::new(rates))
    }

    fn with_memory_store(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            cache: Arc::new(MokaCache::with_defaults()),
            greetings: store.clone(),
            rates: store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bootcamp::planes::data::RateResolver;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRates {
        inner: MemoryStore,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl RateTable for CountingRates {
        async fn ping(&self) -> Result<()> {
            RateTable::ping(&self.inner).await
        }

        async fn best_match(&self, subscriber: &str) -> Result<Option<RateRecord>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.best_match(subscriber).await
        }
    }

    #[tokio::test]
    async fn test_rate_table_is_queried_again_after_ttl() {
        let rates = Arc::new(CountingRates {
            inner: MemoryStore::new(vec![RateRecord::new("1555", 4, 250)]),
            lookups: AtomicUsize::new(0),
        });
        let resolver = RateResolver::new(
            Arc::new(MokaCache::with_defaults()),
            rates.clone(),
            5,
            Duration::from_millis(100),
        );

        assert_eq!(resolver.resolve("15551234567").await.unwrap(), "250");
        assert_eq!(resolver.resolve("15551999999").await.unwrap(), "250");
        assert_eq!(rates.lookups.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(resolver.resolve("15551234567").await.unwrap(), "250");
        assert_eq!(rates.lookups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_memory_backend_from_config() {
        let config = Config::from_lookup(|key| match key {
            "APP_BACKEND" => Some("memory".to_string()),
            _ => None,
        });
        assert!(Backends::from_config(&config).is_ok());
    }
}
