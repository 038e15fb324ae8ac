use crate::domain::{EncodedGreeting, validate_token};
use crate::ports::{GreetingStore, KeyValueCache};
use shared::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Read-through resolution of greeting tokens.
///
/// Every call appends exactly one row for the token: the cached payload on a
/// hit, or the payload already stored for the token on a miss. The returned
/// text is always what the store hands back after that append, never the
/// cached value itself. A miss also repopulates the cache (without expiry).
#[derive(Clone)]
pub struct TokenResolver {
    cache: Arc<dyn KeyValueCache>,
    store: Arc<dyn GreetingStore>,
}

impl TokenResolver {
    pub fn new(cache: Arc<dyn KeyValueCache>, store: Arc<dyn GreetingStore>) -> Self {
        Self { cache, store }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, token: &str) -> Result<String> {
        validate_token(token)?;

        let cached = self.cache.get(token).await?;

        self.store.ensure_schema().await?;

        let text_hex = match &cached {
            Some(text_hex) => {
                debug!(token = %token, "Token cache hit");
                text_hex.clone()
            }
            None => {
                debug!(token = %token, "Token cache miss, reading from store");
                self.fetch(token).await?
            }
        };

        self.store.insert(token, &text_hex).await?;
        debug!(token = %token, "Greeting record appended");

        let stored = self.fetch(token).await?;

        if cached.is_none() {
            self.cache.set(token, &stored).await?;
            info!(token = %token, "Repopulated token cache from store");
        }

        EncodedGreeting::from_hex(stored).decode()
    }

    async fn fetch(&self, token: &str) -> Result<String> {
        self.store
            .fetch_text(token)
            .await?
            .ok_or_else(|| Error::NotFound(format!("no greeting stored for token {}", token)))
    }
}
