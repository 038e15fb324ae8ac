use crate::banner::Banner;
use crate::domain::EncodedGreeting;
use crate::ports::KeyValueCache;
use shared::Result;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Renders greeting text as a banner, turns it into a token and parks the
/// encoded banner in the cache under it, where the data role will pick it up.
#[derive(Clone)]
pub struct GreetingService {
    cache: Arc<dyn KeyValueCache>,
    banner: Banner,
}

impl GreetingService {
    pub fn new(cache: Arc<dyn KeyValueCache>, banner: Banner) -> Self {
        Self { cache, banner }
    }

    #[instrument(skip(self, text))]
    pub async fn register(&self, text: &str) -> Result<String> {
        let encoded = EncodedGreeting::encode(&self.banner.render(text));
        let token = encoded.token();
        debug!(token = %token, encoded = %encoded.as_str(), "Registering greeting");

        // Token path entries never expire
        self.cache.set(&token, encoded.as_str()).await?;

        Ok(token)
    }
}
