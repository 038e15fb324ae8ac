use crate::forward::Forwarder;
use bootcamp::banner::Banner;
use bootcamp::planes::control::ReadinessProbe;
use bootcamp::planes::data::{GreetingService, RateResolver, TokenResolver};
use shared::config::Config;
use shared::Result;
use std::sync::Arc;
use storage_engine::Backends;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub greetings: GreetingService,
    pub token_resolver: TokenResolver,
    pub rate_resolver: RateResolver,
    pub readiness: ReadinessProbe,
    pub forwarder: Forwarder,
}

impl AppState {
    pub fn new(config: Arc<Config>, backends: Backends) -> Result<Self> {
        let Backends {
            cache,
            greetings,
            rates,
        } = backends;

        let forwarder = Forwarder::new(config.forward_timeout)?;

        Ok(Self {
            greetings: GreetingService::new(cache.clone(), Banner::standard()?),
            token_resolver: TokenResolver::new(cache.clone(), greetings.clone()),
            rate_resolver: RateResolver::new(
                cache.clone(),
                rates.clone(),
                config.rate_prefix_len,
                config.rate_cache_ttl,
            ),
            readiness: ReadinessProbe::new(config.role, cache, greetings, rates),
            forwarder,
            config,
        })
    }
}
