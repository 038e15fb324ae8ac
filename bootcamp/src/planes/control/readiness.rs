use crate::domain::READINESS_PROBE_KEY;
use crate::ports::{GreetingStore, KeyValueCache, RateTable};
use shared::Result;
use shared::config::Role;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Ready, with the body to serve
    Ready(&'static str),
    NotReady(String),
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }

    fn from_checks(body: &'static str, checks: Result<()>) -> Self {
        match checks {
            Ok(()) => Readiness::Ready(body),
            Err(e) => Readiness::NotReady(e.to_string()),
        }
    }
}

/// Role-specific readiness predicate.
///
/// The data role probes the cache with a write of `readiness_probe`, so a
/// readiness check on that role is observable in the cache.
#[derive(Clone)]
pub struct ReadinessProbe {
    role: Option<Role>,
    cache: Arc<dyn KeyValueCache>,
    greetings: Arc<dyn GreetingStore>,
    rates: Arc<dyn RateTable>,
}

impl ReadinessProbe {
    pub fn new(
        role: Option<Role>,
        cache: Arc<dyn KeyValueCache>,
        greetings: Arc<dyn GreetingStore>,
        rates: Arc<dyn RateTable>,
    ) -> Self {
        Self {
            role,
            cache,
            greetings,
            rates,
        }
    }

    pub async fn check(&self) -> Readiness {
        let readiness = match self.role {
            Some(Role::Front) => Readiness::Ready("OK"),
            Some(Role::Service) => Readiness::from_checks("OK", self.cache_ping().await),
            Some(Role::Data) => Readiness::from_checks("200", self.data_checks().await),
            Some(Role::Rate) => Readiness::from_checks("OK", self.rate_checks().await),
            None => Readiness::NotReady("no role configured".into()),
        };

        match &readiness {
            Readiness::Ready(_) => debug!(role = ?self.role, "Readiness probe passed"),
            Readiness::NotReady(reason) => {
                warn!(role = ?self.role, reason = %reason, "Readiness probe failed")
            }
        }

        readiness
    }

    async fn cache_ping(&self) -> Result<()> {
        let reply = self.cache.ping().await?;
        debug!(reply = %reply, "Cache answered ping");
        Ok(())
    }

    async fn data_checks(&self) -> Result<()> {
        self.cache.set(READINESS_PROBE_KEY, "0").await?;
        self.greetings.ping().await
    }

    async fn rate_checks(&self) -> Result<()> {
        self.cache_ping().await?;
        self.rates.ping().await
    }
}
