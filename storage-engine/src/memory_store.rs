use async_trait::async_trait;
use bootcamp::domain::{RateRecord, best_rate};
use bootcamp::ports::{GreetingStore, RateTable};
use shared::{Error, Result};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Clone, Debug)]
struct GreetingRow {
    id: u64,
    token: String,
    text: String,
}

/// In-memory stand-in for the relational store: an append-only greetings
/// table next to a fixed rate table.
#[derive(Debug, Default)]
pub struct MemoryStore {
    greetings: RwLock<Vec<GreetingRow>>,
    rates: Vec<RateRecord>,
}

impl MemoryStore {
    pub fn new(rates: Vec<RateRecord>) -> Self {
        Self {
            greetings: RwLock::new(Vec::new()),
            rates,
        }
    }

    /// Loads the rate table from a JSON array of rate records.
    pub fn from_rates_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Internal(format!("Failed to read rates file {}: {}", path.display(), e))
        })?;
        let rates: Vec<RateRecord> = serde_json::from_str(&raw).map_err(|e| {
            Error::Internal(format!("Failed to parse rates file {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), rates = rates.len(), "Loaded rate table");
        Ok(Self::new(rates))
    }

    pub async fn greeting_count(&self) -> usize {
        self.greetings.read().await.len()
    }
}

#[async_trait]
impl GreetingStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, token: &str, text_hex: &str) -> Result<()> {
        let mut greetings = self.greetings.write().await;
        let id = greetings.len() as u64 + 1;
        greetings.push(GreetingRow {
            id,
            token: token.to_string(),
            text: text_hex.to_string(),
        });
        Ok(())
    }

    async fn fetch_text(&self, token: &str) -> Result<Option<String>> {
        let greetings = self.greetings.read().await;
        Ok(greetings
            .iter()
            .filter(|row| row.token == token)
            .min_by_key(|row| row.id)
            .map(|row| row.text.clone()))
    }
}

#[async_trait]
impl RateTable for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn best_match(&self, subscriber: &str) -> Result<Option<RateRecord>> {
        Ok(best_rate(&self.rates, subscriber).cloned())
    }
}
