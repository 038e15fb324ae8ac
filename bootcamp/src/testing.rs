//! Recording fakes for exercising the planes without real backends.

use crate::domain::{RateRecord, best_rate};
use crate::ports::{GreetingStore, KeyValueCache, RateTable};
use async_trait::async_trait;
use shared::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeCache {
    pub values: Mutex<HashMap<String, String>>,
    pub hashes: Mutex<HashMap<String, HashMap<String, String>>>,
    pub expiries: Mutex<HashMap<String, Duration>>,
    pub calls: Mutex<Vec<String>>,
    pub offline: AtomicBool,
}

impl FakeCache {
    pub fn offline() -> Self {
        let cache = Self::default();
        cache.offline.store(true, Ordering::SeqCst);
        cache
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let cache = Self::default();
        cache
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        cache
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn field(&self, key: &str, field: &str) -> Option<String> {
        self.hashes
            .lock()
            .unwrap()
            .get(key)
            .and_then(|fields| fields.get(field).cloned())
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::UpstreamUnavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueCache for FakeCache {
    async fn ping(&self) -> Result<String> {
        self.record("PING".into())?;
        Ok("PONG".into())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.record(format!("GET {}", key))?;
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.record(format!("SET {} {}", key, value))?;
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.expiries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        self.record(format!("HGET {} {}", key, field))?;
        Ok(self.field(key, field))
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        self.record(format!("HSET {} {} {}", key, field, value))?;
        self.hashes
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        self.record(format!("EXPIRE {} {}", key, ttl.as_secs()))?;
        self.expiries.lock().unwrap().insert(key.to_string(), ttl);
        Ok(true)
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub rows: Mutex<Vec<(String, String)>>,
    pub rates: Vec<RateRecord>,
    pub calls: Mutex<Vec<String>>,
    pub offline: AtomicBool,
}

impl FakeStore {
    pub fn with_rates(rates: Vec<RateRecord>) -> Self {
        Self {
            rates,
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        let store = Self::default();
        store.offline.store(true, Ordering::SeqCst);
        store
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rows(&self) -> Vec<(String, String)> {
        self.rows.lock().unwrap().clone()
    }

    fn record(&self, call: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl GreetingStore for FakeStore {
    async fn ping(&self) -> Result<()> {
        self.record("ping")
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.record("ensure_schema")
    }

    async fn insert(&self, token: &str, text_hex: &str) -> Result<()> {
        self.record("insert")?;
        self.rows
            .lock()
            .unwrap()
            .push((token.to_string(), text_hex.to_string()));
        Ok(())
    }

    async fn fetch_text(&self, token: &str) -> Result<Option<String>> {
        self.record("fetch_text")?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(row_token, _)| row_token == token)
            .map(|(_, text)| text.clone()))
    }
}

#[async_trait]
impl RateTable for FakeStore {
    async fn ping(&self) -> Result<()> {
        self.record("ping")
    }

    async fn best_match(&self, subscriber: &str) -> Result<Option<RateRecord>> {
        self.record("best_match")?;
        Ok(best_rate(&self.rates, subscriber).cloned())
    }
}
