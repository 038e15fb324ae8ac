use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Behaviour selected once at startup from `APP_NAME`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Front,
    Service,
    Data,
    Rate,
}

impl Role {
    const NAMES: [(&'static str, Role); 4] = [
        ("front", Role::Front),
        ("service", Role::Service),
        ("data", Role::Data),
        ("rate", Role::Rate),
    ];

    /// Looks a role up by its process name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, role)| *role)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Front => "front",
            Role::Service => "service",
            Role::Data => "data",
            Role::Rate => "rate",
        }
    }
}

/// Where the cache and store live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Redis + Postgres
    Remote,
    /// In-process moka cache and in-memory tables
    Memory,
}

pub struct Config {
    pub app_name: String,
    pub role: Option<Role>,
    pub port: u16,
    pub backend: Backend,
    pub redis_url: String,
    pub database_url: String,
    pub service_url: String,
    pub data_url: String,
    pub forward_timeout: Duration,
    pub rate_prefix_len: usize,
    pub rate_cache_ttl: Duration,
    pub text_override: Option<String>,
    pub rates_file: Option<String>,
    pub version: String,
    pub build_info: String,
}

impl Config {
    const DEFAULT_PORT: u16 = 8080;
    const DEFAULT_REDIS_URL: &str = "redis://redis:6379";
    const DEFAULT_DATABASE_URL: &str = "postgres://postgres@db:5432/bootcamp";
    const DEFAULT_SERVICE_URL: &str = "http://service";
    const DEFAULT_DATA_URL: &str = "http://data";
    const DEFAULT_FORWARD_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_RATE_PREFIX_LEN: usize = 5;
    const DEFAULT_RATE_CACHE_TTL_SECS: u64 = 10;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_name = lookup("APP_NAME").unwrap_or_default();
        let role = Role::from_name(&app_name);
        if role.is_none() {
            warn!(app_name = %app_name, "APP_NAME does not name a known role, serving only system endpoints");
        }

        let backend = match lookup("APP_BACKEND").as_deref() {
            None | Some("remote") => Backend::Remote,
            Some("memory") => Backend::Memory,
            Some(other) => {
                warn!(backend = %other, "Unknown APP_BACKEND, using remote");
                Backend::Remote
            }
        };

        Self {
            role,
            port: parse_or(&lookup, "APP_PORT", Self::DEFAULT_PORT),
            backend,
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| Self::DEFAULT_REDIS_URL.to_string()),
            database_url: lookup("APP_DB")
                .unwrap_or_else(|| Self::DEFAULT_DATABASE_URL.to_string()),
            service_url: lookup("SERVICE_URL")
                .unwrap_or_else(|| Self::DEFAULT_SERVICE_URL.to_string()),
            data_url: lookup("DATA_URL").unwrap_or_else(|| Self::DEFAULT_DATA_URL.to_string()),
            forward_timeout: Duration::from_secs(parse_or(
                &lookup,
                "FORWARD_TIMEOUT_SECS",
                Self::DEFAULT_FORWARD_TIMEOUT_SECS,
            )),
            rate_prefix_len: parse_or(&lookup, "RATE_CACHE_LEN", Self::DEFAULT_RATE_PREFIX_LEN),
            rate_cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "RATE_CACHE_TTL_SECS",
                Self::DEFAULT_RATE_CACHE_TTL_SECS,
            )),
            text_override: lookup("NEW_FEATURE").filter(|text| !text.is_empty()),
            rates_file: lookup("RATES_FILE").filter(|path| !path.is_empty()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            build_info: option_env!("BUILD_INFO").unwrap_or("commit").to_string(),
            app_name,
        }
    }

    /// Build identity served by `/version`.
    pub fn revision(&self) -> String {
        format!("{} version: {}+{}", self.app_name, self.version, self.build_info)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!(key = %key, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
    }
}
