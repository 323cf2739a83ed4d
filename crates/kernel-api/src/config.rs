use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::persistence::{MemorySessionStore, PersistenceError, SessionStore, SqliteSessionStore};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const ADDR_ENV: &str = "GRAD_SURVIVAL_ADDR";
pub const SQLITE_PATH_ENV: &str = "GRAD_SURVIVAL_SQLITE_PATH";
pub const SEED_ENV: &str = "GRAD_SURVIVAL_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid seed {value:?}: {source}")]
    InvalidSeed {
        value: String,
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite(PathBuf),
}

impl StoreBackend {
    /// An empty path or `:memory:` keeps sessions in process memory.
    pub fn from_path(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ":memory:" {
            Self::Memory
        } else {
            Self::Sqlite(PathBuf::from(trimmed))
        }
    }

    pub fn open(&self) -> Result<Box<dyn SessionStore>, PersistenceError> {
        match self {
            Self::Memory => Ok(Box::new(MemorySessionStore::new())),
            Self::Sqlite(path) => Ok(Box::new(SqliteSessionStore::open(path)?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    /// Fixed seed for the event generator; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            store: StoreBackend::Memory,
            seed: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = present(ADDR_ENV) {
            config.bind_addr = parse_addr(&value)?;
        }
        if let Some(value) = lookup(SQLITE_PATH_ENV) {
            config.store = StoreBackend::from_path(&value);
        }
        if let Some(value) = present(SEED_ENV) {
            config.seed = Some(parse_seed(&value)?);
        }

        Ok(config)
    }

    /// Applies command-line flags on top of the current values. Absent flags
    /// keep what defaults and environment produced.
    pub fn with_overrides(
        mut self,
        addr: Option<SocketAddr>,
        sqlite: Option<&str>,
        seed: Option<u64>,
    ) -> Self {
        if let Some(addr) = addr {
            self.bind_addr = addr;
        }
        if let Some(path) = sqlite {
            self.store = StoreBackend::from_path(path);
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }
}

pub fn parse_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidAddr {
            value: value.to_string(),
            source,
        })
}

pub fn parse_seed(value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidSeed {
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = ApiConfig::from_lookup(|_| None).expect("defaults parse");
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_addr.to_string(), DEFAULT_ADDR);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            (ADDR_ENV, "0.0.0.0:9000"),
            (SQLITE_PATH_ENV, "sessions.sqlite"),
            (SEED_ENV, "42"),
        ]))
        .expect("valid environment");

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(
            config.store,
            StoreBackend::Sqlite(PathBuf::from("sessions.sqlite"))
        );
        assert_eq!(config.seed, Some(42));
    }

    fn from_env_pairs() -> ApiConfig {
        ApiConfig::from_lookup(lookup_from(&[
            (ADDR_ENV, "0.0.0.0:9000"),
            (SQLITE_PATH_ENV, "env.sqlite"),
            (SEED_ENV, "42"),
        ]))
        .expect("valid environment")
    }

    #[test]
    fn flags_override_environment() {
        let flag_addr = parse_addr("127.0.0.1:7000").expect("flag addr");
        let config =
            from_env_pairs().with_overrides(Some(flag_addr), Some("flag.sqlite"), Some(7));

        assert_eq!(config.bind_addr, flag_addr);
        assert_eq!(config.store, StoreBackend::Sqlite(PathBuf::from("flag.sqlite")));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn absent_flags_keep_environment() {
        let config = from_env_pairs().with_overrides(None, None, None);
        assert_eq!(config, from_env_pairs());
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn memory_flag_replaces_environment_database() {
        let config = from_env_pairs().with_overrides(None, Some(":memory:"), None);
        assert_eq!(config.store, StoreBackend::Memory);
    }

    #[test]
    fn memory_markers_select_memory_store() {
        assert_eq!(StoreBackend::from_path(""), StoreBackend::Memory);
        assert_eq!(StoreBackend::from_path("  :memory: "), StoreBackend::Memory);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let addr = ApiConfig::from_lookup(lookup_from(&[(ADDR_ENV, "not-an-addr")]));
        assert!(matches!(addr, Err(ConfigError::InvalidAddr { .. })));

        let seed = ApiConfig::from_lookup(lookup_from(&[(SEED_ENV, "-3")]));
        assert!(matches!(seed, Err(ConfigError::InvalidSeed { .. })));
    }
}
