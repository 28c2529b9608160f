//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;

pub const ADDR_VAR: &str = "ROUTE_SERVER_ADDR";
pub const ROUTES_TTL_VAR: &str = "ROUTE_CACHE_ROUTES_TTL_SECS";
pub const LOCATIONS_TTL_VAR: &str = "ROUTE_CACHE_LOCATIONS_TTL_SECS";
pub const TRANSPORTATIONS_TTL_VAR: &str = "ROUTE_CACHE_TRANSPORTATIONS_TTL_SECS";
pub const MAX_CAPACITY_VAR: &str = "ROUTE_CACHE_MAX_CAPACITY";
pub const SEED_FILE_VAR: &str = "ROUTE_SEED_FILE";
pub const SEED_SAMPLE_VAR: &str = "ROUTE_SEED_SAMPLE";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration for the route server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,

    /// Cache TTLs and capacity.
    pub cache: CacheConfig,

    /// Optional JSON seed file loaded at startup.
    pub seed_file: Option<PathBuf>,

    /// Load the built-in sample network when no seed file is given.
    pub seed_sample: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cache: CacheConfig::default(),
            seed_file: None,
            seed_sample: true,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`. Unset or blank variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let addr = parse_or(get(ADDR_VAR), ADDR_VAR, defaults.addr)?;

        let cache = CacheConfig {
            routes_ttl: secs_or(get(ROUTES_TTL_VAR), ROUTES_TTL_VAR, defaults.cache.routes_ttl)?,
            locations_ttl: secs_or(
                get(LOCATIONS_TTL_VAR),
                LOCATIONS_TTL_VAR,
                defaults.cache.locations_ttl,
            )?,
            transportations_ttl: secs_or(
                get(TRANSPORTATIONS_TTL_VAR),
                TRANSPORTATIONS_TTL_VAR,
                defaults.cache.transportations_ttl,
            )?,
            max_capacity: parse_or(
                get(MAX_CAPACITY_VAR),
                MAX_CAPACITY_VAR,
                defaults.cache.max_capacity,
            )?,
        };

        let seed_file = get(SEED_FILE_VAR).map(PathBuf::from);

        let seed_sample = match get(SEED_SAMPLE_VAR) {
            None => defaults.seed_sample,
            Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::Invalid {
                var: SEED_SAMPLE_VAR,
                value: v.clone(),
                reason: "expected true or false".to_string(),
            })?,
        };

        Ok(Self {
            addr,
            cache,
            seed_file,
            seed_sample,
        })
    }
}

fn parse_or<T>(value: Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: v.clone(),
            reason: e.to_string(),
        }),
    }
}

fn secs_or(
    value: Option<String>,
    var: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_or(value.clone(), var, default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            var,
            value: value.unwrap_or_default(),
            reason: "must be at least one second".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.cache.routes_ttl, Duration::from_secs(600));
        assert!(config.seed_sample);
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn overrides() {
        let config = from_pairs(&[
            (ADDR_VAR, "0.0.0.0:8080"),
            (ROUTES_TTL_VAR, "30"),
            (LOCATIONS_TTL_VAR, "60"),
            (TRANSPORTATIONS_TTL_VAR, " 90 "),
            (MAX_CAPACITY_VAR, "500"),
            (SEED_FILE_VAR, "/data/network.json"),
            (SEED_SAMPLE_VAR, "false"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.cache.routes_ttl, Duration::from_secs(30));
        assert_eq!(config.cache.locations_ttl, Duration::from_secs(60));
        assert_eq!(config.cache.transportations_ttl, Duration::from_secs(90));
        assert_eq!(config.cache.max_capacity, 500);
        assert_eq!(config.seed_file, Some(PathBuf::from("/data/network.json")));
        assert!(!config.seed_sample);
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = from_pairs(&[(ADDR_VAR, "  "), (SEED_FILE_VAR, "")]).unwrap();
        assert_eq!(config.addr, ServerConfig::default().addr);
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn invalid_values_rejected() {
        let err = from_pairs(&[(ROUTES_TTL_VAR, "ten")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == ROUTES_TTL_VAR));

        let err = from_pairs(&[(ROUTES_TTL_VAR, "0")]).unwrap_err();
        assert!(err.to_string().contains("at least one second"));

        let err = from_pairs(&[(ADDR_VAR, "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == ADDR_VAR));

        let err = from_pairs(&[(SEED_SAMPLE_VAR, "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == SEED_SAMPLE_VAR));
    }
}
