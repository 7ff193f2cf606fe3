use std::net::SocketAddr;

use chrono_tz::Tz;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "review_schedules.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_POOL_SIZE: u32 = 5;
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDR '{0}'")]
    BindAddr(String),
    #[error("Invalid DB_POOL_SIZE '{0}': expected a positive integer")]
    PoolSize(String),
    #[error("Unknown SCHEDULE_TIMEZONE '{0}'")]
    Timezone(String),
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub pool_size: u32,
    pub timezone: Tz,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::BindAddr(raw_addr.clone()))?;

        let pool_size = match lookup("DB_POOL_SIZE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::PoolSize(raw)),
            },
            None => DEFAULT_POOL_SIZE,
        };

        let timezone = match lookup("SCHEDULE_TIMEZONE") {
            Some(raw) => raw
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::Timezone(raw.clone()))?,
            None => DEFAULT_TIMEZONE,
        };

        Ok(Config {
            database_url,
            bind_addr,
            pool_size,
            timezone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, "review_schedules.db");
        assert_eq!(config.bind_addr, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.pool_size, 5);
        assert_eq!(config.timezone, chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "/tmp/reviews.db"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("DB_POOL_SIZE", "12"),
            ("SCHEDULE_TIMEZONE", "Europe/Rome"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "/tmp/reviews.db");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.pool_size, 12);
        assert_eq!(config.timezone, chrono_tz::Europe::Rome);
    }

    #[test]
    fn rejects_zero_pool_size() {
        let err = config_from(&[("DB_POOL_SIZE", "0")]).unwrap_err();
        assert_eq!(err, ConfigError::PoolSize("0".into()));
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = config_from(&[("SCHEDULE_TIMEZONE", "Mars/Olympus")]).unwrap_err();
        assert_eq!(err, ConfigError::Timezone("Mars/Olympus".into()));
    }

    #[test]
    fn rejects_bad_bind_addr() {
        assert!(matches!(
            config_from(&[("BIND_ADDR", "localhost")]),
            Err(ConfigError::BindAddr(_))
        ));
    }
}
