use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DB_MAX_CONNECTIONS: &str = "10";
const DEFAULT_VOTE_TIMEOUT_MS: &str = "5000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_access_secret: String,
    pub listen_addr: String,
    pub db_max_connections: u32,
    pub vote_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vote_timeout_ms: u64 = try_load(&lookup, "VOTE_TIMEOUT_MS", DEFAULT_VOTE_TIMEOUT_MS)?;
        if vote_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "VOTE_TIMEOUT_MS",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            jwt_access_secret: required(&lookup, "JWT_ACCESS_SECRET")?,
            listen_addr: try_load(&lookup, "APP_ADDR", DEFAULT_ADDR)?,
            db_max_connections: try_load(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            vote_timeout: Duration::from_millis(vote_timeout_ms),
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/quora"),
            ("JWT_ACCESS_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.listen_addr, DEFAULT_ADDR);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.vote_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn test_missing_required() {
        let err = Config::from_lookup(lookup(&[("JWT_ACCESS_SECRET", "secret")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_invalid_number() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/quora"),
            ("JWT_ACCESS_SECRET", "secret"),
            ("VOTE_TIMEOUT_MS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "VOTE_TIMEOUT_MS", .. }));
    }
}
