use crate::domain::Fingerprint;
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_WALLET_RPC_URL: &str = "https://localhost:9256";
pub const DEFAULT_TIBET_API_URL: &str = "https://api.v2.tibetswap.io";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub wallet_rpc_url: String,
    pub wallet_cert_path: String,
    pub wallet_key_path: String,
    pub wallet_fingerprints: Vec<Fingerprint>,
    pub tibet_api_url: String,
    pub registry_cache_ttl_ms: i64,
    pub rpc_timeout_secs: u64,
    pub sync_poll_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    env_map
        .get(key)
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn parsed<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
    expected: &str,
) -> Result<T, ConfigError> {
    env_map
        .get(key)
        .map(|s| s.as_str())
        .unwrap_or(default)
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(key.to_string(), format!("must be a valid {}", expected)))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = parsed::<u16>(&env_map, "PORT", "8080", "u16")?;
        let database_path = required(&env_map, "DATABASE_PATH")?;

        let wallet_rpc_url = env_map
            .get("WALLET_RPC_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_WALLET_RPC_URL.to_string());
        let wallet_cert_path = required(&env_map, "WALLET_CERT_PATH")?;
        let wallet_key_path = required(&env_map, "WALLET_KEY_PATH")?;
        let wallet_fingerprints = parse_fingerprints_from_map(&env_map)?;

        let tibet_api_url = env_map
            .get("TIBET_API_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_TIBET_API_URL.to_string());

        let registry_cache_ttl_ms =
            parsed::<i64>(&env_map, "REGISTRY_CACHE_TTL_MS", "86400000", "i64")?;
        if registry_cache_ttl_ms < 0 {
            return Err(ConfigError::InvalidValue(
                "REGISTRY_CACHE_TTL_MS".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let rpc_timeout_secs = parsed::<u64>(&env_map, "RPC_TIMEOUT_SECS", "30", "u64")?;
        let sync_poll_ms = parsed::<u64>(&env_map, "SYNC_POLL_MS", "10000", "u64")?;

        Ok(Config {
            port,
            database_path,
            wallet_rpc_url,
            wallet_cert_path,
            wallet_key_path,
            wallet_fingerprints,
            tibet_api_url,
            registry_cache_ttl_ms,
            rpc_timeout_secs,
            sync_poll_ms,
        })
    }
}

/// Comma separated; blanks are ignored and an empty list means the active key.
fn parse_fingerprints_from_map(
    env_map: &HashMap<String, String>,
) -> Result<Vec<Fingerprint>, ConfigError> {
    let Some(list) = env_map.get("WALLET_FINGERPRINTS") else {
        return Ok(Vec::new());
    };
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map(Fingerprint).map_err(|_| {
                ConfigError::InvalidValue(
                    "WALLET_FINGERPRINTS".to_string(),
                    format!("{} is not a valid fingerprint", s),
                )
            })
        })
        .collect()
}
