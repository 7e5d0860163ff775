use crate::engine::{
    StrategyParams, DEFAULT_TARGET_TICKER_HEX, MINSWAP_POOL_NFT_POLICY_ID, POLICY_ID_HEX_LEN,
};
use secrecy::SecretString;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub seed_phrase: SecretString,
    pub blockfrost_key: SecretString,
    pub ogmios_url: String,
    pub swap_gateway_url: String,
    pub network: Network,
    pub feed_retry_delay: Duration,
    pub shutdown_grace: Duration,
    pub log_format: LogFormat,
    /// Directory for the per-severity log files; `None` logs to the console only.
    pub log_dir: Option<PathBuf>,
    pub strategy: StrategyParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Preprod,
    Preview,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Preprod => "preprod",
            Network::Preview => "preview",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let seed_phrase = required(&env_map, "SEED_PHRASE")?;
        let blockfrost_key = required(&env_map, "BLOCKFROST_KEY")?;

        let ogmios_url = env_map
            .get("OGMIOS_URL")
            .cloned()
            .unwrap_or_else(|| "ws://127.0.0.1:1337".to_string());

        let swap_gateway_url = env_map
            .get("SWAP_GATEWAY_URL")
            .cloned()
            .unwrap_or_else(|| "http://127.0.0.1:8090".to_string());

        let network = match env_map
            .get("NETWORK")
            .map(|s| s.as_str())
            .unwrap_or("mainnet")
        {
            "mainnet" => Network::Mainnet,
            "preprod" => Network::Preprod,
            "preview" => Network::Preview,
            other => {
                return Err(ConfigError::InvalidValue(
                    "NETWORK".to_string(),
                    format!("must be mainnet, preprod, or preview, got {}", other),
                ))
            }
        };

        let feed_retry_delay_ms = env_map
            .get("FEED_RETRY_DELAY_MS")
            .map(|s| s.as_str())
            .unwrap_or("1000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "FEED_RETRY_DELAY_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        let shutdown_grace_ms = env_map
            .get("SHUTDOWN_GRACE_MS")
            .map(|s| s.as_str())
            .unwrap_or("10000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "SHUTDOWN_GRACE_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        // An empty LOG_DIR turns the log files off.
        let log_dir = match env_map.get("LOG_DIR").map(|s| s.trim()) {
            None => Some(PathBuf::from(".")),
            Some("") => None,
            Some(dir) => Some(PathBuf::from(dir)),
        };

        let log_format = match env_map
            .get("LOG_FORMAT")
            .map(|s| s.as_str())
            .unwrap_or("pretty")
        {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidValue(
                    "LOG_FORMAT".to_string(),
                    format!("must be pretty or json, got {}", other),
                ))
            }
        };

        let pool_nft_policy_id = env_map
            .get("POOL_NFT_POLICY_ID")
            .cloned()
            .unwrap_or_else(|| MINSWAP_POOL_NFT_POLICY_ID.to_string());
        let valid_policy_id = pool_nft_policy_id.len() == POLICY_ID_HEX_LEN
            && hex::decode(&pool_nft_policy_id).is_ok();
        if !valid_policy_id {
            return Err(ConfigError::InvalidValue(
                "POOL_NFT_POLICY_ID".to_string(),
                format!("must be {} hex characters", POLICY_ID_HEX_LEN),
            ));
        }

        let target_ticker_hex = env_map
            .get("TARGET_TICKER_HEX")
            .cloned()
            .unwrap_or_else(|| DEFAULT_TARGET_TICKER_HEX.to_string());
        if target_ticker_hex.is_empty() || hex::decode(&target_ticker_hex).is_err() {
            return Err(ConfigError::InvalidValue(
                "TARGET_TICKER_HEX".to_string(),
                "must be a non-empty hex string".to_string(),
            ));
        }

        let strategy = StrategyParams::default()
            .with_pool_nft_policy_id(pool_nft_policy_id.to_ascii_lowercase())
            .with_target_ticker_hex(target_ticker_hex.to_ascii_lowercase());

        Ok(Config {
            port,
            seed_phrase,
            blockfrost_key,
            ogmios_url,
            swap_gateway_url,
            network,
            feed_retry_delay: Duration::from_millis(feed_retry_delay_ms),
            shutdown_grace: Duration::from_millis(shutdown_grace_ms),
            log_format,
            log_dir,
            strategy,
        })
    }
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<SecretString, ConfigError> {
    env_map
        .get(key)
        .filter(|s| !s.trim().is_empty())
        .map(|s| SecretString::from(s.clone()))
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}
