use crate::domain::RoundingMode;
use crate::engine::{CalculationOptions, OwnershipPolicy};
use std::collections::HashMap;
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_addr: IpAddr,
    pub rounding_mode: RoundingMode,
    pub ownership_policy: OwnershipPolicy,
    pub max_batch_size: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            bind_addr: IpAddr::from([127, 0, 0, 1]),
            rounding_mode: RoundingMode::HalfUp,
            ownership_policy: OwnershipPolicy::Strict,
            max_batch_size: 500,
        }
    }
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

        let bind_addr = env_map
            .get("BIND_ADDR")
            .map(|s| s.as_str())
            .unwrap_or("127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "BIND_ADDR".to_string(),
                    "must be an IP address".to_string(),
                )
            })?;

        let rounding_mode = match env_map
            .get("ROUNDING_MODE")
            .map(|s| s.as_str())
            .unwrap_or("half_up")
        {
            "half_up" => RoundingMode::HalfUp,
            "half_even" => RoundingMode::HalfEven,
            other => {
                return Err(ConfigError::InvalidValue(
                    "ROUNDING_MODE".to_string(),
                    format!("must be half_up or half_even, got {}", other),
                ))
            }
        };

        let ownership_policy = match env_map
            .get("OWNERSHIP_POLICY")
            .map(|s| s.as_str())
            .unwrap_or("strict")
        {
            "strict" => OwnershipPolicy::Strict,
            "trust" => OwnershipPolicy::Trust,
            other => {
                return Err(ConfigError::InvalidValue(
                    "OWNERSHIP_POLICY".to_string(),
                    format!("must be strict or trust, got {}", other),
                ))
            }
        };

        let max_batch_size = env_map
            .get("MAX_BATCH_SIZE")
            .map(|s| s.as_str())
            .unwrap_or("500")
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "MAX_BATCH_SIZE".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;

        Ok(Config {
            port,
            bind_addr,
            rounding_mode,
            ownership_policy,
            max_batch_size,
        })
    }

    pub fn calculation_options(&self) -> CalculationOptions {
        CalculationOptions {
            rounding: self.rounding_mode,
            ownership_policy: self.ownership_policy,
        }
    }
}
