use crate::gate::rate_limit::RateLimitConfig;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub admin_password: String,
    pub environment: Environment,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_ms: i64,
    pub rate_limit_block_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
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

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let admin_password = env_map
            .get("ADMIN_PASSWORD")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("ADMIN_PASSWORD".to_string()))?;

        let environment = match env_map
            .get("ENVIRONMENT")
            .map(|s| s.as_str())
            .unwrap_or("development")
        {
            "development" => Environment::Development,
            "production" => Environment::Production,
            other => {
                return Err(ConfigError::InvalidValue(
                    "ENVIRONMENT".to_string(),
                    format!("must be development or production, got {}", other),
                ))
            }
        };

        let rate_limit_max_requests = parse_numeric(&env_map, "RATE_LIMIT_MAX_REQUESTS", "30")?;
        let rate_limit_window_ms = parse_numeric(&env_map, "RATE_LIMIT_WINDOW_MS", "60000")?;
        let rate_limit_block_ms = parse_numeric(&env_map, "RATE_LIMIT_BLOCK_MS", "300000")?;

        Ok(Config {
            port,
            database_path,
            admin_password,
            environment,
            rate_limit_max_requests,
            rate_limit_window_ms,
            rate_limit_block_ms,
        })
    }

    /// Rate-limiter knobs for the public listing gate.
    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests: self.rate_limit_max_requests,
            window_ms: self.rate_limit_window_ms,
            block_ms: self.rate_limit_block_ms,
        }
    }
}

fn parse_numeric<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError> {
    env_map
        .get(key)
        .map(|s| s.as_str())
        .unwrap_or(default)
        .parse::<T>()
        .map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a valid number".to_string())
        })
}
