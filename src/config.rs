//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LEADERBOARD_LIMIT: u32 = 10;
const DEFAULT_LEADERBOARD_MAX_LIMIT: u32 = 100;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// HS256 key used to verify identity tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Leaderboard size when the caller gives no `limit`
    pub leaderboard_default_limit: u32,
    /// Requested leaderboard sizes are clamped to this
    pub leaderboard_max_limit: u32,
    /// Seed demo teams and the workout catalog at startup
    pub seed_demo_data: bool,
}

impl Config {
    /// Config for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            port: DEFAULT_PORT,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            leaderboard_default_limit: DEFAULT_LEADERBOARD_LIMIT,
            leaderboard_max_limit: DEFAULT_LEADERBOARD_MAX_LIMIT,
            seed_demo_data: false,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let config = Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: parse_var("PORT", DEFAULT_PORT)?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .trim()
                .as_bytes()
                .to_vec(),
            leaderboard_default_limit: parse_var(
                "LEADERBOARD_DEFAULT_LIMIT",
                DEFAULT_LEADERBOARD_LIMIT,
            )?,
            leaderboard_max_limit: parse_var(
                "LEADERBOARD_MAX_LIMIT",
                DEFAULT_LEADERBOARD_MAX_LIMIT,
            )?,
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(false),
        };

        if config.leaderboard_default_limit == 0 {
            return Err(ConfigError::Invalid(
                "LEADERBOARD_DEFAULT_LIMIT",
                "must be positive".to_string(),
            ));
        }
        if config.leaderboard_max_limit == 0 {
            return Err(ConfigError::Invalid(
                "LEADERBOARD_MAX_LIMIT",
                "must be positive".to_string(),
            ));
        }
        if config.leaderboard_default_limit > config.leaderboard_max_limit {
            return Err(ConfigError::Invalid(
                "LEADERBOARD_DEFAULT_LIMIT",
                "must not exceed LEADERBOARD_MAX_LIMIT".to_string(),
            ));
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(name, e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
