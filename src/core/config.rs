//! Environment-driven bot configuration
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add PRESENCE_INTERVAL_SECS and DEFAULT_ROLE_NAME
//! - 1.0.0: Initial release with token, owner and database path

use anyhow::{anyhow, Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_PREFIX: char = '?';
pub const DEFAULT_ROLE_NAME: &str = "Teacher";
pub const DEFAULT_DATABASE_PATH: &str = "classroom.db";
pub const DEFAULT_PRESENCE_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub owner_id: u64,
    pub database_path: String,
    pub log_level: String,
    pub default_prefix: char,
    pub default_role_name: String,
    pub presence_interval: Duration,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let owner_id = lookup("BOT_OWNER_ID")
            .ok_or_else(|| anyhow!("BOT_OWNER_ID must be set"))?
            .trim()
            .parse::<u64>()
            .context("BOT_OWNER_ID must be a numeric Discord user id")?;

        let default_prefix = match lookup("DEFAULT_PREFIX") {
            Some(value) => value
                .trim()
                .chars()
                .next()
                .ok_or_else(|| anyhow!("DEFAULT_PREFIX must not be empty"))?,
            None => DEFAULT_PREFIX,
        };

        let presence_interval = match lookup("PRESENCE_INTERVAL_SECS") {
            Some(value) => Duration::from_secs(
                value
                    .trim()
                    .parse::<u64>()
                    .context("PRESENCE_INTERVAL_SECS must be a whole number of seconds")?,
            ),
            None => Duration::from_secs(DEFAULT_PRESENCE_INTERVAL_SECS),
        };

        Ok(Config {
            discord_token,
            owner_id,
            database_path: lookup("DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            default_prefix,
            default_role_name: lookup("DEFAULT_ROLE_NAME")
                .unwrap_or_else(|| DEFAULT_ROLE_NAME.to_string()),
            presence_interval,
        })
    }
}
