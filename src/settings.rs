//! Per-guild settings read by the dispatcher and admin commands
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::id::GuildId;

use crate::core::config::{DEFAULT_PREFIX, DEFAULT_ROLE_NAME};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSettings {
    /// Leading character of every command in the guild
    pub prefix: char,
    /// Name of the role that marks teachers
    pub role_name: String,
}

impl Default for GuildSettings {
    fn default() -> Self {
        GuildSettings {
            prefix: DEFAULT_PREFIX,
            role_name: DEFAULT_ROLE_NAME.to_string(),
        }
    }
}

#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Resolved settings for a guild; `None` (direct messages) yields defaults
    async fn get_settings(&self, guild_id: Option<GuildId>) -> Result<GuildSettings>;

    async fn set_prefix(&self, guild_id: GuildId, prefix: char) -> Result<()>;

    async fn set_role_name(&self, guild_id: GuildId, role_name: &str) -> Result<()>;
}
