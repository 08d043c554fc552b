//! # Platform Layer
//!
//! The chat-gateway capabilities the dispatcher and commands depend on.
//! `DiscordPlatform` is the serenity-backed implementation; tests use
//! recording mocks.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

pub mod discord;

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::id::{ChannelId, GuildId, UserId};
use serenity::model::permissions::Permissions;

pub use discord::DiscordPlatform;

/// Kind of activity shown next to the bot's presence text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Playing,
    Listening,
    Watching,
    Competing,
}

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Post a plain text message to a channel
    async fn send_message(&self, channel_id: ChannelId, text: &str) -> Result<()>;

    /// Replace the bot's presence activity
    async fn update_presence(&self, status_text: &str, kind: ActivityKind) -> Result<()>;

    /// Number of guilds the bot currently sees
    async fn guild_count(&self) -> usize;

    /// Effective permissions of `user_id` in `channel_id`
    ///
    /// Direct messages (no guild) report the permissions a user has in a DM.
    async fn effective_permissions(
        &self,
        guild_id: Option<GuildId>,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<Permissions>;

    /// Names of every role `user_id` holds in `guild_id`
    async fn member_role_names(&self, guild_id: GuildId, user_id: UserId) -> Result<Vec<String>>;

    /// Guild nickname of a member, falling back to the account name
    async fn member_display_name(&self, guild_id: GuildId, user_id: UserId) -> Result<String>;

    /// Close the gateway connection and stop the client
    async fn shutdown(&self);
}
