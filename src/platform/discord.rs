//! Serenity-backed `ChatPlatform`
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Permissions no longer need the author in the guild member cache; threads use their parent
//! - 1.0.0: Cache-first permission and role lookups with HTTP fallback for members

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use serenity::cache::Cache;
use serenity::client::bridge::gateway::ShardManager;
use serenity::http::Http;
use serenity::model::channel::{ChannelType, GuildChannel};
use serenity::model::gateway::Activity;
use serenity::model::guild::Member;
use serenity::model::id::{ChannelId, GuildId, UserId};
use serenity::model::permissions::Permissions;
use serenity::prelude::{Client, Mutex};
use std::sync::Arc;

use super::{ActivityKind, ChatPlatform};

/// Discord gateway and REST access for the dispatcher
#[derive(Clone)]
pub struct DiscordPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
    shard_manager: Arc<Mutex<ShardManager>>,
}

impl DiscordPlatform {
    pub fn new(client: &Client) -> Self {
        DiscordPlatform {
            http: client.cache_and_http.http.clone(),
            cache: client.cache_and_http.cache.clone(),
            shard_manager: client.shard_manager.clone(),
        }
    }

    async fn member(&self, guild_id: GuildId, user_id: UserId) -> Result<Member> {
        if let Some(member) = self.cache.member(guild_id, user_id) {
            return Ok(member);
        }
        Ok(self.http.get_member(guild_id.0, user_id.0).await?)
    }

    async fn channel(&self, channel_id: ChannelId) -> Result<GuildChannel> {
        if let Some(channel) = self.cache.guild_channel(channel_id) {
            return Ok(channel);
        }
        self.http
            .get_channel(channel_id.0)
            .await?
            .guild()
            .ok_or_else(|| anyhow!("Channel {channel_id} is not a guild channel"))
    }
}

/// Channel whose overwrites apply to messages sent in `channel`
///
/// Threads carry no overwrites of their own, so their parent is used.
fn permission_channel_id(channel: &GuildChannel) -> ChannelId {
    match (channel.kind, channel.parent_id) {
        (
            ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::NewsThread,
            Some(parent_id),
        ) => parent_id,
        _ => channel.id,
    }
}

/// Permissions of `member` in `channel` using the cached guild's roles and owner
///
/// The member is passed in rather than read from `guild.members`, which only
/// holds the bot itself without the privileged members intent.
fn member_permissions_in(
    cache: &Cache,
    channel: &GuildChannel,
    member: &Member,
) -> Result<Permissions> {
    let guild = cache
        .guild(channel.guild_id)
        .ok_or_else(|| anyhow!("Guild {} is not cached", channel.guild_id))?;
    Ok(guild.user_permissions_in(channel, member)?)
}

fn to_activity(status_text: &str, kind: ActivityKind) -> Activity {
    match kind {
        ActivityKind::Playing => Activity::playing(status_text),
        ActivityKind::Listening => Activity::listening(status_text),
        ActivityKind::Watching => Activity::watching(status_text),
        ActivityKind::Competing => Activity::competing(status_text),
    }
}

#[async_trait]
impl ChatPlatform for DiscordPlatform {
    async fn send_message(&self, channel_id: ChannelId, text: &str) -> Result<()> {
        channel_id.say(&self.http, text).await?;
        Ok(())
    }

    async fn update_presence(&self, status_text: &str, kind: ActivityKind) -> Result<()> {
        let manager = self.shard_manager.lock().await;
        let runners = manager.runners.lock().await;
        if runners.is_empty() {
            return Err(anyhow!("No running shards to update presence on"));
        }
        for runner in runners.values() {
            runner
                .runner_tx
                .set_activity(Some(to_activity(status_text, kind)));
        }
        Ok(())
    }

    async fn guild_count(&self) -> usize {
        self.cache.guild_count()
    }

    async fn effective_permissions(
        &self,
        guild_id: Option<GuildId>,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<Permissions> {
        let Some(guild_id) = guild_id else {
            return Ok(Permissions::SEND_MESSAGES
                | Permissions::READ_MESSAGE_HISTORY
                | Permissions::ATTACH_FILES
                | Permissions::EMBED_LINKS);
        };

        let mut channel = self.channel(channel_id).await?;
        let source_id = permission_channel_id(&channel);
        if source_id != channel.id {
            debug!("Resolving permissions for thread {channel_id} via parent {source_id}");
            channel = self.channel(source_id).await?;
        }

        let member = self.member(guild_id, user_id).await?;
        member_permissions_in(&self.cache, &channel, &member)
    }

    async fn member_role_names(&self, guild_id: GuildId, user_id: UserId) -> Result<Vec<String>> {
        let member = self.member(guild_id, user_id).await?;

        let mut names = Vec::with_capacity(member.roles.len());
        let mut fetched_roles = None;
        for role_id in &member.roles {
            if let Some(role) = self.cache.role(guild_id, *role_id) {
                names.push(role.name);
                continue;
            }

            if fetched_roles.is_none() {
                fetched_roles = Some(self.http.get_guild_roles(guild_id.0).await?);
            }
            match fetched_roles
                .as_ref()
                .and_then(|roles| roles.iter().find(|r| r.id == *role_id))
            {
                Some(role) => names.push(role.name.clone()),
                None => warn!("Role {role_id} of user {user_id} not found in guild {guild_id}"),
            }
        }

        Ok(names)
    }

    async fn member_display_name(&self, guild_id: GuildId, user_id: UserId) -> Result<String> {
        let member = self.member(guild_id, user_id).await?;
        Ok(member
            .nick
            .filter(|nick| !nick.is_empty())
            .unwrap_or(member.user.name))
    }

    async fn shutdown(&self) {
        info!("🛑 Shutting down all shards");
        self.shard_manager.lock().await.shutdown_all().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serenity::model::event::GuildCreateEvent;

    const GUILD: u64 = 100;
    const BOT: u64 = 1;
    const AUTHOR: u64 = 2;
    const OWNER: u64 = 3;
    const TEACHER_ROLE: u64 = 200;
    const TEXT_CHANNEL: u64 = 10;
    const LOCKED_CHANNEL: u64 = 11;

    fn user(id: u64, name: &str) -> serde_json::Value {
        json!({ "id": id.to_string(), "username": name, "discriminator": "0001", "avatar": null })
    }

    fn member(id: u64, roles: &[u64]) -> serde_json::Value {
        let roles: Vec<String> = roles.iter().map(u64::to_string).collect();
        json!({
            "user": user(id, "someone"),
            "roles": roles,
            "deaf": false,
            "mute": false,
            "nick": null,
            "joined_at": "2021-01-01T00:00:00.000000+00:00",
            "guild_id": GUILD.to_string(),
        })
    }

    fn role(id: u64, name: &str, permissions: Permissions, position: i64) -> serde_json::Value {
        json!({
            "id": id.to_string(),
            "name": name,
            "color": 0,
            "hoist": false,
            "managed": false,
            "mentionable": false,
            "permissions": permissions.bits().to_string(),
            "position": position,
        })
    }

    /// A cache holding one guild whose member list is only the bot, as
    /// GUILD_CREATE delivers it without the members intent
    fn cache_without_author() -> Cache {
        let everyone = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;
        let guild = json!({
            "id": GUILD.to_string(),
            "name": "Classroom",
            "owner_id": OWNER.to_string(),
            "afk_timeout": 300,
            "default_message_notifications": 0,
            "explicit_content_filter": 0,
            "mfa_level": 0,
            "verification_level": 0,
            "nsfw_level": 0,
            "system_channel_flags": 0,
            "preferred_locale": "en-US",
            "features": [],
            "emojis": [],
            "stickers": [],
            "presences": [],
            "voice_states": [],
            "joined_at": "2021-01-01T00:00:00.000000+00:00",
            "large": false,
            "member_count": 2,
            "members": [member(BOT, &[])],
            "roles": [
                role(GUILD, "@everyone", everyone, 0),
                role(TEACHER_ROLE, "Teacher", Permissions::MANAGE_GUILD, 1),
            ],
            "channels": [
                { "id": TEXT_CHANNEL.to_string(), "type": 0, "name": "general" },
                {
                    "id": LOCKED_CHANNEL.to_string(),
                    "type": 0,
                    "name": "announcements",
                    "permission_overwrites": [{
                        "id": GUILD.to_string(),
                        "type": 0,
                        "allow": "0",
                        "deny": Permissions::SEND_MESSAGES.bits().to_string(),
                    }],
                },
            ],
        });

        let cache = Cache::new();
        let mut event: GuildCreateEvent = serde_json::from_value(guild).unwrap();
        cache.update(&mut event);
        cache
    }

    fn author(roles: &[u64]) -> Member {
        serde_json::from_value(member(AUTHOR, roles)).unwrap()
    }

    #[test]
    fn test_author_missing_from_member_cache_still_resolves() {
        let cache = cache_without_author();
        let channel = cache.guild_channel(ChannelId(TEXT_CHANNEL)).unwrap();
        assert!(cache.member(GuildId(GUILD), UserId(AUTHOR)).is_none());

        let permissions = member_permissions_in(&cache, &channel, &author(&[])).unwrap();
        assert!(permissions.contains(Permissions::SEND_MESSAGES));
        assert!(!permissions.contains(Permissions::MANAGE_GUILD));
    }

    #[test]
    fn test_member_roles_add_permissions() {
        let cache = cache_without_author();
        let channel = cache.guild_channel(ChannelId(TEXT_CHANNEL)).unwrap();

        let permissions =
            member_permissions_in(&cache, &channel, &author(&[TEACHER_ROLE])).unwrap();
        assert!(permissions.contains(Permissions::MANAGE_GUILD | Permissions::SEND_MESSAGES));
    }

    #[test]
    fn test_channel_overwrites_apply() {
        let cache = cache_without_author();
        let channel = cache.guild_channel(ChannelId(LOCKED_CHANNEL)).unwrap();

        let permissions = member_permissions_in(&cache, &channel, &author(&[])).unwrap();
        assert!(permissions.contains(Permissions::VIEW_CHANNEL));
        assert!(!permissions.contains(Permissions::SEND_MESSAGES));
    }

    #[test]
    fn test_guild_owner_has_everything() {
        let cache = cache_without_author();
        let channel = cache.guild_channel(ChannelId(TEXT_CHANNEL)).unwrap();
        let owner: Member = serde_json::from_value(member(OWNER, &[])).unwrap();

        let permissions = member_permissions_in(&cache, &channel, &owner).unwrap();
        assert!(permissions.contains(Permissions::MANAGE_GUILD));
    }

    #[test]
    fn test_uncached_guild_is_an_error() {
        let cache = Cache::new();
        let channel: GuildChannel = serde_json::from_value(json!({
            "id": TEXT_CHANNEL.to_string(),
            "guild_id": GUILD.to_string(),
            "type": 0,
            "name": "general",
        }))
        .unwrap();

        assert!(member_permissions_in(&cache, &channel, &author(&[])).is_err());
    }

    #[test]
    fn test_threads_use_parent_channel() {
        let thread: GuildChannel = serde_json::from_value(json!({
            "id": "50",
            "guild_id": GUILD.to_string(),
            "parent_id": LOCKED_CHANNEL.to_string(),
            "type": 11,
            "name": "question",
        }))
        .unwrap();
        assert_eq!(permission_channel_id(&thread), ChannelId(LOCKED_CHANNEL));

        let cache = cache_without_author();
        let text = cache.guild_channel(ChannelId(TEXT_CHANNEL)).unwrap();
        assert_eq!(permission_channel_id(&text), ChannelId(TEXT_CHANNEL));
    }
}
