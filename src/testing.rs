//! Test doubles for the platform and settings traits

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use serenity::model::id::{ChannelId, GuildId, UserId};
use serenity::model::permissions::Permissions;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::platform::{ActivityKind, ChatPlatform};
use crate::settings::{GuildSettings, SettingsProvider};

/// Records every outbound call
#[derive(Default)]
pub struct MockPlatform {
    pub sent: Mutex<Vec<(ChannelId, String)>>,
    pub presences: Mutex<Vec<(String, ActivityKind)>>,
    pub shutdowns: AtomicUsize,
    pub fail_sends: AtomicBool,
    presence_delay: Mutex<Option<Duration>>,
    guilds: AtomicUsize,
    permissions: Mutex<HashMap<UserId, Permissions>>,
    roles: Mutex<HashMap<UserId, Vec<String>>>,
    names: Mutex<HashMap<UserId, String>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_guild_count(&self, count: usize) {
        self.guilds.store(count, Ordering::SeqCst);
    }

    /// Make every presence update take `delay` before it is recorded
    pub fn set_presence_delay(&self, delay: Duration) {
        *self.presence_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_permissions(&self, user_id: UserId, perms: Permissions) {
        self.permissions.lock().unwrap().insert(user_id, perms);
    }

    pub fn set_roles(&self, user_id: UserId, roles: &[&str]) {
        self.roles
            .lock()
            .unwrap()
            .insert(user_id, roles.iter().map(|r| r.to_string()).collect());
    }

    pub fn set_display_name(&self, user_id: UserId, name: &str) {
        self.names.lock().unwrap().insert(user_id, name.to_string());
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn presence_count(&self) -> usize {
        self.presences.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatPlatform for MockPlatform {
    async fn send_message(&self, channel_id: ChannelId, text: &str) -> Result<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(anyhow!("send failed"));
        }
        self.sent.lock().unwrap().push((channel_id, text.to_string()));
        Ok(())
    }

    async fn update_presence(&self, status_text: &str, kind: ActivityKind) -> Result<()> {
        let delay = *self.presence_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.presences
            .lock()
            .unwrap()
            .push((status_text.to_string(), kind));
        Ok(())
    }

    async fn guild_count(&self) -> usize {
        self.guilds.load(Ordering::SeqCst)
    }

    async fn effective_permissions(
        &self,
        _guild_id: Option<GuildId>,
        _channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<Permissions> {
        Ok(self
            .permissions
            .lock()
            .unwrap()
            .get(&user_id)
            .copied()
            .unwrap_or(Permissions::SEND_MESSAGES))
    }

    async fn member_role_names(&self, _guild_id: GuildId, user_id: UserId) -> Result<Vec<String>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn member_display_name(&self, _guild_id: GuildId, user_id: UserId) -> Result<String> {
        self.names
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown member {user_id}"))
    }

    async fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory settings with the stock defaults
#[derive(Default)]
pub struct MockSettings {
    guilds: DashMap<GuildId, GuildSettings>,
}

impl MockSettings {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsProvider for MockSettings {
    async fn get_settings(&self, guild_id: Option<GuildId>) -> Result<GuildSettings> {
        Ok(guild_id
            .and_then(|id| self.guilds.get(&id).map(|s| s.clone()))
            .unwrap_or_default())
    }

    async fn set_prefix(&self, guild_id: GuildId, prefix: char) -> Result<()> {
        self.guilds.entry(guild_id).or_default().prefix = prefix;
        Ok(())
    }

    async fn set_role_name(&self, guild_id: GuildId, role_name: &str) -> Result<()> {
        self.guilds.entry(guild_id).or_default().role_name = role_name.to_string();
        Ok(())
    }
}
