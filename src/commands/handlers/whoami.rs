//! Member info command
//!
//! Handles: whoami
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::commands::command::{Command, CommandInfo, MessageContext};
use crate::commands::permissions::{display_name, is_teacher};
use crate::platform::ChatPlatform;
use crate::settings::SettingsProvider;

/// Tells the caller their display name and whether they are a teacher
pub struct WhoAmICommand {
    info: CommandInfo,
    platform: Arc<dyn ChatPlatform>,
    settings: Arc<dyn SettingsProvider>,
}

impl WhoAmICommand {
    pub fn new(platform: Arc<dyn ChatPlatform>, settings: Arc<dyn SettingsProvider>) -> Self {
        WhoAmICommand {
            info: CommandInfo::new(
                &["whoami", "me"],
                "Show your name and whether you hold the teacher role.",
            ),
            platform,
            settings,
        }
    }
}

#[async_trait]
impl Command for WhoAmICommand {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    async fn call(&self, _args: &[String], ctx: &MessageContext) -> Result<()> {
        let Some(guild_id) = ctx.guild_id else {
            return self
                .platform
                .send_message(ctx.channel_id, "This command can only be used in a server.")
                .await;
        };

        let platform = self.platform.as_ref();
        let name = display_name(platform, guild_id, ctx.author_id).await?;
        let reply = if is_teacher(platform, self.settings.as_ref(), guild_id, ctx.author_id).await? {
            format!("You are **{name}**, a teacher.")
        } else {
            format!("You are **{name}**, a student.")
        };

        self.platform.send_message(ctx.channel_id, &reply).await
    }
}
