//! Admin command handlers
//!
//! Handles: prefix, teacherrole
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add teacherrole
//! - 1.0.0: Per-guild prefix command

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::id::GuildId;
use serenity::model::permissions::Permissions;
use std::sync::Arc;

use crate::commands::command::{Command, CommandInfo, MessageContext};
use crate::commands::permissions::requires;
use crate::platform::ChatPlatform;
use crate::settings::SettingsProvider;

const GUILD_ONLY: &str = "This command can only be used in a server.";
const MANAGERS_ONLY: &str = "You need the Manage Server permission to change bot settings.";

/// Guild id of the invocation, answering with an error message in DMs
async fn require_guild(platform: &dyn ChatPlatform, ctx: &MessageContext) -> Result<Option<GuildId>> {
    match ctx.guild_id {
        Some(id) => Ok(Some(id)),
        None => {
            platform.send_message(ctx.channel_id, GUILD_ONLY).await?;
            Ok(None)
        }
    }
}

/// Show or change the guild's command prefix
pub struct PrefixCommand {
    info: CommandInfo,
    platform: Arc<dyn ChatPlatform>,
    settings: Arc<dyn SettingsProvider>,
}

impl PrefixCommand {
    pub fn new(platform: Arc<dyn ChatPlatform>, settings: Arc<dyn SettingsProvider>) -> Self {
        PrefixCommand {
            info: CommandInfo::new(&["prefix", "setprefix"], "Show or change the command prefix.")
                .with_options(&["<character>: new prefix, omit to show the current one"])
                .with_perms_message(MANAGERS_ONLY),
            platform,
            settings,
        }
    }
}

#[async_trait]
impl Command for PrefixCommand {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn check_permissions(&self, perms: &Permissions) -> bool {
        requires(perms, Permissions::MANAGE_GUILD)
    }

    async fn call(&self, args: &[String], ctx: &MessageContext) -> Result<()> {
        let Some(guild_id) = require_guild(self.platform.as_ref(), ctx).await? else {
            return Ok(());
        };

        let reply = match args {
            [] => {
                let prefix = self.settings.get_settings(Some(guild_id)).await?.prefix;
                format!("The current prefix is `{prefix}`")
            }
            [value] if value.chars().count() == 1 => {
                let prefix = value.chars().next().unwrap_or_default();
                self.settings.set_prefix(guild_id, prefix).await?;
                info!("Set prefix for guild {guild_id} to '{prefix}'");
                format!("Prefix set to `{prefix}`")
            }
            _ => "Usage: prefix <character>".to_string(),
        };

        self.platform.send_message(ctx.channel_id, &reply).await
    }
}

/// Show or change the role that marks teachers
pub struct TeacherRoleCommand {
    info: CommandInfo,
    platform: Arc<dyn ChatPlatform>,
    settings: Arc<dyn SettingsProvider>,
}

impl TeacherRoleCommand {
    pub fn new(platform: Arc<dyn ChatPlatform>, settings: Arc<dyn SettingsProvider>) -> Self {
        TeacherRoleCommand {
            info: CommandInfo::new(
                &["teacherrole", "role"],
                "Show or change the name of the teacher role.",
            )
            .with_options(&["<role name>: new role name, omit to show the current one"])
            .with_perms_message(MANAGERS_ONLY),
            platform,
            settings,
        }
    }
}

#[async_trait]
impl Command for TeacherRoleCommand {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn check_permissions(&self, perms: &Permissions) -> bool {
        requires(perms, Permissions::MANAGE_GUILD)
    }

    async fn call(&self, args: &[String], ctx: &MessageContext) -> Result<()> {
        let Some(guild_id) = require_guild(self.platform.as_ref(), ctx).await? else {
            return Ok(());
        };

        let reply = if args.is_empty() {
            let role_name = self.settings.get_settings(Some(guild_id)).await?.role_name;
            format!("The teacher role is **{role_name}**")
        } else {
            let role_name = args.join(" ");
            self.settings.set_role_name(guild_id, &role_name).await?;
            info!("Set teacher role for guild {guild_id} to '{role_name}'");
            format!("Teacher role set to **{role_name}**")
        };

        self.platform.send_message(ctx.channel_id, &reply).await
    }
}
