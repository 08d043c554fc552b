//! Permission gate and role helpers
//!
//! The gate only evaluates a command's predicate against permissions the
//! caller already resolved; role helpers query the platform and are used by
//! individual commands.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add is_teacher and display_name helpers
//! - 1.0.0: Initial gate

use anyhow::Result;
use serenity::model::id::{GuildId, UserId};
use serenity::model::permissions::Permissions;

use super::command::Command;
use crate::platform::ChatPlatform;
use crate::settings::SettingsProvider;

pub struct PermissionGate;

impl PermissionGate {
    /// Whether `effective` satisfies the command's requirement
    pub fn check(command: &dyn Command, effective: &Permissions) -> bool {
        command.check_permissions(effective)
    }
}

/// True when `effective` holds every bit in `required`
///
/// Administrators pass every check.
pub fn requires(effective: &Permissions, required: Permissions) -> bool {
    effective.contains(Permissions::ADMINISTRATOR) || effective.contains(required)
}

/// Whether the member holds the guild's configured teacher role
pub async fn is_teacher(
    platform: &dyn ChatPlatform,
    settings: &dyn SettingsProvider,
    guild_id: GuildId,
    user_id: UserId,
) -> Result<bool> {
    let role_name = settings.get_settings(Some(guild_id)).await?.role_name;
    let roles = platform.member_role_names(guild_id, user_id).await?;
    Ok(roles.iter().any(|role| *role == role_name))
}

/// Guild nickname or account name of a member
pub async fn display_name(
    platform: &dyn ChatPlatform,
    guild_id: GuildId,
    user_id: UserId,
) -> Result<String> {
    platform.member_display_name(guild_id, user_id).await
}
