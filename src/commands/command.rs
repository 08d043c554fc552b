//! Prefix command trait and descriptor types
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: CommandInfo descriptor, Command trait and MessageContext

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use serenity::model::permissions::Permissions;

/// Static description of a command
///
/// `aliases[0]` is the canonical name: the registry key and the name shown in
/// help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub aliases: Vec<String>,
    pub description: String,
    /// Free-form option documentation, printed by help and never parsed
    pub options: Vec<String>,
    /// Reply sent when the permission check fails
    pub perms_message: String,
}

impl CommandInfo {
    pub fn new(aliases: &[&str], description: impl Into<String>) -> Self {
        CommandInfo {
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            description: description.into(),
            options: Vec::new(),
            perms_message: "You don't have permission to use this command.".to_string(),
        }
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn with_perms_message(mut self, message: impl Into<String>) -> Self {
        self.perms_message = message.into();
        self
    }

    /// Canonical name, or `None` for a descriptor without aliases
    pub fn name(&self) -> Option<&str> {
        self.aliases.first().map(String::as_str)
    }

    /// Every alias except the canonical name
    pub fn extra_aliases(&self) -> &[String] {
        self.aliases.get(1..).unwrap_or(&[])
    }
}

/// Where an invocation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageContext {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub author_id: UserId,
}

/// A prefix command
///
/// Implementations validate their own arguments and answer bad input with a
/// usage message rather than an error.
///
/// # Example
///
/// ```ignore
/// pub struct PingCommand { info: CommandInfo, platform: Arc<dyn ChatPlatform> }
///
/// #[async_trait]
/// impl Command for PingCommand {
///     fn info(&self) -> &CommandInfo { &self.info }
///
///     async fn call(&self, _args: &[String], ctx: &MessageContext) -> Result<()> {
///         self.platform.send_message(ctx.channel_id, "Pong!").await
///     }
/// }
/// ```
#[async_trait]
pub trait Command: Send + Sync {
    fn info(&self) -> &CommandInfo;

    /// Whether a caller holding `perms` may run this command
    ///
    /// Defaults to allowing everyone.
    fn check_permissions(&self, perms: &Permissions) -> bool {
        let _ = perms;
        true
    }

    async fn call(&self, args: &[String], ctx: &MessageContext) -> Result<()>;
}
