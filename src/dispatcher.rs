//! # Command Dispatcher
//!
//! Routes an inbound chat message through parsing, the shutdown and help
//! built-ins, alias resolution, the permission gate and finally the command.
//! Also drives the throttled presence update on guild joins.
//!
//! - **Version**: 1.2.1
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.1: Pending presence retry runs in the background instead of ahead of the command
//! - 1.2.0: Paginate help output
//! - 1.1.0: Retry throttled presence updates on the next command
//! - 1.0.0: Initial prefix dispatcher with owner-only shutdown

use anyhow::Result;
use log::{debug, info, warn};
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::commands::command::MessageContext;
use crate::commands::help::{HelpFormatter, HELP_ALIASES};
use crate::commands::parser::{parse, ParseError};
use crate::commands::permissions::PermissionGate;
use crate::commands::registry::CommandRegistry;
use crate::core::response::MESSAGE_LIMIT;
use crate::features::presence::PresenceThrottle;
use crate::platform::ChatPlatform;
use crate::settings::SettingsProvider;

pub const SHUTDOWN_COMMAND: &str = "shutdown";
pub const SHUTDOWN_ACK: &str = "Ok, shutting down.";
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// Delay between the shutdown acknowledgement and closing the gateway
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// The parts of a chat message the dispatcher looks at
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub author_id: UserId,
    pub author_is_bot: bool,
    pub content: String,
}

impl InboundMessage {
    pub fn from_message(msg: &Message) -> Self {
        InboundMessage {
            message_id: msg.id,
            channel_id: msg.channel_id,
            guild_id: msg.guild_id,
            author_id: msg.author.id,
            author_is_bot: msg.author.bot,
            content: msg.content.clone(),
        }
    }

    fn context(&self) -> MessageContext {
        MessageContext {
            message_id: self.message_id,
            channel_id: self.channel_id,
            guild_id: self.guild_id,
            author_id: self.author_id,
        }
    }
}

/// How a message left the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Bot author or empty body
    Ignored,
    /// Not a command; dropped without a reply
    Rejected(ParseError),
    Shutdown,
    Help,
    UnknownCommand(String),
    PermissionDenied(String),
    Invoked(String),
}

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    platform: Arc<dyn ChatPlatform>,
    settings: Arc<dyn SettingsProvider>,
    owner_id: UserId,
    presence: Arc<PresenceThrottle>,
    shutdown_grace: Duration,
    help_page_limit: usize,
}

impl Dispatcher {
    pub fn new(
        registry: CommandRegistry,
        platform: Arc<dyn ChatPlatform>,
        settings: Arc<dyn SettingsProvider>,
        owner_id: UserId,
        presence_interval: Duration,
    ) -> Self {
        Dispatcher {
            registry: Arc::new(registry),
            platform,
            settings,
            owner_id,
            presence: Arc::new(PresenceThrottle::new(presence_interval)),
            shutdown_grace: SHUTDOWN_GRACE,
            help_page_limit: MESSAGE_LIMIT,
        }
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn with_help_page_limit(mut self, limit: usize) -> Self {
        self.help_page_limit = limit;
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn presence(&self) -> &PresenceThrottle {
        &self.presence
    }

    pub async fn handle_message(&self, msg: &InboundMessage) -> Result<Dispatch> {
        if msg.author_is_bot || msg.content.is_empty() {
            return Ok(Dispatch::Ignored);
        }

        let request_id = Uuid::new_v4();
        let prefix = self.settings.get_settings(msg.guild_id).await?.prefix;

        let tokens = match parse(&msg.content, prefix) {
            Ok(tokens) => tokens,
            Err(reason) => return Ok(Dispatch::Rejected(reason)),
        };
        let name = tokens[0].as_str();

        debug!(
            "[{request_id}] 📥 Command '{name}' from {} in channel {} ({} args)",
            msg.author_id,
            msg.channel_id,
            tokens.len() - 1
        );

        if self.presence.is_pending() {
            self.retry_presence(request_id);
        }

        if name == SHUTDOWN_COMMAND && msg.author_id == self.owner_id {
            self.shutdown(msg.channel_id, request_id).await;
            return Ok(Dispatch::Shutdown);
        }

        if HELP_ALIASES.contains(&name) {
            for page in HelpFormatter::render_pages(&self.registry, self.help_page_limit) {
                self.platform.send_message(msg.channel_id, &page).await?;
            }
            return Ok(Dispatch::Help);
        }

        let canonical = self.registry.resolve(name).unwrap_or(name);
        let Some(command) = self.registry.lookup(canonical) else {
            debug!("[{request_id}] ❓ Unknown command '{name}'");
            self.platform
                .send_message(msg.channel_id, UNKNOWN_COMMAND)
                .await?;
            return Ok(Dispatch::UnknownCommand(name.to_string()));
        };

        let perms = self
            .platform
            .effective_permissions(msg.guild_id, msg.channel_id, msg.author_id)
            .await?;
        if !PermissionGate::check(command.as_ref(), &perms) {
            warn!(
                "[{request_id}] 🚫 {} lacks permission for '{canonical}'",
                msg.author_id
            );
            self.platform
                .send_message(msg.channel_id, &command.info().perms_message)
                .await?;
            return Ok(Dispatch::PermissionDenied(canonical.to_string()));
        }

        command.call(&tokens[1..], &msg.context()).await?;
        debug!("[{request_id}] ✅ '{canonical}' completed");

        Ok(Dispatch::Invoked(canonical.to_string()))
    }

    /// Presence attempt for a guild that just became available
    ///
    /// A throttled attempt leaves the update pending for the next command.
    pub async fn handle_guild_available(&self, guild_id: GuildId) -> Result<()> {
        debug!("Guild {guild_id} available, attempting presence update");
        match self.presence.try_update(self.platform.as_ref()).await {
            Ok(updated) => {
                self.presence.set_pending(!updated);
                Ok(())
            }
            Err(e) => {
                self.presence.set_pending(true);
                Err(e)
            }
        }
    }

    /// Retry a throttled presence update without holding up the command
    fn retry_presence(&self, request_id: Uuid) {
        let presence = Arc::clone(&self.presence);
        let platform = Arc::clone(&self.platform);
        tokio::spawn(async move {
            match presence.try_update(platform.as_ref()).await {
                Ok(true) => presence.set_pending(false),
                Ok(false) => {}
                Err(e) => warn!("[{request_id}] Presence update failed: {e}"),
            }
        });
    }

    async fn shutdown(&self, channel_id: ChannelId, request_id: Uuid) {
        info!("[{request_id}] 🛑 Shutdown requested by owner");
        if let Err(e) = self.platform.send_message(channel_id, SHUTDOWN_ACK).await {
            warn!("[{request_id}] Failed to acknowledge shutdown: {e}");
        }

        let platform = Arc::clone(&self.platform);
        let grace = self.shutdown_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            platform.shutdown().await;
        });
    }
}
