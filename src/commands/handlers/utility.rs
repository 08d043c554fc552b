//! Utility commands
//!
//! Handles: ping
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::command::{Command, CommandInfo, MessageContext};
use crate::platform::ChatPlatform;

pub struct PingCommand {
    info: CommandInfo,
    platform: Arc<dyn ChatPlatform>,
}

impl PingCommand {
    pub fn new(platform: Arc<dyn ChatPlatform>) -> Self {
        PingCommand {
            info: CommandInfo::new(&["ping"], "Check that the bot is responding."),
            platform,
        }
    }
}

#[async_trait]
impl Command for PingCommand {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    async fn call(&self, _args: &[String], ctx: &MessageContext) -> Result<()> {
        self.platform.send_message(ctx.channel_id, "Pong!").await?;
        info!("Ping command completed for user {}", ctx.author_id);
        Ok(())
    }
}
