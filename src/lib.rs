// Core layer - configuration and message helpers
pub mod core;

// Features layer
pub mod features;

// Platform layer - Discord gateway access
pub mod platform;

// Infrastructure
pub mod database;
pub mod settings;

// Application layer
pub mod commands;
pub mod dispatcher;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::core::Config;
pub use database::Database;
pub use dispatcher::{Dispatch, Dispatcher, InboundMessage};
pub use features::PresenceThrottle;
pub use platform::{ActivityKind, ChatPlatform, DiscordPlatform};
pub use settings::{GuildSettings, SettingsProvider};
