//! Prefix command implementations
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add WhoAmICommand
//! - 1.0.0: Initial ping, prefix and teacherrole commands

pub mod admin;
pub mod utility;
pub mod whoami;

use std::sync::Arc;

use super::command::Command;
use crate::platform::ChatPlatform;
use crate::settings::SettingsProvider;

/// Create every built-in command, in help order
///
/// Returns a vector of commands ready to be registered with CommandRegistry.
pub fn create_all_commands(
    platform: Arc<dyn ChatPlatform>,
    settings: Arc<dyn SettingsProvider>,
) -> Vec<Arc<dyn Command>> {
    vec![
        Arc::new(utility::PingCommand::new(platform.clone())),
        Arc::new(whoami::WhoAmICommand::new(platform.clone(), settings.clone())),
        Arc::new(admin::PrefixCommand::new(platform.clone(), settings.clone())),
        Arc::new(admin::TeacherRoleCommand::new(platform, settings)),
    ]
}
