//! # Command System
//!
//! Prefix command (`?name args`) parsing, registration, permission gating and
//! help rendering.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Alias-aware registry and generated help page
//! - 2.0.0: Command trait with per-command permission predicates
//! - 1.0.0: Initial prefix parser

pub mod command;
pub mod handlers;
pub mod help;
pub mod parser;
pub mod permissions;
pub mod registry;

pub use command::{Command, CommandInfo, MessageContext};
pub use handlers::create_all_commands;
pub use help::HelpFormatter;
pub use parser::{parse, ParseError};
pub use permissions::{is_teacher, PermissionGate};
pub use registry::CommandRegistry;
