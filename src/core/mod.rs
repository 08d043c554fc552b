//! # Core Module
//!
//! Configuration and Discord message helpers shared by every layer.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add response module with fenced pagination
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod response;

pub use config::Config;
pub use response::{paginate_code_block, split_message, MESSAGE_LIMIT};
