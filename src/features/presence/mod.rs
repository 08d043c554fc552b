//! # Presence Feature
//!
//! Throttled "Watching N servers" presence updates.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

pub mod throttle;

pub use throttle::PresenceThrottle;
