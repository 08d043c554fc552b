//! # Features Layer
//!
//! Optional behaviour layered on top of the command pipeline.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

pub mod presence;

pub use presence::PresenceThrottle;
