//! # Feature: Presence Throttle
//!
//! Keeps the "Watching N servers" presence current without flooding the
//! gateway: at most one update per interval, with a pending flag so a
//! throttled guild join is retried on the next command.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use anyhow::Result;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::platform::{ActivityKind, ChatPlatform};

pub struct PresenceThrottle {
    interval: Duration,
    /// `None` until the first update, so the first attempt always goes through
    last_update: Mutex<Option<Instant>>,
    pending: AtomicBool,
}

impl PresenceThrottle {
    pub fn new(interval: Duration) -> Self {
        PresenceThrottle {
            interval,
            last_update: Mutex::new(None),
            pending: AtomicBool::new(false),
        }
    }

    /// Whether a throttled update is waiting to be retried
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn set_pending(&self, pending: bool) {
        self.pending.store(pending, Ordering::SeqCst);
    }

    /// Update presence unless the last update is within the interval
    ///
    /// Returns whether an update was sent.
    pub async fn try_update(&self, platform: &dyn ChatPlatform) -> Result<bool> {
        self.try_update_at(platform, Instant::now()).await
    }

    /// `try_update` with an explicit clock reading
    pub async fn try_update_at(&self, platform: &dyn ChatPlatform, now: Instant) -> Result<bool> {
        let mut last_update = self.last_update.lock().await;

        if let Some(last) = *last_update {
            let elapsed = now.saturating_duration_since(last);
            if elapsed <= self.interval {
                debug!(
                    "Presence update throttled ({}s since last, interval {}s)",
                    elapsed.as_secs(),
                    self.interval.as_secs()
                );
                return Ok(false);
            }
        }

        let guilds = platform.guild_count().await;
        let status = format!("{guilds} servers");
        info!("👀 Updating presence: {status}");
        platform.update_presence(&status, ActivityKind::Watching).await?;

        *last_update = Some(now);
        Ok(true)
    }

    /// Time of the last successful update
    pub async fn last_update(&self) -> Option<Instant> {
        *self.last_update.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockPlatform;

    const WINDOW: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_first_attempt_updates() {
        let platform = MockPlatform::new();
        platform.set_guild_count(3);
        let throttle = PresenceThrottle::new(WINDOW);

        assert!(throttle.try_update(&platform).await.unwrap());
        let presences = platform.presences.lock().unwrap().clone();
        assert_eq!(presences, vec![("3 servers".to_string(), ActivityKind::Watching)]);
    }

    #[tokio::test]
    async fn test_within_window_is_throttled() {
        let platform = MockPlatform::new();
        let throttle = PresenceThrottle::new(WINDOW);
        let t = Instant::now();

        assert!(throttle.try_update_at(&platform, t).await.unwrap());
        assert!(!throttle
            .try_update_at(&platform, t + Duration::from_secs(30))
            .await
            .unwrap());
        assert!(!throttle
            .try_update_at(&platform, t + Duration::from_secs(60))
            .await
            .unwrap());

        assert_eq!(platform.presence_count(), 1);
        assert_eq!(throttle.last_update().await, Some(t));
    }

    #[tokio::test]
    async fn test_after_window_updates_once_and_advances() {
        let platform = MockPlatform::new();
        let throttle = PresenceThrottle::new(WINDOW);
        let t = Instant::now();
        throttle.try_update_at(&platform, t).await.unwrap();

        let later = t + Duration::from_secs(61);
        assert!(throttle.try_update_at(&platform, later).await.unwrap());
        assert_eq!(platform.presence_count(), 2);
        assert_eq!(throttle.last_update().await, Some(later));

        // the window restarts from the new timestamp
        assert!(!throttle
            .try_update_at(&platform, later + Duration::from_secs(30))
            .await
            .unwrap());
        assert_eq!(platform.presence_count(), 2);
    }

    #[tokio::test]
    async fn test_pending_flag() {
        let throttle = PresenceThrottle::new(WINDOW);
        assert!(!throttle.is_pending());
        throttle.set_pending(true);
        assert!(throttle.is_pending());
        throttle.set_pending(false);
        assert!(!throttle.is_pending());
    }
}
