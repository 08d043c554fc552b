//! # Infrastructure: Settings Database
//!
//! SQLite storage for per-guild settings with an in-process read cache.
//! Columns left NULL fall back to the configured defaults. The cache is only
//! filled or invalidated while the connection lock is held.
//!
//! - **Version**: 1.1.1
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.1: Fill the read cache under the connection lock so writes cannot be lost
//! - 1.1.0: DashMap read cache in front of guild_settings
//! - 1.0.0: Initial guild_settings table (prefix, role_name)

use anyhow::{Context, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, info};
use serenity::model::id::GuildId;
use sqlite::{Connection, State};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::settings::{GuildSettings, SettingsProvider};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS guild_settings (
        guild_id  TEXT PRIMARY KEY,
        prefix    TEXT,
        role_name TEXT
    );
";

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
    cache: Arc<DashMap<GuildId, GuildSettings>>,
    defaults: GuildSettings,
}

impl Database {
    /// Open (or create) the database at `path`
    ///
    /// `":memory:"` gives a private in-memory database.
    pub async fn new(path: &str, defaults: GuildSettings) -> Result<Self> {
        let connection =
            sqlite::open(path).with_context(|| format!("Failed to open database at {path}"))?;
        connection
            .execute(SCHEMA)
            .context("Failed to create guild_settings table")?;

        info!("💾 Settings database ready at {path}");

        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
            cache: Arc::new(DashMap::new()),
            defaults,
        })
    }

    pub fn defaults(&self) -> &GuildSettings {
        &self.defaults
    }

    fn load(&self, connection: &Connection, guild_id: GuildId) -> Result<GuildSettings> {
        let mut statement = connection
            .prepare("SELECT prefix, role_name FROM guild_settings WHERE guild_id = ?")?;
        statement.bind((1, guild_id.to_string().as_str()))?;

        let mut settings = self.defaults.clone();
        if let State::Row = statement.next()? {
            let prefix = statement.read::<Option<String>, _>("prefix")?;
            let role_name = statement.read::<Option<String>, _>("role_name")?;

            if let Some(prefix) = prefix.and_then(|p| p.chars().next()) {
                settings.prefix = prefix;
            }
            if let Some(role_name) = role_name.filter(|r| !r.is_empty()) {
                settings.role_name = role_name;
            }
        }
        Ok(settings)
    }

    async fn upsert(&self, guild_id: GuildId, column: &str, value: &str) -> Result<()> {
        let sql = format!(
            "INSERT INTO guild_settings (guild_id, {column}) VALUES (?, ?) \
             ON CONFLICT(guild_id) DO UPDATE SET {column} = excluded.{column}"
        );

        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(sql)?;
        statement.bind((1, guild_id.to_string().as_str()))?;
        statement.bind((2, value))?;
        while statement.next()? != State::Done {}
        self.cache.remove(&guild_id);

        debug!("Stored {column}={value} for guild {guild_id}");
        Ok(())
    }
}

#[async_trait]
impl SettingsProvider for Database {
    async fn get_settings(&self, guild_id: Option<GuildId>) -> Result<GuildSettings> {
        let Some(guild_id) = guild_id else {
            return Ok(self.defaults.clone());
        };

        if let Some(cached) = self.cache.get(&guild_id) {
            return Ok(cached.clone());
        }

        let connection = self.connection.lock().await;
        // Another reader may have filled it while we waited
        if let Some(cached) = self.cache.get(&guild_id) {
            return Ok(cached.clone());
        }

        let settings = self.load(&connection, guild_id)?;
        self.cache.insert(guild_id, settings.clone());
        Ok(settings)
    }

    async fn set_prefix(&self, guild_id: GuildId, prefix: char) -> Result<()> {
        self.upsert(guild_id, "prefix", &prefix.to_string()).await
    }

    async fn set_role_name(&self, guild_id: GuildId, role_name: &str) -> Result<()> {
        self.upsert(guild_id, "role_name", role_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        Database::new(":memory:", GuildSettings::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_unknown_guild_gets_defaults() {
        let db = memory_db().await;
        let settings = db.get_settings(Some(GuildId(1))).await.unwrap();
        assert_eq!(settings, GuildSettings::default());
    }

    #[tokio::test]
    async fn test_direct_messages_get_defaults() {
        let db = memory_db().await;
        db.set_prefix(GuildId(1), '!').await.unwrap();
        let settings = db.get_settings(None).await.unwrap();
        assert_eq!(settings.prefix, '?');
    }

    #[tokio::test]
    async fn test_set_prefix_is_visible_after_cached_read() {
        let db = memory_db().await;
        assert_eq!(db.get_settings(Some(GuildId(5))).await.unwrap().prefix, '?');

        db.set_prefix(GuildId(5), '$').await.unwrap();
        let settings = db.get_settings(Some(GuildId(5))).await.unwrap();
        assert_eq!(settings.prefix, '$');
        assert_eq!(settings.role_name, "Teacher");
    }

    #[tokio::test]
    async fn test_columns_update_independently() {
        let db = memory_db().await;
        db.set_role_name(GuildId(9), "Professor").await.unwrap();
        db.set_prefix(GuildId(9), '%').await.unwrap();

        let settings = db.get_settings(Some(GuildId(9))).await.unwrap();
        assert_eq!(settings.prefix, '%');
        assert_eq!(settings.role_name, "Professor");

        let other = db.get_settings(Some(GuildId(10))).await.unwrap();
        assert_eq!(other, GuildSettings::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reads_racing_a_write_never_keep_old_prefix() {
        let db = memory_db().await;
        let guild = GuildId(42);

        for (round, prefix) in "!#$%&*+-=^".chars().cycle().take(40).enumerate() {
            let readers: Vec<_> = (0..4)
                .map(|_| {
                    let db = db.clone();
                    tokio::spawn(async move { db.get_settings(Some(guild)).await.unwrap() })
                })
                .collect();
            let writer = {
                let db = db.clone();
                tokio::spawn(async move { db.set_prefix(guild, prefix).await.unwrap() })
            };

            writer.await.unwrap();
            for reader in readers {
                reader.await.unwrap();
            }

            let settings = db.get_settings(Some(guild)).await.unwrap();
            assert_eq!(settings.prefix, prefix, "round {round}");
        }
    }

    #[tokio::test]
    async fn test_custom_defaults() {
        let defaults = GuildSettings {
            prefix: '>',
            role_name: "Staff".to_string(),
        };
        let db = Database::new(":memory:", defaults.clone()).await.unwrap();
        assert_eq!(db.get_settings(Some(GuildId(3))).await.unwrap(), defaults);
    }
}
