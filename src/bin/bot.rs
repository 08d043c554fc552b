use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use log::{debug, error, info, warn};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::guild::Guild;
use serenity::model::id::UserId;
use serenity::prelude::*;
use std::sync::Arc;
use tokio::sync::OnceCell;

use classroom::commands::{create_all_commands, CommandRegistry};
use classroom::{
    ChatPlatform, Config, Database, DiscordPlatform, Dispatcher, GuildSettings, InboundMessage,
    SettingsProvider,
};

struct Handler {
    /// Filled once the client exists, before the gateway connects
    dispatcher: Arc<OnceCell<Arc<Dispatcher>>>,
}

impl Handler {
    fn dispatcher(&self) -> Option<&Arc<Dispatcher>> {
        let dispatcher = self.dispatcher.get();
        if dispatcher.is_none() {
            warn!("Event received before the dispatcher was ready, dropping it");
        }
        dispatcher
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, _ctx: Context, msg: Message) {
        let Some(dispatcher) = self.dispatcher() else {
            return;
        };

        let inbound = InboundMessage::from_message(&msg);
        match dispatcher.handle_message(&inbound).await {
            Ok(outcome) => debug!("Message {} handled: {outcome:?}", msg.id),
            Err(e) => error!("Error handling message {}: {e:#}", msg.id),
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        if let Some(shard) = ready.shard {
            info!("⚡ Shard: {}/{}", shard[0] + 1, shard[1]);
        }
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, is_new: bool) {
        if is_new {
            info!("🆕 Joined new guild: {} ({})", guild.name, guild.id);
        } else {
            info!("📥 Guild available: {} ({})", guild.name, guild.id);
        }

        let Some(dispatcher) = self.dispatcher() else {
            return;
        };
        if let Err(e) = dispatcher.handle_guild_available(guild.id).await {
            error!("Failed to update presence for guild {}: {e:#}", guild.id);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Classroom bot...");

    let defaults = GuildSettings {
        prefix: config.default_prefix,
        role_name: config.default_role_name.clone(),
    };
    let database = Arc::new(Database::new(&config.database_path, defaults).await?);

    let dispatcher_cell = Arc::new(OnceCell::new());
    let handler = Handler {
        dispatcher: dispatcher_cell.clone(),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow!("Client creation failed: {}", e)
        })?;

    let platform: Arc<dyn ChatPlatform> = Arc::new(DiscordPlatform::new(&client));
    let settings: Arc<dyn SettingsProvider> = database;

    let mut registry = CommandRegistry::new();
    for command in create_all_commands(platform.clone(), settings.clone()) {
        registry.register(command);
    }
    info!("📋 Registered {} commands", registry.len());

    let dispatcher = Dispatcher::new(
        registry,
        platform,
        settings,
        UserId(config.owner_id),
        config.presence_interval,
    );
    if dispatcher_cell.set(Arc::new(dispatcher)).is_err() {
        return Err(anyhow!("Dispatcher was initialised twice"));
    }

    info!("Establishing WebSocket connection to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow!("Failed to establish gateway connection: {}", why));
    }

    info!("👋 Gateway closed, exiting");
    Ok(())
}
