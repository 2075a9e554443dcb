// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (JSON file, health endpoint)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::leveling::LevelingService;
use crate::discord::commands::presence;
use crate::discord::message_xp;
use crate::discord::{Data, Error};
use crate::infra::health;
use crate::infra::leveling::JsonLevelStore;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

const DEFAULT_LEVELS_FILE: &str = "levels.json";
const DEFAULT_HEALTH_PORT: u16 = 8080;

/// Event handler for non-command Discord events.
/// This is where we handle messages for XP gain.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        message_xp::handle_message(ctx, new_message, data).await;
    }

    Ok(())
}

/// Read the health port from `HEALTH_PORT`, falling back to the default.
fn health_port() -> u16 {
    match std::env::var("HEALTH_PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid HEALTH_PORT {:?}, using {}",
                raw,
                DEFAULT_HEALTH_PORT
            );
            DEFAULT_HEALTH_PORT
        }),
        Err(_) => DEFAULT_HEALTH_PORT,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Get Discord bot token from environment
    let token = std::env::var("DISCORD_TOKEN").context(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    )?;
    let levels_path =
        std::env::var("LEVELS_FILE").unwrap_or_else(|_| DEFAULT_LEVELS_FILE.to_string());

    // The liveness endpoint shares nothing with the bot, so it just runs on its own task.
    let port = health_port();
    tokio::spawn(async move {
        if let Err(e) = health::run(port).await {
            tracing::error!("Health check server stopped: {}", e);
        }
    });

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let level_store = JsonLevelStore::new(&levels_path);
    let leveling_service = Arc::new(
        LevelingService::new(level_store)
            .await
            .with_context(|| format!("Failed to load leveling data from {}", levels_path))?,
    );

    let data = Data {
        leveling: Arc::clone(&leveling_service),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: discord::commands::all(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Logged in as {}", ready.user.name);

                // A failed sync leaves commands stale but the bot can still award XP.
                let commands = &framework.options().commands;
                match poise::builtins::register_globally(ctx, commands).await {
                    Ok(()) => tracing::info!("Synced {} commands!", commands.len()),
                    Err(e) => tracing::error!("Failed to sync commands: {}", e),
                }

                presence::on_ready(ctx);

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;

    Ok(())
}
