// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (media server APIs, JSON files)
// - `discord/` = Discord-specific adapters (commands, presence, dashboard)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Start the background polling and shut it down cleanly

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::core::dashboard::DashboardService;
use crate::core::media::ServerStatusReader;
use crate::discord::scheduler::PollScheduler;
use crate::discord::{Data, Error};
use crate::infra::media::{JellyfinApiClient, PlexApiClient};
use crate::infra::settings::{running_in_docker, BotSettings};
use crate::infra::storage::{load_config, load_user_aliases, JsonMessageIdStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Containers get their environment injected, local runs read .env
    if !running_in_docker() {
        dotenv::dotenv().ok();
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = BotSettings::from_env().context("Invalid environment configuration")?;

    // Runtime files (config, user mapping, dashboard message id) live together.
    tokio::fs::create_dir_all(&settings.data_dir)
        .await
        .with_context(|| format!("Failed to create {}", settings.data_dir.display()))?;

    let config = load_config(&settings.data_dir).await;
    let aliases = load_user_aliases(&settings.data_dir).await;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let plex = PlexApiClient::new(&settings.plex_url, &settings.plex_token)
        .context("Failed to create Plex client")?;

    let jellyfin = match &settings.jellyfin {
        Some(jf) => {
            tracing::info!(url = %jf.url, "Jellyfin integration enabled");
            Some(
                JellyfinApiClient::new(&jf.url, &jf.api_key)
                    .context("Failed to create Jellyfin client")?,
            )
        }
        None => {
            tracing::info!("Jellyfin integration disabled");
            None
        }
    };

    let reader = Arc::new(ServerStatusReader::new(
        plex,
        jellyfin,
        config.plex_sections.clone(),
        config.cache.interval(),
        aliases,
    ));

    // No download or uptime reporters ship with this bot; the dashboard
    // renders their empty states until one is wired in here.
    let dashboard = Arc::new(
        DashboardService::new(
            config.dashboard.clone(),
            JsonMessageIdStore::in_dir(&settings.data_dir),
            None,
            None,
        )
        .await,
    );

    let data = Data {
        reader,
        dashboard,
        config: Arc::new(config),
        channel_id: serenity::ChannelId::new(settings.channel_id),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    // Slash commands and presence need nothing privileged.
    let intents = serenity::GatewayIntents::GUILDS;

    // Filled once the gateway is ready so main can stop the loops on exit.
    let scheduler_slot: Arc<Mutex<Option<PollScheduler>>> = Arc::new(Mutex::new(None));
    let setup_slot = Arc::clone(&scheduler_slot);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![discord::commands::plex::plex()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!(user = %ready.user.name, "Bot is starting up");

                // Register slash commands globally (can take up to an hour to propagate)
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Commands registered");

                *setup_slot.lock().await = Some(PollScheduler::start(ctx, &data));

                Ok::<Data, Error>(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&settings.discord_token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;
    let shard_manager = client.shard_manager.clone();

    tokio::select! {
        result = client.start() => result.context("Error running bot")?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            shard_manager.shutdown_all().await;
        }
    }

    if let Some(scheduler) = scheduler_slot.lock().await.take() {
        scheduler.shutdown().await;
    }

    Ok(())
}
