// Discord commands for the media server status.
//
// Same shape as every other command file: pull what we need from Data, call
// the core, format the reply. No business logic lives here.

use std::sync::Arc;

use chrono::Utc;
use poise::serenity_prelude as serenity;

use crate::core::config::PlexBotConfig;
use crate::core::dashboard::dashboard_view::{describe_offline_duration, format_offline_since};
use crate::core::dashboard::{DashboardService, DashboardTone};
use crate::core::media::{format_count, ServerSnapshot, ServerStatus, ServerStatusReader};
use crate::discord::dashboard::embed::tone_colour;
use crate::discord::dashboard::update_dashboard;
use crate::infra::media::{JellyfinApiClient, PlexApiClient};
use crate::infra::storage::JsonMessageIdStore;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub type PlexReader = ServerStatusReader<PlexApiClient, JellyfinApiClient>;
pub type Dashboard = DashboardService<JsonMessageIdStore>;

/// Shared state handed to every command and background task.
#[derive(Clone)]
pub struct Data {
    pub reader: Arc<PlexReader>,
    pub dashboard: Arc<Dashboard>,
    pub config: Arc<PlexBotConfig>,
    pub channel_id: serenity::ChannelId,
}

/// Media server status and dashboard controls
#[poise::command(slash_command, subcommands("status", "refresh"))]
pub async fn plex(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Show the current server status
#[poise::command(slash_command)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let reader = &ctx.data().reader;
    let snapshot = reader.snapshot().await;
    let embed = status_embed(&snapshot, reader.secondary_enabled());

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Update the dashboard message right now
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn refresh(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let reply = match update_dashboard(ctx.serenity_context(), ctx.data()).await {
        Ok(Some(message_id)) => format!("✅ Dashboard updated (message `{}`)", message_id),
        Ok(None) => format!(
            "❌ Dashboard channel <#{}> is not reachable.",
            ctx.data().channel_id
        ),
        Err(e) => {
            tracing::error!(error = %e, "Manual dashboard refresh failed");
            format!("❌ Dashboard update failed: {}", e)
        }
    };

    ctx.send(poise::CreateReply::default().content(reply).ephemeral(true))
        .await?;
    Ok(())
}

fn status_embed(snapshot: &ServerSnapshot, show_jellyfin: bool) -> serenity::CreateEmbed {
    let (title, tone, state_field) = match &snapshot.status {
        ServerStatus::Online { uptime } => (
            "🟢 Online",
            DashboardTone::Online,
            ("Uptime", format!("`{}`", uptime)),
        ),
        ServerStatus::Offline { since } => (
            "🔴 Offline",
            DashboardTone::Offline,
            (
                "Offline since",
                format!(
                    "`{}` ({})",
                    format_offline_since(*since),
                    describe_offline_duration(Utc::now() - *since)
                ),
            ),
        ),
    };

    let mut streams = format!("`{}`", snapshot.stream_count());
    if show_jellyfin {
        streams.push_str(&format!(" ({} Jellyfin)", snapshot.secondary_stream_count));
    }

    let mut embed = serenity::CreateEmbed::new()
        .title(title)
        .color(tone_colour(tone))
        .field(state_field.0, state_field.1, true)
        .field("Streams", streams, true);

    for stats in snapshot.libraries.iter() {
        let mut value = format!("`{}`", format_count(stats.count));
        if stats.show_episodes {
            value.push_str(&format!(" · {} episodes", format_count(stats.episodes)));
        }
        embed = embed.field(format!("{} {}", stats.display_name, stats.emoji), value, true);
    }

    embed
}
