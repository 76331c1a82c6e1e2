use poise::serenity_prelude as serenity;

use super::channel::SerenityDashboardChannel;
use crate::core::dashboard::DashboardError;
use crate::discord::Data;

/// Poll the servers and upsert the dashboard message.
///
/// Returns the message id shown, or `None` when the configured channel
/// cannot be resolved.
pub async fn update_dashboard(
    ctx: &serenity::Context,
    data: &Data,
) -> Result<Option<u64>, DashboardError> {
    if let Err(err) = data.channel_id.to_channel(ctx).await {
        tracing::warn!(channel_id = %data.channel_id, error = %err, "Dashboard channel not available");
        return Ok(None);
    }

    let channel = SerenityDashboardChannel::new(ctx.http.clone(), data.channel_id);
    let server = data.reader.snapshot().await;
    data.dashboard.refresh(&channel, server).await.map(Some)
}

/// Scheduled variant: failures are logged and the next tick tries again.
pub async fn dashboard_tick(ctx: &serenity::Context, data: &Data) {
    if let Err(err) = update_dashboard(ctx, data).await {
        tracing::error!(error = %err, "Error updating dashboard");
    }
}
