// This module handles the bot's presence line.
//
// The text itself is chosen in the core; here we only translate it into
// serenity's ActivityData/OnlineStatus.

use poise::serenity_prelude as serenity;

use crate::core::presence::{select_presence, PresenceStatus, PresenceUpdate};
use crate::discord::Data;

fn online_status(status: PresenceStatus) -> serenity::OnlineStatus {
    match status {
        PresenceStatus::Online => serenity::OnlineStatus::Online,
        PresenceStatus::DoNotDisturb => serenity::OnlineStatus::DoNotDisturb,
    }
}

pub fn apply_presence(ctx: &serenity::Context, update: &PresenceUpdate) {
    let activity = serenity::ActivityData::custom(update.text.clone());
    ctx.set_presence(Some(activity), online_status(update.status));
}

/// One presence tick: poll the servers and show the result.
pub async fn update_presence(ctx: &serenity::Context, data: &Data) {
    let snapshot = data.reader.snapshot().await;
    let update = select_presence(&snapshot, &data.config.presence);
    apply_presence(ctx, &update);
    tracing::info!(text = %update.text, status = ?update.status, "Status updated");
}
