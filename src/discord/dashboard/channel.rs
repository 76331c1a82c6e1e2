use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use super::embed::dashboard_embed;
use crate::core::dashboard::{DashboardChannel, DashboardError, DashboardView};

/// The text channel that hosts the dashboard message.
pub struct SerenityDashboardChannel {
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
}

impl SerenityDashboardChannel {
    pub fn new(http: Arc<serenity::Http>, channel_id: serenity::ChannelId) -> Self {
        Self { http, channel_id }
    }
}

/// Discord answers 404 for a message that was deleted.
fn is_not_found(err: &::serenity::Error) -> bool {
    matches!(
        err,
        ::serenity::Error::Http(http) if http.status_code().is_some_and(|s| s.as_u16() == 404)
    )
}

fn edit_error(err: ::serenity::Error, message_id: u64) -> DashboardError {
    if is_not_found(&err) {
        DashboardError::MessageNotFound(message_id)
    } else {
        DashboardError::Channel(err.to_string())
    }
}

#[async_trait]
impl DashboardChannel for SerenityDashboardChannel {
    async fn edit_message(
        &self,
        message_id: u64,
        view: &DashboardView,
    ) -> Result<(), DashboardError> {
        let builder = serenity::EditMessage::new().embed(dashboard_embed(view));
        self.channel_id
            .edit_message(&*self.http, serenity::MessageId::new(message_id), builder)
            .await
            .map(|_| ())
            .map_err(|e| edit_error(e, message_id))
    }

    async fn send_message(&self, view: &DashboardView) -> Result<u64, DashboardError> {
        let builder = serenity::CreateMessage::new().embed(dashboard_embed(view));
        let message = self
            .channel_id
            .send_message(&*self.http, builder)
            .await
            .map_err(|e| DashboardError::Channel(e.to_string()))?;
        Ok(message.id.get())
    }
}
