// Background polling tasks.
//
// Each task owns a tokio interval and stops when the shutdown flag flips.
// Ticks that fall behind are skipped rather than bunched up.

use std::future::Future;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::discord::commands::presence::update_presence;
use crate::discord::dashboard::dashboard_tick;
use crate::discord::Data;

pub const PRESENCE_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const DASHBOARD_INTERVAL: Duration = Duration::from_secs(60);

pub struct PollScheduler {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl PollScheduler {
    /// Start the presence and dashboard loops. Both fire once right away.
    pub fn start(ctx: &serenity::Context, data: &Data) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let presence = {
            let ctx = ctx.clone();
            let data = data.clone();
            spawn_loop("presence", PRESENCE_INTERVAL, shutdown_rx.clone(), move || {
                let ctx = ctx.clone();
                let data = data.clone();
                async move { update_presence(&ctx, &data).await }
            })
        };

        let dashboard = {
            let ctx = ctx.clone();
            let data = data.clone();
            spawn_loop("dashboard", DASHBOARD_INTERVAL, shutdown_rx, move || {
                let ctx = ctx.clone();
                let data = data.clone();
                async move { dashboard_tick(&ctx, &data).await }
            })
        };

        tracing::info!("Background polling started");
        Self {
            shutdown_tx,
            handles: vec![presence, dashboard],
        }
    }

    /// Signal every loop to stop and wait for them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "Background task ended abnormally");
            }
        }
        tracing::info!("Background polling stopped");
    }
}

fn spawn_loop<F, Fut>(
    name: &'static str,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    mut tick: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    tracing::debug!(task = name, "Running scheduled tick");
                    tick().await;
                }
            }
        }

        tracing::debug!(task = name, "Scheduled task stopped");
    })
}
