//! Background scheduler that delivers due notifications.
//!
//! The scheduler owns nothing but a handle to the notification service;
//! all state lives in the store, so a restart never loses queued
//! notifications. Delivery failures are logged and retried on the next
//! tick because the due records stay `scheduled`.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::NotificationService;

#[derive(Debug)]
struct Runner {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

/// Periodic delivery loop with an explicit start/stop lifecycle.
#[derive(Debug)]
pub struct ReminderScheduler {
    notifications: NotificationService,
    tick: Duration,
    runner: Mutex<Option<Runner>>,
}

impl ReminderScheduler {
    /// Creates a stopped scheduler ticking every `tick`.
    #[must_use]
    pub fn new(notifications: NotificationService, tick: Duration) -> Self {
        Self {
            notifications,
            tick,
            runner: Mutex::new(None),
        }
    }

    /// Spawns the delivery loop. Calling `start` on a running scheduler
    /// is a no-op.
    ///
    /// The first tick fires immediately, so notifications that came due
    /// while the server was down are delivered right after startup.
    pub async fn start(&self) {
        let mut runner = self.runner.lock().await;
        if runner.is_some() {
            tracing::warn!("scheduler already running");
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let notifications = self.notifications.clone();
        let tick = self.tick;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = notifications.deliver_due(Utc::now()).await {
                            tracing::error!(error = %e, "notification delivery tick failed");
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        *runner = Some(Runner {
            handle,
            shutdown: shutdown_tx,
        });
        tracing::info!(tick_secs = self.tick.as_secs(), "scheduler started");
    }

    /// Signals the loop to stop and waits for it to finish. Calling
    /// `stop` on a stopped scheduler is a no-op.
    pub async fn stop(&self) {
        let Some(runner) = self.runner.lock().await.take() else {
            return;
        };
        let _ = runner.shutdown.send(true);
        if let Err(e) = runner.handle.await {
            tracing::error!(error = %e, "scheduler task did not shut down cleanly");
        }
        tracing::info!("scheduler stopped");
    }

    /// Whether the delivery loop is currently running.
    pub async fn is_running(&self) -> bool {
        self.runner.lock().await.is_some()
    }
}
