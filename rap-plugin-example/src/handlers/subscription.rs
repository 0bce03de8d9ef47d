//! Subscription bookkeeping and the periodic observation push.
//!
//! A single worker task owns the subscription set. Subscribe and unsubscribe
//! calls are commands on a channel, and the push timer lives on the same task,
//! so mutations and push iterations never interleave and no second timer can
//! be started. Commands are applied in the order they were sent.

use crate::observation::create_observation;
use async_trait::async_trait;
use rap_plugin::listener::{NotificationSink, SubscriptionListener};
use rap_plugin::RapPluginError;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

enum Command {
    Subscribe(String),
    Unsubscribe(String),
    Snapshot(oneshot::Sender<Vec<String>>),
    Shutdown,
}

/// Pushes a fresh observation for every subscribed resource on a fixed interval.
///
/// Idle while the set is empty; the first subscription triggers an immediate
/// push and then one every `push_interval`.
pub struct SubscriptionManager {
    commands: mpsc::UnboundedSender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SubscriptionManager {
    /// Spawn the worker task. Must be called inside a Tokio runtime.
    pub fn spawn(notifier: Arc<dyn NotificationSink>, push_interval: Duration) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(rx, notifier, push_interval));

        Self {
            commands,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Currently subscribed resource ids, sorted.
    pub async fn subscriptions(&self) -> Result<Vec<String>, RapPluginError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot(reply))?;
        rx.await.map_err(|_| stopped())
    }

    /// Stop the worker and wait for it to finish. Later calls fail with 500.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);

        let handle = self.worker.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Subscription worker ended abnormally");
            }
        }
    }

    fn send(&self, command: Command) -> Result<(), RapPluginError> {
        self.commands.send(command).map_err(|_| stopped())
    }
}

fn stopped() -> RapPluginError {
    RapPluginError::internal("subscription manager is stopped")
}

#[async_trait]
impl SubscriptionListener for SubscriptionManager {
    fn name(&self) -> &str {
        "subscription-manager"
    }

    async fn subscribe_resource(&self, resource_id: &str) -> Result<(), RapPluginError> {
        info!(resource_id = %resource_id, "Subscribing");
        self.send(Command::Subscribe(resource_id.to_string()))
    }

    async fn unsubscribe_resource(&self, resource_id: &str) -> Result<(), RapPluginError> {
        info!(resource_id = %resource_id, "Unsubscribing");
        self.send(Command::Unsubscribe(resource_id.to_string()))
    }
}

async fn run_worker(
    mut commands: mpsc::UnboundedReceiver<Command>,
    notifier: Arc<dyn NotificationSink>,
    push_interval: Duration,
) {
    let mut subscriptions: BTreeSet<String> = BTreeSet::new();
    let mut ticker = interval(push_interval);

    // Keep the spacing between pushes even if a push runs long
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    Some(Command::Subscribe(id)) => {
                        let was_idle = subscriptions.is_empty();
                        subscriptions.insert(id);
                        if was_idle {
                            info!(interval_ms = push_interval.as_millis() as u64, "Starting notification push");
                            ticker.reset_immediately();
                        }
                    }
                    Some(Command::Unsubscribe(id)) => {
                        subscriptions.remove(&id);
                        if subscriptions.is_empty() {
                            info!("No subscriptions left, notification push idle");
                        }
                    }
                    Some(Command::Snapshot(reply)) => {
                        let _ = reply.send(subscriptions.iter().cloned().collect());
                    }
                    Some(Command::Shutdown) | None => break,
                }
            }

            _ = ticker.tick(), if !subscriptions.is_empty() => {
                push(&subscriptions, notifier.as_ref()).await;
            }
        }
    }

    debug!("Subscription worker stopped");
}

/// One push cycle; delivery failures are logged and skipped.
async fn push(subscriptions: &BTreeSet<String>, notifier: &dyn NotificationSink) {
    info!(count = subscriptions.len(), "Sending notifications");

    for id in subscriptions {
        let observation = create_observation(id);
        match notifier.send_notification(&observation).await {
            Ok(()) => debug!(resource_id = %id, "Notification sent"),
            Err(e) => warn!(resource_id = %id, error = %e, "Failed to send notification"),
        }
    }
}
