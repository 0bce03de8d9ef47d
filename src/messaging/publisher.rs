use super::notification_subject;
use crate::listener::NotificationSink;
use crate::model::Observation;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Publishes pushed observations to NATS
#[derive(Clone)]
pub struct NotificationPublisher {
    client: async_nats::Client,
    subject_prefix: String,
}

impl NotificationPublisher {
    pub fn new(client: async_nats::Client, subject_prefix: String) -> Self {
        Self {
            client,
            subject_prefix,
        }
    }
}

#[async_trait]
impl NotificationSink for NotificationPublisher {
    /// Subject format: {prefix}.notifications.{resourceId}
    /// Payload: JSON-serialized Observation
    async fn send_notification(&self, observation: &Observation) -> Result<()> {
        let subject = notification_subject(&self.subject_prefix, &observation.resource_id);
        let payload =
            serde_json::to_vec(observation).context("Failed to serialize observation to JSON")?;

        debug!(
            resource_id = %observation.resource_id,
            subject = %subject,
            "Publishing notification to NATS"
        );

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .with_context(|| format!("Failed to publish notification to subject '{}'", subject))?;

        Ok(())
    }
}
