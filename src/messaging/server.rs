use super::{registration_subject, request_subject};
use crate::config::{BrokerConfig, RapConfig};
use crate::plugin::RapPlugin;
use anyhow::{Context, Result};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Announcement sent to the RAP when the plugin starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRegistration {
    pub plugin_id: String,
    pub enabled_filters: bool,
    pub has_notifications: bool,
}

impl From<&RapConfig> for PluginRegistration {
    fn from(config: &RapConfig) -> Self {
        Self {
            plugin_id: config.id.clone(),
            enabled_filters: config.filters_supported,
            has_notifications: config.notifications_supported,
        }
    }
}

/// Publish the plugin registration message
pub async fn register_plugin(
    client: &async_nats::Client,
    broker: &BrokerConfig,
    plugin: &RapConfig,
) -> Result<()> {
    let registration = PluginRegistration::from(plugin);
    let subject = registration_subject(&broker.subject_prefix);
    let payload =
        serde_json::to_vec(&registration).context("Failed to serialize plugin registration")?;

    client
        .publish(subject.clone(), payload.into())
        .await
        .with_context(|| format!("Failed to publish registration to subject '{}'", subject))?;

    info!(
        plugin_id = %registration.plugin_id,
        filters = registration.enabled_filters,
        notifications = registration.has_notifications,
        subject = %subject,
        "Registered plugin with RAP"
    );

    Ok(())
}

/// Serve requests addressed to this plugin until the subscription ends.
///
/// Every message is handled on its own task, so slow handlers do not hold
/// up other requests. Responses go to the message's reply subject.
pub async fn serve_requests(
    client: async_nats::Client,
    plugin: Arc<RapPlugin>,
    broker: &BrokerConfig,
    plugin_id: &str,
) -> Result<()> {
    let subject = request_subject(&broker.subject_prefix, plugin_id);

    let mut subscriber = client
        .subscribe(subject.clone())
        .await
        .with_context(|| format!("Failed to subscribe to subject '{}'", subject))?;

    info!(subject = %subject, "Listening for RAP requests");

    while let Some(message) = subscriber.next().await {
        let plugin = Arc::clone(&plugin);
        let client = client.clone();

        tokio::spawn(async move {
            let response = plugin.handle_message(&message.payload).await;

            let Some(reply) = message.reply else {
                debug!(status = response.status, "Request had no reply subject, response dropped");
                return;
            };

            let payload = match serde_json::to_vec(&response) {
                Ok(payload) => payload,
                Err(e) => {
                    error!(error = %e, "Failed to serialize response");
                    return;
                }
            };

            if let Err(e) = client.publish(reply, payload.into()).await {
                error!(error = %e, "Failed to publish response");
            }
        });
    }

    warn!(subject = %subject, "Request subscription closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registration_message() {
        let config = RapConfig {
            id: "vienna".to_string(),
            filters_supported: false,
            notifications_supported: true,
        };

        let json = serde_json::to_value(PluginRegistration::from(&config)).unwrap();
        assert_eq!(
            json,
            json!({"pluginId": "vienna", "enabledFilters": false, "hasNotifications": true})
        );
    }
}
