use crate::config::BrokerConfig;
use anyhow::{Context, Result};
use async_nats::ConnectOptions;
use tracing::info;

/// NATS connection shared by the request server and the notification publisher
pub struct NatsClient {
    client: async_nats::Client,
    subject_prefix: String,
}

impl NatsClient {
    /// Connect to NATS, authenticating when both username and password are set
    pub async fn connect(config: &BrokerConfig) -> Result<Self> {
        info!("Connecting to NATS at {}", config.url);

        let options = match (&config.username, &config.password) {
            (Some(user), Some(password)) => {
                ConnectOptions::with_user_and_password(user.clone(), password.clone())
            }
            _ => ConnectOptions::new(),
        };

        let client = options
            .name("rap-plugin")
            .connect(config.url.as_str())
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS at {}", config.url);

        Ok(Self {
            client,
            subject_prefix: config.subject_prefix.clone(),
        })
    }

    /// Get underlying NATS client
    pub fn client(&self) -> &async_nats::Client {
        &self.client
    }

    pub fn subject_prefix(&self) -> &str {
        &self.subject_prefix
    }

    /// Flush pending publishes (used on shutdown)
    pub async fn flush(&self) -> Result<()> {
        self.client
            .flush()
            .await
            .context("Failed to flush NATS connection")
    }
}
