mod loaded;
pub use loaded::{ConfigSource, LoadedConfig, DEFAULT_CONFIG_PATH};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete plugin configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub broker: BrokerConfig,
    #[serde(default)]
    pub plugin: RapConfig,
    #[serde(default)]
    pub subscription: SubscriptionConfig,
    #[serde(default)]
    pub startup: StartupConfig,
}

/// Message broker connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    #[serde(default = "default_broker_url")]
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Root of every subject this plugin publishes to or listens on
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

fn default_broker_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_subject_prefix() -> String {
    "rap".to_string()
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: default_broker_url(),
            username: None,
            password: None,
            subject_prefix: default_subject_prefix(),
        }
    }
}

/// What the plugin announces to the RAP when it registers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RapConfig {
    #[serde(default = "default_plugin_id")]
    pub id: String,
    #[serde(default)]
    pub filters_supported: bool,
    #[serde(default = "default_notifications_supported")]
    pub notifications_supported: bool,
}

fn default_plugin_id() -> String {
    "rap-plugin-example".to_string()
}

fn default_notifications_supported() -> bool {
    true
}

impl Default for RapConfig {
    fn default() -> Self {
        Self {
            id: default_plugin_id(),
            filters_supported: false,
            notifications_supported: default_notifications_supported(),
        }
    }
}

/// Subscription push loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// Seconds between two pushes to every subscribed resource
    #[serde(default = "default_push_interval")]
    pub push_interval_seconds: u64,
}

fn default_push_interval() -> u64 {
    5
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            push_interval_seconds: default_push_interval(),
        }
    }
}

impl SubscriptionConfig {
    pub fn push_interval(&self) -> Duration {
        Duration::from_secs(self.push_interval_seconds)
    }
}

/// Services that must accept TCP connections before the plugin starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupConfig {
    /// `host:port` entries
    #[serde(default)]
    pub wait_for_services: Vec<String>,
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_seconds: u64,
    #[serde(default = "default_retry_interval")]
    pub retry_interval_millis: u64,
}

fn default_wait_timeout() -> u64 {
    300
}

fn default_retry_interval() -> u64 {
    1000
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            wait_for_services: Vec::new(),
            wait_timeout_seconds: default_wait_timeout(),
            retry_interval_millis: default_retry_interval(),
        }
    }
}

impl StartupConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_seconds)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_millis)
    }
}

impl PluginConfig {
    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.subscription.push_interval_seconds == 0 {
            bail!("subscription.push_interval_seconds must be greater than zero");
        }
        Ok(())
    }
}

/// Parse and validate configuration from TOML text
pub fn parse_config(contents: &str) -> Result<PluginConfig> {
    let config: PluginConfig =
        toml::from_str(contents).context("Failed to parse plugin configuration")?;
    config.validate()?;
    Ok(config)
}
