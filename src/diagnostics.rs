//! Debug dumps of the resolved configuration and the registered handlers.

use crate::config::{ConfigSource, LoadedConfig};
use crate::plugin::RapPlugin;
use serde_json::Value;
use tracing::{debug, warn};

const MASK: &str = "****";
const UNSET: &str = "<unset>";

/// One resolved configuration value and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: ConfigSource,
}

/// Every resolved key, sorted, with secrets masked
pub fn config_report(loaded: &LoadedConfig) -> Vec<ConfigEntry> {
    let tree = match serde_json::to_value(&loaded.config) {
        Ok(tree) => tree,
        Err(e) => {
            warn!(error = %e, "Failed to render configuration");
            return Vec::new();
        }
    };

    let mut flat = Vec::new();
    flatten("", &tree, &mut flat);
    flat.sort_by(|a, b| a.0.cmp(&b.0));

    flat.into_iter()
        .map(|(key, value)| {
            let value = if is_secret(&key) && value != UNSET {
                MASK.to_string()
            } else {
                value
            };
            let source = loaded.source_of(&key);
            ConfigEntry { key, value, source }
        })
        .collect()
}

/// Log configuration at debug level
pub fn log_config(loaded: &LoadedConfig) {
    debug!("**** PLUGIN CONFIGURATION ****");
    match loaded.path() {
        Some(path) => debug!(path = %path, "Configuration file"),
        None => debug!("No configuration file, defaults and environment only"),
    }

    for entry in config_report(loaded) {
        debug!("{}={}\ts:{}", entry.key, entry.value, entry.source);
    }

    let config = &loaded.config;
    debug!("**** BROKER ****");
    debug!("Url: {}", config.broker.url);
    debug!(
        "Username: {}",
        config.broker.username.as_deref().unwrap_or(UNSET)
    );

    debug!("**** RAP ****");
    debug!("isFiltersSupported: {}", config.plugin.filters_supported);
    debug!(
        "isNotificationsSupported: {}",
        config.plugin.notifications_supported
    );
}

/// Log registered handler kinds and names at debug level
pub fn log_components(plugin: &RapPlugin) {
    debug!("**** REGISTERED LISTENERS ****");

    let listeners = plugin.registered_listeners();
    if listeners.is_empty() {
        debug!("No listeners registered");
    }
    for (kind, name) in listeners {
        debug!("{}: {}", kind, name);
    }
}

fn is_secret(key: &str) -> bool {
    key.ends_with("password")
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, inner, out);
            }
        }
        other => out.push((prefix.to_string(), render(other))),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => UNSET.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
