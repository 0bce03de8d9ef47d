// Broker integration: connection, notifications, request serving

mod client;
mod publisher;
mod server;

pub use client::NatsClient;
pub use publisher::NotificationPublisher;
pub use server::{register_plugin, serve_requests, PluginRegistration};

/// Subject an observation push for `resource_id` is published on
pub fn notification_subject(prefix: &str, resource_id: &str) -> String {
    format!("{}.notifications.{}", prefix, resource_id)
}

/// Subject plugin registrations are announced on
pub fn registration_subject(prefix: &str) -> String {
    format!("{}.register", prefix)
}

/// Subject the RAP sends requests for `plugin_id` to
pub fn request_subject(prefix: &str, plugin_id: &str) -> String {
    format!("{}.plugins.{}", prefix, plugin_id)
}
