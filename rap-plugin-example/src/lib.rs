//! Example RAP plugin.
//!
//! Answers requests for a handful of fixed internal resource ids with a
//! canned temperature reading taken at the Stephansdome in Vienna:
//!
//! | Kind         | Ids                       | Result                          |
//! |--------------|---------------------------|---------------------------------|
//! | reading      | `rp_isen1`, `isen1`       | one or `top` observations       |
//! | actuating    | `rp_iaid1`, `iaid1`       | logs the command                |
//! | invoking     | `rp_isrid1`, `isrid1`     | `"ok"` / `"some json"`          |
//! | notification | any                       | periodic observation push       |
//!
//! Every other id fails with 404.

pub mod handlers;
pub mod observation;

use handlers::{ExampleActuator, ExampleResourceReader, ExampleService, SubscriptionManager};
use rap_plugin::config::PluginConfig;
use rap_plugin::RapPlugin;
use std::sync::Arc;
use tracing::info;

/// Register the example handlers with `plugin`.
///
/// The subscription handler is only registered when notifications are
/// enabled; it is returned so the caller can shut its worker down.
pub fn register_listeners(
    plugin: &mut RapPlugin,
    config: &PluginConfig,
) -> Option<Arc<SubscriptionManager>> {
    plugin.register_reading_resource_listener(Arc::new(ExampleResourceReader));
    plugin.register_actuating_resource_listener(Arc::new(ExampleActuator));
    plugin.register_invoking_service_listener(Arc::new(ExampleService));

    if !config.plugin.notifications_supported {
        info!("Notifications disabled, subscription listener not registered");
        return None;
    }

    let subscriptions = Arc::new(SubscriptionManager::spawn(
        plugin.notifier(),
        config.subscription.push_interval(),
    ));
    plugin.register_notification_resource_listener(subscriptions.clone());

    Some(subscriptions)
}
