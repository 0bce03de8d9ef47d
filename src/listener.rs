//! Handler capability traits.
//!
//! A plugin implements one trait per request kind it supports and registers
//! an instance with [`RapPlugin`](crate::plugin::RapPlugin). The runtime calls
//! the handler once per inbound request, possibly from several tasks at once,
//! so every implementation must be `Send + Sync`.
//!
//! # Example
//! ```no_run
//! use async_trait::async_trait;
//! use rap_plugin::listener::ServiceAccessListener;
//! use rap_plugin::model::Parameters;
//! use rap_plugin::RapPluginError;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ServiceAccessListener for Echo {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     async fn invoke_service(
//!         &self,
//!         internal_id: &str,
//!         _parameters: &Parameters,
//!     ) -> Result<serde_json::Value, RapPluginError> {
//!         Ok(serde_json::json!(internal_id))
//!     }
//! }
//! ```

use crate::error::RapPluginError;
use crate::model::{Capabilities, Observation, Parameters, Query, ResourceInfo};
use anyhow::Result;
use async_trait::async_trait;

/// Answers "read current value" and "read history" requests.
#[async_trait]
pub trait ResourceAccessListener: Send + Sync {
    /// Name shown in diagnostics.
    fn name(&self) -> &str;

    /// Returns the current reading of the addressed resource.
    async fn get_resource(
        &self,
        resource_info: &[ResourceInfo],
    ) -> Result<Observation, RapPluginError>;

    /// Returns the last `top` readings of the addressed resource.
    ///
    /// `filter` is only present when the platform forwarded a query; plugins
    /// that do not support filtering may ignore it.
    async fn get_resource_history(
        &self,
        resource_info: &[ResourceInfo],
        top: usize,
        filter: Option<&Query>,
    ) -> Result<Vec<Observation>, RapPluginError>;
}

/// Performs actuation requests.
#[async_trait]
pub trait ActuatorAccessListener: Send + Sync {
    fn name(&self) -> &str;

    /// Single pass/fail outcome; there is no partial success.
    async fn actuate_resource(
        &self,
        internal_id: &str,
        capabilities: &Capabilities,
    ) -> Result<(), RapPluginError>;
}

/// Performs remote service invocations.
#[async_trait]
pub trait ServiceAccessListener: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the service result; it is sent back serialized as JSON.
    async fn invoke_service(
        &self,
        internal_id: &str,
        parameters: &Parameters,
    ) -> Result<serde_json::Value, RapPluginError>;
}

/// Tracks which resources have push subscriptions.
#[async_trait]
pub trait SubscriptionListener: Send + Sync {
    fn name(&self) -> &str;

    async fn subscribe_resource(&self, resource_id: &str) -> Result<(), RapPluginError>;

    async fn unsubscribe_resource(&self, resource_id: &str) -> Result<(), RapPluginError>;
}

/// One-way outbound channel for pushed observations.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send_notification(&self, observation: &Observation) -> Result<()>;
}
