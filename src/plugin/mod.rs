//! Plugin registry and request dispatch.
//!
//! [`RapPlugin`] keeps at most one handler per request kind and routes each
//! decoded [`RapRequest`] to it. Handler errors become responses carrying the
//! handler's status code; nothing here retries.

mod request;
#[cfg(test)]
mod tests;

pub use request::{RapRequest, RapResponse};

use crate::error::RapPluginError;
use crate::listener::{
    ActuatorAccessListener, NotificationSink, ResourceAccessListener, ServiceAccessListener,
    SubscriptionListener,
};
use crate::model::{internal_resource_id, Observation, ResourceInfo};
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Registered handler kinds, in the order diagnostics list them
pub const LISTENER_KINDS: [&str; 4] = ["reading", "actuating", "invoking", "notification"];

/// Largest `top` a history request may ask for
pub const MAX_HISTORY_TOP: usize = 1000;

/// Plugin runtime: handler registry plus the outbound notification channel.
pub struct RapPlugin {
    reading: Option<Arc<dyn ResourceAccessListener>>,
    actuating: Option<Arc<dyn ActuatorAccessListener>>,
    invoking: Option<Arc<dyn ServiceAccessListener>>,
    notification: Option<Arc<dyn SubscriptionListener>>,
    notifier: Arc<dyn NotificationSink>,
}

impl RapPlugin {
    /// Create a plugin with no handlers registered.
    pub fn new(notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            reading: None,
            actuating: None,
            invoking: None,
            notification: None,
            notifier,
        }
    }

    pub fn register_reading_resource_listener(&mut self, listener: Arc<dyn ResourceAccessListener>) {
        if let Some(previous) = self.reading.replace(Arc::clone(&listener)) {
            warn!(previous = %previous.name(), "Replacing reading listener");
        }
        info!(listener = %listener.name(), "Registered reading listener");
    }

    pub fn register_actuating_resource_listener(
        &mut self,
        listener: Arc<dyn ActuatorAccessListener>,
    ) {
        if let Some(previous) = self.actuating.replace(Arc::clone(&listener)) {
            warn!(previous = %previous.name(), "Replacing actuating listener");
        }
        info!(listener = %listener.name(), "Registered actuating listener");
    }

    pub fn register_invoking_service_listener(&mut self, listener: Arc<dyn ServiceAccessListener>) {
        if let Some(previous) = self.invoking.replace(Arc::clone(&listener)) {
            warn!(previous = %previous.name(), "Replacing invoking listener");
        }
        info!(listener = %listener.name(), "Registered invoking listener");
    }

    pub fn register_notification_resource_listener(
        &mut self,
        listener: Arc<dyn SubscriptionListener>,
    ) {
        if let Some(previous) = self.notification.replace(Arc::clone(&listener)) {
            warn!(previous = %previous.name(), "Replacing notification listener");
        }
        info!(listener = %listener.name(), "Registered notification listener");
    }

    /// Lists `(kind, listener name)` for every registered handler.
    pub fn registered_listeners(&self) -> Vec<(&'static str, String)> {
        let names = [
            self.reading.as_ref().map(|l| l.name().to_string()),
            self.actuating.as_ref().map(|l| l.name().to_string()),
            self.invoking.as_ref().map(|l| l.name().to_string()),
            self.notification.as_ref().map(|l| l.name().to_string()),
        ];

        LISTENER_KINDS
            .iter()
            .zip(names)
            .filter_map(|(kind, name)| name.map(|n| (*kind, n)))
            .collect()
    }

    /// Outbound notification channel (shared with subscription handlers).
    pub fn notifier(&self) -> Arc<dyn NotificationSink> {
        Arc::clone(&self.notifier)
    }

    /// Push an observation to the platform.
    pub async fn send_notification(&self, observation: &Observation) -> Result<()> {
        self.notifier.send_notification(observation).await
    }

    /// Decode a raw JSON request and dispatch it.
    pub async fn handle_message(&self, payload: &[u8]) -> RapResponse {
        let request_id = Uuid::new_v4();

        let request: RapRequest = match serde_json::from_slice(payload) {
            Ok(request) => request,
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "Malformed request");
                return RapPluginError::bad_request(format!("malformed request: {}", e)).into();
            }
        };

        let kind = request.kind();
        debug!(request_id = %request_id, kind = kind, "Dispatching request");

        let response = self.dispatch(request).await;

        if response.is_success() {
            debug!(request_id = %request_id, kind = kind, "Request succeeded");
        } else {
            warn!(
                request_id = %request_id,
                kind = kind,
                status = response.status,
                error = %response.body,
                "Request failed"
            );
        }

        response
    }

    /// Route a decoded request to its handler.
    pub async fn dispatch(&self, request: RapRequest) -> RapResponse {
        match self.route(request).await {
            Ok(body) => RapResponse::ok(body),
            Err(e) => e.into(),
        }
    }

    async fn route(&self, request: RapRequest) -> Result<String, RapPluginError> {
        match request {
            RapRequest::Get { resource_info } => {
                let listener = require(&self.reading, "reading")?;
                let observation = listener.get_resource(&resource_info).await?;
                to_json(&observation, "Can not convert observation to JSON")
            }
            RapRequest::History {
                resource_info,
                top,
                filter,
            } => {
                let listener = require(&self.reading, "reading")?;
                if top > MAX_HISTORY_TOP {
                    return Err(RapPluginError::bad_request(format!(
                        "History size {} exceeds the limit of {}",
                        top, MAX_HISTORY_TOP
                    )));
                }
                let observations = listener
                    .get_resource_history(&resource_info, top, filter.as_ref())
                    .await?;
                to_json(&observations, "Can not convert observations to JSON")
            }
            RapRequest::Actuate {
                resource_info,
                body,
            } => {
                let listener = require(&self.actuating, "actuating")?;
                let internal_id = require_internal_id(&resource_info)?;
                listener.actuate_resource(internal_id, &body).await?;
                Ok(String::new())
            }
            RapRequest::Invoke {
                resource_info,
                body,
            } => {
                let listener = require(&self.invoking, "invoking")?;
                let internal_id = require_internal_id(&resource_info)?;
                let result = listener.invoke_service(internal_id, &body).await?;
                to_json(&result, "Can not convert service response to JSON")
            }
            RapRequest::Subscribe { resource_ids } => {
                let listener = require(&self.notification, "notification")?;
                for id in &resource_ids {
                    listener.subscribe_resource(id).await?;
                }
                Ok(String::new())
            }
            RapRequest::Unsubscribe { resource_ids } => {
                let listener = require(&self.notification, "notification")?;
                for id in &resource_ids {
                    listener.unsubscribe_resource(id).await?;
                }
                Ok(String::new())
            }
        }
    }
}

fn require<'a, T: ?Sized>(
    listener: &'a Option<Arc<T>>,
    kind: &str,
) -> Result<&'a Arc<T>, RapPluginError> {
    listener
        .as_ref()
        .ok_or_else(|| RapPluginError::not_implemented(format!("no {} listener registered", kind)))
}

fn require_internal_id(resource_info: &[ResourceInfo]) -> Result<&str, RapPluginError> {
    internal_resource_id(resource_info)
        .ok_or_else(|| RapPluginError::bad_request("request carries no internal resource id"))
}

fn to_json<T: Serialize + ?Sized>(value: &T, context: &str) -> Result<String, RapPluginError> {
    serde_json::to_string(value).map_err(|e| RapPluginError::internal_with_cause(context, e))
}
