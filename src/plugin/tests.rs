use super::*;
use crate::model::{
    Capabilities, ObservationValue, Parameters, Property, Query, UnitOfMeasurement,
    WGS84Location,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send_notification(&self, observation: &Observation) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(observation.resource_id.clone());
        Ok(())
    }
}

fn observation(id: &str) -> Observation {
    Observation {
        resource_id: id.to_string(),
        location: WGS84Location {
            longitude: 0.0,
            latitude: 0.0,
            altitude: 0.0,
            name: "here".to_string(),
            description: vec![],
        },
        result_time: "2024-02-11T13:00:01".to_string(),
        sampling_time: "2024-02-11T13:00:00".to_string(),
        obs_values: vec![ObservationValue {
            value: "1".to_string(),
            obs_property: Property {
                name: "p".to_string(),
                iri: "p_iri".to_string(),
                description: vec![],
            },
            uom: UnitOfMeasurement {
                symbol: "u".to_string(),
                name: "unit".to_string(),
                iri: "u_iri".to_string(),
                description: None,
            },
        }],
    }
}

/// Knows a single sensor "s1".
struct OneSensor;

#[async_trait]
impl ResourceAccessListener for OneSensor {
    fn name(&self) -> &str {
        "one-sensor"
    }

    async fn get_resource(
        &self,
        resource_info: &[ResourceInfo],
    ) -> Result<Observation, RapPluginError> {
        match internal_resource_id(resource_info) {
            Some("s1") => Ok(observation("s1")),
            _ => Err(RapPluginError::not_found("Sensor not found.")),
        }
    }

    async fn get_resource_history(
        &self,
        resource_info: &[ResourceInfo],
        top: usize,
        _filter: Option<&Query>,
    ) -> Result<Vec<Observation>, RapPluginError> {
        let single = self.get_resource(resource_info).await?;
        Ok(vec![single; top])
    }
}

#[derive(Default)]
struct RecordingActuator {
    calls: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl ActuatorAccessListener for RecordingActuator {
    fn name(&self) -> &str {
        "recording-actuator"
    }

    async fn actuate_resource(
        &self,
        internal_id: &str,
        capabilities: &Capabilities,
    ) -> Result<(), RapPluginError> {
        self.calls
            .lock()
            .unwrap()
            .push((internal_id.to_string(), capabilities.len()));
        Ok(())
    }
}

struct EchoService;

#[async_trait]
impl ServiceAccessListener for EchoService {
    fn name(&self) -> &str {
        "echo"
    }

    async fn invoke_service(
        &self,
        internal_id: &str,
        parameters: &Parameters,
    ) -> Result<serde_json::Value, RapPluginError> {
        Ok(json!({"id": internal_id, "count": parameters.len()}))
    }
}

#[derive(Default)]
struct RecordingSubscriptions {
    log: Mutex<Vec<String>>,
}

#[async_trait]
impl SubscriptionListener for RecordingSubscriptions {
    fn name(&self) -> &str {
        "recording-subscriptions"
    }

    async fn subscribe_resource(&self, resource_id: &str) -> Result<(), RapPluginError> {
        self.log.lock().unwrap().push(format!("+{}", resource_id));
        Ok(())
    }

    async fn unsubscribe_resource(&self, resource_id: &str) -> Result<(), RapPluginError> {
        self.log.lock().unwrap().push(format!("-{}", resource_id));
        Ok(())
    }
}

fn plugin_with_reader() -> RapPlugin {
    let mut plugin = RapPlugin::new(Arc::new(RecordingSink::default()));
    plugin.register_reading_resource_listener(Arc::new(OneSensor));
    plugin
}

#[tokio::test]
async fn test_get_returns_serialized_observation() {
    let plugin = plugin_with_reader();

    let response = plugin
        .handle_message(br#"{"type":"get","resourceInfo":[{"internalId":"s1"}]}"#)
        .await;

    assert_eq!(response.status, 200);
    let parsed: Observation = serde_json::from_str(&response.body).unwrap();
    assert_eq!(parsed.resource_id, "s1");
}

#[tokio::test]
async fn test_history_returns_top_entries() {
    let plugin = plugin_with_reader();

    let response = plugin
        .dispatch(RapRequest::History {
            resource_info: vec![ResourceInfo::internal("s1")],
            top: 4,
            filter: None,
        })
        .await;

    assert!(response.is_success());
    let parsed: Vec<Observation> = serde_json::from_str(&response.body).unwrap();
    assert_eq!(parsed.len(), 4);
}

#[tokio::test]
async fn test_history_above_limit_is_bad_request() {
    let plugin = plugin_with_reader();

    let response = plugin
        .handle_message(
            br#"{"type":"history","resourceInfo":[{"internalId":"s1"}],"top":1000000000000}"#,
        )
        .await;
    assert_eq!(response.status, 400);
    assert!(response.body.contains("exceeds the limit"));

    let response = plugin
        .dispatch(RapRequest::History {
            resource_info: vec![ResourceInfo::internal("s1")],
            top: MAX_HISTORY_TOP,
            filter: None,
        })
        .await;
    assert!(response.is_success());
}

#[tokio::test]
async fn test_handler_error_keeps_status() {
    let plugin = plugin_with_reader();

    let response = plugin
        .dispatch(RapRequest::Get {
            resource_info: vec![ResourceInfo::internal("unknown")],
        })
        .await;

    assert_eq!(response.status, 404);
    assert_eq!(response.body, "Sensor not found.");
}

#[tokio::test]
async fn test_malformed_request_is_bad_request() {
    let plugin = plugin_with_reader();

    let response = plugin.handle_message(b"{not json").await;
    assert_eq!(response.status, 400);

    let response = plugin.handle_message(br#"{"type":"teleport"}"#).await;
    assert_eq!(response.status, 400);
}

#[tokio::test]
async fn test_missing_listener_is_not_implemented() {
    let plugin = plugin_with_reader();

    let response = plugin
        .dispatch(RapRequest::Invoke {
            resource_info: vec![ResourceInfo::internal("svc")],
            body: Parameters::new(),
        })
        .await;

    assert_eq!(response.status, 501);
    assert!(response.body.contains("invoking"));
}

#[tokio::test]
async fn test_actuate_requires_internal_id() {
    let actuator = Arc::new(RecordingActuator::default());
    let mut plugin = RapPlugin::new(Arc::new(RecordingSink::default()));
    plugin.register_actuating_resource_listener(actuator.clone());

    let response = plugin
        .handle_message(br#"{"type":"actuate","resourceInfo":[{"symbioteId":"x"}],"body":{}}"#)
        .await;
    assert_eq!(response.status, 400);
    assert!(actuator.calls.lock().unwrap().is_empty());

    let response = plugin
        .handle_message(
            br#"{"type":"actuate","resourceInfo":[{"internalId":"a1"}],"body":{"Light":{"on":1}}}"#,
        )
        .await;
    assert_eq!(response, RapResponse::empty());
    assert_eq!(
        actuator.calls.lock().unwrap().as_slice(),
        &[("a1".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_invoke_serializes_result() {
    let mut plugin = RapPlugin::new(Arc::new(RecordingSink::default()));
    plugin.register_invoking_service_listener(Arc::new(EchoService));

    let response = plugin
        .handle_message(
            br#"{"type":"invoke","resourceInfo":[{"internalId":"svc"}],"body":{"a":"x","b":2}}"#,
        )
        .await;

    assert!(response.is_success());
    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body, json!({"id": "svc", "count": 2}));
}

#[tokio::test]
async fn test_subscription_requests_keep_order() {
    let subscriptions = Arc::new(RecordingSubscriptions::default());
    let mut plugin = RapPlugin::new(Arc::new(RecordingSink::default()));
    plugin.register_notification_resource_listener(subscriptions.clone());

    plugin
        .handle_message(br#"{"type":"subscribe","resourceIds":["a","b"]}"#)
        .await;
    plugin
        .handle_message(br#"{"type":"unsubscribe","resourceIds":["a"]}"#)
        .await;

    assert_eq!(
        subscriptions.log.lock().unwrap().as_slice(),
        &["+a".to_string(), "+b".to_string(), "-a".to_string()]
    );
}

#[tokio::test]
async fn test_send_notification_uses_sink() {
    let sink = Arc::new(RecordingSink::default());
    let plugin = RapPlugin::new(sink.clone());

    plugin.send_notification(&observation("s1")).await.unwrap();
    plugin.notifier().send_notification(&observation("s2")).await.unwrap();

    assert_eq!(
        sink.sent.lock().unwrap().as_slice(),
        &["s1".to_string(), "s2".to_string()]
    );
}

#[test]
fn test_registered_listeners() {
    let mut plugin = plugin_with_reader();
    plugin.register_notification_resource_listener(Arc::new(RecordingSubscriptions::default()));

    let listeners = plugin.registered_listeners();
    assert_eq!(
        listeners,
        vec![
            ("reading", "one-sensor".to_string()),
            ("notification", "recording-subscriptions".to_string()),
        ]
    );
}
