use crate::observation::create_observation;
use async_trait::async_trait;
use rap_plugin::listener::ResourceAccessListener;
use rap_plugin::model::{internal_resource_id, Observation, Query, ResourceInfo};
use rap_plugin::RapPluginError;
use tracing::debug;

/// Sensors this plugin answers for
pub const SENSOR_IDS: [&str; 2] = ["rp_isen1", "isen1"];

/// Serves readings for the example sensors.
pub struct ExampleResourceReader;

impl ExampleResourceReader {
    fn known_sensor(resource_info: &[ResourceInfo]) -> Result<&str, RapPluginError> {
        internal_resource_id(resource_info)
            .filter(|id| SENSOR_IDS.contains(id))
            .ok_or_else(|| RapPluginError::not_found("Sensor not found."))
    }
}

#[async_trait]
impl ResourceAccessListener for ExampleResourceReader {
    fn name(&self) -> &str {
        "example-resource-reader"
    }

    async fn get_resource(
        &self,
        resource_info: &[ResourceInfo],
    ) -> Result<Observation, RapPluginError> {
        debug!(resource_info = ?resource_info, "Reading resource");

        let sensor_id = Self::known_sensor(resource_info)?;
        Ok(create_observation(sensor_id))
    }

    async fn get_resource_history(
        &self,
        resource_info: &[ResourceInfo],
        top: usize,
        _filter: Option<&Query>,
    ) -> Result<Vec<Observation>, RapPluginError> {
        debug!(resource_info = ?resource_info, top = top, "Reading resource history");

        let sensor_id = Self::known_sensor(resource_info)?;
        Ok((0..top).map(|_| create_observation(sensor_id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_sensors() {
        let reader = ExampleResourceReader;
        for id in SENSOR_IDS {
            let observation = reader
                .get_resource(&[ResourceInfo::internal(id)])
                .await
                .unwrap();
            assert_eq!(observation.resource_id, id);
        }
    }

    #[tokio::test]
    async fn test_unknown_sensor() {
        let reader = ExampleResourceReader;
        let err = reader
            .get_resource(&[ResourceInfo::internal("isen2")])
            .await
            .unwrap_err();
        assert_eq!(err.code, 404);
        assert_eq!(err.message, "Sensor not found.");

        let err = reader.get_resource(&[]).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_history_count() {
        let reader = ExampleResourceReader;
        let info = [ResourceInfo::internal("isen1")];

        for top in [0, 1, 3, 10] {
            let history = reader.get_resource_history(&info, top, None).await.unwrap();
            assert_eq!(history.len(), top);
            assert!(history.iter().all(|o| o.resource_id == "isen1"));
        }
    }

    #[tokio::test]
    async fn test_history_unknown_sensor() {
        let reader = ExampleResourceReader;
        let err = reader
            .get_resource_history(&[ResourceInfo::internal("iaid1")], 3, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, 404);
    }
}
