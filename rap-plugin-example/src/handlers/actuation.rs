use async_trait::async_trait;
use rap_plugin::listener::ActuatorAccessListener;
use rap_plugin::model::Capabilities;
use rap_plugin::RapPluginError;
use tracing::info;

/// Actuators this plugin accepts commands for
pub const ACTUATOR_IDS: [&str; 2] = ["rp_iaid1", "iaid1"];

/// Logs actuation commands for the example actuator.
pub struct ExampleActuator;

#[async_trait]
impl ActuatorAccessListener for ExampleActuator {
    fn name(&self) -> &str {
        "example-actuator"
    }

    async fn actuate_resource(
        &self,
        internal_id: &str,
        capabilities: &Capabilities,
    ) -> Result<(), RapPluginError> {
        info!(internal_id = %internal_id, "Called actuation for resource");

        for (capability, parameters) in capabilities {
            info!(capability = %capability, "Capability");
            for (name, value) in parameters {
                info!(capability = %capability, parameter = %name, value = %value, "Parameter");
            }
        }

        if !ACTUATOR_IDS.contains(&internal_id) {
            return Err(RapPluginError::not_found("Actuating entity not found."));
        }

        info!(internal_id = %internal_id, "Resource actuated");
        Ok(())
    }
}
