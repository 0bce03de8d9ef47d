use async_trait::async_trait;
use rap_plugin::listener::ServiceAccessListener;
use rap_plugin::model::Parameters;
use rap_plugin::RapPluginError;
use serde_json::{json, Value};
use tracing::info;

/// Answers invocations of the two example services.
pub struct ExampleService;

#[async_trait]
impl ServiceAccessListener for ExampleService {
    fn name(&self) -> &str {
        "example-service"
    }

    async fn invoke_service(
        &self,
        internal_id: &str,
        parameters: &Parameters,
    ) -> Result<Value, RapPluginError> {
        info!(internal_id = %internal_id, "Invoking service");

        for (name, value) in parameters {
            info!(parameter = %name, value = %value, "Service parameter");
        }

        match internal_id {
            "rp_isrid1" => Ok(json!("ok")),
            "isrid1" => Ok(json!("some json")),
            _ => Err(RapPluginError::not_found("Service not found.")),
        }
    }
}
