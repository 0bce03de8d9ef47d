use crate::error::RapPluginError;
use crate::model::{Capabilities, Parameters, Query, ResourceInfo};
use serde::{Deserialize, Serialize};

/// Inbound request addressed to this plugin.
///
/// Wire format: JSON object with a `type` discriminator, e.g.
/// `{"type": "get", "resourceInfo": [{"internalId": "isen1"}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RapRequest {
    Get {
        #[serde(rename = "resourceInfo")]
        resource_info: Vec<ResourceInfo>,
    },
    History {
        #[serde(rename = "resourceInfo")]
        resource_info: Vec<ResourceInfo>,
        top: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<Query>,
    },
    Actuate {
        #[serde(rename = "resourceInfo")]
        resource_info: Vec<ResourceInfo>,
        body: Capabilities,
    },
    Invoke {
        #[serde(rename = "resourceInfo")]
        resource_info: Vec<ResourceInfo>,
        body: Parameters,
    },
    Subscribe {
        #[serde(rename = "resourceIds")]
        resource_ids: Vec<String>,
    },
    Unsubscribe {
        #[serde(rename = "resourceIds")]
        resource_ids: Vec<String>,
    },
}

impl RapRequest {
    /// Short request kind for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RapRequest::Get { .. } => "get",
            RapRequest::History { .. } => "history",
            RapRequest::Actuate { .. } => "actuate",
            RapRequest::Invoke { .. } => "invoke",
            RapRequest::Subscribe { .. } => "subscribe",
            RapRequest::Unsubscribe { .. } => "unsubscribe",
        }
    }
}

/// Reply sent back for every request.
///
/// `body` holds the serialized result on success and the error message otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RapResponse {
    pub status: u16,
    pub body: String,
}

impl RapResponse {
    pub const OK: u16 = 200;

    pub fn ok(body: String) -> Self {
        Self {
            status: Self::OK,
            body,
        }
    }

    pub fn empty() -> Self {
        Self::ok(String::new())
    }

    pub fn is_success(&self) -> bool {
        self.status == Self::OK
    }
}

impl From<RapPluginError> for RapResponse {
    fn from(err: RapPluginError) -> Self {
        Self {
            status: err.code,
            body: err.message,
        }
    }
}
