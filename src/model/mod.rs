// Platform information model (observations, locations, parameter values)

mod value;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use value::{Capabilities, Parameters, PrimitiveValue, Value};

/// Timestamp layout used for `resultTime` / `samplingTime` (UTC, second precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a UTC instant the way the platform expects observation timestamps.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Observation is a timestamped sensor reading with location and measured values.
///
/// Built fresh for every request and never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Internal id of the sensor that produced the reading
    pub resource_id: String,

    /// Where the reading was taken
    pub location: WGS84Location,

    /// When the result became available
    pub result_time: String,

    /// When the sample was taken
    pub sampling_time: String,

    /// Measured values, in declaration order
    pub obs_values: Vec<ObservationValue>,
}

/// WGS84 geo-point with a display name and aliases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@c", rename = ".WGS84Location")]
pub struct WGS84Location {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub name: String,
    #[serde(default)]
    pub description: Vec<String>,
}

/// A single measured value with its property and unit descriptors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationValue {
    pub value: String,
    pub obs_property: Property,
    pub uom: UnitOfMeasurement,
}

/// Observed property descriptor (e.g. "Temperature").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub iri: String,
    #[serde(default)]
    pub description: Vec<String>,
}

/// Unit descriptor (e.g. "degree Celsius").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitOfMeasurement {
    pub symbol: String,
    pub name: String,
    pub iri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
}

/// Identifies the resource a request is addressed to.
///
/// The platform sends a chain of these; only the internal id matters to a plugin.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbiote_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl ResourceInfo {
    /// Shorthand for a resource info carrying only an internal id.
    pub fn internal(id: impl Into<String>) -> Self {
        Self {
            internal_id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// Returns the first non-empty internal id in the chain.
pub fn internal_resource_id(resource_info: &[ResourceInfo]) -> Option<&str> {
    resource_info
        .iter()
        .filter_map(|info| info.internal_id.as_deref())
        .find(|id| !id.is_empty())
}

/// Opaque history filter; passed through to handlers untouched.
pub type Query = serde_json::Value;
