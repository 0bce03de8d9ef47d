//! Canned sensor readings.

use chrono::{DateTime, Duration, Utc};
use rap_plugin::model::{
    format_timestamp, Observation, ObservationValue, Property, UnitOfMeasurement, WGS84Location,
};
use tracing::{debug, error};

/// Build the sample temperature reading for `sensor_id`, taken now.
pub fn create_observation(sensor_id: &str) -> Observation {
    create_observation_at(sensor_id, Utc::now())
}

/// Build the sample reading with `now` as result time; sampled one second earlier.
pub fn create_observation_at(sensor_id: &str, now: DateTime<Utc>) -> Observation {
    let location = WGS84Location {
        longitude: 16.3734492,
        latitude: 48.2088475,
        altitude: 158.0,
        name: "Stephansdome".to_string(),
        description: vec!["City of Wien".to_string()],
    };

    let value = ObservationValue {
        value: "7".to_string(),
        obs_property: Property {
            name: "Temperature".to_string(),
            iri: "TempIRI".to_string(),
            description: vec!["Air temperature".to_string()],
        },
        uom: UnitOfMeasurement {
            symbol: "C".to_string(),
            name: "degree Celsius".to_string(),
            iri: "C_IRI".to_string(),
            description: None,
        },
    };

    let observation = Observation {
        resource_id: sensor_id.to_string(),
        location,
        result_time: format_timestamp(now),
        sampling_time: format_timestamp(now - Duration::seconds(1)),
        obs_values: vec![value],
    };

    match serde_json::to_string(&observation) {
        Ok(json) => debug!(observation = %json, "Created observation"),
        Err(e) => error!(error = %e, "Can not convert observation to JSON"),
    }

    observation
}
