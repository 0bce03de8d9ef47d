// Information model shared with the platform
pub mod model;

// Plugin error taxonomy
pub mod error;

// Handler capability traits
pub mod listener;

// Handler registry and request dispatch
pub mod plugin;

// NATS integration
pub mod messaging;

// Configuration loading
pub mod config;

// Startup dependency wait
pub mod wait;

// Configuration and component dumps
pub mod diagnostics;

pub use error::RapPluginError;
pub use model::Observation;
pub use plugin::{RapPlugin, RapRequest, RapResponse};
