// Example handlers, one per request kind

mod actuation;
mod reading;
mod service;
mod subscription;

pub use actuation::ExampleActuator;
pub use reading::ExampleResourceReader;
pub use service::ExampleService;
pub use subscription::SubscriptionManager;
