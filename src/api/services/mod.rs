pub mod health;
pub mod treasury;

pub use health::{AppStartTime, HealthService, health_routes};
