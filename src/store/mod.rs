// In-memory session state
pub mod dashboard_store;
pub mod fixtures;

pub use dashboard_store::{DashboardStore, DEFAULT_SENSOR_ADDRESS};
pub use fixtures::{generate, Fixture};
