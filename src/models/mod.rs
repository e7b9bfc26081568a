// Domain models module
pub mod alert;
pub mod metric;
pub mod room;
pub mod sensor;

pub use alert::{Alert, Severity};
pub use metric::{classify, classify_key, overall_tier, MetricKind, QualityTier};
pub use room::{Readings, Room, RoomPatch, TrendPoint};
pub use sensor::{Sensor, SensorPatch, SensorStatus};
