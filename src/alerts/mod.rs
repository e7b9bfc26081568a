pub mod ranking;
pub mod thresholds;

pub use ranking::{rank_alerts, ranked, AlertCounts, AlertFilter};
pub use thresholds::{Band, BandKind, MetricBands, ThresholdError, ThresholdSet};
