// Cross-room analysis
pub mod statistics;

pub use statistics::{summarize, tier_distribution, trend_bounds, trend_series, MetricSummary, TierDistribution};
