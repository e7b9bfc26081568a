use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::metric::MetricKind;

/// Alert severity. Declaration order is ranking order: most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Ranking index: 0 for critical through 3 for low
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub room_id: String,
    pub room_name: String,
    pub metric: MetricKind,
    pub severity: Severity,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub resolved: bool,
}

impl Alert {
    /// Flip to resolved. Resolution is terminal; returns whether anything changed.
    pub fn resolve(&mut self) -> bool {
        if self.resolved {
            return false;
        }
        self.resolved = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::Critical.rank() < Severity::High.rank());
        assert!(Severity::High.rank() < Severity::Medium.rank());
        assert!(Severity::Medium.rank() < Severity::Low.rank());
        assert!(Severity::Critical < Severity::Low);
    }

    #[test]
    fn test_resolve_is_one_way() {
        let mut alert = Alert {
            id: "1".into(),
            room_id: "3".into(),
            room_name: "Lab 201".into(),
            metric: MetricKind::Co2,
            severity: Severity::Critical,
            message: "Critical CO₂ level: 1150 ppm".into(),
            created_at: Utc::now(),
            resolved: false,
        };
        assert!(alert.resolve());
        assert!(alert.resolved);
        assert!(!alert.resolve());
        assert!(alert.resolved);
    }
}
