use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::metric::{classify, overall_tier, MetricKind, QualityTier};

/// One reading of each metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub co2: f64,
    pub pm25: f64,
    pub temperature: f64,
    pub humidity: f64,
}

impl Readings {
    pub fn new(co2: f64, pm25: f64, temperature: f64, humidity: f64) -> Self {
        Self {
            co2,
            pm25,
            temperature,
            humidity,
        }
    }

    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Co2 => self.co2,
            MetricKind::Pm25 => self.pm25,
            MetricKind::Temperature => self.temperature,
            MetricKind::Humidity => self.humidity,
        }
    }

    pub fn tier(&self, kind: MetricKind) -> QualityTier {
        classify(kind, self.value(kind))
    }

    pub fn tiers(&self) -> [QualityTier; 4] {
        MetricKind::ALL.map(|kind| self.tier(kind))
    }

    pub fn overall_tier(&self) -> QualityTier {
        overall_tier(self.tiers())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub time: DateTime<Utc>,
    #[serde(flatten)]
    pub readings: Readings,
}

/// A monitored room. `current` is `None` for rooms added during the session
/// that have not reported yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub building: String,
    pub current: Option<Readings>,
    pub last_updated: DateTime<Utc>,
    pub trend: Vec<TrendPoint>,
}

impl Room {
    pub fn new(id: String, name: String, building: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            building,
            current: None,
            last_updated: now,
            trend: Vec::new(),
        }
    }

    pub fn value(&self, kind: MetricKind) -> Option<f64> {
        self.current.map(|r| r.value(kind))
    }

    pub fn tier(&self, kind: MetricKind) -> Option<QualityTier> {
        self.current.map(|r| r.tier(kind))
    }

    pub fn overall_tier(&self) -> Option<QualityTier> {
        self.current.map(|r| r.overall_tier())
    }

    /// Trend values of one metric, oldest first
    pub fn trend_values(&self, kind: MetricKind) -> Vec<f64> {
        self.trend.iter().map(|p| p.readings.value(kind)).collect()
    }
}

/// Editable room fields; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct RoomPatch {
    pub name: Option<String>,
    pub building: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readings_dispatch() {
        let r = Readings::new(650.0, 15.0, 23.5, 55.0);
        assert_eq!(r.value(MetricKind::Co2), 650.0);
        assert_eq!(r.value(MetricKind::Pm25), 15.0);
        assert_eq!(r.value(MetricKind::Temperature), 23.5);
        assert_eq!(r.value(MetricKind::Humidity), 55.0);
    }

    #[test]
    fn test_room_overall_tier() {
        let mut room = Room::new("1".into(), "Room 101".into(), "Building A".into(), Utc::now());
        assert_eq!(room.overall_tier(), None);

        room.current = Some(Readings::new(650.0, 15.0, 23.5, 55.0));
        assert_eq!(room.overall_tier(), Some(QualityTier::Moderate));

        room.current = Some(Readings::new(1150.0, 35.0, 22.1, 48.0));
        assert_eq!(room.overall_tier(), Some(QualityTier::Critical));
    }
}
