use serde::Serialize;

use crate::models::{MetricKind, QualityTier, Room};

/// Cross-room statistics for one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: MetricKind,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub rooms: usize,
}

/// Average, max and min of the current reading over rooms that have data
pub fn summarize(rooms: &[Room], metric: MetricKind) -> Option<MetricSummary> {
    let values: Vec<f64> = rooms.iter().filter_map(|r| r.value(metric)).collect();
    if values.is_empty() {
        return None;
    }

    let sum: f64 = values.iter().sum();
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    Some(MetricSummary {
        metric,
        average: sum / values.len() as f64,
        max,
        min,
        rooms: values.len(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TierDistribution {
    pub good: usize,
    pub moderate: usize,
    pub poor: usize,
    pub critical: usize,
    pub awaiting_data: usize,
}

impl TierDistribution {
    pub fn count(&self, tier: QualityTier) -> usize {
        match tier {
            QualityTier::Good => self.good,
            QualityTier::Moderate => self.moderate,
            QualityTier::Poor => self.poor,
            QualityTier::Critical => self.critical,
        }
    }

    pub fn total(&self) -> usize {
        self.good + self.moderate + self.poor + self.critical + self.awaiting_data
    }
}

/// Count rooms by overall tier
pub fn tier_distribution(rooms: &[Room]) -> TierDistribution {
    let mut dist = TierDistribution::default();
    for room in rooms {
        match room.overall_tier() {
            Some(QualityTier::Good) => dist.good += 1,
            Some(QualityTier::Moderate) => dist.moderate += 1,
            Some(QualityTier::Poor) => dist.poor += 1,
            Some(QualityTier::Critical) => dist.critical += 1,
            None => dist.awaiting_data += 1,
        }
    }
    dist
}

/// Chart points for one metric of a room: x is hours relative to the newest sample
pub fn trend_series(room: &Room, metric: MetricKind) -> Vec<(f64, f64)> {
    let Some(newest) = room.trend.last().map(|p| p.time) else {
        return Vec::new();
    };
    room.trend
        .iter()
        .map(|p| {
            let hours = (p.time - newest).num_minutes() as f64 / 60.0;
            (hours, p.readings.value(metric))
        })
        .collect()
}

/// `(min, max)` over the trend of every room, padded for chart bounds
pub fn trend_bounds(rooms: &[Room], metric: MetricKind) -> Option<(f64, f64)> {
    let mut values = rooms
        .iter()
        .flat_map(|r| r.trend.iter().map(move |p| p.readings.value(metric)))
        .peekable();
    values.peek()?;

    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let pad = ((hi - lo) * 0.05).max(1.0);
    Some((lo - pad, hi + pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Readings;
    use crate::store::fixtures;
    use chrono::Utc;

    fn room_with(id: &str, readings: Option<Readings>) -> Room {
        let mut room = Room::new(id.into(), format!("Room {}", id), "Building A".into(), Utc::now());
        room.current = readings;
        room
    }

    #[test]
    fn test_summarize() {
        let rooms = vec![
            room_with("1", Some(Readings::new(600.0, 10.0, 20.0, 40.0))),
            room_with("2", Some(Readings::new(900.0, 20.0, 24.0, 50.0))),
            room_with("3", None),
        ];
        let summary = summarize(&rooms, MetricKind::Co2).unwrap();
        assert_eq!(summary.average, 750.0);
        assert_eq!(summary.max, 900.0);
        assert_eq!(summary.min, 600.0);
        assert_eq!(summary.rooms, 2);
    }

    #[test]
    fn test_summarize_without_data() {
        assert!(summarize(&[], MetricKind::Humidity).is_none());
        assert!(summarize(&[room_with("1", None)], MetricKind::Humidity).is_none());
    }

    #[test]
    fn test_fixture_tier_distribution() {
        let fixture = fixtures::generate(Utc::now(), 3);
        let dist = tier_distribution(&fixture.rooms);
        // Room 101 moderate, 102 poor, Lab 201 critical, Main Hall good,
        // Room 301 moderate, Conference Room moderate
        assert_eq!(dist.good, 1);
        assert_eq!(dist.moderate, 3);
        assert_eq!(dist.poor, 1);
        assert_eq!(dist.critical, 1);
        assert_eq!(dist.total(), 6);
    }

    #[test]
    fn test_trend_series_x_axis() {
        let fixture = fixtures::generate(Utc::now(), 5);
        let series = trend_series(&fixture.rooms[0], MetricKind::Co2);
        assert_eq!(series.len(), 24);
        assert_eq!(series.first().unwrap().0, -23.0);
        assert_eq!(series.last().unwrap().0, 0.0);
    }

    #[test]
    fn test_trend_bounds() {
        let fixture = fixtures::generate(Utc::now(), 5);
        let (lo, hi) = trend_bounds(&fixture.rooms, MetricKind::Pm25).unwrap();
        assert!(lo < hi);
        assert!(trend_bounds(&[], MetricKind::Pm25).is_none());
    }
}
