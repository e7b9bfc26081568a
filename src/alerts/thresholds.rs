use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::MetricKind;

/// Inclusive `[min, max]` display range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandKind {
    Good,
    Moderate,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBands {
    pub metric: MetricKind,
    pub good: Band,
    pub moderate: Band,
    pub poor: Band,
}

impl MetricBands {
    pub fn band(&self, kind: BandKind) -> &Band {
        match kind {
            BandKind::Good => &self.good,
            BandKind::Moderate => &self.moderate,
            BandKind::Poor => &self.poor,
        }
    }

    fn band_mut(&mut self, kind: BandKind) -> &mut Band {
        match kind {
            BandKind::Good => &mut self.good,
            BandKind::Moderate => &mut self.moderate,
            BandKind::Poor => &mut self.poor,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("Unknown threshold key: {0}. Expected <metric>.<good|moderate|poor>.<min|max>")]
    UnknownKey(String),

    #[error("Invalid threshold value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Band boundaries shown and edited on the configuration screen.
///
/// These are display values only. Classification uses its own fixed bands
/// in `models::metric`, and editing this set never changes a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub metrics: Vec<MetricBands>,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            metrics: vec![
                MetricBands {
                    metric: MetricKind::Co2,
                    good: Band::new(0.0, 600.0),
                    moderate: Band::new(600.0, 800.0),
                    poor: Band::new(800.0, 1000.0),
                },
                MetricBands {
                    metric: MetricKind::Pm25,
                    good: Band::new(0.0, 12.0),
                    moderate: Band::new(12.0, 25.0),
                    poor: Band::new(25.0, 35.0),
                },
                MetricBands {
                    metric: MetricKind::Temperature,
                    good: Band::new(20.0, 25.0),
                    moderate: Band::new(18.0, 28.0),
                    poor: Band::new(15.0, 30.0),
                },
                MetricBands {
                    metric: MetricKind::Humidity,
                    good: Band::new(40.0, 60.0),
                    moderate: Band::new(30.0, 70.0),
                    poor: Band::new(20.0, 80.0),
                },
            ],
        }
    }
}

impl ThresholdSet {
    pub fn for_metric(&self, metric: MetricKind) -> Option<&MetricBands> {
        self.metrics.iter().find(|m| m.metric == metric)
    }

    /// Set one boundary from a dotted key such as `co2.good.max`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ThresholdError> {
        let unknown = || ThresholdError::UnknownKey(key.to_string());

        let mut parts = key.split('.');
        let (Some(metric), Some(band), Some(bound), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(unknown());
        };

        let metric: MetricKind = metric.parse().map_err(|_| unknown())?;
        let band = match band.to_lowercase().as_str() {
            "good" => BandKind::Good,
            "moderate" => BandKind::Moderate,
            "poor" => BandKind::Poor,
            _ => return Err(unknown()),
        };

        let parsed: f64 = value
            .trim()
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| ThresholdError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            })?;

        let bands = self
            .metrics
            .iter_mut()
            .find(|m| m.metric == metric)
            .ok_or_else(unknown)?;
        let target = bands.band_mut(band);

        match bound.to_lowercase().as_str() {
            "min" => target.min = parsed,
            "max" => target.max = parsed,
            _ => return Err(unknown()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{classify, QualityTier};

    #[test]
    fn test_default_bands_mirror_classifier() {
        let set = ThresholdSet::default();
        let co2 = set.for_metric(MetricKind::Co2).unwrap();
        assert_eq!(co2.good, Band::new(0.0, 600.0));
        assert_eq!(co2.poor, Band::new(800.0, 1000.0));
        let humidity = set.for_metric(MetricKind::Humidity).unwrap();
        assert_eq!(humidity.band(BandKind::Moderate), &Band::new(30.0, 70.0));
    }

    #[test]
    fn test_set_value() {
        let mut set = ThresholdSet::default();
        set.set_value("co2.good.max", "650").unwrap();
        assert_eq!(set.for_metric(MetricKind::Co2).unwrap().good.max, 650.0);

        set.set_value("temperature.poor.min", "14.5").unwrap();
        assert_eq!(set.for_metric(MetricKind::Temperature).unwrap().poor.min, 14.5);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut set = ThresholdSet::default();
        assert!(matches!(set.set_value("co2.good", "1"), Err(ThresholdError::UnknownKey(_))));
        assert!(matches!(set.set_value("radon.good.max", "1"), Err(ThresholdError::UnknownKey(_))));
        assert!(matches!(set.set_value("co2.great.max", "1"), Err(ThresholdError::UnknownKey(_))));
        assert!(matches!(set.set_value("co2.good.mid", "1"), Err(ThresholdError::UnknownKey(_))));
        assert!(matches!(
            set.set_value("co2.good.max", "lots"),
            Err(ThresholdError::InvalidValue { .. })
        ));
        assert_eq!(set, ThresholdSet::default());
    }

    #[test]
    fn test_edits_do_not_affect_classification() {
        let mut set = ThresholdSet::default();
        set.set_value("co2.good.max", "2000").unwrap();
        assert_eq!(classify(MetricKind::Co2, 900.0), QualityTier::Poor);
    }
}
