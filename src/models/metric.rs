use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four measured quantities of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Co2,
    Pm25,
    Temperature,
    Humidity,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Co2,
        MetricKind::Pm25,
        MetricKind::Temperature,
        MetricKind::Humidity,
    ];

    /// Stable machine key, used in config keys and JSON.
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::Co2 => "co2",
            MetricKind::Pm25 => "pm25",
            MetricKind::Temperature => "temperature",
            MetricKind::Humidity => "humidity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Co2 => "CO₂",
            MetricKind::Pm25 => "PM2.5",
            MetricKind::Temperature => "Temperature",
            MetricKind::Humidity => "Humidity",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Co2 => "ppm",
            MetricKind::Pm25 => "μg/m³",
            MetricKind::Temperature => "°C",
            MetricKind::Humidity => "%",
        }
    }

    /// Format a reading with its unit, e.g. `650 ppm` or `23.5°C`
    pub fn format_value(&self, value: f64) -> String {
        match self {
            MetricKind::Co2 => format!("{} ppm", trim_float(value)),
            MetricKind::Pm25 => format!("{} μg/m³", trim_float(value)),
            MetricKind::Temperature => format!("{}°C", trim_float(value)),
            MetricKind::Humidity => format!("{}%", trim_float(value)),
        }
    }

    pub fn next(&self) -> MetricKind {
        match self {
            MetricKind::Co2 => MetricKind::Pm25,
            MetricKind::Pm25 => MetricKind::Temperature,
            MetricKind::Temperature => MetricKind::Humidity,
            MetricKind::Humidity => MetricKind::Co2,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MetricKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "co2" | "co₂" => Ok(MetricKind::Co2),
            "pm25" | "pm2.5" | "pm2_5" => Ok(MetricKind::Pm25),
            "temperature" | "temp" => Ok(MetricKind::Temperature),
            "humidity" | "hum" => Ok(MetricKind::Humidity),
            other => Err(anyhow::anyhow!(
                "Unknown metric '{}'. Must be one of: co2, pm25, temperature, humidity",
                other
            )),
        }
    }
}

/// Ordinal air-quality tier; ordering follows severity so `max` is the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Good,
    Moderate,
    Poor,
    Critical,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Good,
        QualityTier::Moderate,
        QualityTier::Poor,
        QualityTier::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Good => "good",
            QualityTier::Moderate => "moderate",
            QualityTier::Poor => "poor",
            QualityTier::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Good => "Good",
            QualityTier::Moderate => "Moderate",
            QualityTier::Poor => "Poor",
            QualityTier::Critical => "Critical",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QualityTier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" => Ok(QualityTier::Good),
            "moderate" => Ok(QualityTier::Moderate),
            "poor" => Ok(QualityTier::Poor),
            "critical" => Ok(QualityTier::Critical),
            other => Err(anyhow::anyhow!(
                "Unknown tier '{}'. Must be one of: good, moderate, poor, critical",
                other
            )),
        }
    }
}

/// Classify a reading into its quality tier.
///
/// CO₂ and PM2.5 use an upper-bound cascade. Temperature and humidity use
/// nested inclusive bands: a value is in the narrowest band that contains
/// it, and anything outside the widest band is critical.
pub fn classify(kind: MetricKind, value: f64) -> QualityTier {
    match kind {
        MetricKind::Co2 => cascade(value, 600.0, 800.0, 1000.0),
        MetricKind::Pm25 => cascade(value, 12.0, 25.0, 35.0),
        MetricKind::Temperature => nested(value, (20.0, 25.0), (18.0, 28.0), (15.0, 30.0)),
        MetricKind::Humidity => nested(value, (40.0, 60.0), (30.0, 70.0), (20.0, 80.0)),
    }
}

/// String-keyed classification for callers holding a raw metric name.
///
/// An unrecognised key yields `Good`. That fallback hides typos rather than
/// reporting them, so it is logged.
pub fn classify_key(key: &str, value: f64) -> QualityTier {
    match key.parse::<MetricKind>() {
        Ok(kind) => classify(kind, value),
        Err(_) => {
            tracing::warn!(metric = key, value, "unknown metric kind, defaulting to good");
            QualityTier::Good
        }
    }
}

/// Worst tier wins: critical > poor > moderate > good. No averaging.
pub fn overall_tier<I>(tiers: I) -> QualityTier
where
    I: IntoIterator<Item = QualityTier>,
{
    tiers.into_iter().max().unwrap_or(QualityTier::Good)
}

fn cascade(value: f64, good_below: f64, moderate_below: f64, poor_below: f64) -> QualityTier {
    if value < good_below {
        QualityTier::Good
    } else if value < moderate_below {
        QualityTier::Moderate
    } else if value < poor_below {
        QualityTier::Poor
    } else {
        QualityTier::Critical
    }
}

fn nested(value: f64, good: (f64, f64), moderate: (f64, f64), poor: (f64, f64)) -> QualityTier {
    let within = |(lo, hi): (f64, f64)| value >= lo && value <= hi;
    if within(good) {
        QualityTier::Good
    } else if within(moderate) {
        QualityTier::Moderate
    } else if within(poor) {
        QualityTier::Poor
    } else {
        QualityTier::Critical
    }
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
