use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::models::metric::MetricKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Active,
    Inactive,
    Maintenance,
}

impl SensorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorStatus::Active => "active",
            SensorStatus::Inactive => "inactive",
            SensorStatus::Maintenance => "maintenance",
        }
    }

    /// Cycle order used by the configuration screen
    pub fn next(&self) -> SensorStatus {
        match self {
            SensorStatus::Active => SensorStatus::Maintenance,
            SensorStatus::Maintenance => SensorStatus::Inactive,
            SensorStatus::Inactive => SensorStatus::Active,
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(SensorStatus::Active),
            "inactive" => Ok(SensorStatus::Inactive),
            "maintenance" => Ok(SensorStatus::Maintenance),
            other => anyhow::bail!(
                "Invalid sensor status: {}. Must be 'active', 'inactive', or 'maintenance'",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub kind: MetricKind,
    pub room_id: String,
    pub status: SensorStatus,
    pub address: IpAddr,
    pub last_contact: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SensorPatch {
    pub address: Option<IpAddr>,
    pub status: Option<SensorStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cycle_returns_to_start() {
        let start = SensorStatus::Active;
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Maintenance".parse::<SensorStatus>().unwrap(), SensorStatus::Maintenance);
        assert!("broken".parse::<SensorStatus>().is_err());
    }
}
