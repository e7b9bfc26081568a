use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::alerts::{AlertCounts, ThresholdSet};
use crate::export::ExportMeta;
use crate::models::{Alert, Room, Sensor};
use crate::store::DashboardStore;

/// Full JSON snapshot of the dashboard session
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub version: &'static str,
    pub snapshot_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub alert_counts: AlertCounts,
    pub rooms: &'a [Room],
    pub sensors: &'a [Sensor],
    pub alerts: &'a [Alert],
    pub thresholds: &'a ThresholdSet,
}

impl<'a> Snapshot<'a> {
    pub fn new(store: &'a DashboardStore, meta: &ExportMeta) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            snapshot_id: meta.snapshot_id,
            generated_at: meta.generated_at,
            alert_counts: store.alert_counts(),
            rooms: store.rooms(),
            sensors: store.sensors(),
            alerts: store.alerts(),
            thresholds: store.thresholds(),
        }
    }
}

pub fn write_snapshot(path: &Path, store: &DashboardStore, meta: &ExportMeta) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create export directory: {}", parent.display()))?;
        }
    }

    let json_content = serde_json::to_string_pretty(&Snapshot::new(store, meta))?;
    fs::write(path, json_content)
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_contents() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap();
        let store = DashboardStore::with_fixtures(now, 3);
        let meta = ExportMeta::new(now);

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        write_snapshot(&path, &store, &meta).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["snapshot_id"], meta.snapshot_id.to_string());
        assert_eq!(value["rooms"].as_array().unwrap().len(), 6);
        assert_eq!(value["sensors"].as_array().unwrap().len(), 24);
        assert_eq!(value["alerts"].as_array().unwrap().len(), 4);
        assert_eq!(value["thresholds"]["metrics"].as_array().unwrap().len(), 4);
    }
}
