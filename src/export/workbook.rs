use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::ExportMeta;
use crate::models::{Alert, MetricKind, Room};
use crate::utils::DateFormatter;

pub const ROOMS_SHEET: &str = "rooms.csv";
pub const ALERTS_SHEET: &str = "alerts.csv";

/// Write the two-sheet workbook into `dir`, returning the sheet paths
pub fn write_workbook(
    dir: &Path,
    rooms: &[Room],
    alerts: &[Alert],
    meta: &ExportMeta,
    dates: &DateFormatter,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create workbook directory: {}", dir.display()))?;

    let rooms_path = dir.join(ROOMS_SHEET);
    fs::write(&rooms_path, rooms_sheet(rooms, meta, dates))
        .with_context(|| format!("Failed to write sheet: {}", rooms_path.display()))?;

    let alerts_path = dir.join(ALERTS_SHEET);
    fs::write(&alerts_path, alerts_sheet(alerts, meta, dates))
        .with_context(|| format!("Failed to write sheet: {}", alerts_path.display()))?;

    Ok(vec![rooms_path, alerts_path])
}

/// One row per room. Rooms awaiting data leave the reading cells empty.
pub fn rooms_sheet(rooms: &[Room], meta: &ExportMeta, dates: &DateFormatter) -> String {
    let mut csv_content = String::new();
    csv_content.push_str(
        "Room,Building,CO₂ (ppm),PM2.5 (μg/m³),Temperature (°C),Humidity (%),Last Updated,Snapshot\n",
    );

    for room in rooms {
        let reading = |kind: MetricKind| room.value(kind).map(|v| v.to_string()).unwrap_or_default();
        csv_content.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            csv_field(&room.name),
            csv_field(&room.building),
            reading(MetricKind::Co2),
            reading(MetricKind::Pm25),
            reading(MetricKind::Temperature),
            reading(MetricKind::Humidity),
            csv_field(&dates.date_time(&room.last_updated)),
            meta.snapshot_id
        ));
    }

    csv_content
}

/// Every alert, resolved or not, in stored order
pub fn alerts_sheet(alerts: &[Alert], meta: &ExportMeta, dates: &DateFormatter) -> String {
    let mut csv_content = String::new();
    csv_content.push_str("Room,Metric,Severity,Message,Created,Resolved,Snapshot\n");

    for alert in alerts {
        csv_content.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            csv_field(&alert.room_name),
            alert.metric.key(),
            alert.severity,
            csv_field(&alert.message),
            csv_field(&dates.date_time(&alert.created_at)),
            if alert.resolved { "yes" } else { "no" },
            meta.snapshot_id
        ));
    }

    csv_content
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Readings, Severity};
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap()
    }

    fn sample_alert(resolved: bool) -> Alert {
        Alert {
            id: "1".into(),
            room_id: "3".into(),
            room_name: "Lab 201".into(),
            metric: MetricKind::Co2,
            severity: Severity::High,
            message: "CO₂ above \"safe\" level".into(),
            created_at: now(),
            resolved,
        }
    }

    #[test]
    fn test_csv_field_escapes_quotes() {
        assert_eq!(csv_field("plain"), "\"plain\"");
        assert_eq!(csv_field("a \"b\", c"), "\"a \"\"b\"\", c\"");
    }

    #[test]
    fn test_rooms_sheet_rows() {
        let meta = ExportMeta::new(now());
        let mut measured = Room::new("1".into(), "Room 101".into(), "Building A".into(), now());
        measured.current = Some(Readings::new(650.0, 15.0, 23.5, 55.0));
        let pending = Room::new("7".into(), "Annex".into(), "Building C".into(), now());

        let sheet = rooms_sheet(&[measured, pending], &meta, &DateFormatter::default());
        let lines: Vec<&str> = sheet.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Room,Building,CO₂ (ppm)"));
        assert_eq!(
            lines[1],
            format!(
                "\"Room 101\",\"Building A\",650,15,23.5,55,\"2024-03-15 14:30\",{}",
                meta.snapshot_id
            )
        );
        assert!(lines[2].starts_with("\"Annex\",\"Building C\",,,,,"));
    }

    #[test]
    fn test_alerts_sheet_includes_resolved() {
        let meta = ExportMeta::new(now());
        let sheet = alerts_sheet(
            &[sample_alert(false), sample_alert(true)],
            &meta,
            &DateFormatter::default(),
        );
        let lines: Vec<&str> = sheet.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("\"CO₂ above \"\"safe\"\" level\""));
        assert!(lines[1].contains(",no,"));
        assert!(lines[2].contains(",yes,"));
    }

    #[test]
    fn test_write_workbook_creates_both_sheets() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("workbook");
        let files = write_workbook(
            &dir,
            &[],
            &[sample_alert(false)],
            &ExportMeta::new(now()),
            &DateFormatter::default(),
        )
        .unwrap();

        assert_eq!(files, vec![dir.join(ROOMS_SHEET), dir.join(ALERTS_SHEET)]);
        let alerts = fs::read_to_string(dir.join(ALERTS_SHEET)).unwrap();
        assert!(alerts.contains("Lab 201"));
    }
}
