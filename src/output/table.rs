use crossterm::style::{Color as AnsiColor, Stylize};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::alerts::{MetricBands, ThresholdSet};
use crate::analysis::MetricSummary;
use crate::models::{Alert, MetricKind, QualityTier, Room, Sensor};
use crate::store::DashboardStore;
use crate::utils::DateFormatter;

/// Rendering options shared by every table
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub colored: bool,
    pub decimal_places: u8,
    pub dates: DateFormatter,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            colored: false,
            decimal_places: 1,
            dates: DateFormatter::default(),
        }
    }
}

/// Trait for items that can be displayed as tables or JSON
pub trait OutputFormat {
    fn to_table(&self, options: &TableOptions) -> String;
    fn to_json(&self) -> Result<String, serde_json::Error>;
}

#[derive(Tabled, Serialize, Debug)]
pub struct RoomRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Room")]
    pub name: String,
    #[tabled(rename = "Building")]
    pub building: String,
    #[tabled(rename = "CO₂ (ppm)")]
    pub co2: String,
    #[tabled(rename = "PM2.5 (μg/m³)")]
    pub pm25: String,
    #[tabled(rename = "Temp (°C)")]
    pub temperature: String,
    #[tabled(rename = "Humidity (%)")]
    pub humidity: String,
    #[tabled(rename = "Overall")]
    pub overall: String,
    #[tabled(rename = "Updated")]
    pub updated: String,
}

impl RoomRow {
    pub fn from_room(room: &Room, options: &TableOptions) -> Self {
        let cell = |kind: MetricKind| match (room.value(kind), room.tier(kind)) {
            (Some(value), Some(tier)) => paint(
                &format!("{} {}", format_number(value, options.decimal_places), tier.as_str()),
                tier,
                options.colored,
            ),
            _ => "-".to_string(),
        };

        Self {
            id: room.id.clone(),
            name: room.name.clone(),
            building: room.building.clone(),
            co2: cell(MetricKind::Co2),
            pm25: cell(MetricKind::Pm25),
            temperature: cell(MetricKind::Temperature),
            humidity: cell(MetricKind::Humidity),
            overall: match room.overall_tier() {
                Some(tier) => paint(tier.label(), tier, options.colored),
                None => "Awaiting data".to_string(),
            },
            updated: options.dates.date_time(&room.last_updated),
        }
    }
}

#[derive(Tabled, Serialize, Debug)]
pub struct AlertRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Room")]
    pub room: String,
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Severity")]
    pub severity: String,
    #[tabled(rename = "Message")]
    pub message: String,
    #[tabled(rename = "Created")]
    pub created: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl AlertRow {
    pub fn from_alert(alert: &Alert, options: &TableOptions) -> Self {
        Self {
            id: alert.id.clone(),
            room: alert.room_name.clone(),
            metric: alert.metric.label().to_string(),
            severity: alert.severity.as_str().to_string(),
            message: alert.message.clone(),
            created: options.dates.date_time(&alert.created_at),
            status: if alert.resolved { "resolved" } else { "active" }.to_string(),
        }
    }
}

#[derive(Tabled, Serialize, Debug)]
pub struct SensorRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Room")]
    pub room: String,
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Last Contact")]
    pub last_contact: String,
}

impl SensorRow {
    pub fn from_sensor(sensor: &Sensor, room_name: &str, options: &TableOptions) -> Self {
        Self {
            id: sensor.id.clone(),
            room: room_name.to_string(),
            metric: sensor.kind.label().to_string(),
            status: sensor.status.as_str().to_string(),
            address: sensor.address.to_string(),
            last_contact: options.dates.date_time(&sensor.last_contact),
        }
    }
}

#[derive(Tabled, Serialize, Debug)]
pub struct ThresholdRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Good")]
    pub good: String,
    #[tabled(rename = "Moderate")]
    pub moderate: String,
    #[tabled(rename = "Poor")]
    pub poor: String,
}

impl ThresholdRow {
    pub fn from_bands(bands: &MetricBands) -> Self {
        let range = |min: f64, max: f64| {
            format!(
                "{} - {} {}",
                format_number(min, 1),
                format_number(max, 1),
                bands.metric.unit()
            )
        };
        Self {
            metric: bands.metric.label().to_string(),
            good: range(bands.good.min, bands.good.max),
            moderate: range(bands.moderate.min, bands.moderate.max),
            poor: range(bands.poor.min, bands.poor.max),
        }
    }
}

#[derive(Tabled, Serialize, Debug)]
pub struct SummaryRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Average")]
    pub average: String,
    #[tabled(rename = "Max")]
    pub max: String,
    #[tabled(rename = "Min")]
    pub min: String,
    #[tabled(rename = "Rooms")]
    pub rooms: usize,
}

impl SummaryRow {
    pub fn from_summary(summary: &MetricSummary, decimal_places: u8) -> Self {
        let unit = summary.metric.unit();
        Self {
            metric: summary.metric.label().to_string(),
            average: format!("{} {}", format_number(summary.average, decimal_places), unit),
            max: format!("{} {}", format_number(summary.max, decimal_places), unit),
            min: format!("{} {}", format_number(summary.min, decimal_places), unit),
            rooms: summary.rooms,
        }
    }
}

impl OutputFormat for Vec<Room> {
    fn to_table(&self, options: &TableOptions) -> String {
        if self.is_empty() {
            return "No rooms found.".to_string();
        }
        let rows: Vec<RoomRow> = self.iter().map(|r| RoomRow::from_room(r, options)).collect();
        render(rows, options)
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl OutputFormat for Vec<Alert> {
    fn to_table(&self, options: &TableOptions) -> String {
        if self.is_empty() {
            return "No alerts found.".to_string();
        }
        let rows: Vec<AlertRow> = self.iter().map(|a| AlertRow::from_alert(a, options)).collect();
        render(rows, options)
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl OutputFormat for ThresholdSet {
    fn to_table(&self, options: &TableOptions) -> String {
        let rows: Vec<ThresholdRow> = self.metrics.iter().map(ThresholdRow::from_bands).collect();
        render(rows, options)
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl OutputFormat for Vec<MetricSummary> {
    fn to_table(&self, options: &TableOptions) -> String {
        if self.is_empty() {
            return "No readings available.".to_string();
        }
        let rows: Vec<SummaryRow> = self
            .iter()
            .map(|s| SummaryRow::from_summary(s, options.decimal_places))
            .collect();
        render(rows, options)
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Sensor table; needs the store to resolve room names
pub fn sensors_table(store: &DashboardStore, sensors: &[&Sensor], options: &TableOptions) -> String {
    if sensors.is_empty() {
        return "No sensors found.".to_string();
    }
    let rows: Vec<SensorRow> = sensors
        .iter()
        .map(|s| {
            let room_name = store.room(&s.room_id).map(|r| r.name.as_str()).unwrap_or("-");
            SensorRow::from_sensor(s, room_name, options)
        })
        .collect();
    render(rows, options)
}

fn render<T: Tabled>(rows: Vec<T>, options: &TableOptions) -> String {
    let mut table = Table::new(rows);
    if options.colored {
        table.with(Style::rounded());
    } else {
        table.with(Style::ascii());
    }
    table.to_string()
}

/// Wrap text in the ANSI color of its tier
pub fn paint(text: &str, tier: QualityTier, colored: bool) -> String {
    if !colored {
        return text.to_string();
    }
    let color = match tier {
        QualityTier::Good => AnsiColor::Green,
        QualityTier::Moderate => AnsiColor::Yellow,
        QualityTier::Poor => AnsiColor::AnsiValue(208),
        QualityTier::Critical => AnsiColor::Red,
    };
    text.with(color).to_string()
}

/// Fixed decimals, with trailing zeros trimmed off whole numbers
pub fn format_number(value: f64, decimal_places: u8) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.*}", decimal_places as usize, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Readings;
    use chrono::{TimeZone, Utc};

    fn sample_room() -> Room {
        let mut room = Room::new(
            "1".into(),
            "Room 101".into(),
            "Building A".into(),
            Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap(),
        );
        room.current = Some(Readings::new(650.0, 15.0, 23.5, 55.0));
        room
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(650.0, 1), "650");
        assert_eq!(format_number(23.46, 1), "23.5");
        assert_eq!(format_number(23.46, 2), "23.46");
    }

    #[test]
    fn test_room_row_creation() {
        let row = RoomRow::from_room(&sample_room(), &TableOptions::default());
        assert_eq!(row.name, "Room 101");
        assert_eq!(row.co2, "650 moderate");
        assert_eq!(row.temperature, "23.5 good");
        assert_eq!(row.overall, "Moderate");
        assert_eq!(row.updated, "2024-03-15 14:30");
    }

    #[test]
    fn test_room_without_readings() {
        let mut room = sample_room();
        room.current = None;
        let row = RoomRow::from_room(&room, &TableOptions::default());
        assert_eq!(row.co2, "-");
        assert_eq!(row.overall, "Awaiting data");
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint("Good", QualityTier::Good, false), "Good");

        // crossterm honours NO_COLOR, in which case text comes back plain
        if std::env::var_os("NO_COLOR").is_none() {
            let critical = paint("Bad", QualityTier::Critical, true);
            assert!(critical.starts_with("\x1b["));
            assert!(critical.contains("Bad"));
            assert_ne!(critical, paint("Bad", QualityTier::Good, true));
        }
    }

    #[test]
    fn test_empty_tables() {
        let options = TableOptions::default();
        assert_eq!(Vec::<Room>::new().to_table(&options), "No rooms found.");
        assert_eq!(Vec::<Alert>::new().to_table(&options), "No alerts found.");
    }

    #[test]
    fn test_threshold_table_lists_every_metric() {
        let table = ThresholdSet::default().to_table(&TableOptions::default());
        assert!(table.contains("CO₂"));
        assert!(table.contains("PM2.5"));
        assert!(table.contains("20 - 25 °C"));
        assert!(table.contains("Humidity"));
    }

    #[test]
    fn test_room_json_output() {
        let json = vec![sample_room()].to_json().unwrap();
        assert!(json.contains("Room 101"));
        assert!(json.contains("650"));
    }
}
