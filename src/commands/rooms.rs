// Rooms command handlers
use anyhow::Result;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::commands::OutputContext;
use crate::models::{MetricKind, QualityTier, Room, Sensor};
use crate::output::{format_number, paint, sensors_table};
use crate::store::DashboardStore;

pub fn handle_rooms_command(
    store: &DashboardStore,
    building: Option<String>,
    tier: Option<QualityTier>,
    output: &OutputContext,
) -> Result<()> {
    println!("{}", rooms_report(store, building.as_deref(), tier, output)?);
    Ok(())
}

pub fn rooms_report(
    store: &DashboardStore,
    building: Option<&str>,
    tier: Option<QualityTier>,
    output: &OutputContext,
) -> Result<String> {
    let rooms: Vec<Room> = store
        .rooms()
        .iter()
        .filter(|r| building.is_none_or(|b| r.building.eq_ignore_ascii_case(b)))
        .filter(|r| tier.is_none_or(|t| r.overall_tier() == Some(t)))
        .cloned()
        .collect();
    tracing::debug!(count = rooms.len(), "rooms selected");
    output.render(&rooms)
}

#[derive(Serialize)]
struct RoomDetail<'a> {
    room: &'a Room,
    overall_tier: Option<QualityTier>,
    active_sensors: usize,
    total_sensors: usize,
    sensors: Vec<&'a Sensor>,
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "CO₂ (ppm)")]
    co2: String,
    #[tabled(rename = "PM2.5 (μg/m³)")]
    pm25: String,
    #[tabled(rename = "Temp (°C)")]
    temperature: String,
    #[tabled(rename = "Humidity (%)")]
    humidity: String,
}

pub fn handle_room_command(store: &DashboardStore, id: &str, output: &OutputContext) -> Result<()> {
    println!("{}", room_report(store, id, output)?);
    Ok(())
}

pub fn room_report(store: &DashboardStore, id: &str, output: &OutputContext) -> Result<String> {
    let Some(room) = store.room(id) else {
        anyhow::bail!("Room not found: {}", id);
    };
    let sensors: Vec<&Sensor> = store.sensors_for_room(id).collect();
    let (active_sensors, total_sensors) = store.sensor_counts(id);

    if output.json {
        let detail = RoomDetail {
            room,
            overall_tier: room.overall_tier(),
            active_sensors,
            total_sensors,
            sensors,
        };
        return Ok(serde_json::to_string_pretty(&detail)?);
    }

    let options = &output.table;
    let mut text = String::new();
    text.push_str(&format!("{} ({})\n", room.name, room.building));
    text.push_str(&format!(
        "Last updated: {}\n",
        options.dates.date_time(&room.last_updated)
    ));
    text.push_str(&format!("Sensors: {}/{} active\n\n", active_sensors, total_sensors));

    match room.current {
        Some(readings) => {
            for kind in MetricKind::ALL {
                let tier = readings.tier(kind);
                text.push_str(&format!(
                    "  {:<12} {:>10}  {}\n",
                    kind.label(),
                    kind.format_value(readings.value(kind)),
                    paint(tier.label(), tier, options.colored)
                ));
            }
            let overall = readings.overall_tier();
            text.push_str(&format!(
                "  {:<12} {:>10}  {}\n\n",
                "Overall",
                "",
                paint(overall.label(), overall, options.colored)
            ));
        }
        None => text.push_str("  Awaiting data\n\n"),
    }

    text.push_str(&sensors_table(store, &sensors, options));
    text.push('\n');

    if !room.trend.is_empty() {
        let rows: Vec<TrendRow> = room
            .trend
            .iter()
            .map(|p| TrendRow {
                time: options.dates.time(&p.time),
                co2: format_number(p.readings.co2, options.decimal_places),
                pm25: format_number(p.readings.pm25, options.decimal_places),
                temperature: format_number(p.readings.temperature, options.decimal_places),
                humidity: format_number(p.readings.humidity, options.decimal_places),
            })
            .collect();
        let mut table = Table::new(rows);
        if options.colored {
            table.with(Style::rounded());
        } else {
            table.with(Style::ascii());
        }
        text.push_str("\nLast 24 hours\n");
        text.push_str(&table.to_string());
    }

    Ok(text)
}
