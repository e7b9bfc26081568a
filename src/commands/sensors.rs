// Sensors command handler
use anyhow::Result;

use crate::commands::OutputContext;
use crate::models::{Sensor, SensorStatus};
use crate::output::sensors_table;
use crate::store::DashboardStore;

pub fn handle_sensors_command(
    store: &DashboardStore,
    room: Option<String>,
    status: Option<SensorStatus>,
    output: &OutputContext,
) -> Result<()> {
    println!("{}", sensors_report(store, room.as_deref(), status, output)?);
    Ok(())
}

pub fn sensors_report(
    store: &DashboardStore,
    room: Option<&str>,
    status: Option<SensorStatus>,
    output: &OutputContext,
) -> Result<String> {
    if let Some(room_id) = room {
        if store.room(room_id).is_none() {
            anyhow::bail!("Room not found: {}", room_id);
        }
    }

    let sensors: Vec<&Sensor> = store
        .sensors()
        .iter()
        .filter(|s| room.is_none_or(|id| s.room_id == id))
        .filter(|s| status.is_none_or(|st| s.status == st))
        .collect();

    if output.json {
        return Ok(serde_json::to_string_pretty(&sensors)?);
    }
    Ok(sensors_table(store, &sensors, &output.table))
}
