use chrono::{DateTime, Utc};
use std::net::{IpAddr, Ipv4Addr};

use crate::alerts::{ranked, AlertCounts, AlertFilter, ThresholdError, ThresholdSet};
use crate::models::{Alert, MetricKind, Room, RoomPatch, Sensor, SensorPatch, SensorStatus};
use crate::store::fixtures::{self, Fixture};

/// Address given to sensors created from the configuration screen
pub const DEFAULT_SENSOR_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 100));

/// Session state of the dashboard: the room, sensor and alert collections
/// plus the display thresholds. Every mutation goes through a method here.
#[derive(Debug, Clone, Default)]
pub struct DashboardStore {
    rooms: Vec<Room>,
    sensors: Vec<Sensor>,
    alerts: Vec<Alert>,
    thresholds: ThresholdSet,
}

impl DashboardStore {
    pub fn new(rooms: Vec<Room>, sensors: Vec<Sensor>, alerts: Vec<Alert>) -> Self {
        Self {
            rooms,
            sensors,
            alerts,
            thresholds: ThresholdSet::default(),
        }
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        Self::new(fixture.rooms, fixture.sensors, fixture.alerts)
    }

    /// Fresh session seeded with the mock dataset
    pub fn with_fixtures(now: DateTime<Utc>, seed: u64) -> Self {
        let store = Self::from_fixture(fixtures::generate(now, seed));
        tracing::debug!(
            rooms = store.rooms.len(),
            sensors = store.sensors.len(),
            alerts = store.alerts.len(),
            "generated fixture dataset"
        );
        store
    }

    // ---- rooms ----

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn add_room(&mut self, name: &str, building: &str) -> String {
        let id = next_id(self.rooms.iter().map(|r| r.id.as_str()));
        self.rooms.push(Room::new(
            id.clone(),
            name.to_string(),
            building.to_string(),
            Utc::now(),
        ));
        tracing::info!(room_id = %id, name, "room added");
        id
    }

    pub fn update_room(&mut self, id: &str, patch: RoomPatch) -> bool {
        let Some(room) = self.rooms.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        if let Some(name) = patch.name {
            room.name = name;
        }
        if let Some(building) = patch.building {
            room.building = building;
        }
        true
    }

    /// Remove a room and its sensors. Alerts keep their cached room name.
    pub fn delete_room(&mut self, id: &str) -> Option<Room> {
        let index = self.rooms.iter().position(|r| r.id == id)?;
        let room = self.rooms.remove(index);
        let before = self.sensors.len();
        self.sensors.retain(|s| s.room_id != id);
        tracing::info!(
            room_id = id,
            sensors_removed = before - self.sensors.len(),
            "room deleted"
        );
        Some(room)
    }

    // ---- sensors ----

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn sensor(&self, id: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.id == id)
    }

    pub fn sensors_for_room<'a>(&'a self, room_id: &'a str) -> impl Iterator<Item = &'a Sensor> + 'a {
        self.sensors.iter().filter(move |s| s.room_id == room_id)
    }

    /// `(active, total)` sensor counts for a room
    pub fn sensor_counts(&self, room_id: &str) -> (usize, usize) {
        self.sensors_for_room(room_id).fold((0, 0), |(active, total), s| {
            let active = active + usize::from(s.status == SensorStatus::Active);
            (active, total + 1)
        })
    }

    /// Attach a new active sensor to an existing room. Unknown rooms are a no-op.
    pub fn add_sensor(&mut self, room_id: &str, kind: MetricKind) -> Option<String> {
        self.room(room_id)?;
        let id = next_id(self.sensors.iter().map(|s| s.id.as_str()));
        self.sensors.push(Sensor {
            id: id.clone(),
            kind,
            room_id: room_id.to_string(),
            status: SensorStatus::Active,
            address: DEFAULT_SENSOR_ADDRESS,
            last_contact: Utc::now(),
        });
        tracing::info!(sensor_id = %id, room_id, kind = kind.key(), "sensor added");
        Some(id)
    }

    pub fn update_sensor(&mut self, id: &str, patch: SensorPatch) -> bool {
        let Some(sensor) = self.sensors.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        if let Some(address) = patch.address {
            sensor.address = address;
        }
        if let Some(status) = patch.status {
            sensor.status = status;
        }
        sensor.last_contact = Utc::now();
        true
    }

    pub fn delete_sensor(&mut self, id: &str) -> Option<Sensor> {
        let index = self.sensors.iter().position(|s| s.id == id)?;
        tracing::info!(sensor_id = id, "sensor deleted");
        Some(self.sensors.remove(index))
    }

    // ---- alerts ----

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn ranked_alerts(&self, filter: AlertFilter) -> Vec<&Alert> {
        ranked(&self.alerts, filter)
    }

    pub fn alert_counts(&self) -> AlertCounts {
        AlertCounts::from_alerts(&self.alerts)
    }

    pub fn active_alert_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.resolved).count()
    }

    /// Mark an alert resolved. Unknown ids and already-resolved alerts are left as is.
    pub fn resolve_alert(&mut self, id: &str) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                let changed = alert.resolve();
                tracing::debug!(alert_id = id, changed, "resolve alert");
                changed
            }
            None => {
                tracing::debug!(alert_id = id, "resolve requested for unknown alert");
                false
            }
        }
    }

    // ---- thresholds ----

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    pub fn set_threshold(&mut self, key: &str, value: &str) -> Result<(), ThresholdError> {
        self.thresholds.set_value(key, value)?;
        tracing::info!(key, value, "display threshold updated");
        Ok(())
    }
}

/// Next numeric identifier after the largest existing one
fn next_id<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let max = ids.filter_map(|id| id.parse::<u64>().ok()).max().unwrap_or(0);
    (max + 1).to_string()
}
