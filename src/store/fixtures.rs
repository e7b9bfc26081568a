// Mock dataset for the dashboard session
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::net::{IpAddr, Ipv4Addr};

use crate::models::{
    Alert, MetricKind, Readings, Room, Sensor, SensorStatus, Severity, TrendPoint,
};

pub const TREND_POINTS: usize = 24;

/// Everything a fresh session starts with
#[derive(Debug, Clone)]
pub struct Fixture {
    pub rooms: Vec<Room>,
    pub sensors: Vec<Sensor>,
    pub alerts: Vec<Alert>,
}

/// Build the fixture. A seed of 0 draws trend noise from OS entropy.
pub fn generate(now: DateTime<Utc>, seed: u64) -> Fixture {
    let mut rng = if seed == 0 {
        StdRng::from_entropy()
    } else {
        StdRng::seed_from_u64(seed)
    };
    generate_with_rng(now, &mut rng)
}

pub fn generate_with_rng<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Fixture {
    let rooms = ROOMS
        .iter()
        .map(|fixture| Room {
            id: fixture.id.to_string(),
            name: fixture.name.to_string(),
            building: fixture.building.to_string(),
            current: Some(Readings::new(fixture.co2, fixture.pm25, fixture.temperature, fixture.humidity)),
            last_updated: now,
            trend: generate_trend(now, rng),
        })
        .collect();

    Fixture {
        rooms,
        sensors: generate_sensors(now),
        alerts: generate_alerts(now),
    }
}

/// 24 hourly samples ending at `now`, oldest first
pub fn generate_trend<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Vec<TrendPoint> {
    (0..TREND_POINTS)
        .rev()
        .map(|hours_ago| TrendPoint {
            time: now - Duration::hours(hours_ago as i64),
            readings: Readings::new(
                rng.gen_range(400.0..1200.0),
                rng.gen_range(0.0..50.0),
                rng.gen_range(20.0..28.0),
                rng.gen_range(40.0..80.0),
            ),
        })
        .collect()
}

struct FixtureRoom {
    id: &'static str,
    name: &'static str,
    building: &'static str,
    co2: f64,
    pm25: f64,
    temperature: f64,
    humidity: f64,
}

const ROOMS: [FixtureRoom; 6] = [
    FixtureRoom { id: "1", name: "Room 101", building: "Building A", co2: 650.0, pm25: 15.0, temperature: 23.5, humidity: 55.0 },
    FixtureRoom { id: "2", name: "Room 102", building: "Building A", co2: 890.0, pm25: 28.0, temperature: 24.8, humidity: 62.0 },
    FixtureRoom { id: "3", name: "Lab 201", building: "Building B", co2: 1150.0, pm25: 35.0, temperature: 22.1, humidity: 48.0 },
    FixtureRoom { id: "4", name: "Main Hall", building: "Building C", co2: 420.0, pm25: 8.0, temperature: 23.2, humidity: 58.0 },
    FixtureRoom { id: "5", name: "Room 301", building: "Building B", co2: 780.0, pm25: 22.0, temperature: 25.1, humidity: 65.0 },
    FixtureRoom { id: "6", name: "Conference Room", building: "Building C", co2: 520.0, pm25: 12.0, temperature: 22.8, humidity: 51.0 },
];

fn generate_sensors(now: DateTime<Utc>) -> Vec<Sensor> {
    let mut sensors = Vec::with_capacity(ROOMS.len() * MetricKind::ALL.len());
    let mut next_id = 1u32;

    for (room_index, room) in ROOMS.iter().enumerate() {
        for (metric_index, kind) in MetricKind::ALL.iter().enumerate() {
            let host = ((room_index + 1) * 100 + metric_index + 1) as u32;
            let (status, last_contact) = match next_id {
                4 => (SensorStatus::Maintenance, now - Duration::hours(2)),
                10 => (SensorStatus::Inactive, now - Duration::hours(24)),
                _ => (SensorStatus::Active, now),
            };
            sensors.push(Sensor {
                id: next_id.to_string(),
                kind: *kind,
                room_id: room.id.to_string(),
                status,
                address: fixture_address(host),
                last_contact,
            });
            next_id += 1;
        }
    }
    sensors
}

// Fixture hosts run 101..604; the fourth octet only holds 0..=255, so the
// hundreds digit moves into the third octet: room 3 sensor 2 -> 192.168.3.2
fn fixture_address(host: u32) -> IpAddr {
    let room = (host / 100) as u8;
    let sensor = (host % 100) as u8;
    IpAddr::V4(Ipv4Addr::new(192, 168, room, sensor))
}

fn generate_alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![
        Alert {
            id: "1".to_string(),
            room_id: "3".to_string(),
            room_name: "Lab 201".to_string(),
            metric: MetricKind::Co2,
            severity: Severity::Critical,
            message: "Critical CO₂ level: 1150 ppm".to_string(),
            created_at: now - Duration::minutes(10),
            resolved: false,
        },
        Alert {
            id: "2".to_string(),
            room_id: "2".to_string(),
            room_name: "Room 102".to_string(),
            metric: MetricKind::Pm25,
            severity: Severity::Medium,
            message: "Elevated PM2.5: 28 μg/m³".to_string(),
            created_at: now - Duration::minutes(25),
            resolved: false,
        },
        Alert {
            id: "3".to_string(),
            room_id: "5".to_string(),
            room_name: "Room 301".to_string(),
            metric: MetricKind::Humidity,
            severity: Severity::Low,
            message: "High humidity: 65%".to_string(),
            created_at: now - Duration::minutes(45),
            resolved: false,
        },
        Alert {
            id: "4".to_string(),
            room_id: "1".to_string(),
            room_name: "Room 101".to_string(),
            metric: MetricKind::Temperature,
            severity: Severity::Low,
            message: "Temperature checked".to_string(),
            created_at: now - Duration::hours(2),
            resolved: true,
        },
    ]
}
