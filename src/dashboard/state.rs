// Dashboard state and key handling, independent of the terminal
use chrono::{DateTime, Utc};
use crossterm::event::KeyCode;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::alerts::AlertFilter;
use crate::auth::{AccessGate, Session, LOGIN_FAILED_MESSAGE};
use crate::export::{export_store, ExportFormat};
use crate::models::{Alert, MetricKind, Room, RoomPatch, Sensor, SensorPatch};
use crate::store::DashboardStore;
use crate::utils::DateFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Monitoring,
    Alerts,
    Analysis,
    Config,
}

impl Panel {
    pub const ALL: [Panel; 4] = [Panel::Monitoring, Panel::Alerts, Panel::Analysis, Panel::Config];

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Monitoring => "Monitoring",
            Panel::Alerts => "Alerts",
            Panel::Analysis => "Analysis",
            Panel::Config => "Configuration",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Panel::Monitoring => 0,
            Panel::Alerts => 1,
            Panel::Analysis => 2,
            Panel::Config => 3,
        }
    }

    fn from_index(index: usize) -> Panel {
        Panel::ALL[index % Panel::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigTab {
    Rooms,
    Sensors,
    Thresholds,
}

impl ConfigTab {
    pub const ALL: [ConfigTab; 3] = [ConfigTab::Rooms, ConfigTab::Sensors, ConfigTab::Thresholds];

    pub fn title(&self) -> &'static str {
        match self {
            ConfigTab::Rooms => "Rooms",
            ConfigTab::Sensors => "Sensors",
            ConfigTab::Thresholds => "Thresholds",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ConfigTab::Rooms => 0,
            ConfigTab::Sensors => 1,
            ConfigTab::Thresholds => 2,
        }
    }

    fn next(&self) -> ConfigTab {
        ConfigTab::ALL[(self.index() + 1) % ConfigTab::ALL.len()]
    }

    fn prev(&self) -> ConfigTab {
        ConfigTab::ALL[(self.index() + ConfigTab::ALL.len() - 1) % ConfigTab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
}

/// What a text prompt will do with its buffer on Enter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    NewRoomName,
    NewRoomBuilding { name: String },
    RoomName { room_id: String },
    RoomBuilding { room_id: String },
    SensorAddress { sensor_id: String },
    Threshold,
}

impl InputPurpose {
    pub fn title(&self) -> &'static str {
        match self {
            InputPurpose::NewRoomName => "New room: name",
            InputPurpose::NewRoomBuilding { .. } => "New room: building",
            InputPurpose::RoomName { .. } => "Rename room",
            InputPurpose::RoomBuilding { .. } => "Edit building",
            InputPurpose::SensorAddress { .. } => "Sensor IP address",
            InputPurpose::Threshold => "Threshold (metric.band.min|max=value)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputPrompt {
    pub purpose: InputPurpose,
    pub buffer: String,
    pub error: Option<String>,
}

impl InputPrompt {
    fn new(purpose: InputPurpose, buffer: impl Into<String>) -> Self {
        Self {
            purpose,
            buffer: buffer.into(),
            error: None,
        }
    }
}

/// A deletion waiting for y/n
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Room { id: String, name: String },
    Sensor { id: String },
}

impl PendingDelete {
    pub fn message(&self) -> String {
        match self {
            PendingDelete::Room { name, .. } => {
                format!("Delete room '{}'? All of its sensors will be deleted too.", name)
            }
            PendingDelete::Sensor { id } => format!("Delete sensor #{}?", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
    Export,
}

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub refresh_interval: Duration,
    pub tick_rate: Duration,
    pub export_dir: PathBuf,
    pub export_format: ExportFormat,
    pub dates: DateFormatter,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            tick_rate: Duration::from_millis(200),
            export_dir: PathBuf::from("."),
            export_format: ExportFormat::Report,
            dates: DateFormatter::default(),
        }
    }
}

pub struct DashboardState {
    pub store: DashboardStore,
    gate: Box<dyn AccessGate>,
    pub session: Option<Session>,
    pub login: LoginForm,
    pub panel: Panel,
    pub config_tab: ConfigTab,
    pub alert_filter: AlertFilter,
    pub analysis_metric: MetricKind,
    pub selected_room: usize,
    pub selected_alert: usize,
    pub selected_sensor: usize,
    pub selected_threshold: usize,
    pub input: Option<InputPrompt>,
    pub confirm: Option<PendingDelete>,
    pub show_help: bool,
    pub status: Option<String>,
    pub last_update: DateTime<Utc>,
    pub settings: DashboardSettings,
}

impl DashboardState {
    pub fn new(
        store: DashboardStore,
        gate: Box<dyn AccessGate>,
        settings: DashboardSettings,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            store,
            gate,
            session: None,
            login: LoginForm::default(),
            panel: Panel::Monitoring,
            config_tab: ConfigTab::Rooms,
            alert_filter: AlertFilter::default(),
            analysis_metric: MetricKind::Co2,
            selected_room: 0,
            selected_alert: 0,
            selected_sensor: 0,
            selected_threshold: 0,
            input: None,
            confirm: None,
            show_help: false,
            status: None,
            last_update: now,
            settings,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Check credentials against the gate. A failure leaves everything but
    /// the login error untouched.
    pub fn try_login(&mut self, username: &str, password: &str) -> bool {
        match self.gate.login(username, password) {
            Ok(session) => {
                tracing::info!(user = %session.username, "dashboard login");
                self.status = Some(format!("Signed in as {}", session.username));
                self.session = Some(session);
                self.login = LoginForm::default();
                self.panel = Panel::Monitoring;
                true
            }
            Err(_) => {
                self.login.error = Some(LOGIN_FAILED_MESSAGE.to_string());
                false
            }
        }
    }

    /// Drop the session and return to a fresh login screen on the monitoring panel
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(user = %session.username, "dashboard logout");
        }
        self.login = LoginForm::default();
        self.panel = Panel::Monitoring;
        self.config_tab = ConfigTab::Rooms;
        self.input = None;
        self.confirm = None;
        self.show_help = false;
        self.status = None;
    }

    pub fn refresh_clock(&mut self, now: DateTime<Utc>) {
        self.last_update = now;
    }

    pub fn visible_alerts(&self) -> Vec<&Alert> {
        self.store.ranked_alerts(self.alert_filter)
    }

    pub fn selected_room(&self) -> Option<&Room> {
        self.store.rooms().get(self.selected_room)
    }

    pub fn selected_sensor(&self) -> Option<&Sensor> {
        self.store.sensors().get(self.selected_sensor)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        if !self.is_logged_in() {
            return self.handle_login_key(code);
        }
        if self.confirm.is_some() {
            self.handle_confirm_key(code);
            return Action::Continue;
        }
        if self.input.is_some() {
            self.handle_input_key(code);
            return Action::Continue;
        }
        if self.show_help {
            if matches!(code, KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return Action::Continue;
        }
        self.handle_main_key(code)
    }

    fn handle_login_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.focus = match self.login.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            KeyCode::Enter => {
                let (username, password) = (self.login.username.clone(), self.login.password.clone());
                self.try_login(&username, &password);
            }
            KeyCode::Backspace => {
                self.focused_login_field().pop();
            }
            KeyCode::Char(c) => self.focused_login_field().push(c),
            _ => {}
        }
        Action::Continue
    }

    fn focused_login_field(&mut self) -> &mut String {
        match self.login.focus {
            LoginField::Username => &mut self.login.username,
            LoginField::Password => &mut self.login.password,
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        let Some(pending) = self.confirm.take() else {
            return;
        };
        if !matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            self.status = Some("Deletion cancelled".to_string());
            return;
        }

        self.status = Some(match pending {
            PendingDelete::Room { id, name } => match self.store.delete_room(&id) {
                Some(_) => format!("Room '{}' deleted", name),
                None => format!("Room #{} no longer exists", id),
            },
            PendingDelete::Sensor { id } => match self.store.delete_sensor(&id) {
                Some(_) => format!("Sensor #{} deleted", id),
                None => format!("Sensor #{} no longer exists", id),
            },
        });
        self.clamp_selections();
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        let Some(prompt) = self.input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => self.input = None,
            KeyCode::Backspace => {
                prompt.buffer.pop();
            }
            KeyCode::Char(c) => prompt.buffer.push(c),
            KeyCode::Enter => self.submit_input(),
            _ => {}
        }
    }

    fn submit_input(&mut self) {
        let Some(prompt) = self.input.take() else {
            return;
        };
        let value = prompt.buffer.trim().to_string();

        let outcome: Result<Option<InputPrompt>, String> = match &prompt.purpose {
            InputPurpose::NewRoomName => {
                if value.is_empty() {
                    Err("Name cannot be empty".to_string())
                } else {
                    Ok(Some(InputPrompt::new(
                        InputPurpose::NewRoomBuilding { name: value },
                        "",
                    )))
                }
            }
            InputPurpose::NewRoomBuilding { name } => {
                if value.is_empty() {
                    Err("Building cannot be empty".to_string())
                } else {
                    let id = self.store.add_room(name, &value);
                    self.selected_room = self.store.rooms().len().saturating_sub(1);
                    self.status = Some(format!("Room #{} '{}' added", id, name));
                    Ok(None)
                }
            }
            InputPurpose::RoomName { room_id } => {
                if value.is_empty() {
                    Err("Name cannot be empty".to_string())
                } else {
                    let patch = RoomPatch {
                        name: Some(value),
                        ..Default::default()
                    };
                    self.store.update_room(room_id, patch);
                    self.status = Some("Room updated".to_string());
                    Ok(None)
                }
            }
            InputPurpose::RoomBuilding { room_id } => {
                if value.is_empty() {
                    Err("Building cannot be empty".to_string())
                } else {
                    let patch = RoomPatch {
                        building: Some(value),
                        ..Default::default()
                    };
                    self.store.update_room(room_id, patch);
                    self.status = Some("Room updated".to_string());
                    Ok(None)
                }
            }
            InputPurpose::SensorAddress { sensor_id } => match value.parse::<IpAddr>() {
                Ok(address) => {
                    let patch = SensorPatch {
                        address: Some(address),
                        ..Default::default()
                    };
                    self.store.update_sensor(sensor_id, patch);
                    self.status = Some(format!("Sensor #{} now at {}", sensor_id, address));
                    Ok(None)
                }
                Err(_) => Err(format!("Invalid IP address: {}", value)),
            },
            InputPurpose::Threshold => match value.split_once('=') {
                Some((key, raw)) => match self.store.set_threshold(key.trim(), raw.trim()) {
                    Ok(()) => {
                        self.status = Some(format!("Threshold {} set to {}", key.trim(), raw.trim()));
                        Ok(None)
                    }
                    Err(e) => Err(e.to_string()),
                },
                None => Err("Expected key=value, e.g. co2.good.max=650".to_string()),
            },
        };

        match outcome {
            Ok(next) => self.input = next,
            Err(error) => {
                self.input = Some(InputPrompt {
                    error: Some(error),
                    ..prompt
                });
            }
        }
    }

    fn handle_main_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char('e') if self.panel != Panel::Config => return Action::Export,
            KeyCode::Char('o') => self.logout(),
            KeyCode::Char('h') | KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char(c @ '1'..='4') => {
                self.panel = Panel::from_index(c as usize - '1' as usize);
            }
            KeyCode::Tab => self.panel = Panel::from_index(self.panel.index() + 1),
            KeyCode::BackTab => self.panel = Panel::from_index(self.panel.index() + Panel::ALL.len() - 1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            other => match self.panel {
                Panel::Monitoring => {}
                Panel::Alerts => self.handle_alerts_key(other),
                Panel::Analysis => {
                    if other == KeyCode::Char('m') {
                        self.analysis_metric = self.analysis_metric.next();
                    }
                }
                Panel::Config => self.handle_config_key(other),
            },
        }
        Action::Continue
    }

    fn handle_alerts_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('f') => {
                self.alert_filter = self.alert_filter.next();
                self.selected_alert = 0;
            }
            KeyCode::Char('r') => {
                let Some(id) = self
                    .visible_alerts()
                    .get(self.selected_alert)
                    .map(|a| a.id.clone())
                else {
                    return;
                };
                self.status = Some(if self.store.resolve_alert(&id) {
                    format!("Alert #{} resolved", id)
                } else {
                    format!("Alert #{} is already resolved", id)
                });
                self.clamp_selections();
            }
            _ => {}
        }
    }

    fn handle_config_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => self.config_tab = self.config_tab.prev(),
            KeyCode::Right => self.config_tab = self.config_tab.next(),
            other => match self.config_tab {
                ConfigTab::Rooms => self.handle_rooms_key(other),
                ConfigTab::Sensors => self.handle_sensors_key(other),
                ConfigTab::Thresholds => {
                    if matches!(other, KeyCode::Char('e') | KeyCode::Enter) {
                        let metric = self
                            .store
                            .thresholds()
                            .metrics
                            .get(self.selected_threshold)
                            .map(|b| b.metric)
                            .unwrap_or(MetricKind::Co2);
                        self.input = Some(InputPrompt::new(
                            InputPurpose::Threshold,
                            format!("{}.good.max=", metric.key()),
                        ));
                    }
                }
            },
        }
    }

    fn handle_rooms_key(&mut self, code: KeyCode) {
        if code == KeyCode::Char('a') {
            self.input = Some(InputPrompt::new(InputPurpose::NewRoomName, ""));
            return;
        }
        let Some(room) = self.selected_room() else {
            return;
        };
        let (room_id, name, building) = (room.id.clone(), room.name.clone(), room.building.clone());

        match code {
            KeyCode::Char('n') => {
                self.input = Some(InputPrompt::new(InputPurpose::RoomName { room_id }, name));
            }
            KeyCode::Char('b') => {
                self.input = Some(InputPrompt::new(InputPurpose::RoomBuilding { room_id }, building));
            }
            KeyCode::Char('s') => {
                if let Some(sensor_id) = self.store.add_sensor(&room_id, MetricKind::Co2) {
                    self.status = Some(format!("Sensor #{} added to {}", sensor_id, name));
                }
            }
            KeyCode::Char('d') => {
                self.confirm = Some(PendingDelete::Room { id: room_id, name });
            }
            _ => {}
        }
    }

    fn handle_sensors_key(&mut self, code: KeyCode) {
        let Some(sensor) = self.selected_sensor() else {
            return;
        };
        let (sensor_id, address, status) = (sensor.id.clone(), sensor.address, sensor.status);

        match code {
            KeyCode::Char('i') => {
                self.input = Some(InputPrompt::new(
                    InputPurpose::SensorAddress { sensor_id },
                    address.to_string(),
                ));
            }
            KeyCode::Char('t') => {
                let next = status.next();
                let patch = SensorPatch {
                    status: Some(next),
                    ..Default::default()
                };
                self.store.update_sensor(&sensor_id, patch);
                self.status = Some(format!("Sensor #{} is now {}", sensor_id, next));
            }
            KeyCode::Char('d') => self.confirm = Some(PendingDelete::Sensor { id: sensor_id }),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.selection_len();
        if let Some(index) = self.selection_mut() {
            *index = step(*index, len, delta);
        }
    }

    fn selection_len(&self) -> usize {
        match self.panel {
            Panel::Monitoring => self.store.rooms().len(),
            Panel::Alerts => self.visible_alerts().len(),
            Panel::Analysis => 0,
            Panel::Config => match self.config_tab {
                ConfigTab::Rooms => self.store.rooms().len(),
                ConfigTab::Sensors => self.store.sensors().len(),
                ConfigTab::Thresholds => self.store.thresholds().metrics.len(),
            },
        }
    }

    fn selection_mut(&mut self) -> Option<&mut usize> {
        match self.panel {
            Panel::Monitoring => Some(&mut self.selected_room),
            Panel::Alerts => Some(&mut self.selected_alert),
            Panel::Analysis => None,
            Panel::Config => Some(match self.config_tab {
                ConfigTab::Rooms => &mut self.selected_room,
                ConfigTab::Sensors => &mut self.selected_sensor,
                ConfigTab::Thresholds => &mut self.selected_threshold,
            }),
        }
    }

    fn clamp_selections(&mut self) {
        let rooms = self.store.rooms().len();
        let sensors = self.store.sensors().len();
        let alerts = self.visible_alerts().len();
        self.selected_room = step(self.selected_room, rooms, 0);
        self.selected_sensor = step(self.selected_sensor, sensors, 0);
        self.selected_alert = step(self.selected_alert, alerts, 0);
    }

    /// Write a snapshot in the configured format; the result lands in the status line
    pub fn export_snapshot(&mut self, now: DateTime<Utc>) {
        let format = self.settings.export_format;
        let target = format.default_target(&self.settings.export_dir);
        self.status = Some(
            match export_store(&self.store, format, &target, &self.settings.dates, now) {
                Ok(outcome) => format!("Exported {} to {}", outcome.format, target.display()),
                Err(e) => {
                    tracing::error!(error = %e, "export failed");
                    format!("Export failed: {}", e)
                }
            },
        );
    }
}

fn step(index: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as isize + delta).clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StubAccessGate;
    use crate::models::SensorStatus;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap()
    }

    fn logged_out() -> DashboardState {
        DashboardState::new(
            DashboardStore::with_fixtures(now(), 9),
            Box::new(StubAccessGate::default()),
            DashboardSettings::default(),
            now(),
        )
    }

    fn logged_in() -> DashboardState {
        let mut state = logged_out();
        assert!(state.try_login("Admin", "Admin"));
        state
    }

    fn type_text(state: &mut DashboardState, text: &str) {
        for c in text.chars() {
            state.handle_key(KeyCode::Char(c));
        }
    }

    fn clear_input(state: &mut DashboardState) {
        if let Some(prompt) = state.input.as_mut() {
            prompt.buffer.clear();
        }
    }

    #[test]
    fn test_login_through_keys() {
        let mut state = logged_out();
        type_text(&mut state, "Admin");
        state.handle_key(KeyCode::Tab);
        type_text(&mut state, "wrong");
        state.handle_key(KeyCode::Enter);
        assert!(!state.is_logged_in());
        assert_eq!(state.login.error.as_deref(), Some(LOGIN_FAILED_MESSAGE));
        assert_eq!(state.login.username, "Admin");

        for _ in 0.."wrong".len() {
            state.handle_key(KeyCode::Backspace);
        }
        type_text(&mut state, "Admin");
        state.handle_key(KeyCode::Enter);
        assert!(state.is_logged_in());
        assert!(state.login.password.is_empty());
    }

    #[test]
    fn test_keys_before_login_do_not_touch_store() {
        let mut state = logged_out();
        state.handle_key(KeyCode::Char('2'));
        state.handle_key(KeyCode::Char('r'));
        assert_eq!(state.panel, Panel::Monitoring);
        assert_eq!(state.store.active_alert_count(), 3);
        assert_eq!(state.handle_key(KeyCode::Esc), Action::Quit);
    }

    #[test]
    fn test_tab_switching() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('3'));
        assert_eq!(state.panel, Panel::Analysis);
        state.handle_key(KeyCode::Tab);
        assert_eq!(state.panel, Panel::Config);
        state.handle_key(KeyCode::Tab);
        assert_eq!(state.panel, Panel::Monitoring);
        state.handle_key(KeyCode::BackTab);
        assert_eq!(state.panel, Panel::Config);
    }

    #[test]
    fn test_logout_returns_to_monitoring() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('4'));
        state.handle_key(KeyCode::Char('o'));
        assert!(!state.is_logged_in());
        assert_eq!(state.panel, Panel::Monitoring);

        state.try_login("Admin", "Admin");
        assert_eq!(state.panel, Panel::Monitoring);
    }

    #[test]
    fn test_resolve_selected_alert() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('2'));
        state.handle_key(KeyCode::Down);
        state.handle_key(KeyCode::Char('r'));

        assert_eq!(state.store.active_alert_count(), 2);
        let resolved: Vec<&str> = state
            .store
            .alerts()
            .iter()
            .filter(|a| a.resolved)
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(resolved, vec!["2", "4"]);
        assert_eq!(state.visible_alerts().len(), 2);
        assert_eq!(state.selected_alert, 1);
    }

    #[test]
    fn test_alert_filter_cycles() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('2'));
        state.handle_key(KeyCode::Char('f'));
        assert_eq!(state.alert_filter, AlertFilter::Resolved);
        assert_eq!(state.visible_alerts().len(), 1);
        state.handle_key(KeyCode::Char('f'));
        assert_eq!(state.visible_alerts().len(), 4);
    }

    #[test]
    fn test_analysis_metric_cycles() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('3'));
        state.handle_key(KeyCode::Char('m'));
        assert_eq!(state.analysis_metric, MetricKind::Pm25);
    }

    #[test]
    fn test_delete_room_confirmed() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('4'));
        state.handle_key(KeyCode::Char('d'));
        assert!(matches!(state.confirm, Some(PendingDelete::Room { ref id, .. }) if id == "1"));

        state.handle_key(KeyCode::Char('y'));
        assert!(state.confirm.is_none());
        assert!(state.store.room("1").is_none());
        assert_eq!(state.store.sensors().len(), 20);
        assert_eq!(state.store.alerts().len(), 4);
    }

    #[test]
    fn test_delete_room_cancelled() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('4'));
        state.handle_key(KeyCode::Char('d'));
        state.handle_key(KeyCode::Char('n'));
        assert!(state.confirm.is_none());
        assert_eq!(state.store.rooms().len(), 6);
        assert_eq!(state.status.as_deref(), Some("Deletion cancelled"));
    }

    #[test]
    fn test_delete_last_sensor_clamps_selection() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('4'));
        state.handle_key(KeyCode::Right);
        assert_eq!(state.config_tab, ConfigTab::Sensors);
        for _ in 0..30 {
            state.handle_key(KeyCode::Down);
        }
        assert_eq!(state.selected_sensor, 23);
        state.handle_key(KeyCode::Char('d'));
        state.handle_key(KeyCode::Char('y'));
        assert_eq!(state.store.sensors().len(), 23);
        assert_eq!(state.selected_sensor, 22);
    }

    #[test]
    fn test_add_room_two_step_prompt() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('4'));
        state.handle_key(KeyCode::Char('a'));
        state.handle_key(KeyCode::Enter);
        assert_eq!(
            state.input.as_ref().and_then(|p| p.error.as_deref()),
            Some("Name cannot be empty")
        );

        type_text(&mut state, "Annex");
        state.handle_key(KeyCode::Enter);
        type_text(&mut state, "Building D");
        state.handle_key(KeyCode::Enter);

        assert!(state.input.is_none());
        let room = state.store.room("7").unwrap();
        assert_eq!(room.name, "Annex");
        assert_eq!(room.building, "Building D");
        assert!(room.current.is_none());
        assert_eq!(state.selected_room, 6);
    }

    #[test]
    fn test_rename_room_and_add_sensor() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('4'));
        state.handle_key(KeyCode::Char('n'));
        clear_input(&mut state);
        type_text(&mut state, "Room 101B");
        state.handle_key(KeyCode::Enter);
        assert_eq!(state.store.room("1").unwrap().name, "Room 101B");

        state.handle_key(KeyCode::Char('s'));
        let sensor = state.store.sensor("25").unwrap();
        assert_eq!(sensor.room_id, "1");
        assert_eq!(sensor.kind, MetricKind::Co2);
    }

    #[test]
    fn test_sensor_status_and_address() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('4'));
        state.handle_key(KeyCode::Right);
        state.handle_key(KeyCode::Char('t'));
        assert_eq!(state.store.sensor("1").unwrap().status, SensorStatus::Maintenance);

        state.handle_key(KeyCode::Char('i'));
        clear_input(&mut state);
        type_text(&mut state, "10.0.0.999");
        state.handle_key(KeyCode::Enter);
        assert!(state.input.as_ref().unwrap().error.is_some());

        clear_input(&mut state);
        type_text(&mut state, "10.0.0.9");
        state.handle_key(KeyCode::Enter);
        assert!(state.input.is_none());
        assert_eq!(state.store.sensor("1").unwrap().address.to_string(), "10.0.0.9");
    }

    #[test]
    fn test_threshold_edit() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('4'));
        state.handle_key(KeyCode::Left);
        assert_eq!(state.config_tab, ConfigTab::Thresholds);

        state.handle_key(KeyCode::Char('e'));
        assert_eq!(state.input.as_ref().unwrap().buffer, "co2.good.max=");
        type_text(&mut state, "abc");
        state.handle_key(KeyCode::Enter);
        assert!(state.input.as_ref().unwrap().error.is_some());

        clear_input(&mut state);
        type_text(&mut state, "co2.good.max=650");
        state.handle_key(KeyCode::Enter);
        assert!(state.input.is_none());
        let bands = state.store.thresholds().for_metric(MetricKind::Co2).unwrap();
        assert_eq!(bands.good.max, 650.0);
    }

    #[test]
    fn test_escape_cancels_prompt_without_changes() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('4'));
        state.handle_key(KeyCode::Char('n'));
        type_text(&mut state, "zzz");
        state.handle_key(KeyCode::Esc);
        assert!(state.input.is_none());
        assert_eq!(state.store.room("1").unwrap().name, "Room 101");
    }

    #[test]
    fn test_export_action_and_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = logged_in();
        state.settings.export_dir = temp_dir.path().to_path_buf();
        assert_eq!(state.handle_key(KeyCode::Char('e')), Action::Export);

        state.export_snapshot(now());
        assert!(temp_dir.path().join("air-quality-report.txt").exists());
        assert!(state.status.as_deref().unwrap().starts_with("Exported report"));
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut state = logged_in();
        state.handle_key(KeyCode::Char('h'));
        assert!(state.show_help);
        assert_eq!(state.handle_key(KeyCode::Char('q')), Action::Continue);
        state.handle_key(KeyCode::Esc);
        assert!(!state.show_help);
    }

    #[test]
    fn test_refresh_clock() {
        let mut state = logged_in();
        let later = now() + chrono::Duration::seconds(30);
        state.refresh_clock(later);
        assert_eq!(state.last_update, later);
    }
}
