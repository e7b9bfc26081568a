// Dashboard command handler
use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::StubAccessGate;
use crate::commands::export::resolve_format;
use crate::config::Config;
use crate::dashboard::{Dashboard, DashboardSettings, DashboardState};
use crate::store::DashboardStore;
use crate::utils::DateFormatter;

pub async fn handle_dashboard_command(
    store: DashboardStore,
    settings: DashboardSettings,
    user: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let mut state = DashboardState::new(store, Box::new(StubAccessGate::new()), settings, Utc::now());

    // Credentials from flags or env skip the login screen; a bad pair leaves
    // the error on it instead.
    if let (Some(user), Some(password)) = (user.as_deref(), password.as_deref()) {
        state.login.username = user.to_string();
        state.try_login(user, password);
    }

    let mut dashboard = Dashboard::new(state)?;
    let result = dashboard.run().await;
    dashboard.cleanup()?;
    result
}

/// Timers and export defaults for the dashboard. Both intervals are kept
/// non-zero since a zero period cannot drive a timer.
pub fn dashboard_settings(
    config: &Config,
    refresh_secs: Option<u64>,
    dates: DateFormatter,
) -> DashboardSettings {
    let refresh = refresh_secs
        .unwrap_or(config.general.refresh_interval_secs)
        .max(1);
    DashboardSettings {
        refresh_interval: Duration::from_secs(refresh),
        tick_rate: Duration::from_millis(config.dashboard.tick_rate_ms.max(16)),
        export_dir: PathBuf::from(&config.export.directory),
        export_format: resolve_format(None, config),
        dates,
    }
}
