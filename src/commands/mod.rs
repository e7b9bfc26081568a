// Command handlers module
pub mod alerts;
pub mod analysis;
pub mod classify;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod rooms;
pub mod sensors;
pub mod thresholds;

use crate::output::{OutputFormat, TableOptions};

// Re-export command handlers for easy access
pub use alerts::handle_alerts_command;
pub use analysis::handle_analysis_command;
pub use classify::handle_classify_command;
pub use config::handle_config_action;
pub use dashboard::handle_dashboard_command;
pub use export::handle_export_command;
pub use rooms::{handle_room_command, handle_rooms_command};
pub use sensors::handle_sensors_command;
pub use thresholds::handle_thresholds_command;

/// Output settings resolved from config and CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputContext {
    pub table: TableOptions,
    pub json: bool,
}

impl OutputContext {
    pub fn render<T: OutputFormat + ?Sized>(&self, value: &T) -> anyhow::Result<String> {
        if self.json {
            Ok(value.to_json()?)
        } else {
            Ok(value.to_table(&self.table))
        }
    }
}
