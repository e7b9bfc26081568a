// Interactive terminal dashboard
pub mod state;
pub mod terminal;
pub mod ui;

pub use state::{Action, DashboardSettings, DashboardState, Panel};
pub use terminal::Dashboard;
