// Terminal wrapper driving the dashboard event loop
use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use crate::dashboard::state::{Action, DashboardState};
use crate::dashboard::ui;

pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(state: DashboardState) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Dashboard { terminal, state })
    }

    pub async fn run(&mut self) -> Result<()> {
        use tokio::time::interval;

        let mut tick_timer = interval(self.state.settings.tick_rate);
        let mut refresh_timer = interval(self.state.settings.refresh_interval);
        let mut last_terminal_size = self.terminal.size()?;

        tracing::info!(
            refresh_secs = self.state.settings.refresh_interval.as_secs(),
            "dashboard started"
        );

        loop {
            tokio::select! {
                _ = refresh_timer.tick() => {
                    self.state.refresh_clock(Utc::now());
                }

                _ = tick_timer.tick() => {
                    let current_size = self.terminal.size()?;
                    if current_size != last_terminal_size {
                        last_terminal_size = current_size;
                        self.terminal.clear()?;
                    }

                    self.draw()?;

                    if apply_keys(&mut self.state, pending_keys()?) {
                        break;
                    }
                }
            }
        }

        tracing::info!("dashboard closed");
        Ok(())
    }

    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let state = &self.state;
        self.terminal.draw(|f| ui::render(f, state))?;
        Ok(())
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Every key event queued since the last tick
fn pending_keys() -> Result<Vec<KeyEvent>> {
    let mut keys = Vec::new();
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            keys.push(key);
        }
    }
    Ok(keys)
}

/// Feed a batch of key events to the state. Returns true once the user quits;
/// keys after that are dropped.
fn apply_keys(state: &mut DashboardState, keys: impl IntoIterator<Item = KeyEvent>) -> bool {
    for key in keys {
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            return true;
        }
        match state.handle_key(key.code) {
            Action::Quit => return true,
            Action::Export => state.export_snapshot(Utc::now()),
            Action::Continue => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StubAccessGate;
    use crate::dashboard::state::DashboardSettings;
    use crate::store::DashboardStore;
    use crossterm::event::KeyEventState;

    fn state() -> DashboardState {
        DashboardState::new(
            DashboardStore::with_fixtures(Utc::now(), 3),
            Box::new(StubAccessGate::default()),
            DashboardSettings::default(),
            Utc::now(),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(text: &str) -> Vec<KeyEvent> {
        text.chars().map(|c| press(KeyCode::Char(c))).collect()
    }

    #[test]
    fn test_whole_batch_applied_in_one_tick() {
        let mut state = state();
        let mut keys = typed("Admin");
        keys.push(press(KeyCode::Tab));
        keys.extend(typed("Admin"));
        keys.push(press(KeyCode::Enter));
        keys.push(press(KeyCode::Char('2')));

        assert!(!apply_keys(&mut state, keys));
        assert!(state.is_logged_in());
        assert_eq!(state.panel, crate::dashboard::Panel::Alerts);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut state = state();
        let release = KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(!apply_keys(&mut state, vec![release]));
        assert!(state.login.username.is_empty());
    }

    #[test]
    fn test_ctrl_c_quits_and_drops_the_rest() {
        let mut state = state();
        let mut keys = vec![KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)];
        keys.extend(typed("Admin"));
        assert!(apply_keys(&mut state, keys));
        assert!(state.login.username.is_empty());
    }

    #[test]
    fn test_escape_on_login_quits() {
        let mut state = state();
        assert!(apply_keys(&mut state, vec![press(KeyCode::Esc)]));
    }
}
