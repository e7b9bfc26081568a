// Rendering for the interactive dashboard using ratatui
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Sparkline,
        Table, TableState, Tabs, Wrap,
    },
    Frame,
};

use crate::alerts::AlertFilter;
use crate::analysis::{summarize, tier_distribution, trend_bounds, trend_series};
use crate::dashboard::state::{ConfigTab, DashboardState, LoginField, Panel};
use crate::models::{MetricKind, QualityTier, Room, SensorStatus, Severity};
use crate::output::format_number;
use crate::utils::format_age;

const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::LightRed,
];

pub fn render(f: &mut Frame, state: &DashboardState) {
    if !state.is_logged_in() {
        render_login_static(f, state);
        return;
    }

    render_main_layout_static(f, state);

    if state.show_help {
        render_help_popup_static(f);
    } else if state.confirm.is_some() {
        render_confirm_popup_static(f, state);
    } else if state.input.is_some() {
        render_input_popup_static(f, state);
    }
}

pub fn tier_color(tier: QualityTier) -> Color {
    match tier {
        QualityTier::Good => Color::Green,
        QualityTier::Moderate => Color::Yellow,
        QualityTier::Poor => Color::LightRed,
        QualityTier::Critical => Color::Red,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::High => Color::LightRed,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
    }
}

fn sensor_status_color(status: SensorStatus) -> Color {
    match status {
        SensorStatus::Active => Color::Green,
        SensorStatus::Maintenance => Color::Yellow,
        SensorStatus::Inactive => Color::Red,
    }
}

fn highlight() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

fn header_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn render_login_static(f: &mut Frame, state: &DashboardState) {
    let area = centered_rect(50, 40, f.size());
    f.render_widget(Clear, area);

    let field_style = |field: LoginField| {
        if state.login.focus == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };

    let mut lines = vec![
        Line::from(Span::styled("Indoor Air Quality Dashboard", header_style())),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Username: "),
            Span::styled(state.login.username.clone(), field_style(LoginField::Username)),
        ]),
        Line::from(vec![
            Span::raw("Password: "),
            Span::styled(
                "*".repeat(state.login.password.chars().count()),
                field_style(LoginField::Password),
            ),
        ]),
        Line::raw(""),
    ];
    if let Some(error) = &state.login.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(Span::styled(
        "Tab switch field | Enter sign in | Esc quit",
        Style::default().fg(Color::Gray),
    )));

    let login = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Sign in")
                .title_alignment(Alignment::Center),
        )
        .alignment(Alignment::Center);
    f.render_widget(login, area);
}

fn render_main_layout_static(f: &mut Frame, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Panel tabs
            Constraint::Min(0),    // Panel content
            Constraint::Length(1), // Status line
        ])
        .split(f.size());

    render_header_static(f, chunks[0], state);
    render_tabs_static(f, chunks[1], state);
    match state.panel {
        Panel::Monitoring => render_monitoring_static(f, chunks[2], state),
        Panel::Alerts => render_alerts_static(f, chunks[2], state),
        Panel::Analysis => render_analysis_static(f, chunks[2], state),
        Panel::Config => render_config_static(f, chunks[2], state),
    }
    render_status_line_static(f, chunks[3], state);
}

fn render_header_static(f: &mut Frame, area: Rect, state: &DashboardState) {
    let user = state
        .session
        .as_ref()
        .map(|s| s.username.as_str())
        .unwrap_or("-");
    let active = state.store.active_alert_count();
    let alert_color = if active > 0 { Color::Red } else { Color::Green };

    let header_text = Line::from(vec![
        Span::raw("User: "),
        Span::styled(user.to_string(), Style::default().fg(Color::Cyan)),
        Span::raw(" | Last update: "),
        Span::styled(
            state.settings.dates.time(&state.last_update),
            Style::default().fg(Color::Green),
        ),
        Span::raw(" | Active alerts: "),
        Span::styled(
            active.to_string(),
            Style::default().fg(alert_color).add_modifier(Modifier::BOLD),
        ),
    ]);

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled("airwatch - Indoor Air Quality", header_style())),
    );
    f.render_widget(header, area);
}

fn render_tabs_static(f: &mut Frame, area: Rect, state: &DashboardState) {
    let titles: Vec<String> = Panel::ALL
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if *p == Panel::Alerts {
                format!("{} {} ({})", i + 1, p.title(), state.store.active_alert_count())
            } else {
                format!("{} {}", i + 1, p.title())
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(state.panel.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn tier_cell(room: &Room, kind: MetricKind) -> Cell<'static> {
    match (room.value(kind), room.tier(kind)) {
        (Some(value), Some(tier)) => {
            Cell::from(kind.format_value(value)).style(Style::default().fg(tier_color(tier)))
        }
        _ => Cell::from("-"),
    }
}

fn overall_cell(room: &Room) -> Cell<'static> {
    match room.overall_tier() {
        Some(tier) => Cell::from(tier.label()).style(
            Style::default()
                .fg(tier_color(tier))
                .add_modifier(Modifier::BOLD),
        ),
        None => Cell::from("Awaiting data").style(Style::default().fg(Color::Gray)),
    }
}

fn render_monitoring_static(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let rows: Vec<Row> = state
        .store
        .rooms()
        .iter()
        .map(|room| {
            Row::new(vec![
                Cell::from(room.name.clone()),
                Cell::from(room.building.clone()),
                tier_cell(room, MetricKind::Co2),
                tier_cell(room, MetricKind::Pm25),
                tier_cell(room, MetricKind::Temperature),
                tier_cell(room, MetricKind::Humidity),
                overall_cell(room),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(11),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(14),
        ],
    )
    .header(Row::new(vec!["Room", "Building", "CO₂", "PM2.5", "Temp", "Humidity", "Overall"]).style(header_style()))
    .block(Block::default().borders(Borders::ALL).title("Classrooms"))
    .highlight_style(highlight())
    .highlight_symbol("> ");

    let mut table_state = TableState::default();
    if !state.store.rooms().is_empty() {
        table_state.select(Some(state.selected_room));
    }
    f.render_stateful_widget(table, chunks[0], &mut table_state);

    render_room_detail_static(f, chunks[1], state);
}

fn render_room_detail_static(f: &mut Frame, area: Rect, state: &DashboardState) {
    let Some(room) = state.selected_room() else {
        let placeholder = Paragraph::new("No rooms configured")
            .block(Block::default().borders(Borders::ALL).title("Details"))
            .alignment(Alignment::Center);
        f.render_widget(placeholder, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(area);

    let (active, total) = state.store.sensor_counts(&room.id);
    let mut lines = vec![
        Line::from(Span::styled(room.name.clone(), header_style())),
        Line::raw(room.building.clone()),
        Line::raw(""),
    ];
    match room.current {
        Some(readings) => {
            for kind in MetricKind::ALL {
                let tier = readings.tier(kind);
                lines.push(Line::from(vec![
                    Span::raw(format!("{:<12}", kind.label())),
                    Span::styled(
                        format!("{:<12}", kind.format_value(readings.value(kind))),
                        Style::default().fg(tier_color(tier)),
                    ),
                    Span::raw(tier.as_str()),
                ]));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Awaiting data",
            Style::default().fg(Color::Gray),
        ))),
    }
    lines.push(Line::raw(format!(
        "Sensors: {}/{} active | Updated {}",
        active,
        total,
        format_age(&room.last_updated, &Utc::now())
    )));

    let detail = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Details"));
    f.render_widget(detail, chunks[0]);

    let data: Vec<u64> = room
        .trend_values(MetricKind::Co2)
        .iter()
        .map(|v| v.max(0.0).round() as u64)
        .collect();
    let sparkline = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title("CO₂ last 24h"))
        .data(&data)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(sparkline, chunks[1]);
}

fn render_alerts_static(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let counts = state.store.alert_counts();
    let filters = [AlertFilter::Active, AlertFilter::Resolved, AlertFilter::All];
    let titles: Vec<String> = filters
        .iter()
        .map(|filter| format!("{} ({})", filter.label(), counts.for_filter(*filter)))
        .collect();
    let selected = filters.iter().position(|f| *f == state.alert_filter).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Filter (f)"))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    let alerts = state.visible_alerts();
    if alerts.is_empty() {
        let placeholder = Paragraph::new("No alerts")
            .block(Block::default().borders(Borders::ALL).title("Alerts"))
            .alignment(Alignment::Center);
        f.render_widget(placeholder, chunks[1]);
        return;
    }

    let now = Utc::now();
    let rows: Vec<Row> = alerts
        .iter()
        .map(|alert| {
            let row = Row::new(vec![
                Cell::from(alert.severity.as_str())
                    .style(Style::default().fg(severity_color(alert.severity))),
                Cell::from(alert.room_name.clone()),
                Cell::from(alert.metric.label()),
                Cell::from(alert.message.clone()),
                Cell::from(format_age(&alert.created_at, &now)),
                Cell::from(if alert.resolved { "resolved" } else { "active" }),
            ]);
            if alert.resolved {
                row.style(Style::default().fg(Color::DarkGray))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(11),
            Constraint::Length(9),
        ],
    )
    .header(Row::new(vec!["Severity", "Room", "Metric", "Message", "Age", "Status"]).style(header_style()))
    .block(Block::default().borders(Borders::ALL).title("Alerts (r resolve)"))
    .highlight_style(highlight())
    .highlight_symbol("> ");

    let mut table_state = TableState::default();
    table_state.select(Some(state.selected_alert));
    f.render_stateful_widget(table, chunks[1], &mut table_state);
}

fn render_analysis_static(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let metric = state.analysis_metric;
    let rooms = state.store.rooms();
    let distribution = tier_distribution(rooms);

    let summary_line = match summarize(rooms, metric) {
        Some(summary) => Line::from(vec![
            Span::raw("Average: "),
            Span::styled(
                format!("{} {}", format_number(summary.average, 1), metric.unit()),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(" | Max: "),
            Span::styled(
                format!("{} {}", format_number(summary.max, 1), metric.unit()),
                Style::default().fg(Color::Red),
            ),
            Span::raw(" | Min: "),
            Span::styled(
                format!("{} {}", format_number(summary.min, 1), metric.unit()),
                Style::default().fg(Color::Green),
            ),
        ]),
        None => Line::raw("No readings available"),
    };

    let mut tier_spans = vec![Span::raw("Rooms: ")];
    for tier in QualityTier::ALL {
        tier_spans.push(Span::styled(
            format!("{} {}  ", tier.label(), distribution.count(tier)),
            Style::default().fg(tier_color(tier)),
        ));
    }
    if distribution.awaiting_data > 0 {
        tier_spans.push(Span::raw(format!("Awaiting {}", distribution.awaiting_data)));
    }

    let summary = Paragraph::new(vec![summary_line, Line::from(tier_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} summary (m: next metric)", metric.label())),
    );
    f.render_widget(summary, chunks[0]);

    let series: Vec<(String, Vec<(f64, f64)>)> = rooms
        .iter()
        .filter(|r| !r.trend.is_empty())
        .map(|r| (r.name.clone(), trend_series(r, metric)))
        .collect();

    let Some((lo, hi)) = trend_bounds(rooms, metric) else {
        let placeholder = Paragraph::new("No trend data")
            .block(Block::default().borders(Borders::ALL).title("Last 24 hours"))
            .alignment(Alignment::Center);
        f.render_widget(placeholder, chunks[1]);
        return;
    };

    let datasets: Vec<Dataset> = series
        .iter()
        .enumerate()
        .map(|(i, (name, points))| {
            Dataset::default()
                .name(name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Last 24 hours"))
        .x_axis(
            Axis::default()
                .title("hours")
                .style(Style::default().fg(Color::Gray))
                .bounds([-23.0, 0.0])
                .labels(vec![Span::raw("-23h"), Span::raw("-12h"), Span::raw("now")]),
        )
        .y_axis(
            Axis::default()
                .title(metric.unit())
                .style(Style::default().fg(Color::Gray))
                .bounds([lo, hi])
                .labels(vec![
                    Span::raw(format_number(lo, 0)),
                    Span::raw(format_number((lo + hi) / 2.0, 0)),
                    Span::raw(format_number(hi, 0)),
                ]),
        );
    f.render_widget(chart, chunks[1]);
}

fn render_config_static(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let titles: Vec<&str> = ConfigTab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Configuration (←/→)"))
        .select(state.config_tab.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    match state.config_tab {
        ConfigTab::Rooms => render_config_rooms_static(f, chunks[1], state),
        ConfigTab::Sensors => render_config_sensors_static(f, chunks[1], state),
        ConfigTab::Thresholds => render_config_thresholds_static(f, chunks[1], state),
    }
}

fn render_config_rooms_static(f: &mut Frame, area: Rect, state: &DashboardState) {
    let rows: Vec<Row> = state
        .store
        .rooms()
        .iter()
        .map(|room| {
            let (active, total) = state.store.sensor_counts(&room.id);
            Row::new(vec![
                Cell::from(room.id.clone()),
                Cell::from(room.name.clone()),
                Cell::from(room.building.clone()),
                Cell::from(format!("{}/{}", active, total)),
                overall_cell(room),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(16),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(14),
        ],
    )
    .header(Row::new(vec!["ID", "Name", "Building", "Sensors", "Overall"]).style(header_style()))
    .block(Block::default().borders(Borders::ALL).title("Rooms"))
    .highlight_style(highlight())
    .highlight_symbol("> ");

    let mut table_state = TableState::default();
    if !state.store.rooms().is_empty() {
        table_state.select(Some(state.selected_room));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}

fn render_config_sensors_static(f: &mut Frame, area: Rect, state: &DashboardState) {
    let now = Utc::now();
    let rows: Vec<Row> = state
        .store
        .sensors()
        .iter()
        .map(|sensor| {
            let room = state
                .store
                .room(&sensor.room_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                Cell::from(sensor.id.clone()),
                Cell::from(room),
                Cell::from(sensor.kind.label()),
                Cell::from(sensor.status.as_str())
                    .style(Style::default().fg(sensor_status_color(sensor.status))),
                Cell::from(sensor.address.to_string()),
                Cell::from(format_age(&sensor.last_contact, &now)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(16),
            Constraint::Length(11),
        ],
    )
    .header(Row::new(vec!["ID", "Room", "Metric", "Status", "Address", "Contact"]).style(header_style()))
    .block(Block::default().borders(Borders::ALL).title("Sensors"))
    .highlight_style(highlight())
    .highlight_symbol("> ");

    let mut table_state = TableState::default();
    if !state.store.sensors().is_empty() {
        table_state.select(Some(state.selected_sensor));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}

fn render_config_thresholds_static(f: &mut Frame, area: Rect, state: &DashboardState) {
    let range = |min: f64, max: f64, unit: &str| {
        format!("{} - {} {}", format_number(min, 1), format_number(max, 1), unit)
    };
    let rows: Vec<Row> = state
        .store
        .thresholds()
        .metrics
        .iter()
        .map(|bands| {
            let unit = bands.metric.unit();
            Row::new(vec![
                Cell::from(bands.metric.label()),
                Cell::from(range(bands.good.min, bands.good.max, unit))
                    .style(Style::default().fg(tier_color(QualityTier::Good))),
                Cell::from(range(bands.moderate.min, bands.moderate.max, unit))
                    .style(Style::default().fg(tier_color(QualityTier::Moderate))),
                Cell::from(range(bands.poor.min, bands.poor.max, unit))
                    .style(Style::default().fg(tier_color(QualityTier::Poor))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(16),
            Constraint::Min(16),
            Constraint::Min(16),
        ],
    )
    .header(Row::new(vec!["Metric", "Good", "Moderate", "Poor"]).style(header_style()))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Reference thresholds (display only)"),
    )
    .highlight_style(highlight())
    .highlight_symbol("> ");

    let mut table_state = TableState::default();
    table_state.select(Some(state.selected_threshold));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn status_hints(state: &DashboardState) -> &'static str {
    match state.panel {
        Panel::Monitoring => "1-4/Tab panels | ↑↓ select | e export | o logout | h help | q quit",
        Panel::Alerts => "r resolve | f filter | ↑↓ select | e export | o logout | q quit",
        Panel::Analysis => "m next metric | e export | o logout | h help | q quit",
        Panel::Config => match state.config_tab {
            ConfigTab::Rooms => "a add | n rename | b building | s add sensor | d delete | ←→ tabs",
            ConfigTab::Sensors => "i edit IP | t cycle status | d delete | ←→ tabs",
            ConfigTab::Thresholds => "e edit | ↑↓ select | ←→ tabs",
        },
    }
}

fn render_status_line_static(f: &mut Frame, area: Rect, state: &DashboardState) {
    let status = match &state.status {
        Some(message) => Paragraph::new(message.clone()).style(Style::default().fg(Color::Yellow)),
        None => Paragraph::new(status_hints(state)).style(Style::default().fg(Color::Gray)),
    };
    f.render_widget(status.alignment(Alignment::Center), area);
}

fn render_confirm_popup_static(f: &mut Frame, state: &DashboardState) {
    let Some(pending) = &state.confirm else {
        return;
    };
    let area = centered_rect(50, 20, f.size());
    f.render_widget(Clear, area);

    let text = vec![
        Line::raw(pending.message()),
        Line::raw(""),
        Line::from(Span::styled(
            "y confirm | any other key cancels",
            Style::default().fg(Color::Gray),
        )),
    ];
    let popup = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm deletion")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Red)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(popup, area);
}

fn render_input_popup_static(f: &mut Frame, state: &DashboardState) {
    let Some(prompt) = &state.input else {
        return;
    };
    let area = centered_rect(60, 20, f.size());
    f.render_widget(Clear, area);

    let mut text = vec![Line::from(vec![
        Span::raw("> "),
        Span::styled(prompt.buffer.clone(), Style::default().fg(Color::Yellow)),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ])];
    if let Some(error) = &prompt.error {
        text.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }
    text.push(Line::raw(""));
    text.push(Line::from(Span::styled(
        "Enter save | Esc cancel",
        Style::default().fg(Color::Gray),
    )));

    let popup = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(prompt.purpose.title())
            .title_alignment(Alignment::Center),
    );
    f.render_widget(popup, area);
}

fn render_help_popup_static(f: &mut Frame) {
    let area = centered_rect(60, 70, f.size());

    f.render_widget(Clear, area);

    let help_text = vec![
        Line::from(Span::styled("airwatch dashboard - Help", header_style())),
        Line::raw(""),
        Line::raw("Navigation:"),
        Line::raw("  1-4 / Tab    - Switch panel"),
        Line::raw("  ↑↓ / k j     - Move selection"),
        Line::raw("  e            - Export snapshot (outside Configuration)"),
        Line::raw("  o            - Log out"),
        Line::raw("  h / ?        - Show/Hide help"),
        Line::raw("  q / Esc      - Quit"),
        Line::raw(""),
        Line::raw("Alerts:        r resolve selected, f cycle filter"),
        Line::raw("Analysis:      m cycle metric"),
        Line::raw("Configuration: ←→ switch rooms/sensors/thresholds"),
        Line::raw("  Rooms        a add, n rename, b building, s add sensor, d delete"),
        Line::raw("  Sensors      i edit IP, t cycle status, d delete"),
        Line::raw("  Thresholds   e edit (display only)"),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Tiers: "),
            Span::styled("good ", Style::default().fg(tier_color(QualityTier::Good))),
            Span::styled("moderate ", Style::default().fg(tier_color(QualityTier::Moderate))),
            Span::styled("poor ", Style::default().fg(tier_color(QualityTier::Poor))),
            Span::styled("critical", Style::default().fg(tier_color(QualityTier::Critical))),
        ]),
        Line::raw(""),
        Line::raw("Press 'h' again to close this help."),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_alignment(Alignment::Center),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StubAccessGate;
    use crate::dashboard::state::DashboardSettings;
    use crate::store::DashboardStore;
    use crossterm::event::KeyCode;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn draw(state: &DashboardState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        buffer_text(&terminal)
    }

    fn state() -> DashboardState {
        DashboardState::new(
            DashboardStore::with_fixtures(Utc::now(), 4),
            Box::new(StubAccessGate::default()),
            DashboardSettings::default(),
            Utc::now(),
        )
    }

    #[test]
    fn test_centered_rect() {
        let area = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(area.width, 50);
        assert_eq!(area.height, 20);
    }

    #[test]
    fn test_login_screen_rendered_first() {
        let text = draw(&state());
        assert!(text.contains("Sign in"));
        assert!(!text.contains("Classrooms"));
    }

    #[test]
    fn test_every_panel_renders() {
        let mut state = state();
        state.try_login("Admin", "Admin");
        assert!(draw(&state).contains("Classrooms"));

        state.handle_key(KeyCode::Char('2'));
        assert!(draw(&state).contains("Filter (f)"));

        state.handle_key(KeyCode::Char('3'));
        assert!(draw(&state).contains("Last 24 hours"));

        state.handle_key(KeyCode::Char('4'));
        assert!(draw(&state).contains("Rooms"));
        state.handle_key(KeyCode::Right);
        assert!(draw(&state).contains("Sensors"));
        state.handle_key(KeyCode::Right);
        assert!(draw(&state).contains("Reference thresholds"));
    }

    #[test]
    fn test_confirm_popup_rendered() {
        let mut state = state();
        state.try_login("Admin", "Admin");
        state.handle_key(KeyCode::Char('4'));
        state.handle_key(KeyCode::Char('d'));
        assert!(draw(&state).contains("Confirm deletion"));
    }
}
