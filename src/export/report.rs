// Paginated plain-text air-quality report
//
// Pages hold at most LINES_PER_PAGE body lines and a room or alert block
// never straddles a page break. Pages are separated by a form feed and end
// with a `Page N of M` footer.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::alerts::{ranked, AlertFilter};
use crate::export::ExportMeta;
use crate::models::{Alert, MetricKind, Room};
use crate::utils::DateFormatter;

pub const LINES_PER_PAGE: usize = 30;

pub const REPORT_TITLE: &str = "Air Quality Report";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pages: Vec<Vec<String>>,
}

impl ReportDocument {
    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn render(&self) -> String {
        let total = self.pages.len();
        let mut output = String::new();
        for (index, page) in self.pages.iter().enumerate() {
            if index > 0 {
                output.push('\x0c');
            }
            for line in page {
                output.push_str(line);
                output.push('\n');
            }
            output.push('\n');
            output.push_str(&format!("Page {} of {}\n", index + 1, total));
        }
        output
    }
}

struct PageBuilder {
    pages: Vec<Vec<String>>,
    current: Vec<String>,
}

impl PageBuilder {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    fn push_block(&mut self, block: Vec<String>) {
        if !self.current.is_empty() && self.current.len() + block.len() > LINES_PER_PAGE {
            self.break_page();
        }
        self.current.extend(block);
    }

    fn break_page(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> ReportDocument {
        self.break_page();
        ReportDocument { pages: self.pages }
    }
}

/// Lay out rooms, then unresolved alerts on their own page(s).
/// The alerts section is present whenever `alerts` is non-empty.
pub fn build_report(
    rooms: &[Room],
    alerts: &[Alert],
    meta: &ExportMeta,
    dates: &DateFormatter,
) -> ReportDocument {
    let mut builder = PageBuilder::new();

    builder.push_block(vec![
        REPORT_TITLE.to_string(),
        format!("Date: {}", dates.date(&meta.generated_at)),
        format!("Snapshot: {}", meta.snapshot_id),
        String::new(),
        "Room summary".to_string(),
        String::new(),
    ]);

    for room in rooms {
        builder.push_block(room_block(room));
    }

    if !alerts.is_empty() {
        builder.break_page();
        builder.push_block(vec!["Active alerts".to_string(), String::new()]);

        let active = ranked(alerts, AlertFilter::Active);
        if active.is_empty() {
            builder.push_block(vec!["No active alerts.".to_string()]);
        }
        for alert in active {
            builder.push_block(vec![
                format!("{}: {}", alert.room_name, alert.message),
                format!(
                    "  Severity: {} - {}",
                    alert.severity,
                    dates.date_time(&alert.created_at)
                ),
                String::new(),
            ]);
        }
    }

    builder.finish()
}

fn room_block(room: &Room) -> Vec<String> {
    let heading = format!("{} ({})", room.name, room.building);
    match room.current {
        Some(readings) => {
            let cell = |kind: MetricKind| {
                format!("{}: {}", short_label(kind), kind.format_value(readings.value(kind)))
            };
            vec![
                heading,
                format!("  {:<24}{}", cell(MetricKind::Co2), cell(MetricKind::Pm25)),
                format!("  {:<24}{}", cell(MetricKind::Temperature), cell(MetricKind::Humidity)),
                String::new(),
            ]
        }
        None => vec![heading, "  Awaiting data".to_string(), String::new()],
    }
}

fn short_label(kind: MetricKind) -> &'static str {
    match kind {
        MetricKind::Temperature => "Temp",
        other => other.label(),
    }
}

pub fn write_report(path: &Path, document: &ReportDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create export directory: {}", parent.display()))?;
        }
    }
    fs::write(path, document.render())
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}
