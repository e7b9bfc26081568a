// Report snapshot exports
pub mod report;
pub mod snapshot;
pub mod workbook;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::store::DashboardStore;
use crate::utils::DateFormatter;

pub use report::{build_report, write_report, ReportDocument, LINES_PER_PAGE};
pub use snapshot::{write_snapshot, Snapshot};
pub use workbook::{alerts_sheet, rooms_sheet, write_workbook};

pub const REPORT_FILE_NAME: &str = "air-quality-report.txt";
pub const WORKBOOK_DIR_NAME: &str = "air-quality-report";
pub const SNAPSHOT_FILE_NAME: &str = "air-quality-snapshot.json";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Paginated plain-text report
    Report,
    /// Rooms and alerts as two CSV sheets
    Workbook,
    /// Full snapshot as JSON
    Json,
}

impl ExportFormat {
    pub fn from_config_str(value: &str) -> Option<Self> {
        match value {
            "report" => Some(Self::Report),
            "workbook" => Some(Self::Workbook),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Workbook => "workbook",
            Self::Json => "json",
        }
    }

    /// Where the export lands when no explicit output path is given
    pub fn default_target(&self, directory: &Path) -> PathBuf {
        match self {
            Self::Report => directory.join(REPORT_FILE_NAME),
            Self::Workbook => directory.join(WORKBOOK_DIR_NAME),
            Self::Json => directory.join(SNAPSHOT_FILE_NAME),
        }
    }
}

/// Identity of one export run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExportMeta {
    pub snapshot_id: Uuid,
    pub generated_at: DateTime<Utc>,
}

impl ExportMeta {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            snapshot_id: Uuid::new_v4(),
            generated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub snapshot_id: Uuid,
    pub format: &'static str,
    pub files: Vec<PathBuf>,
}

/// Write the store in the requested format to `target`
pub fn export_store(
    store: &DashboardStore,
    format: ExportFormat,
    target: &Path,
    dates: &DateFormatter,
    now: DateTime<Utc>,
) -> Result<ExportOutcome> {
    let meta = ExportMeta::new(now);
    tracing::info!(
        snapshot_id = %meta.snapshot_id,
        format = format.as_str(),
        target = %target.display(),
        "exporting snapshot"
    );

    let files = match format {
        ExportFormat::Report => {
            let document = build_report(store.rooms(), store.alerts(), &meta, dates);
            write_report(target, &document)?;
            vec![target.to_path_buf()]
        }
        ExportFormat::Workbook => write_workbook(target, store.rooms(), store.alerts(), &meta, dates)?,
        ExportFormat::Json => {
            write_snapshot(target, store, &meta)?;
            vec![target.to_path_buf()]
        }
    };

    Ok(ExportOutcome {
        snapshot_id: meta.snapshot_id,
        format: format.as_str(),
        files,
    })
}
