// Export command handler
use anyhow::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::export::{export_store, ExportFormat, ExportOutcome};
use crate::store::DashboardStore;
use crate::utils::DateFormatter;

pub fn handle_export_command(
    store: &DashboardStore,
    format: Option<ExportFormat>,
    output: Option<String>,
    config: &Config,
    dates: &DateFormatter,
    json_output: bool,
) -> Result<()> {
    let format = resolve_format(format, config);
    let target = resolve_target(format, output.as_deref(), config);
    let outcome = export_store(store, format, &target, dates, Utc::now())?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

/// CLI flag first, then `export.default_format`
pub fn resolve_format(format: Option<ExportFormat>, config: &Config) -> ExportFormat {
    format.unwrap_or_else(|| {
        ExportFormat::from_config_str(&config.export.default_format).unwrap_or_else(|| {
            tracing::warn!(
                value = %config.export.default_format,
                "unknown export.default_format, using report"
            );
            ExportFormat::Report
        })
    })
}

pub fn resolve_target(format: ExportFormat, output: Option<&str>, config: &Config) -> PathBuf {
    match output {
        Some(path) => PathBuf::from(path),
        None => format.default_target(Path::new(&config.export.directory)),
    }
}

fn print_outcome(outcome: &ExportOutcome) {
    println!("Exported {} snapshot {}", outcome.format, outcome.snapshot_id);
    for file in &outcome.files {
        println!("  {}", file.display());
    }
}
