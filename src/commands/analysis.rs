// Analysis command handler
use anyhow::Result;
use serde::Serialize;

use crate::analysis::{summarize, tier_distribution, MetricSummary, TierDistribution};
use crate::commands::OutputContext;
use crate::models::{MetricKind, QualityTier};
use crate::output::paint;
use crate::store::DashboardStore;

#[derive(Serialize)]
struct AnalysisReport {
    summaries: Vec<MetricSummary>,
    distribution: TierDistribution,
}

pub fn handle_analysis_command(
    store: &DashboardStore,
    metric: Option<MetricKind>,
    output: &OutputContext,
) -> Result<()> {
    println!("{}", analysis_report(store, metric, output)?);
    Ok(())
}

pub fn analysis_report(
    store: &DashboardStore,
    metric: Option<MetricKind>,
    output: &OutputContext,
) -> Result<String> {
    let metrics: Vec<MetricKind> = match metric {
        Some(kind) => vec![kind],
        None => MetricKind::ALL.to_vec(),
    };
    let summaries: Vec<MetricSummary> = metrics
        .into_iter()
        .filter_map(|kind| summarize(store.rooms(), kind))
        .collect();
    let distribution = tier_distribution(store.rooms());

    if output.json {
        let report = AnalysisReport {
            summaries,
            distribution,
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut text = output.render(&summaries)?;
    text.push_str("\n\nRooms by overall quality\n");
    for tier in QualityTier::ALL {
        text.push_str(&format!(
            "  {:<10} {}\n",
            paint(tier.label(), tier, output.table.colored),
            distribution.count(tier)
        ));
    }
    if distribution.awaiting_data > 0 {
        text.push_str(&format!("  {:<10} {}\n", "Awaiting", distribution.awaiting_data));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_json_report_for_one_metric() {
        let store = DashboardStore::with_fixtures(Utc::now(), 2);
        let output = OutputContext {
            json: true,
            ..Default::default()
        };
        let json = analysis_report(&store, Some(MetricKind::Co2), &output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let summaries = value["summaries"].as_array().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0]["max"], 1150.0);
        assert_eq!(summaries[0]["min"], 420.0);
        assert_eq!(value["distribution"]["critical"], 1);
    }

    #[test]
    fn test_table_report_lists_tiers() {
        let store = DashboardStore::with_fixtures(Utc::now(), 2);
        let text = analysis_report(&store, None, &OutputContext::default()).unwrap();
        assert!(text.contains("Rooms by overall quality"));
        assert!(text.contains("Moderate   3"));
        assert!(!text.contains("Awaiting"));
    }
}
