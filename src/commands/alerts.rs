// Alerts command handler
use anyhow::Result;
use serde::Serialize;

use crate::alerts::{AlertCounts, AlertFilter};
use crate::commands::OutputContext;
use crate::models::Alert;
use crate::store::DashboardStore;

#[derive(Serialize)]
struct AlertListing<'a> {
    filter: AlertFilter,
    counts: AlertCounts,
    resolved_now: Vec<String>,
    alerts: Vec<&'a Alert>,
}

pub fn handle_alerts_command(
    store: &mut DashboardStore,
    filter: AlertFilter,
    resolve: Vec<String>,
    output: &OutputContext,
) -> Result<()> {
    let resolved_now = resolve_all(store, &resolve);
    for id in resolve.iter().filter(|id| !resolved_now.contains(id)) {
        eprintln!("Note: alert {} not found or already resolved", id);
    }
    println!("{}", alerts_report(store, filter, resolved_now, output)?);
    Ok(())
}

/// Resolve each id in turn, returning the ids that actually flipped
pub fn resolve_all(store: &mut DashboardStore, ids: &[String]) -> Vec<String> {
    ids.iter()
        .filter(|id| store.resolve_alert(id))
        .cloned()
        .collect()
}

pub fn alerts_report(
    store: &DashboardStore,
    filter: AlertFilter,
    resolved_now: Vec<String>,
    output: &OutputContext,
) -> Result<String> {
    let counts = store.alert_counts();
    let alerts = store.ranked_alerts(filter);

    if output.json {
        let listing = AlertListing {
            filter,
            counts,
            resolved_now,
            alerts,
        };
        return Ok(serde_json::to_string_pretty(&listing)?);
    }

    let owned: Vec<Alert> = alerts.into_iter().cloned().collect();
    let mut text = String::new();
    if !resolved_now.is_empty() {
        text.push_str(&format!("Resolved: {}\n\n", resolved_now.join(", ")));
    }
    text.push_str(&format!(
        "Active: {} | Resolved: {} | All: {}   (showing {})\n",
        counts.active,
        counts.resolved,
        counts.all,
        filter.label()
    ));
    text.push_str(&output.render(&owned)?);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn json_output() -> OutputContext {
        OutputContext {
            json: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_listing_is_active_and_ranked() {
        let store = DashboardStore::with_fixtures(Utc::now(), 5);
        let json = alerts_report(&store, AlertFilter::Active, Vec::new(), &json_output()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let ids: Vec<&str> = value["alerts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(value["counts"]["active"], 3);
    }

    #[test]
    fn test_resolve_all_reports_only_flipped_ids() {
        let mut store = DashboardStore::with_fixtures(Utc::now(), 5);
        let ids = vec!["2".to_string(), "4".to_string(), "99".to_string()];
        assert_eq!(resolve_all(&mut store, &ids), vec!["2".to_string()]);
        assert_eq!(store.active_alert_count(), 2);
    }

    #[test]
    fn test_table_listing_shows_counts() {
        let mut store = DashboardStore::with_fixtures(Utc::now(), 5);
        let resolved = resolve_all(&mut store, &["1".to_string()]);
        let text = alerts_report(&store, AlertFilter::All, resolved, &OutputContext::default()).unwrap();
        assert!(text.starts_with("Resolved: 1"));
        assert!(text.contains("Active: 2 | Resolved: 2 | All: 4"));
    }
}
