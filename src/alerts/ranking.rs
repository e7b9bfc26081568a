use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Alert;

/// Which alerts a listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertFilter {
    #[default]
    Active,
    Resolved,
    All,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        match self {
            AlertFilter::Active => !alert.resolved,
            AlertFilter::Resolved => alert.resolved,
            AlertFilter::All => true,
        }
    }

    pub fn next(&self) -> AlertFilter {
        match self {
            AlertFilter::Active => AlertFilter::Resolved,
            AlertFilter::Resolved => AlertFilter::All,
            AlertFilter::All => AlertFilter::Active,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertFilter::Active => "Active",
            AlertFilter::Resolved => "Resolved",
            AlertFilter::All => "All",
        }
    }
}

impl fmt::Display for AlertFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AlertFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(AlertFilter::Active),
            "resolved" => Ok(AlertFilter::Resolved),
            "all" => Ok(AlertFilter::All),
            other => anyhow::bail!(
                "Invalid alert filter: {}. Must be 'active', 'resolved', or 'all'",
                other
            ),
        }
    }
}

/// Counts shown next to each filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AlertCounts {
    pub active: usize,
    pub resolved: usize,
    pub all: usize,
}

impl AlertCounts {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let resolved = alerts.iter().filter(|a| a.resolved).count();
        Self {
            active: alerts.len() - resolved,
            resolved,
            all: alerts.len(),
        }
    }

    pub fn for_filter(&self, filter: AlertFilter) -> usize {
        match filter {
            AlertFilter::Active => self.active,
            AlertFilter::Resolved => self.resolved,
            AlertFilter::All => self.all,
        }
    }
}

/// Order alerts in place: unresolved first, then most severe first.
/// The sort is stable, so equal keys keep their input order.
pub fn rank_alerts(alerts: &mut [Alert]) {
    alerts.sort_by_key(rank_key);
}

/// Filter then rank, returning borrowed alerts
pub fn ranked<'a>(alerts: &'a [Alert], filter: AlertFilter) -> Vec<&'a Alert> {
    let mut selected: Vec<&Alert> = alerts.iter().filter(|a| filter.matches(a)).collect();
    selected.sort_by_key(|a| rank_key(a));
    selected
}

fn rank_key(alert: &Alert) -> (bool, u8) {
    (alert.resolved, alert.severity.rank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricKind, Severity};
    use chrono::Utc;

    fn alert(id: &str, severity: Severity, resolved: bool) -> Alert {
        Alert {
            id: id.to_string(),
            room_id: "1".to_string(),
            room_name: "Room 101".to_string(),
            metric: MetricKind::Co2,
            severity,
            message: format!("alert {}", id),
            created_at: Utc::now(),
            resolved,
        }
    }

    #[test]
    fn test_unresolved_before_resolved_then_severity() {
        let mut alerts = vec![
            alert("a", Severity::Medium, false),
            alert("b", Severity::Critical, true),
            alert("c", Severity::Critical, false),
        ];
        rank_alerts(&mut alerts);

        let order: Vec<(&str, Severity, bool)> = alerts
            .iter()
            .map(|a| (a.id.as_str(), a.severity, a.resolved))
            .collect();
        assert_eq!(
            order,
            vec![
                ("c", Severity::Critical, false),
                ("a", Severity::Medium, false),
                ("b", Severity::Critical, true),
            ]
        );
    }

    #[test]
    fn test_ranking_is_stable_for_equal_keys() {
        let mut alerts = vec![
            alert("first", Severity::Low, false),
            alert("second", Severity::Low, false),
            alert("third", Severity::Low, false),
        ];
        rank_alerts(&mut alerts);
        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_filtered_ranking() {
        let alerts = vec![
            alert("1", Severity::Low, true),
            alert("2", Severity::High, false),
            alert("3", Severity::Critical, false),
        ];

        let active: Vec<&str> = ranked(&alerts, AlertFilter::Active).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(active, vec!["3", "2"]);

        let resolved: Vec<&str> = ranked(&alerts, AlertFilter::Resolved).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(resolved, vec!["1"]);

        assert_eq!(ranked(&alerts, AlertFilter::All).len(), 3);
    }

    #[test]
    fn test_in_place_and_borrowed_ranking_agree() {
        let mut alerts = vec![
            alert("1", Severity::Low, true),
            alert("2", Severity::Medium, false),
            alert("3", Severity::Critical, true),
            alert("4", Severity::High, false),
            alert("5", Severity::Medium, false),
            alert("6", Severity::Critical, false),
        ];
        let borrowed: Vec<String> = ranked(&alerts, AlertFilter::All)
            .iter()
            .map(|a| a.id.clone())
            .collect();

        rank_alerts(&mut alerts);
        let in_place: Vec<String> = alerts.iter().map(|a| a.id.clone()).collect();

        assert_eq!(borrowed, in_place);
        assert_eq!(in_place, vec!["6", "4", "2", "5", "3", "1"]);
    }

    #[test]
    fn test_alert_counts() {
        let alerts = vec![
            alert("1", Severity::Low, true),
            alert("2", Severity::High, false),
        ];
        let counts = AlertCounts::from_alerts(&alerts);
        assert_eq!(counts.active, 1);
        assert_eq!(counts.resolved, 1);
        assert_eq!(counts.for_filter(AlertFilter::All), 2);
    }
}
