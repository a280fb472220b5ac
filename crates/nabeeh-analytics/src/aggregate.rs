//! Reductions shared by every summary shape
//!
//! All helpers take a filtered slice of borrowed incidents and never reorder
//! or copy the underlying records.

use crate::views::{SeverityBreakdown, ViolationBreakdown};
use chrono::{DateTime, Utc};
use nabeeh_domain::{Incident, Severity};
use std::collections::{HashMap, HashSet};

/// Round a score to two decimals for presentation
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Count of distinct inspector ids
pub fn unique_inspectors(incidents: &[&Incident]) -> usize {
    incidents
        .iter()
        .map(|i| i.inspector_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Distinct port ids, ascending
pub fn distinct_ports(incidents: &[&Incident]) -> Vec<String> {
    let mut ports: Vec<String> = incidents
        .iter()
        .map(|i| i.port_id.as_str())
        .collect::<HashSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    ports.sort();
    ports
}

/// Newest timestamp, or `None` for an empty set
pub fn last_incident_at(incidents: &[&Incident]) -> Option<DateTime<Utc>> {
    incidents.iter().map(|i| i.timestamp).max()
}

/// Counts per severity with every level present
pub fn severity_breakdown(incidents: &[&Incident]) -> SeverityBreakdown {
    let mut counts: SeverityBreakdown = Severity::ALL.into_iter().map(|s| (s, 0)).collect();
    for incident in incidents {
        *counts.entry(incident.severity).or_insert(0) += 1;
    }
    counts
}

/// Counts per observed violation type
pub fn violation_breakdown(incidents: &[&Incident]) -> ViolationBreakdown {
    let mut counts = ViolationBreakdown::new();
    for incident in incidents {
        *counts.entry(incident.violation_type.clone()).or_insert(0) += 1;
    }
    counts
}

/// Group incidents under a key, keeping input order inside each group
pub fn group_by<'a, F>(incidents: &[&'a Incident], key: F) -> HashMap<&'a str, Vec<&'a Incident>>
where
    F: Fn(&'a Incident) -> &'a str,
{
    let mut groups: HashMap<&'a str, Vec<&'a Incident>> = HashMap::new();
    for &incident in incidents {
        groups.entry(key(incident)).or_default().push(incident);
    }
    groups
}

/// Inspectors ranked by incident count, descending
///
/// Ties are broken by inspector id ascending so the ranking does not depend
/// on load order.
pub fn rank_inspectors<'a>(incidents: &[&'a Incident]) -> Vec<(&'a str, Vec<&'a Incident>)> {
    let mut ranked: Vec<_> = group_by(incidents, |i| i.inspector_id.as_str())
        .into_iter()
        .collect();
    ranked.sort_by(|(a_id, a), (b_id, b)| b.len().cmp(&a.len()).then_with(|| a_id.cmp(b_id)));
    ranked
}

/// The `n` newest incidents, newest first; equal timestamps order by id
pub fn most_recent<'a>(incidents: &[&'a Incident], n: usize) -> Vec<&'a Incident> {
    let mut sorted = incidents.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use nabeeh_domain::IncidentSource;

    fn incident(
        id: &str,
        port: &str,
        inspector: &str,
        minutes: i64,
        vtype: &str,
        severity: Severity,
    ) -> Incident {
        Incident::new(
            id,
            port,
            inspector,
            Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes),
            IncidentSource::Video,
            vtype,
            severity,
            0.5,
        )
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(6.2600000001), 6.26);
        assert_eq!(round_score(0.005), 0.01);
        assert_eq!(round_score(0.0), 0.0);
    }

    #[test]
    fn test_breakdowns_on_empty_set() {
        let empty: Vec<&Incident> = Vec::new();
        let severities = severity_breakdown(&empty);
        assert_eq!(severities.len(), 3);
        assert!(severities.values().all(|&c| c == 0));
        assert!(violation_breakdown(&empty).is_empty());
        assert_eq!(last_incident_at(&empty), None);
        assert_eq!(unique_inspectors(&empty), 0);
    }

    #[test]
    fn test_breakdowns() {
        let rows = vec![
            incident("a", "p1", "i1", 0, "smoking", Severity::Low),
            incident("b", "p2", "i1", 5, "smoking", Severity::High),
            incident("c", "p1", "i2", 3, "violence", Severity::High),
        ];
        let refs: Vec<&Incident> = rows.iter().collect();

        let severities = severity_breakdown(&refs);
        assert_eq!(severities[&Severity::Low], 1);
        assert_eq!(severities[&Severity::Medium], 0);
        assert_eq!(severities[&Severity::High], 2);

        let violations = violation_breakdown(&refs);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations["smoking"], 2);
        assert_eq!(violations["violence"], 1);

        assert_eq!(unique_inspectors(&refs), 2);
        assert_eq!(distinct_ports(&refs), vec!["p1", "p2"]);
        assert_eq!(last_incident_at(&refs), Some(rows[1].timestamp));
    }

    #[test]
    fn test_rank_inspectors_tie_break() {
        let rows = vec![
            incident("a", "p1", "i_zed", 0, "smoking", Severity::Low),
            incident("b", "p1", "i_alpha", 1, "smoking", Severity::Low),
            incident("c", "p1", "i_mid", 2, "smoking", Severity::Low),
            incident("d", "p1", "i_mid", 3, "smoking", Severity::Low),
        ];
        let refs: Vec<&Incident> = rows.iter().collect();

        let ranked: Vec<(&str, usize)> = rank_inspectors(&refs)
            .into_iter()
            .map(|(id, group)| (id, group.len()))
            .collect();
        assert_eq!(ranked, vec![("i_mid", 2), ("i_alpha", 1), ("i_zed", 1)]);
    }

    #[test]
    fn test_most_recent() {
        let rows = vec![
            incident("a", "p1", "i1", 10, "smoking", Severity::Low),
            incident("b", "p1", "i1", 30, "smoking", Severity::Low),
            incident("c", "p1", "i1", 20, "smoking", Severity::Low),
            incident("d", "p1", "i1", 30, "smoking", Severity::Low),
        ];
        let refs: Vec<&Incident> = rows.iter().collect();

        let ids: Vec<&str> = most_recent(&refs, 3).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c"]);
        assert!(most_recent(&refs, 0).is_empty());
        assert_eq!(most_recent(&refs, 10).len(), 4);
    }
}
