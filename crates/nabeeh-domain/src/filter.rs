//! Incident filtering
//!
//! A filter is a conjunction of optional predicates. Absent predicates match
//! everything; time bounds are inclusive on both ends.

use crate::incident::{Incident, Severity};
use chrono::{DateTime, Utc};

/// Predicates for narrowing a set of incidents
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use nabeeh_domain::{IncidentFilter, Severity};
///
/// let filter = IncidentFilter::between(
///     Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2026, 10, 2, 0, 0, 0).unwrap(),
/// )
/// .with_port("port_01")
/// .with_severity(Severity::High);
///
/// assert!(filter.is_well_formed());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentFilter {
    /// Inclusive lower time bound
    pub start: Option<DateTime<Utc>>,

    /// Inclusive upper time bound
    pub end: Option<DateTime<Utc>>,

    /// Exact port id
    pub port_id: Option<String>,

    /// Exact inspector id
    pub inspector_id: Option<String>,

    /// Exact violation type wire name
    pub violation_type: Option<String>,

    /// Exact severity
    pub severity: Option<Severity>,
}

impl IncidentFilter {
    /// Filter over the closed window `[start, end]`
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    /// Restrict to one port
    pub fn with_port(mut self, port_id: impl Into<String>) -> Self {
        self.port_id = Some(port_id.into());
        self
    }

    /// Restrict to one inspector
    pub fn with_inspector(mut self, inspector_id: impl Into<String>) -> Self {
        self.inspector_id = Some(inspector_id.into());
        self
    }

    /// Restrict to one violation type
    pub fn with_violation_type(mut self, violation_type: impl Into<String>) -> Self {
        self.violation_type = Some(violation_type.into());
        self
    }

    /// Restrict to one severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// False only when both bounds are set and `start > end`
    ///
    /// The filter itself tolerates an inverted window (it matches nothing);
    /// callers at the boundary use this to reject the request instead.
    pub fn is_well_formed(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }

    /// Whether a single incident satisfies every present predicate
    pub fn matches(&self, incident: &Incident) -> bool {
        if let Some(start) = self.start {
            if incident.timestamp < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if incident.timestamp > end {
                return false;
            }
        }
        if let Some(port_id) = &self.port_id {
            if &incident.port_id != port_id {
                return false;
            }
        }
        if let Some(inspector_id) = &self.inspector_id {
            if &incident.inspector_id != inspector_id {
                return false;
            }
        }
        if let Some(violation_type) = &self.violation_type {
            if &incident.violation_type != violation_type {
                return false;
            }
        }
        if let Some(severity) = self.severity {
            if incident.severity != severity {
                return false;
            }
        }
        true
    }

    /// Matching incidents in input order
    pub fn apply<'a>(&self, incidents: &'a [Incident]) -> Vec<&'a Incident> {
        incidents.iter().filter(|i| self.matches(i)).collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::incident::IncidentSource;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn arb_incidents() -> impl Strategy<Value = Vec<Incident>> {
        prop::collection::vec((0i64..500, 0u8..4, 0u8..4), 0..60).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(n, (minutes, port, inspector))| {
                    Incident::new(
                        format!("evt_{}", n),
                        format!("port_{}", port),
                        format!("insp_{}", inspector),
                        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
                            + Duration::minutes(minutes),
                        IncidentSource::Audio,
                        "shouting",
                        Severity::Medium,
                        0.5,
                    )
                })
                .collect()
        })
    }

    proptest! {
        /// Property: every result lies inside the window and the port predicate
        #[test]
        fn test_results_satisfy_predicates(
            incidents in arb_incidents(),
            a in 0i64..500,
            b in 0i64..500,
            port in 0u8..4,
        ) {
            let origin = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
            let (start, end) = (origin + Duration::minutes(a), origin + Duration::minutes(b));
            let port_id = format!("port_{}", port);
            let filter = IncidentFilter::between(start, end).with_port(port_id.clone());

            let found = filter.apply(&incidents);
            for incident in &found {
                prop_assert!(start <= incident.timestamp && incident.timestamp <= end);
                prop_assert_eq!(&incident.port_id, &port_id);
            }

            let expected = incidents
                .iter()
                .filter(|i| start <= i.timestamp && i.timestamp <= end && i.port_id == port_id)
                .count();
            prop_assert_eq!(found.len(), expected);
        }

        /// Property: filtering preserves input order
        #[test]
        fn test_filter_is_stable(incidents in arb_incidents(), port in 0u8..4) {
            let found = IncidentFilter::default()
                .with_port(format!("port_{}", port))
                .apply(&incidents);
            let positions: Vec<usize> = found
                .iter()
                .map(|f| incidents.iter().position(|i| i.id == f.id).unwrap_or(usize::MAX))
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
