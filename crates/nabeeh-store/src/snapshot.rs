//! Snapshot file format and load-time validation

use crate::StoreError;
use nabeeh_domain::{Incident, Inspector, Port, ViolationType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Serialized form of the three tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Port reference table
    #[serde(default)]
    pub ports: Vec<Port>,

    /// Inspector reference table
    #[serde(default)]
    pub inspectors: Vec<Inspector>,

    /// Incident records
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

impl Snapshot {
    /// Check the invariants the core relies on
    ///
    /// - ids are unique within each table
    /// - inspectors reference known ports
    /// - incidents reference a known port and inspector
    /// - incident confidence is within [0, 1]
    ///
    /// Unknown violation types are allowed; the scorer gives them the
    /// default weight.
    pub fn validate(&self) -> Result<(), StoreError> {
        let port_ids = unique_ids("port", self.ports.iter().map(|p| p.id.as_str()))?;
        let inspector_ids =
            unique_ids("inspector", self.inspectors.iter().map(|i| i.id.as_str()))?;
        unique_ids("incident", self.incidents.iter().map(|i| i.id.as_str()))?;

        for inspector in &self.inspectors {
            if !port_ids.contains(inspector.port_id.as_str()) {
                return Err(StoreError::DanglingReference {
                    kind: "inspector",
                    id: inspector.id.clone(),
                    target: "port",
                    target_id: inspector.port_id.clone(),
                });
            }
        }

        for incident in &self.incidents {
            if !incident.has_valid_confidence() {
                return Err(StoreError::ConfidenceOutOfRange {
                    id: incident.id.clone(),
                    value: incident.confidence,
                });
            }
            if !port_ids.contains(incident.port_id.as_str()) {
                return Err(StoreError::DanglingReference {
                    kind: "incident",
                    id: incident.id.clone(),
                    target: "port",
                    target_id: incident.port_id.clone(),
                });
            }
            if !inspector_ids.contains(incident.inspector_id.as_str()) {
                return Err(StoreError::DanglingReference {
                    kind: "incident",
                    id: incident.id.clone(),
                    target: "inspector",
                    target_id: incident.inspector_id.clone(),
                });
            }
        }

        let report = self.taxonomy_report();
        if report.unknown_types > 0 {
            warn!(
                count = report.unknown_types,
                "Snapshot contains incidents with violation types outside the taxonomy"
            );
        }
        if report.channel_mismatches > 0 {
            warn!(
                count = report.channel_mismatches,
                "Snapshot contains incidents whose source disagrees with their violation type"
            );
        }

        Ok(())
    }

    /// Count incidents that do not line up with the violation taxonomy
    ///
    /// Neither condition fails a load; both are reported as warnings.
    pub fn taxonomy_report(&self) -> TaxonomyReport {
        let mut report = TaxonomyReport::default();
        for incident in &self.incidents {
            match ViolationType::parse(&incident.violation_type) {
                None => report.unknown_types += 1,
                Some(known) if known.source() != incident.source => {
                    debug!(
                        id = %incident.id,
                        source = incident.source.as_str(),
                        expected = known.source().as_str(),
                        "Incident source disagrees with violation type"
                    );
                    report.channel_mismatches += 1;
                }
                Some(_) => {}
            }
        }
        report
    }
}

/// Taxonomy anomalies found in a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxonomyReport {
    /// Incidents whose type is outside the taxonomy
    pub unknown_types: usize,
    /// Known-type incidents recorded on the other detection channel
    pub channel_mismatches: usize,
}

fn unique_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<HashSet<&'a str>, StoreError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::Duplicate {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(seen)
}
