//! Summary shapes returned by the analytics operations
//!
//! Scores are rounded to two decimals for presentation; levels are computed
//! from the unrounded score before rounding.

use chrono::{DateTime, Utc};
use nabeeh_domain::{Incident, RiskLevel, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Incident counts per severity; always carries all three levels
pub type SeverityBreakdown = BTreeMap<Severity, usize>;

/// Incident counts per violation type; only observed types appear
pub type ViolationBreakdown = BTreeMap<String, usize>;

/// Nationwide aggregates over the filtered set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationwideSummary {
    /// Composite score over every matching incident
    pub total_risk_score: f64,
    /// Matching incident count
    pub total_incidents: usize,
    /// Distinct inspectors among matching incidents
    pub total_inspectors_impacted: usize,
    /// Distinct ports among matching incidents
    pub total_ports_affected: usize,
    /// Newest matching timestamp
    pub last_incident_at: Option<DateTime<Utc>>,
    /// Counts per severity
    pub incidents_by_severity: SeverityBreakdown,
    /// Counts per violation type
    pub incidents_by_violation: ViolationBreakdown,
}

/// One row of the port list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSummary {
    /// Port id
    pub id: String,
    /// Arabic display name
    pub name_ar: String,
    /// English display name
    pub name_en: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Composite score for the port-scoped set
    pub risk_score: f64,
    /// Level of the composite score
    pub risk_level: RiskLevel,
    /// Matching incident count
    pub incident_count: usize,
    /// Distinct inspectors among matching incidents
    pub unique_inspectors_count: usize,
    /// Newest matching timestamp
    pub last_incident_at: Option<DateTime<Utc>>,
}

/// Ranked inspector entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectorSummary {
    /// Inspector id
    pub id: String,
    /// Composite score of this inspector's incidents
    pub risk_score: f64,
    /// Level of the composite score
    pub risk_level: RiskLevel,
    /// Incident count
    pub incident_count: usize,
    /// Newest incident timestamp
    pub last_incident_at: Option<DateTime<Utc>>,
}

/// Recent incident as listed on a port detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortIncident {
    /// Incident id
    pub id: String,
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// Violation type
    #[serde(rename = "type")]
    pub violation_type: String,
    /// Severity
    pub severity: Severity,
    /// Inspector on duty
    pub inspector_id: String,
    /// Detection confidence
    pub confidence: f64,
}

impl From<&Incident> for PortIncident {
    fn from(incident: &Incident) -> Self {
        Self {
            id: incident.id.clone(),
            timestamp: incident.timestamp,
            violation_type: incident.violation_type.clone(),
            severity: incident.severity,
            inspector_id: incident.inspector_id.clone(),
            confidence: incident.confidence,
        }
    }
}

/// Port summary plus breakdowns and rankings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortDetail {
    /// Same fields as the port list row
    #[serde(flatten)]
    pub summary: PortSummary,
    /// Counts per violation type
    pub violations_breakdown: ViolationBreakdown,
    /// Counts per severity
    pub severity_breakdown: SeverityBreakdown,
    /// Up to ten inspectors with the most incidents
    pub top_inspectors: Vec<InspectorSummary>,
    /// Up to ten newest incidents, newest first
    pub recent_incidents: Vec<PortIncident>,
}

/// Recent incident as listed on an inspector detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectorIncident {
    /// Incident id
    pub id: String,
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// Violation type
    #[serde(rename = "type")]
    pub violation_type: String,
    /// Severity
    pub severity: Severity,
    /// Port where it happened
    pub port_id: String,
    /// Arabic port name, empty if the port is unknown
    pub port_name_ar: String,
    /// English port name, empty if the port is unknown
    pub port_name_en: String,
    /// Detection confidence
    pub confidence: f64,
}

/// Analytics for one inspector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectorDetail {
    /// Inspector id
    pub id: String,
    /// Masked display name
    pub display_name: String,
    /// Composite score
    pub risk_score: f64,
    /// Level of the composite score
    pub risk_level: RiskLevel,
    /// Matching incident count
    pub total_incidents: usize,
    /// Newest matching timestamp
    pub last_incident_at: Option<DateTime<Utc>>,
    /// Counts per violation type
    pub violations_breakdown: ViolationBreakdown,
    /// Counts per severity
    pub severity_breakdown: SeverityBreakdown,
    /// Distinct ports touched, ascending
    pub ports_affected: Vec<String>,
    /// Up to twenty newest incidents, newest first
    pub recent_incidents: Vec<InspectorIncident>,
}

/// Ranked inspectors with the untruncated total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectorList {
    /// Distinct inspectors in the filtered set, before truncation
    pub total_unique_inspectors: usize,
    /// Ranked and truncated entries
    pub inspectors: Vec<InspectorSummary>,
}

/// Per-port heat intensities for map rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    /// `[lat, lng, intensity]`, one per known port
    pub points: Vec<[f64; 3]>,
    /// Window start
    pub from: Option<DateTime<Utc>>,
    /// Window end
    pub to: Option<DateTime<Utc>>,
}

/// Compact KPI block for one port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortKpis {
    /// Port id
    pub port_id: String,
    /// Window start
    pub from: Option<DateTime<Utc>>,
    /// Window end
    pub to: Option<DateTime<Utc>>,
    /// Composite score
    pub risk_score: f64,
    /// Level of the composite score
    pub risk_level: RiskLevel,
    /// Counts per violation type
    pub counts: ViolationBreakdown,
    /// Matching incident count
    pub total_events: usize,
    /// Distinct inspectors among matching incidents
    pub unique_inspectors: usize,
    /// Newest matching timestamp
    pub last_incident_at: Option<DateTime<Utc>>,
}

/// Newest incidents at one port, full records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortIncidents {
    /// Port id
    pub port_id: String,
    /// Window start
    pub from: Option<DateTime<Utc>>,
    /// Window end
    pub to: Option<DateTime<Utc>>,
    /// Newest first, truncated to the requested limit
    pub incidents: Vec<Incident>,
}
