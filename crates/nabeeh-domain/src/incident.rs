//! Incident module - the unit every score is built from

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Detection channel that produced an incident
///
/// Informational only; the scorer never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentSource {
    /// Camera feed
    Video,
    /// Microphone feed
    Audio,
}

impl IncidentSource {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentSource::Video => "video",
            IncidentSource::Audio => "audio",
        }
    }
}

/// Ordinal severity assigned to an incident, independent of its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Minor incident
    Low,
    /// Notable incident
    Medium,
    /// Serious incident
    High,
}

impl Severity {
    /// All severities in ascending order
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    /// Get the severity name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }

    /// Parse a severity (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOW" => Some(Severity::Low),
            "MEDIUM" => Some(Severity::Medium),
            "HIGH" => Some(Severity::High),
            _ => None,
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid severity: {}", s))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected violation at a port
///
/// Incidents are immutable once loaded. `violation_type` is kept as the raw
/// string so that types outside the taxonomy survive ingestion and are scored
/// with the default weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Opaque unique identifier
    pub id: String,

    /// Port where the incident was detected
    pub port_id: String,

    /// Inspector on duty when the incident was detected
    pub inspector_id: String,

    /// When the incident occurred
    pub timestamp: DateTime<Utc>,

    /// Detection channel
    pub source: IncidentSource,

    /// Violation type (see [`crate::ViolationType`])
    #[serde(rename = "type")]
    pub violation_type: String,

    /// Severity tier
    pub severity: Severity,

    /// Detection confidence in [0, 1]
    pub confidence: f64,

    /// Optional free-text note from the detector
    #[serde(default)]
    pub short_description: Option<String>,
}

impl Incident {
    /// Create a new incident without a description
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        port_id: impl Into<String>,
        inspector_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        source: IncidentSource,
        violation_type: impl Into<String>,
        severity: Severity,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            port_id: port_id.into(),
            inspector_id: inspector_id.into(),
            timestamp,
            source,
            violation_type: violation_type.into(),
            severity,
            confidence,
            short_description: None,
        }
    }

    /// Whether the confidence lies in the closed unit interval
    pub fn has_valid_confidence(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Incident {
        Incident::new(
            "evt_1",
            "port_01",
            "insp_01",
            Utc.with_ymd_and_hms(2026, 10, 1, 8, 30, 0).unwrap(),
            IncidentSource::Video,
            "violence",
            Severity::High,
            0.9,
        )
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse("medium"), Some(Severity::Medium));
        assert_eq!(Severity::parse("Low"), Some(Severity::Low));
        assert_eq!(Severity::parse("CRITICAL"), None);
        assert!("".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_confidence_bounds() {
        let mut incident = sample();
        assert!(incident.has_valid_confidence());

        incident.confidence = 0.0;
        assert!(incident.has_valid_confidence());
        incident.confidence = 1.0;
        assert!(incident.has_valid_confidence());

        incident.confidence = 1.01;
        assert!(!incident.has_valid_confidence());
        incident.confidence = f64::NAN;
        assert!(!incident.has_valid_confidence());
    }
}
