//! Risk scoring
//!
//! Each incident contributes `weight(type) * multiplier(severity) * confidence`.
//! A composite score is the sum of contributions over a set of incidents, and
//! the composite maps onto a [`RiskLevel`] through two fixed thresholds.
//!
//! Lookups never fail: an unknown violation type scores with
//! [`DEFAULT_VIOLATION_WEIGHT`] and a severity missing from the multiplier
//! table scores with [`DEFAULT_SEVERITY_MULTIPLIER`], so one odd record cannot
//! abort an aggregate.

use crate::incident::{Incident, Severity};
use crate::violation::ViolationType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Weight for violation types outside the table
pub const DEFAULT_VIOLATION_WEIGHT: f64 = 1.0;

/// Multiplier for severities outside the table (same as LOW)
pub const DEFAULT_SEVERITY_MULTIPLIER: f64 = 0.3;

/// Composite score at or above which a set is HIGH risk
pub const HIGH_RISK_THRESHOLD: f64 = 25.0;

/// Composite score at or above which a set is MEDIUM risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 10.0;

/// Discrete risk level derived from a composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Below the medium threshold
    Low,
    /// Between the medium and high thresholds
    Medium,
    /// At or above the high threshold
    High,
}

impl RiskLevel {
    /// Get the level name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup tables and thresholds for the scorer
///
/// Passed into [`RiskScorer::new`]; nothing reads global state, so tests can
/// build a scorer over alternate tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Weight per violation type wire name
    pub weights: HashMap<String, f64>,
    /// Weight for types missing from `weights`
    pub default_weight: f64,
    /// Multiplier per severity
    pub severity_multipliers: HashMap<Severity, f64>,
    /// Multiplier for severities missing from `severity_multipliers`
    pub default_multiplier: f64,
    /// Lower bound of the HIGH tier
    pub high_threshold: f64,
    /// Lower bound of the MEDIUM tier
    pub medium_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let weights = [
            (ViolationType::Violence, 5.0),
            (ViolationType::AbusiveLanguage, 4.0),
            (ViolationType::CameraBlocking, 3.0),
            (ViolationType::CameraMisuse, 3.0),
            (ViolationType::CameraShake, 2.0),
            (ViolationType::Smoking, 2.0),
            (ViolationType::Shouting, 2.0),
        ]
        .into_iter()
        .map(|(v, w)| (v.as_str().to_string(), w))
        .collect();

        let severity_multipliers = HashMap::from([
            (Severity::High, 1.0),
            (Severity::Medium, 0.6),
            (Severity::Low, 0.3),
        ]);

        Self {
            weights,
            default_weight: DEFAULT_VIOLATION_WEIGHT,
            severity_multipliers,
            default_multiplier: DEFAULT_SEVERITY_MULTIPLIER,
            high_threshold: HIGH_RISK_THRESHOLD,
            medium_threshold: MEDIUM_RISK_THRESHOLD,
        }
    }
}

impl ScoringConfig {
    /// Largest weight in the table (or the default weight, if larger)
    ///
    /// Upper bound of any single contribution, since multipliers and
    /// confidence are at most 1.0 in the default tables.
    pub fn max_weight(&self) -> f64 {
        self.weights
            .values()
            .copied()
            .fold(self.default_weight, f64::max)
    }
}

/// Deterministic incident scorer
///
/// # Examples
///
/// ```
/// use nabeeh_domain::{RiskLevel, RiskScorer};
///
/// let scorer = RiskScorer::default();
/// assert_eq!(scorer.weight_for("violence"), 5.0);
/// assert_eq!(scorer.weight_for("loitering"), 1.0);
/// assert_eq!(scorer.risk_level(10.0), RiskLevel::Medium);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    /// Create a scorer over the given tables
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Tables in use
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Weight for a violation type, falling back to the default weight
    pub fn weight_for(&self, violation_type: &str) -> f64 {
        self.config
            .weights
            .get(violation_type)
            .copied()
            .unwrap_or(self.config.default_weight)
    }

    /// Multiplier for a severity, falling back to the default multiplier
    pub fn multiplier_for(&self, severity: Severity) -> f64 {
        self.config
            .severity_multipliers
            .get(&severity)
            .copied()
            .unwrap_or(self.config.default_multiplier)
    }

    /// Contribution of a single incident
    pub fn contribution(&self, incident: &Incident) -> f64 {
        self.weight_for(&incident.violation_type)
            * self.multiplier_for(incident.severity)
            * incident.confidence
    }

    /// Sum of contributions; `0.0` for an empty collection
    pub fn composite_score<'a, I>(&self, incidents: I) -> f64
    where
        I: IntoIterator<Item = &'a Incident>,
    {
        incidents
            .into_iter()
            .map(|incident| self.contribution(incident))
            .sum()
    }

    /// Map a composite score onto a risk level
    ///
    /// Boundary values belong to the higher tier.
    pub fn risk_level(&self, score: f64) -> RiskLevel {
        if score >= self.config.high_threshold {
            RiskLevel::High
        } else if score >= self.config.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Composite score and its level in one pass
    pub fn assess<'a, I>(&self, incidents: I) -> (f64, RiskLevel)
    where
        I: IntoIterator<Item = &'a Incident>,
    {
        let score = self.composite_score(incidents);
        (score, self.risk_level(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::IncidentSource;
    use chrono::{TimeZone, Utc};

    fn incident(violation_type: &str, severity: Severity, confidence: f64) -> Incident {
        Incident::new(
            format!("evt_{}_{}", violation_type, confidence),
            "port_01",
            "insp_01",
            Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap(),
            IncidentSource::Video,
            violation_type,
            severity,
            confidence,
        )
    }

    #[test]
    fn test_default_weight_table() {
        let scorer = RiskScorer::default();
        assert_eq!(scorer.weight_for("violence"), 5.0);
        assert_eq!(scorer.weight_for("abusive_language"), 4.0);
        assert_eq!(scorer.weight_for("camera_blocking"), 3.0);
        assert_eq!(scorer.weight_for("camera_misuse"), 3.0);
        assert_eq!(scorer.weight_for("camera_shake"), 2.0);
        assert_eq!(scorer.weight_for("smoking"), 2.0);
        assert_eq!(scorer.weight_for("shouting"), 2.0);
    }

    #[test]
    fn test_unknown_type_uses_default_weight() {
        let scorer = RiskScorer::default();
        assert_eq!(scorer.weight_for("loitering"), DEFAULT_VIOLATION_WEIGHT);
        assert_eq!(scorer.weight_for(""), DEFAULT_VIOLATION_WEIGHT);

        let c = scorer.contribution(&incident("loitering", Severity::High, 0.5));
        assert!((c - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_severity_multipliers() {
        let scorer = RiskScorer::default();
        assert_eq!(scorer.multiplier_for(Severity::High), 1.0);
        assert_eq!(scorer.multiplier_for(Severity::Medium), 0.6);
        assert_eq!(scorer.multiplier_for(Severity::Low), 0.3);
    }

    #[test]
    fn test_missing_severity_uses_default_multiplier() {
        let mut config = ScoringConfig::default();
        config.severity_multipliers.remove(&Severity::High);
        let scorer = RiskScorer::new(config);

        assert_eq!(scorer.multiplier_for(Severity::High), DEFAULT_SEVERITY_MULTIPLIER);
        assert_eq!(scorer.multiplier_for(Severity::Medium), 0.6);
    }

    #[test]
    fn test_worked_example() {
        let scorer = RiskScorer::default();
        let incidents = vec![
            incident("violence", Severity::High, 1.0),
            incident("smoking", Severity::Low, 0.5),
            incident("shouting", Severity::Medium, 0.8),
        ];

        assert!((scorer.contribution(&incidents[0]) - 5.0).abs() < 1e-9);
        assert!((scorer.contribution(&incidents[1]) - 0.3).abs() < 1e-9);
        assert!((scorer.contribution(&incidents[2]) - 0.96).abs() < 1e-9);

        let (score, level) = scorer.assess(&incidents);
        assert!((score - 6.26).abs() < 1e-9);
        assert_eq!(level, RiskLevel::Low);
    }

    #[test]
    fn test_empty_composite_is_zero() {
        let scorer = RiskScorer::default();
        let empty: Vec<Incident> = Vec::new();
        assert_eq!(scorer.composite_score(&empty), 0.0);
        assert_eq!(scorer.risk_level(0.0), RiskLevel::Low);
    }

    #[test]
    fn test_risk_level_boundaries() {
        let scorer = RiskScorer::default();
        assert_eq!(scorer.risk_level(9.99), RiskLevel::Low);
        assert_eq!(scorer.risk_level(10.0), RiskLevel::Medium);
        assert_eq!(scorer.risk_level(24.99), RiskLevel::Medium);
        assert_eq!(scorer.risk_level(25.0), RiskLevel::High);
        assert_eq!(scorer.risk_level(1_000.0), RiskLevel::High);
    }

    #[test]
    fn test_alternate_thresholds() {
        let config = ScoringConfig {
            high_threshold: 2.0,
            medium_threshold: 1.0,
            ..ScoringConfig::default()
        };
        let scorer = RiskScorer::new(config);
        assert_eq!(scorer.risk_level(0.99), RiskLevel::Low);
        assert_eq!(scorer.risk_level(1.0), RiskLevel::Medium);
        assert_eq!(scorer.risk_level(2.0), RiskLevel::High);
    }

    #[test]
    fn test_max_weight() {
        assert_eq!(ScoringConfig::default().max_weight(), 5.0);

        let config = ScoringConfig {
            weights: HashMap::new(),
            ..ScoringConfig::default()
        };
        assert_eq!(config.max_weight(), DEFAULT_VIOLATION_WEIGHT);
    }

    #[test]
    fn test_risk_level_wire_names() {
        assert_eq!(RiskLevel::Low.as_str(), "LOW");
        assert_eq!(RiskLevel::Medium.to_string(), "MEDIUM");
        assert_eq!(RiskLevel::High.as_str(), "HIGH");
    }
}
